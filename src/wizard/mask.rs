//! Input masks for fixed-position numeric fields.
//!
//! A mask is a literal pattern where every `0` is a digit slot and any other
//! character is a separator inserted automatically. Raw keystrokes are
//! interleaved into the slots; anything that isn't a digit is discarded.

/// One position of a mask pattern.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Digit,
    Literal(char),
}

/// A fixed-position display pattern such as `000.000.000-00`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pattern: &'static str,
    slots: Vec<Slot>,
}

pub const CPF_PATTERN: &str = "000.000.000-00";
pub const RG_PATTERN: &str = "00.000.000-0";
pub const DATE_PATTERN: &str = "00/00/0000";
pub const CEP_PATTERN: &str = "00000-000";
pub const PHONE_PATTERN: &str = "(00) 00000-0000";

impl Mask {
    /// Build a mask from a pattern where `0` marks a digit slot.
    ///
    pub fn new(pattern: &'static str) -> Self {
        let slots = pattern
            .chars()
            .map(|c| if c == '0' { Slot::Digit } else { Slot::Literal(c) })
            .collect();
        Mask { pattern, slots }
    }

    pub fn cpf() -> Self {
        Mask::new(CPF_PATTERN)
    }

    pub fn rg() -> Self {
        Mask::new(RG_PATTERN)
    }

    pub fn date() -> Self {
        Mask::new(DATE_PATTERN)
    }

    pub fn cep() -> Self {
        Mask::new(CEP_PATTERN)
    }

    pub fn phone() -> Self {
        Mask::new(PHONE_PATTERN)
    }

    /// The literal pattern, usable as a placeholder.
    ///
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    /// Number of digit slots in the pattern.
    ///
    pub fn digit_capacity(&self) -> usize {
        self.slots.iter().filter(|s| **s == Slot::Digit).count()
    }

    /// Format raw input into the display pattern.
    ///
    /// Separators are only emitted while there are digits left to place, so a
    /// partially typed value never ends in a dangling separator. Digits beyond
    /// the pattern's capacity are dropped.
    ///
    pub fn apply(&self, raw: &str) -> String {
        let mut digits = raw.chars().filter(char::is_ascii_digit).peekable();
        let mut output = String::with_capacity(self.pattern.len());
        for slot in &self.slots {
            if digits.peek().is_none() {
                break;
            }
            match slot {
                Slot::Digit => {
                    if let Some(d) = digits.next() {
                        output.push(d);
                    }
                }
                Slot::Literal(c) => output.push(*c),
            }
        }
        output
    }

    /// Whether `value` fills every slot of the pattern.
    ///
    pub fn is_complete(&self, value: &str) -> bool {
        strip(value).len() == self.digit_capacity()
    }
}

/// Reduce a masked value back to its raw digits.
///
pub fn strip(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Count the digits of a value regardless of punctuation.
///
pub fn digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}
