use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Braille frames cycled while a submission is in flight.
///
pub const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Current frame for the state's spinner index.
///
pub fn frame(state: &State) -> &'static str {
    FRAMES[*state.get_spinner_index() % FRAMES.len()]
}

/// Return a centered spinner with a label, padded to the middle of an area of
/// the given height.
///
pub fn widget(state: &State, label: &str, height: u16) -> Paragraph<'static> {
    let theme = state.get_theme();
    let mut lines = vec![Line::from(""); (height / 2).saturating_sub(1) as usize];
    lines.push(Line::from(vec![
        Span::styled(
            format!("{} ", frame(state)),
            styling::active_block_title_style().fg(theme.primary.to_color()),
        ),
        Span::styled(label.to_string(), styling::normal_text_style(theme)),
    ]));
    Paragraph::new(lines).alignment(Alignment::Center)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_follows_spinner_index() {
        let mut state = State::default();
        assert_eq!(frame(&state), FRAMES[0]);
        state.advance_spinner_index().advance_spinner_index();
        assert_eq!(frame(&state), FRAMES[2]);
    }
}
