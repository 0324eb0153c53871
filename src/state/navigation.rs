//! Navigation-related state types.
//!
//! This module contains the views of the front end and the items that can
//! hold focus inside a step form.

use crate::wizard::Field;

/// Specifying the different views.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum View {
    Wizard,
    ChangeRequest,
}

/// Something on a step screen that can take keyboard focus.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Focusable {
    /// The "has guardian" switch of a guardian step
    Toggle,
    Field(Field),
}

impl Focusable {
    pub fn field(&self) -> Option<Field> {
        match self {
            Focusable::Toggle => None,
            Focusable::Field(field) => Some(*field),
        }
    }
}
