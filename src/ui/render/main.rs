use super::{change_request, dialog, form, welcome, Frame};
use crate::state::{State, View};
use crate::wizard::Screen;
use ratatui::layout::Rect;

/// Render main widget according to state.
///
pub fn main(frame: &mut Frame, size: Rect, state: &mut State) {
    match (state.current_view(), state.current_screen()) {
        (View::ChangeRequest, _) => change_request::change_request(frame, size, state),
        (View::Wizard, Screen::Home) => welcome::render_home(frame, size, state),
        (View::Wizard, Screen::Completed) => welcome::render_completed(frame, size, state),
        (View::Wizard, _) => form::form(frame, size, state),
    }

    // Dialogs are drawn on top of everything
    if let Some(current) = state.get_dialog() {
        dialog::dialog(frame, size, current, state);
    }
}
