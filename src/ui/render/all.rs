use super::{footer, header, log, main, Frame};
use crate::state::State;
use ratatui::layout::{Constraint, Direction, Layout};

/// Terminals shorter than this get no log pane.
///
const MIN_HEIGHT_FOR_LOG: u16 = 24;

/// Render all widgets according to state.
///
pub fn all(frame: &mut Frame, state: &mut State) {
    let show_log = state.get_terminal_size().height >= MIN_HEIGHT_FOR_LOG;
    let constraints = if show_log {
        vec![
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(7),
            Constraint::Length(1),
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ]
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.size());

    header(frame, rows[0], state);
    main(frame, rows[1], state);
    if show_log {
        log(frame, rows[2], state);
        footer(frame, rows[3], state);
    } else {
        footer(frame, rows[2], state);
    }
}
