use super::Frame;
use crate::state::{Dialog, State};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Render a dialog centered over the given area.
///
pub fn dialog(frame: &mut Frame, size: Rect, dialog: &Dialog, state: &State) {
    let theme = state.get_theme();
    let height = if matches!(dialog, Dialog::Blocked(_)) { 70 } else { 40 };
    let popup_area = centered_rect(70, height, size);

    // Clear the area first so the screen below does not bleed through
    frame.render_widget(Clear, popup_area);

    let color = match dialog {
        Dialog::Blocked(_) => theme.warning.to_color(),
        Dialog::Error(_) => theme.error.to_color(),
        Dialog::Consent | Dialog::Info { .. } => theme.primary.to_color(),
    };

    let mut text = vec![Line::from("")];
    text.extend(dialog.body().lines().map(|line| {
        Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(theme.text.to_color()),
        ))
    }));
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        dialog.controls(),
        Style::default().fg(theme.text_muted.to_color()),
    )));

    let alignment = match dialog {
        Dialog::Blocked(_) => Alignment::Left,
        _ => Alignment::Center,
    };
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    format!(" {} ", dialog.title()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
        )
        .alignment(alignment)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rectangle.
///
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
