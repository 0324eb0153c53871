use super::Frame;
use crate::state::{State, View};
use crate::ui::widgets::styling;
use crate::wizard::Screen;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Mode badge and key hints for the current state.
///
fn controls(state: &State) -> (&'static str, &'static str) {
    if let Some(dialog) = state.get_dialog() {
        return ("DIALOG:", dialog.controls());
    }
    if state.current_view() == View::ChangeRequest {
        return (
            "REQUEST:",
            " Digite a solicitação, Enter: gerar link, Esc: voltar",
        );
    }
    if state.is_submitting() {
        return ("SENDING:", " Aguardando o servidor, Ctrl+C: sair");
    }
    match state.current_screen() {
        Screen::Home => (
            "HOME:",
            " Enter: iniciar, s: solicitações, t: termos, q: sair",
        ),
        Screen::Completed => ("DONE:", " d: link dos documentos, Enter: início"),
        Screen::Household => (
            "STEP:",
            " Tab/Shift+Tab: navegar, ←/→: escolher, Enter: enviar cadastro, Esc: voltar",
        ),
        _ => (
            "STEP:",
            " Tab/Shift+Tab: navegar, ←/→: escolher, Espaço: ativar seção, Enter: avançar, Esc: voltar, Ctrl+E: documentos",
        ),
    }
}

/// Render footer widget.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let (badge, controls_text) = controls(state);
    let badge_color = if state.has_dialog() {
        &theme.footer_dialog
    } else if state.current_view() == View::ChangeRequest {
        &theme.footer_request
    } else if state.is_submitting() {
        &theme.footer_submit
    } else if state.current_screen().is_step() {
        &theme.footer_step
    } else {
        &theme.footer_home
    };

    let controls_content = Line::from(vec![
        Span::styled(badge, styling::badge_style(theme, badge_color)),
        Span::styled(controls_text, Style::default().fg(theme.warning.to_color())),
    ]);
    let controls_widget = Paragraph::new(controls_content).alignment(Alignment::Left);

    let right_content = Line::from(vec![Span::styled(
        format!(" {}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(theme.secondary.to_color()),
    )]);
    let right_content_width = right_content.width();
    let right_widget = Paragraph::new(right_content).alignment(Alignment::Right);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(right_content_width.try_into().unwrap_or(0)),
        ])
        .split(size);

    frame.render_widget(controls_widget, columns[0]);
    frame.render_widget(right_widget, columns[1]);
}
