use super::Frame;
use crate::state::{State, View};
use crate::ui::widgets::{spinner, styling};
use crate::wizard::Screen;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const APP_TITLE: &str = "Pré-matrícula";

/// Render the title bar with the step progress.
///
pub fn header(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let screen = state.current_screen();

    let mut spans = vec![Span::styled(
        format!(" {} ", APP_TITLE),
        styling::banner_style(theme).add_modifier(ratatui::style::Modifier::BOLD),
    )];
    let subtitle = match (state.current_view(), screen) {
        (View::ChangeRequest, _) => Some("Solicitação de alteração de dados".to_string()),
        (_, Screen::Home) => None,
        (_, Screen::Completed) => Some("Cadastro enviado".to_string()),
        (_, step) => state.get_wizard().form().map(|form| {
            format!(
                "Etapa {} de {}: {}",
                step.position().unwrap_or_default(),
                Screen::STEPS.len(),
                form.kind().title()
            )
        }),
    };
    if let Some(subtitle) = subtitle {
        spans.push(Span::styled(
            format!("| {}", subtitle),
            styling::normal_text_style(theme),
        ));
    }
    if state.is_submitting() {
        spans.push(Span::styled(
            format!("  {} enviando...", spinner::frame(state)),
            styling::muted_text_style(theme),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), size);
}
