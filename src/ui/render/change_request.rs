use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const INSTRUCTIONS: &str = "Descreva quais dados devem ser alterados. Ao confirmar, \
será gerado um link de e-mail para a secretaria com a sua solicitação.";

/// Render the data change request editor.
///
pub fn change_request(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(size);

    let instructions = Paragraph::new(INSTRUCTIONS)
        .style(styling::normal_text_style(theme))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Solicitações")
                .border_style(styling::normal_block_border_style(theme)),
        );
    frame.render_widget(instructions, rows[0]);

    let text = state.get_change_request();
    let (content, style) = if text.is_empty() {
        (
            "Digite aqui...".to_string(),
            styling::muted_text_style(theme),
        )
    } else {
        (format!("{}▏", text), styling::normal_text_style(theme))
    };
    let input = Paragraph::new(content)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Solicitação (Enter: gerar link, Alt+Enter: nova linha, Esc: voltar)")
                .border_style(styling::active_block_border_style(theme)),
        );
    frame.render_widget(input, rows[1]);
}
