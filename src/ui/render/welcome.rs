use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub const BANNER: &str = r"
  ___                   _    _           _
 | _ \ _ _  ___   ___  | |  | | ___  _ _(_)_ __ ___  _ _  ___
 |  _/| '_|/ -_) |___| | |__| |/ _ \| '_| | '_ \/ _ \| ' \/ _ \
 |_|  |_|  \___|       |____|_|\___/|_| |_| .__/\___/|_||_\___/
                                          |_|
";

pub const HOME_CONTENT: &str = "
 Bem-vindo à pré-matrícula escolar.

 O cadastro tem cinco etapas: dados do aluno, responsável materno,
 responsável paterno, observações e composição familiar. Os dados só
 são enviados ao final, depois de aceitar os termos de uso.

 Tenha em mãos CPF, RG e certidão de nascimento do aluno.
";

pub const COMPLETED_CONTENT: &str = "
 Cadastro completo realizado!

 Envie os documentos do aluno para a secretaria da escola.
";

/// Render the home screen.
///
pub fn render_home(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Início")
        .border_style(styling::active_block_border_style(theme));
    frame.render_widget(block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .margin(1)
        .split(size);

    let banner = Paragraph::new(Text::from(BANNER)).style(styling::banner_style(theme));
    frame.render_widget(banner, rows[0]);

    let content = Paragraph::new(Text::from(HOME_CONTENT))
        .style(styling::normal_text_style(theme))
        .wrap(Wrap { trim: false });
    frame.render_widget(content, rows[1]);

    let actions = vec![
        action_line(state, "Enter", "iniciar nova matrícula"),
        action_line(state, "s", "solicitar alteração de dados"),
        action_line(state, "t", "termos de uso"),
        action_line(state, "q", "sair"),
    ];
    frame.render_widget(Paragraph::new(actions), rows[2]);
}

/// Render the screen shown after a successful submission.
///
pub fn render_completed(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Concluído")
        .border_style(
            styling::active_block_border_style(theme).fg(theme.success.to_color()),
        );

    let mut lines: Vec<Line> = COMPLETED_CONTENT
        .lines()
        .map(|line| Line::styled(line, styling::normal_text_style(theme)))
        .collect();
    lines.push(Line::from(""));
    lines.push(action_line(state, "d", "link para envio dos documentos"));
    lines.push(action_line(state, "Enter", "voltar ao início"));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, size);
}

fn action_line(state: &State, key: &str, description: &str) -> Line<'static> {
    let theme = state.get_theme();
    Line::from(vec![
        Span::styled(
            format!(" {:>5} ", key),
            styling::active_block_title_style().fg(theme.primary.to_color()),
        ),
        Span::styled(description.to_string(), styling::muted_text_style(theme)),
    ])
}
