use super::Frame;
use crate::state::{Focusable, State};
use crate::ui::theme::Theme;
use crate::ui::widgets::styling;
use crate::wizard::records::NOT_INFORMED;
use crate::wizard::validators::Rule;
use crate::wizard::{Field, FormView};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

/// Width of the label column.
///
const LABEL_WIDTH: usize = 34;

/// Render the form of the current step.
///
pub fn form(frame: &mut Frame, size: Rect, state: &State) {
    let Some(form) = state.get_wizard().form() else {
        return;
    };
    let theme = state.get_theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            form.kind().title(),
            styling::active_block_title_style(),
        ))
        .border_style(styling::active_block_border_style(theme));
    let inner = block.inner(size);
    frame.render_widget(block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let focused = state.focused();
    let items: Vec<ListItem> = state
        .focusables()
        .into_iter()
        .map(|item| {
            let is_focused = focused == Some(item);
            match item {
                Focusable::Toggle => toggle_item(form, theme, is_focused),
                Focusable::Field(field) => field_item(form, field, theme, is_focused),
            }
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(
        focused.and_then(|f| state.focusables().iter().position(|item| *item == f)),
    );
    frame.render_stateful_widget(List::new(items), rows[0], &mut list_state);

    let hint = if form.has_toggle() && !form.section_active() {
        format!(
            "Seção desativada: será enviada como \"{}\". Espaço ativa a seção.",
            NOT_INFORMED
        )
    } else {
        "Campos com * são obrigatórios.".to_string()
    };
    let hint = Paragraph::new(hint)
        .style(styling::muted_text_style(theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(hint, rows[1]);
}

fn toggle_item(form: &dyn FormView, theme: &Theme, focused: bool) -> ListItem<'static> {
    let mark = if form.section_active() { "[x]" } else { "[ ]" };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", mark), styling::label_style(theme)),
        Span::styled(
            format!("Informar {}", form.kind().title()),
            styling::normal_text_style(theme),
        ),
    ]);
    let item = ListItem::new(Text::from(vec![line, Line::from("")]));
    if focused {
        item.style(styling::focused_item_style(theme))
    } else {
        item
    }
}

fn field_item(form: &dyn FormView, field: Field, theme: &Theme, focused: bool) -> ListItem<'static> {
    let required = if field.rule() == Rule::Optional { " " } else { "*" };
    let label = format!(" {}{}", field.label(), required);
    let (value, value_style) = display_value(form, field, theme);

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{:<width$}", label, width = LABEL_WIDTH),
            styling::label_style(theme),
        ),
        Span::styled(value, value_style),
    ])];
    if let Some(message) = form.error(field) {
        lines.push(Line::from(Span::styled(
            format!("{:<width$}{}", "", message, width = LABEL_WIDTH),
            styling::error_text_style(theme),
        )));
    }

    let item = ListItem::new(Text::from(lines));
    if focused {
        item.style(styling::focused_item_style(theme))
    } else {
        item
    }
}

/// Text shown in the value column: the typed value, the selected option's
/// label, or a placeholder.
///
fn display_value(form: &dyn FormView, field: Field, theme: &Theme) -> (String, ratatui::style::Style) {
    let value = form.value(field);
    if let Some(options) = field.options() {
        return match options.iter().find(|o| o.value == value) {
            Some(option) => (
                format!("◂ {} ▸", option.label),
                styling::normal_text_style(theme),
            ),
            None => (
                "◂ selecione ▸".to_string(),
                styling::muted_text_style(theme),
            ),
        };
    }
    if !value.is_empty() {
        return (value.to_string(), styling::normal_text_style(theme));
    }
    let placeholder = field
        .mask()
        .map(|mask| mask.pattern().replace('0', "_"))
        .unwrap_or_default();
    (placeholder, styling::muted_text_style(theme))
}
