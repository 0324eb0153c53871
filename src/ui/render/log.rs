use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Render log widget according to state. The newest entries that fit are
/// shown, oldest first.
///
pub fn log(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let block = Block::default()
        .title("Log")
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));

    let entries = state.get_logs().entries();
    let visible = size.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = entries
        .iter()
        .skip(entries.len().saturating_sub(visible))
        .map(|entry| {
            ListItem::new(Line::from(vec![Span::styled(
                entry.clone(),
                styling::muted_text_style(theme),
            )]))
        })
        .collect();

    let list = List::new(items)
        .style(styling::normal_text_style(theme))
        .block(block);
    frame.render_widget(list, size);
}
