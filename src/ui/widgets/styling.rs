use crate::ui::theme::Theme;
use ratatui::style::{Modifier, Style};

/// Return the border style for active blocks.
///
pub fn active_block_border_style(theme: &Theme) -> Style {
    Style::default().fg(theme.border_active.to_color())
}

/// Return the border style for normal blocks.
///
pub fn normal_block_border_style(theme: &Theme) -> Style {
    Style::default().fg(theme.border_normal.to_color())
}

/// Return the title style for active blocks.
///
pub fn active_block_title_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Return the style for the focused form row.
///
pub fn focused_item_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.highlight_fg.to_color())
        .bg(theme.highlight_bg.to_color())
        .add_modifier(Modifier::BOLD)
}

/// Return the style for field labels.
///
pub fn label_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.text_secondary.to_color())
        .add_modifier(Modifier::BOLD)
}

/// Return the style for normal text.
///
pub fn normal_text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.text.to_color())
}

/// Return the style for placeholders and hints.
///
pub fn muted_text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.text_muted.to_color())
}

/// Return the style for inline validation messages.
///
pub fn error_text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.error.to_color())
}

/// Return the style for the banner.
///
pub fn banner_style(theme: &Theme) -> Style {
    Style::default().fg(theme.banner.to_color())
}

/// Return the style of a footer mode badge.
///
pub fn badge_style(theme: &Theme, color: &crate::ui::theme::ColorSpec) -> Style {
    Style::default()
        .fg(theme.background.to_color())
        .bg(color.to_color())
        .add_modifier(Modifier::BOLD)
}
