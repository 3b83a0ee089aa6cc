use super::dialog::Dialog;
use crate::theme::Theme;
use gantry_core::model::AppError;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Padding,
};

fn build_banner<'a>(errors: &'a [AppError], ok_key: &'a str, theme: &Theme) -> Dialog<'a> {
    let mut lines: Vec<Line> = errors
        .iter()
        .map(|error| {
            Line::from(vec![
                Span::styled("• ", Style::default().fg(theme.error)),
                Span::raw(error.message.as_str()),
            ])
        })
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled(
            "[ OK ]",
            Style::default()
                .fg(theme.highlight_fg)
                .bg(theme.error)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {ok_key}"), Style::default().fg(theme.muted)),
    ]));

    let title = if errors.len() == 1 { "Error" } else { "Errors" };
    Dialog::new(lines)
        .border_color(theme.error)
        .title(title)
        .padding(Padding::horizontal(1))
        .alignment(Alignment::Left)
}

/// Draw every pending error with a single OK button. Nothing is drawn for an empty list.
pub fn draw(f: &mut Frame, area: Rect, errors: &[AppError], ok_key: &str, theme: &Theme) {
    if errors.is_empty() {
        return;
    }
    build_banner(errors, ok_key, theme).render(f, area);
}
