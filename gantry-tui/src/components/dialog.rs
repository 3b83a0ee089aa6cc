use super::{centered_fixed_rect, dialog_width};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// A centered popup box sized to its wrapped content.
pub struct Dialog<'a> {
    lines: Vec<Line<'a>>,
    border_color: Color,
    title: Option<String>,
    padding: Padding,
    alignment: Alignment,
    min_height: u16,
}

impl<'a> Dialog<'a> {
    #[must_use]
    pub fn new(lines: Vec<Line<'a>>) -> Self {
        Self {
            lines,
            border_color: Color::White,
            title: None,
            padding: Padding::ZERO,
            alignment: Alignment::Left,
            min_height: 0,
        }
    }

    #[must_use]
    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(format!(" {} ", title.into()));
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Reserve at least this many content rows, for forms that draw inside the dialog.
    #[must_use]
    pub fn min_height(mut self, rows: u16) -> Self {
        self.min_height = rows;
        self
    }

    fn h_chrome(&self) -> u16 {
        2 + self.padding.left + self.padding.right
    }

    fn v_chrome(&self) -> u16 {
        2 + self.padding.top + self.padding.bottom
    }

    /// `(width, height)` for this dialog given the terminal width.
    pub fn size(&self, terminal_width: u16) -> (u16, u16) {
        let width = dialog_width(terminal_width);
        let text_width = width.saturating_sub(self.h_chrome()).max(1);

        let content_height: u16 = self
            .lines
            .iter()
            .map(|line| word_wrapped_line_count(line, text_width))
            .sum();

        (width, content_height.max(self.min_height) + self.v_chrome())
    }

    /// Render centered on `area` over a cleared background. Returns the inner content area.
    pub fn render(&self, f: &mut Frame, area: Rect) -> Rect {
        let (width, height) = self.size(area.width);
        let centered = centered_fixed_rect(width, height, area);

        f.render_widget(Clear, centered);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .padding(self.padding);
        if let Some(title) = &self.title {
            block = block.title(title.as_str());
        }
        let inner = block.inner(centered);

        let paragraph = Paragraph::new(self.lines.clone())
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(self.alignment);
        f.render_widget(paragraph, centered);
        inner
    }
}

/// Visual line count when `line` is word-wrapped to `max_width` columns.
pub fn word_wrapped_line_count(line: &Line, max_width: u16) -> u16 {
    let max_w = usize::from(max_width);
    if max_w == 0 {
        return 1;
    }

    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    if text.is_empty() {
        return 1;
    }

    let mut lines: u16 = 1;
    let mut col: usize = 0;

    for (i, word) in text.split(' ').enumerate() {
        let w = word.width();
        let needed = if i == 0 || col == 0 { w } else { w + 1 };

        if col + needed <= max_w {
            col += needed;
        } else if w <= max_w {
            lines += 1;
            col = w;
        } else {
            if col > 0 {
                lines += 1;
            }
            col = w;
            while col > max_w {
                lines += 1;
                col -= max_w;
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_util::render;
    use ratatui::text::Span;

    #[test]
    fn test_word_wrap_breaks_at_word_boundary() {
        assert_eq!(word_wrapped_line_count(&Line::raw("hello world"), 11), 1);
        assert_eq!(word_wrapped_line_count(&Line::raw("hello world"), 10), 2);
        assert_eq!(word_wrapped_line_count(&Line::raw("one two three four"), 5), 4);
    }

    #[test]
    fn test_word_wrap_oversized_word() {
        assert_eq!(word_wrapped_line_count(&Line::raw("abcdefghij"), 4), 3);
        assert_eq!(word_wrapped_line_count(&Line::raw("hi abcdefghij"), 6), 3);
    }

    #[test]
    fn test_word_wrap_degenerate_inputs() {
        assert_eq!(word_wrapped_line_count(&Line::raw(""), 20), 1);
        assert_eq!(word_wrapped_line_count(&Line::raw("hello"), 0), 1);
    }

    #[test]
    fn test_word_wrap_counts_display_width() {
        // Each CJK character is two columns wide
        assert_eq!(word_wrapped_line_count(&Line::raw("日本語"), 4), 2);
    }

    #[test]
    fn test_word_wrap_multi_span_line() {
        let line = Line::from(vec![
            Span::raw("hello "),
            Span::styled("world", Style::default().fg(Color::Red)),
        ]);
        assert_eq!(word_wrapped_line_count(&line, 20), 1);
        assert_eq!(word_wrapped_line_count(&line, 8), 2);
    }

    #[test]
    fn test_dialog_size_includes_chrome_and_min_height() {
        let dialog = Dialog::new(vec![Line::raw("hello")]).padding(Padding::uniform(1));
        assert_eq!(dialog.size(100), (80, 5));

        let form = Dialog::new(vec![Line::raw("hello")]).min_height(4);
        assert_eq!(form.size(100), (80, 6));
    }

    #[test]
    fn test_dialog_renders_title_and_content() {
        let output = render(60, 12, |f| {
            Dialog::new(vec![Line::raw("Body text")])
                .title("Heading")
                .render(f, f.area());
        });
        assert!(output.contains(" Heading "));
        assert!(output.contains("Body text"));
    }
}
