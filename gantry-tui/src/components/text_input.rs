use gantry_core::input::TextInput;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

pub struct TextInputStyle<'a> {
    pub title: &'a str,
    pub placeholder: &'a str,
    pub border_color: Color,
    pub muted_color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct VisibleSlice {
    start: usize,
    end: usize,
    cursor_col: u16,
}

/// The part of `text` that fits in `max_width` columns while keeping the cursor visible.
fn visible_slice(text: &str, cursor_pos: usize, max_width: u16) -> VisibleSlice {
    if max_width == 0 || text.is_empty() {
        return VisibleSlice {
            start: 0,
            end: 0,
            cursor_col: 0,
        };
    }

    let graphemes: Vec<(usize, &str)> = text.grapheme_indices(true).collect();
    let mut boundaries: Vec<usize> = graphemes.iter().map(|(i, _)| *i).collect();
    boundaries.push(text.len());

    let cursor = cursor_pos.min(text.len());
    let boundary_idx = match boundaries.binary_search(&cursor) {
        Ok(idx) => idx,
        Err(idx) => idx.saturating_sub(1),
    };

    let mut prefix_widths = Vec::with_capacity(boundaries.len());
    let mut width = 0;
    prefix_widths.push(0);
    for (_, grapheme) in &graphemes {
        width += grapheme.width();
        prefix_widths.push(width);
    }

    let cursor_col = prefix_widths[boundary_idx];
    let max_width = usize::from(max_width);
    let max_cursor_col = max_width.saturating_sub(1);
    let scroll_col = cursor_col.saturating_sub(max_cursor_col);

    let start_index = prefix_widths
        .iter()
        .take_while(|col| **col <= scroll_col)
        .count()
        .saturating_sub(1)
        .min(graphemes.len().saturating_sub(1));

    let mut end_index = start_index;
    let mut visible_width = 0;
    while end_index < graphemes.len() {
        let g_width = graphemes[end_index].1.width();
        if visible_width + g_width > max_width {
            break;
        }
        visible_width += g_width;
        end_index += 1;
    }

    let cursor_col = cursor_col
        .saturating_sub(prefix_widths[start_index])
        .min(max_cursor_col);

    VisibleSlice {
        start: boundaries[start_index],
        end: boundaries[end_index],
        cursor_col: u16::try_from(cursor_col).unwrap_or(u16::MAX),
    }
}

/// Render a bordered single-line input and place the terminal cursor in it.
pub fn draw(f: &mut Frame, area: Rect, style: &TextInputStyle<'_>, input: &TextInput) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", style.title))
        .border_style(Style::default().fg(style.border_color));
    let inner = block.inner(area);

    let (content, cursor_col) = if input.is_empty() {
        let placeholder = Line::from(Span::styled(
            style.placeholder,
            Style::default().fg(style.muted_color),
        ));
        (placeholder, 0)
    } else {
        let slice = visible_slice(&input.text, input.cursor, inner.width);
        (
            Line::from(Span::raw(&input.text[slice.start..slice.end])),
            slice.cursor_col,
        )
    };

    f.render_widget(Paragraph::new(content).block(block), area);
    if inner.width > 0 && inner.height > 0 {
        f.set_cursor_position((inner.x.saturating_add(cursor_col), inner.y));
    }
}
