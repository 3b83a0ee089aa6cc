use unicode_segmentation::UnicodeSegmentation;

/// Single-line editable text with a grapheme-aware cursor (byte offset into `text`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub text: String,
    pub cursor: usize,
}

#[derive(Clone, Copy)]
struct GraphemeSpan {
    start: usize,
    end: usize,
    is_whitespace: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input prefilled with `text`, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn grapheme_spans(&self) -> Vec<GraphemeSpan> {
        self.text
            .grapheme_indices(true)
            .map(|(start, grapheme)| GraphemeSpan {
                start,
                end: start + grapheme.len(),
                is_whitespace: grapheme.chars().all(char::is_whitespace),
            })
            .collect()
    }

    fn grapheme_boundaries(&self) -> Vec<usize> {
        let mut boundaries: Vec<usize> = self.text.grapheme_indices(true).map(|(i, _)| i).collect();
        boundaries.push(self.text.len());
        boundaries
    }

    fn boundary_index_at_or_before(boundaries: &[usize], cursor: usize) -> usize {
        match boundaries.binary_search(&cursor) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    fn clamp_cursor_to_boundary(&mut self, boundaries: &[usize]) -> usize {
        let cursor = self.cursor.min(self.text.len());
        let idx = Self::boundary_index_at_or_before(boundaries, cursor);
        self.cursor = boundaries.get(idx).copied().unwrap_or(0);
        idx
    }

    fn prev_word_boundary(&self, from: usize) -> usize {
        let spans = self.grapheme_spans();
        if spans.is_empty() {
            return 0;
        }
        let mut boundaries: Vec<usize> = spans.iter().map(|s| s.start).collect();
        boundaries.push(self.text.len());
        let cursor = from.min(self.text.len());
        let mut grapheme_idx =
            Self::boundary_index_at_or_before(&boundaries, cursor).saturating_sub(1);

        while let Some(span) = spans.get(grapheme_idx) {
            if !span.is_whitespace {
                break;
            }
            if grapheme_idx == 0 {
                return 0;
            }
            grapheme_idx -= 1;
        }

        while let Some(span) = spans.get(grapheme_idx) {
            if span.is_whitespace {
                return span.end;
            }
            if grapheme_idx == 0 {
                return 0;
            }
            grapheme_idx -= 1;
        }

        0
    }

    /// Move cursor left by one grapheme cluster (UTF-8 safe)
    pub fn cursor_left(&mut self) {
        let boundaries = self.grapheme_boundaries();
        let idx = self.clamp_cursor_to_boundary(&boundaries);
        if idx > 0 {
            self.cursor = boundaries[idx - 1];
        }
    }

    /// Move cursor right by one grapheme cluster (UTF-8 safe)
    pub fn cursor_right(&mut self) {
        let boundaries = self.grapheme_boundaries();
        let idx = self.clamp_cursor_to_boundary(&boundaries);
        if idx + 1 < boundaries.len() {
            self.cursor = boundaries[idx + 1];
        }
    }

    pub fn cursor_start(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn insert_char(&mut self, c: char) {
        let boundaries = self.grapheme_boundaries();
        self.clamp_cursor_to_boundary(&boundaries);
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        let boundaries = self.grapheme_boundaries();
        self.clamp_cursor_to_boundary(&boundaries);
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Remove the grapheme cluster before the cursor. Returns false at the start of input.
    pub fn backspace(&mut self) -> bool {
        let boundaries = self.grapheme_boundaries();
        let idx = self.clamp_cursor_to_boundary(&boundaries);
        if idx == 0 {
            return false;
        }
        let prev = boundaries[idx - 1];
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete_word(&mut self) {
        if self.text.is_empty() || self.cursor == 0 {
            return;
        }
        let boundaries = self.grapheme_boundaries();
        self.clamp_cursor_to_boundary(&boundaries);
        let new_cursor = self.prev_word_boundary(self.cursor);
        self.text.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    pub fn delete_to_start(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let boundaries = self.grapheme_boundaries();
        self.clamp_cursor_to_boundary(&boundaries);
        self.text.drain(..self.cursor);
        self.cursor = 0;
    }
}

/// Cursor and scroll position over a list of `len` rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectableList {
    pub len: usize,
    pub selected: Option<usize>,
    pub scroll_offset: usize,
}

impl SelectableList {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            selected: if len > 0 { Some(0) } else { None },
            scroll_offset: 0,
        }
    }

    /// Change the row count, keeping the selection when it is still in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(idx) => Some(idx.min(len - 1)),
            None => Some(0),
        };
        self.scroll_offset = self.scroll_offset.min(len.saturating_sub(1));
    }

    pub fn select(&mut self, idx: Option<usize>) {
        self.selected = idx.filter(|i| *i < self.len);
    }

    /// Move selection by delta, clamping to bounds
    pub fn move_selection(&mut self, delta: i32) {
        if self.len == 0 {
            return;
        }
        let current = self.selected.unwrap_or(0);
        if delta > 0 {
            self.selected = Some(
                current
                    .saturating_add(delta.unsigned_abs() as usize)
                    .min(self.len - 1),
            );
        } else {
            self.selected = Some(current.saturating_sub(delta.unsigned_abs() as usize));
        }
    }

    pub fn move_to_top(&mut self) {
        if self.len > 0 {
            self.selected = Some(0);
        }
    }

    pub fn move_to_bottom(&mut self) {
        if self.len > 0 {
            self.selected = Some(self.len - 1);
        }
    }

    pub fn update_scroll_offset_for_selection(&mut self, viewport_rows: usize) {
        if self.len == 0 {
            self.scroll_offset = 0;
            return;
        }

        let viewport_rows = viewport_rows.max(1);
        let max_offset = self.len.saturating_sub(viewport_rows);
        let selected = self.selected.unwrap_or(0).min(self.len - 1);
        let anchor_top = usize::from(viewport_rows > 2);
        let anchor_bottom = viewport_rows.saturating_sub(2);

        let top_bound = self.scroll_offset.saturating_add(anchor_top);
        let bottom_bound = self.scroll_offset.saturating_add(anchor_bottom);

        if selected < top_bound {
            self.scroll_offset = selected.saturating_sub(anchor_top);
        } else if selected > bottom_bound {
            self.scroll_offset = selected.saturating_sub(anchor_bottom);
        }

        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace() {
        let mut input = TextInput::new();
        for c in "feat".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.text, "feat");
        assert!(input.backspace());
        assert_eq!(input.text, "fea");
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = TextInput::with_text("abc");
        input.cursor_start();
        assert!(!input.backspace());
        assert_eq!(input.text, "abc");
    }

    #[test]
    fn test_cursor_moves_over_graphemes() {
        let mut input = TextInput::with_text("ae\u{301}b");
        input.cursor_left();
        assert_eq!(input.cursor, "ae\u{301}".len());
        input.cursor_left();
        assert_eq!(input.cursor, 1);
        input.insert_char('x');
        assert_eq!(input.text, "axe\u{301}b");
    }

    #[test]
    fn test_backspace_removes_whole_grapheme() {
        let mut input = TextInput::with_text("e\u{301}");
        assert!(input.backspace());
        assert!(input.is_empty());
    }

    #[test]
    fn test_delete_word() {
        let mut input = TextInput::with_text("feature new-thing  ");
        input.delete_word();
        assert_eq!(input.text, "feature ");
        input.delete_word();
        assert_eq!(input.text, "");
    }

    #[test]
    fn test_delete_to_start() {
        let mut input = TextInput::with_text("hello world");
        input.cursor_left();
        input.delete_to_start();
        assert_eq!(input.text, "d");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_insert_str_mid_text() {
        let mut input = TextInput::with_text("/tmp/");
        input.cursor_start();
        input.insert_str("~");
        assert_eq!(input.text, "~/tmp/");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut list = SelectableList::new(3);
        list.move_selection(10);
        assert_eq!(list.selected, Some(2));
        list.move_selection(-10);
        assert_eq!(list.selected, Some(0));
    }

    #[test]
    fn test_empty_list_has_no_selection() {
        let mut list = SelectableList::new(0);
        list.move_selection(1);
        list.move_to_bottom();
        assert_eq!(list.selected, None);
    }

    #[test]
    fn test_set_len_clamps_selection() {
        let mut list = SelectableList::new(5);
        list.move_to_bottom();
        list.set_len(2);
        assert_eq!(list.selected, Some(1));
        list.set_len(0);
        assert_eq!(list.selected, None);
        list.set_len(4);
        assert_eq!(list.selected, Some(0));
    }

    #[test]
    fn test_scroll_offset_follows_selection() {
        let mut list = SelectableList::new(20);
        list.move_selection(10);
        list.update_scroll_offset_for_selection(5);
        assert_eq!(list.scroll_offset, 7);
        list.move_to_top();
        list.update_scroll_offset_for_selection(5);
        assert_eq!(list.scroll_offset, 0);
        list.move_to_bottom();
        list.update_scroll_offset_for_selection(5);
        assert_eq!(list.scroll_offset, 15);
    }
}
