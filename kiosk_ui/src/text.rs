//! Caret-aware editing of a single text field.

/// Field contents plus a selection `[start, end)` in chars.
/// An empty selection is a plain caret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    start: usize,
    end: usize,
}

impl TextField {
    /// Field holding `value` with the caret at the end.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let len = value.chars().count();
        Self {
            value,
            start: len,
            end: len,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn selection(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    pub fn caret(&self) -> usize {
        self.end
    }

    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Select `[start, end)`; bounds are clamped and ordered.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        let (a, b) = (start.min(len), end.min(len));
        self.start = a.min(b);
        self.end = a.max(b);
    }

    pub fn set_caret(&mut self, pos: usize) {
        self.set_selection(pos, pos);
    }

    /// Replace the selection with `text`.
    pub fn insert(&mut self, text: &str) {
        self.replace(self.start, self.end, text);
        let caret = self.start + text.chars().count();
        self.set_caret(caret);
    }

    /// Delete the selection, or the char before the caret.
    pub fn backspace(&mut self) {
        if self.start != self.end {
            self.replace(self.start, self.end, "");
            self.set_caret(self.start);
        } else if self.start > 0 {
            let at = self.start - 1;
            self.replace(at, self.start, "");
            self.set_caret(at);
        }
    }

    /// Delete the selection, or the char after the caret.
    pub fn delete(&mut self) {
        if self.start != self.end {
            self.replace(self.start, self.end, "");
            self.set_caret(self.start);
        } else if self.start < self.char_len() {
            self.replace(self.start, self.start + 1, "");
            self.set_caret(self.start);
        }
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn replace(&mut self, start: usize, end: usize, text: &str) {
        let (a, b) = (self.byte_index(start), self.byte_index(end));
        self.value.replace_range(a..b, text);
    }
}
