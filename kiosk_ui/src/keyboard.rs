//! Layouts and key dispatch.

use crate::key::Key;
use crate::text::TextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutName {
    #[default]
    Default,
    Shift,
    Numeric,
}

const DEFAULT_ROWS: &[&str] = &[
    "1 2 3 4 5 6 7 8 9 0 {bksp}",
    "q w e r t y u i o p { }",
    "a s d f g h j k l :",
    "{shift} z x c v b n m , . ? {shift}",
    "{space}",
];

const SHIFT_ROWS: &[&str] = &[
    "! @ # $ % ^ & * ( ) {bksp}",
    "Q W E R T Y U I O P [ ]",
    "A S D F G H J K L ;",
    "{shift} Z X C V B N M , . / {shift}",
    "{space}",
];

const NUMERIC_ROWS: &[&str] = &["1 2 3", "4 5 6", "7 8 9", "0 {bksp} {abc}"];

impl LayoutName {
    pub fn rows(self) -> &'static [&'static str] {
        match self {
            LayoutName::Default => DEFAULT_ROWS,
            LayoutName::Shift => SHIFT_ROWS,
            LayoutName::Numeric => NUMERIC_ROWS,
        }
    }

    /// Keys of this layout, row by row.
    pub fn keys(self) -> Vec<Vec<Key>> {
        self.rows()
            .iter()
            .map(|row| row.split_whitespace().map(Key::parse).collect())
            .collect()
    }
}

/// Keyboard state: active layout and visibility.
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    layout: LayoutName,
    visible: bool,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(&self) -> LayoutName {
        self.layout
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Apply one key press to `field`.
    pub fn press(&mut self, key: &Key, field: &mut TextField) {
        match key {
            Key::Shift => {
                self.layout = if self.layout == LayoutName::Default {
                    LayoutName::Shift
                } else {
                    LayoutName::Default
                };
            }
            Key::Numeric => self.layout = LayoutName::Numeric,
            Key::Abc => self.layout = LayoutName::Default,
            Key::Backspace => field.backspace(),
            Key::Delete => field.delete(),
            Key::Enter => field.insert("\n"),
            Key::Space => field.insert(" "),
            Key::Char(text) => field.insert(text),
            Key::Unsupported(name) => tracing::debug!(key = %name, "unsupported key ignored"),
        }
    }

    /// Parse and apply a raw layout token.
    pub fn press_token(&mut self, token: &str, field: &mut TextField) {
        self.press(&Key::parse(token), field);
    }
}
