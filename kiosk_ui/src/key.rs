/// One key press as reported by the keyboard layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Literal text to insert.
    Char(String),
    Space,
    Enter,
    Backspace,
    Delete,
    Shift,
    Numeric,
    Abc,
    /// A `{token}` this keyboard does not handle.
    Unsupported(String),
}

impl Key {
    /// Parse a layout token. `{name}` is a function key; anything else,
    /// including a lone `{` or `}`, is literal text.
    pub fn parse(token: &str) -> Self {
        let Some(name) = token
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .filter(|n| !n.is_empty())
        else {
            return Key::Char(token.to_string());
        };
        match name {
            "space" => Key::Space,
            "enter" => Key::Enter,
            "bksp" => Key::Backspace,
            "del" => Key::Delete,
            "shift" => Key::Shift,
            "numeric" => Key::Numeric,
            "abc" => Key::Abc,
            other => Key::Unsupported(other.to_string()),
        }
    }
}

impl std::str::FromStr for Key {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Key::parse(s))
    }
}
