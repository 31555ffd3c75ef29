use std::fmt::Display;

use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey<'a> {
    pub keycode: KeyCode,
    pub description: &'a str,
}

impl Display for Hotkey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.keycode {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            other => write!(f, "{other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let hotkey = Hotkey {
            keycode: KeyCode::Char('D'),
            description: "Delete",
        };
        assert_eq!(hotkey.to_string(), "D");
        let space = Hotkey {
            keycode: KeyCode::Char(' '),
            description: "Select",
        };
        assert_eq!(space.to_string(), "space");
    }
}
