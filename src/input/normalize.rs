//! Key label normalization
//!
//! Event sources report the character a key produced, so holding shift turns
//! `1` into `!` and `j` into `J`. Bindings are written against the unshifted
//! physical key, so labels are folded back before lookup:
//!
//! ```text
//! "J" -> "j"      "!" -> "1"      "<" -> ","
//! "right shift" -> "shift"        "left ctrl" -> "ctrl"
//! ```
//!
//! The symbol table assumes a US layout.

/// Unshifted symbol keys, paired index-by-index with [`SHIFTED_SYMBOLS`]
const SYMBOLS: &str = "`1234567890-=[]\\;',./";

/// Shifted counterparts of [`SYMBOLS`]
const SHIFTED_SYMBOLS: &str = "~!@#$%^&*()_+{}|:\"<>?";

/// Alternate names some sources use for the same physical key
const ALIASES: &[(&str, &str)] = &[
    ("left shift", "shift"),
    ("right shift", "shift"),
    ("lshift", "shift"),
    ("rshift", "shift"),
    ("left ctrl", "ctrl"),
    ("right ctrl", "ctrl"),
    ("control", "ctrl"),
    ("lctrl", "ctrl"),
    ("rctrl", "ctrl"),
    ("spacebar", "space"),
    (" ", "space"),
    ("up arrow", "up"),
    ("down arrow", "down"),
    ("left arrow", "left"),
    ("right arrow", "right"),
];

/// Map a reported key label to the label of its unshifted physical key
pub fn deshift(label: &str) -> String {
    let mut chars = label.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(pos) = SHIFTED_SYMBOLS.chars().position(|s| s == c) {
            if let Some(base) = SYMBOLS.chars().nth(pos) {
                return base.to_string();
            }
        }
        if c == ' ' {
            return "space".to_string();
        }
    }

    let lower = label.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_tables_line_up() {
        assert_eq!(SYMBOLS.chars().count(), SHIFTED_SYMBOLS.chars().count());
    }

    #[test]
    fn test_shifted_symbols() {
        assert_eq!(deshift("!"), "1");
        assert_eq!(deshift("~"), "`");
        assert_eq!(deshift(":"), ";");
        assert_eq!(deshift("\""), "'");
        assert_eq!(deshift("<"), ",");
        assert_eq!(deshift("?"), "/");
        assert_eq!(deshift("|"), "\\");
    }

    #[test]
    fn test_unshifted_pass_through() {
        assert_eq!(deshift(";"), ";");
        assert_eq!(deshift("5"), "5");
        assert_eq!(deshift("j"), "j");
        assert_eq!(deshift("space"), "space");
    }

    #[test]
    fn test_letters_are_lowercased() {
        assert_eq!(deshift("J"), "j");
        assert_eq!(deshift("Shift"), "shift");
        assert_eq!(deshift("UP"), "up");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(deshift("right shift"), "shift");
        assert_eq!(deshift("Left Ctrl"), "ctrl");
        assert_eq!(deshift(" "), "space");
        assert_eq!(deshift("up arrow"), "up");
    }
}
