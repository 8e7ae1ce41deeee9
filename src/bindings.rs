//! Physical key → vkey binding table
//!
//! Text format, one binding per line:
//!
//! ```text
//! # label    vkey
//! j          B
//! right shift TriggerL
//! ```
//!
//! The vkey is the last whitespace-separated word, so labels may contain
//! spaces. Blank lines and `#` comments are ignored. Labels are normalized
//! with [`deshift`] so `J` and `j` bind the same key.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::input::normalize::deshift;
use crate::vkey::{Vkey, VkeyParseError};

/// Default layout: left hand on the main stick and modifiers, right hand on
/// buttons, C stick and triggers
pub const DEFAULT_LAYOUT: &[(&str, Vkey)] = &[
    ("q", Vkey::StickU),
    ("w", Vkey::StickU),
    ("e", Vkey::StickU),
    ("a", Vkey::StickL),
    ("s", Vkey::StickD),
    ("d", Vkey::StickR),
    ("z", Vkey::StickD),
    ("x", Vkey::StickD),
    ("c", Vkey::StickD),
    ("shift", Vkey::TriggerL),
    ("ctrl", Vkey::Mod1),
    ("space", Vkey::A),
    ("h", Vkey::CStickL),
    ("j", Vkey::B),
    ("k", Vkey::X),
    ("l", Vkey::TriggerR2),
    (";", Vkey::CStickR),
    ("u", Vkey::TriggerR),
    ("i", Vkey::Y),
    ("o", Vkey::Z),
    ("p", Vkey::CStickU),
    ("n", Vkey::CStickD),
    ("m", Vkey::CStickD),
    (",", Vkey::CStickD),
    (".", Vkey::CStickD),
    ("/", Vkey::CStickD),
    ("5", Vkey::Start),
    ("6", Vkey::Start),
    ("7", Vkey::Start),
    ("up", Vkey::DUp),
    ("down", Vkey::DDown),
    ("left", Vkey::DLeft),
    ("right", Vkey::DRight),
];

/// Binding table errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    /// Line without a `label vkey` pair
    #[error("line {line}: expected '<key> <vkey>', got '{content}'")]
    MalformedLine { line: usize, content: String },

    /// Vkey name not in the catalog
    #[error("line {line}: {source}")]
    UnknownVkey {
        line: usize,
        #[source]
        source: VkeyParseError,
    },
}

/// Static mapping from normalized key label to vkey
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyBindingTable {
    binds: BTreeMap<String, Vkey>,
}

impl KeyBindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in layout
    pub fn default_layout() -> Self {
        let mut table = Self::new();
        for (label, vkey) in DEFAULT_LAYOUT {
            table.insert(label, *vkey);
        }
        table
    }

    /// Parse a text binding table
    pub fn parse(text: &str) -> Result<Self, BindingError> {
        let mut table = Self::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let content = raw.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            let (label, name) = content
                .rsplit_once(char::is_whitespace)
                .map(|(l, n)| (l.trim(), n.trim()))
                .filter(|(l, n)| !l.is_empty() && !n.is_empty())
                .ok_or_else(|| BindingError::MalformedLine {
                    line,
                    content: content.to_string(),
                })?;

            let vkey: Vkey = name
                .parse()
                .map_err(|source| BindingError::UnknownVkey { line, source })?;

            table.insert(label, vkey);
        }

        Ok(table)
    }

    /// Bind (or rebind) a key label
    pub fn insert(&mut self, label: &str, vkey: Vkey) -> Option<Vkey> {
        self.binds.insert(deshift(label), vkey)
    }

    /// Vkey bound to an already-normalized label
    pub fn get(&self, label: &str) -> Option<Vkey> {
        self.binds.get(label).copied()
    }

    /// Normalize a raw label and look it up
    pub fn lookup(&self, raw_label: &str) -> Option<Vkey> {
        self.get(&deshift(raw_label))
    }

    pub fn len(&self) -> usize {
        self.binds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }

    /// Bindings sorted by label
    pub fn iter(&self) -> impl Iterator<Item = (&str, Vkey)> {
        self.binds.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Labels bound to a vkey
    pub fn labels_for(&self, vkey: Vkey) -> Vec<&str> {
        self.iter().filter(|(_, v)| *v == vkey).map(|(k, _)| k).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let table = KeyBindingTable::default_layout();
        // Every entry is already a normalized, distinct label
        assert_eq!(table.len(), DEFAULT_LAYOUT.len());
        assert_eq!(table.len(), 33);

        assert_eq!(table.get("j"), Some(Vkey::B));
        assert_eq!(table.get("ctrl"), Some(Vkey::Mod1));
        assert_eq!(table.get("shift"), Some(Vkey::TriggerL));
        assert_eq!(table.get(";"), Some(Vkey::CStickR));
        assert_eq!(table.get(","), Some(Vkey::CStickD));
        assert_eq!(table.get("right"), Some(Vkey::DRight));
        assert_eq!(table.labels_for(Vkey::StickU), vec!["e", "q", "w"]);
        assert_eq!(table.get("g"), None);
    }

    #[test]
    fn test_lookup_normalizes() {
        let table = KeyBindingTable::default_layout();
        assert_eq!(table.lookup("J"), Some(Vkey::B));
        assert_eq!(table.lookup(":"), Some(Vkey::CStickR));
        assert_eq!(table.lookup("%"), Some(Vkey::Start));
        assert_eq!(table.lookup("right shift"), Some(Vkey::TriggerL));
    }

    #[test]
    fn test_labels_with_spaces_and_comments() {
        let text = "# comment\n\n  page up   DUp\nJ B\n";
        let table = KeyBindingTable::parse(text).unwrap();
        assert_eq!(table.get("page up"), Some(Vkey::DUp));
        assert_eq!(table.get("j"), Some(Vkey::B));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unknown_vkey() {
        let err = KeyBindingTable::parse("j B\nk Mod2\n").unwrap_err();
        assert_eq!(
            err,
            BindingError::UnknownVkey {
                line: 2,
                source: VkeyParseError("Mod2".to_string()),
            }
        );
        assert_eq!(err.to_string(), "line 2: unknown vkey 'Mod2'");
    }

    #[test]
    fn test_malformed_line() {
        let err = KeyBindingTable::parse("jB\n").unwrap_err();
        assert!(matches!(err, BindingError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn test_default_layout_survives_text_round_trip() {
        let text: String = KeyBindingTable::default_layout()
            .iter()
            .map(|(label, vkey)| format!("{} {}\n", label, vkey))
            .collect();
        assert_eq!(
            KeyBindingTable::parse(&text).unwrap(),
            KeyBindingTable::default_layout()
        );
    }

    #[test]
    fn test_later_lines_rebind() {
        let table = KeyBindingTable::parse("j B\nj X\n").unwrap();
        assert_eq!(table.get("j"), Some(Vkey::X));
    }
}
