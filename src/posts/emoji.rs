//! Emoji alias resolution for reactions.
//!
//! Reactions may be submitted either as a literal emoji grapheme (`👍`) or as
//! one of its shortcodes (`:+1:`, `:thumbsup:`). The [`EmojiAliases`] trait
//! answers "which emoji is this?" for both forms. [`EmojiTable`] is the
//! built-in immutable table; it is constructed once by the caller and shared
//! by reference so every replica resolves aliases from the same data.

use std::collections::HashMap;

/// Variation selector 16 (emoji presentation), ignored when matching values.
pub const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// A known emoji and its shortcodes. The first shortcode is canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emoji {
    pub value: String,
    pub shortcodes: Vec<String>,
}

impl Emoji {
    /// The canonical shortcode, used when a reaction is submitted by value.
    pub fn shortcode(&self) -> &str {
        self.shortcodes.first().map(String::as_str).unwrap_or_default()
    }

    /// Returns true if `code` is one of this emoji's shortcodes.
    pub fn has_shortcode(&self, code: &str) -> bool {
        self.shortcodes.iter().any(|c| c == code)
    }

    /// Returns true if `value` is this emoji's grapheme, ignoring VS16.
    pub fn matches_value(&self, value: &str) -> bool {
        strip_variation_selector(value) == strip_variation_selector(&self.value)
    }
}

/// Read-only emoji lookup consumed by the reaction subsystem.
pub trait EmojiAliases {
    /// Finds an emoji by grapheme or by any of its shortcodes.
    fn find(&self, value: &str) -> Option<&Emoji>;

    /// Returns true if `value` names a known emoji.
    fn is_emoji(&self, value: &str) -> bool {
        self.find(value).is_some()
    }
}

/// Removes every U+FE0F from `value`.
pub fn strip_variation_selector(value: &str) -> String {
    value.chars().filter(|c| *c != VARIATION_SELECTOR_16).collect()
}

/// Built-in emoji table.
#[derive(Debug, Clone)]
pub struct EmojiTable {
    emojis: Vec<Emoji>,
    by_value: HashMap<String, usize>,
    by_shortcode: HashMap<String, usize>,
}

impl EmojiTable {
    /// Builds the table from the Unicode emoji set and its gemoji shortcodes.
    ///
    /// Emojis without any shortcode are left out, as are skin tone variants.
    pub fn standard() -> Self {
        Self::from_entries(emojis::iter().filter_map(|emoji| {
            let shortcodes: Vec<String> = emoji
                .shortcodes()
                .map(|code| format!(":{}:", code))
                .collect();
            if shortcodes.is_empty() {
                return None;
            }
            Some(Emoji {
                value: emoji.as_str().to_string(),
                shortcodes,
            })
        }))
    }

    /// Builds a table from arbitrary entries. Later duplicates of a value or
    /// shortcode do not override earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = Emoji>) -> Self {
        let mut table = Self {
            emojis: Vec::new(),
            by_value: HashMap::new(),
            by_shortcode: HashMap::new(),
        };

        for emoji in entries {
            let index = table.emojis.len();
            table
                .by_value
                .entry(strip_variation_selector(&emoji.value))
                .or_insert(index);
            for code in &emoji.shortcodes {
                table.by_shortcode.entry(code.clone()).or_insert(index);
            }
            table.emojis.push(emoji);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.emojis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Emoji> {
        self.emojis.iter()
    }
}

impl Default for EmojiTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl EmojiAliases for EmojiTable {
    fn find(&self, value: &str) -> Option<&Emoji> {
        let index = self
            .by_shortcode
            .get(value)
            .or_else(|| self.by_value.get(&strip_variation_selector(value)))?;
        self.emojis.get(*index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_value_and_shortcode() {
        let table = EmojiTable::standard();

        let by_value = table.find("👍").expect("thumbs up by value");
        assert_eq!(by_value.shortcode(), ":+1:");

        let by_alias = table.find(":thumbsup:").expect("thumbs up by alias");
        assert_eq!(by_alias, by_value);

        assert!(table.find(":fire:").is_some());
        assert!(table.find(":not-an-emoji:").is_none());
        assert!(table.find("fire").is_none());
        assert!(table.find("").is_none());
    }

    #[test]
    fn test_variation_selector_is_ignored() {
        let table = EmojiTable::standard();
        let heart = table.find("❤️").expect("heart with vs16");
        assert_eq!(table.find("❤").expect("heart without vs16"), heart);
        assert!(heart.matches_value("\u{2764}"));
        assert!(table.is_emoji(":heart:"));
    }

    #[test]
    fn test_first_entry_wins_on_duplicates() {
        let table = EmojiTable::from_entries(vec![
            Emoji {
                value: "🔥".to_string(),
                shortcodes: vec![":fire:".to_string()],
            },
            Emoji {
                value: "🧯".to_string(),
                shortcodes: vec![":fire:".to_string(), ":extinguisher:".to_string()],
            },
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.find(":fire:").map(|e| e.value.as_str()), Some("🔥"));
        assert_eq!(
            table.find(":extinguisher:").map(|e| e.value.as_str()),
            Some("🧯")
        );
    }

    #[test]
    fn test_standard_covers_common_reactions() {
        let table = EmojiTable::standard();
        assert!(table.len() > 1000);

        for (value, code) in [("🐸", ":frog:"), ("🍎", ":apple:"), ("😺", ":smiley_cat:")] {
            let by_value = table.find(value).expect("emoji by value");
            let by_code = table.find(code).expect("emoji by shortcode");
            assert_eq!(by_value, by_code);
            assert!(by_value.has_shortcode(code));
        }
        assert_eq!(table.find(":+1:").map(Emoji::shortcode), Some(":+1:"));
    }
}
