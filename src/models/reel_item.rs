use std::collections::HashSet;

use serde::Deserialize;

/// One video entry supplied by the content source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReelItem {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(rename = "sourceUrl", alias = "source_url", alias = "src")]
    pub source_url: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ReelItem {
    pub fn new(title: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            source_url: source_url.into(),
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Description text, if present and not blank.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Identity of the item at `position`: the explicit id, or title and
    /// position joined when no id is given.
    pub fn identity(&self, position: usize) -> String {
        match self.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => format!("{}-{}", self.title, position),
        }
    }
}

/// The three shapes a source may hand over: nothing, one item or a list.
///
/// `null` is represented by `Option::<ReelInput>::None`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReelInput {
    Many(Vec<ReelItem>),
    One(ReelItem),
}

/// Flattens any input shape into an ordered list. Duplicates are kept.
pub fn normalize(input: Option<ReelInput>) -> Vec<ReelItem> {
    match input {
        None => Vec::new(),
        Some(ReelInput::One(item)) => vec![item],
        Some(ReelInput::Many(items)) => items,
    }
}

/// Computes one key per item, unique within the slice.
///
/// Colliding explicit ids get the position appended (and a counter, if that
/// is taken too) so that every card in a render pass stays addressable.
pub fn identity_keys(items: &[ReelItem]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let base = item.identity(position);
            let mut key = base.clone();
            let mut attempt = 0usize;
            while !seen.insert(key.clone()) {
                if attempt == 0 {
                    tracing::warn!(key = %base, position, "duplicate reel id, disambiguating");
                }
                attempt += 1;
                key = if attempt == 1 {
                    format!("{}#{}", base, position)
                } else {
                    format!("{}#{}.{}", base, position, attempt)
                };
            }
            key
        })
        .collect()
}

/// True when `source` starts with a URI scheme such as `https://` or `file://`.
pub fn has_uri_scheme(source: &str) -> bool {
    let Some((scheme, _)) = source.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_null() {
        let input: Option<ReelInput> = serde_json::from_str("null").unwrap();
        assert!(normalize(input).is_empty());
    }

    #[test]
    fn test_normalize_single_object() {
        let input: Option<ReelInput> =
            serde_json::from_str(r#"{"title": "Surf", "sourceUrl": "surf.mp4"}"#).unwrap();
        let items = normalize(input);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Surf");
        assert_eq!(items[0].source_url, "surf.mp4");
        assert_eq!(items[0].id, None);
    }

    #[test]
    fn test_normalize_list_keeps_order_and_duplicates() {
        let json = r#"[
            {"title": "A", "sourceUrl": "a.mp4"},
            {"title": "A", "sourceUrl": "a.mp4"},
            {"title": "B", "src": "b.mp4", "description": "second"}
        ]"#;
        let items = normalize(serde_json::from_str(json).unwrap());
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "A", "B"]);
        assert_eq!(items[2].description(), Some("second"));
    }

    #[test]
    fn test_empty_list_is_empty() {
        let items = normalize(serde_json::from_str("[]").unwrap());
        assert!(items.is_empty());
    }

    #[test]
    fn test_identity_falls_back_to_title_and_position() {
        let item = ReelItem::new("Dunes", "dunes.mp4");
        assert_eq!(item.identity(3), "Dunes-3");
        assert_eq!(item.clone().with_id("reel-9").identity(3), "reel-9");
        assert_eq!(item.with_id("").identity(1), "Dunes-1");
    }

    #[test]
    fn test_identity_keys_unique_for_duplicate_titles() {
        let items = vec![
            ReelItem::new("Same", "1.mp4"),
            ReelItem::new("Same", "2.mp4"),
            ReelItem::new("Same", "3.mp4"),
        ];
        let keys = identity_keys(&items);
        assert_eq!(keys, vec!["Same-0", "Same-1", "Same-2"]);
    }

    #[test]
    fn test_identity_keys_disambiguates_colliding_ids() {
        let items = vec![
            ReelItem::new("One", "1.mp4").with_id("x"),
            ReelItem::new("Two", "2.mp4").with_id("x"),
        ];
        let keys = identity_keys(&items);
        assert_eq!(keys[0], "x");
        assert_eq!(keys[1], "x#1");
    }

    #[test]
    fn test_identity_keys_skip_taken_suffixes() {
        let items = vec![
            ReelItem::new("A", "a.mp4").with_id("x"),
            ReelItem::new("B", "b.mp4").with_id("x#2"),
            ReelItem::new("C", "c.mp4").with_id("x"),
        ];
        let keys = identity_keys(&items);
        assert_eq!(keys, vec!["x", "x#2", "x#2.2"]);
        let unique: HashSet<&String> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_uri_scheme_detection() {
        assert!(has_uri_scheme("https://cdn.example.com/a.mp4"));
        assert!(has_uri_scheme("file:///home/me/a.mp4"));
        assert!(has_uri_scheme("resource+x://a"));
        assert!(!has_uri_scheme("/home/me/a.mp4"));
        assert!(!has_uri_scheme("clips/a.mp4"));
        assert!(!has_uri_scheme("://broken"));
        assert!(!has_uri_scheme("1http://x"));
        assert!(!has_uri_scheme("my clips/a b://c.mp4"));
    }

    #[test]
    fn test_blank_description_is_hidden() {
        let item = ReelItem::new("T", "t.mp4").with_description("   ");
        assert_eq!(item.description(), None);
    }
}
