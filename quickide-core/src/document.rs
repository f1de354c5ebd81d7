//! # Config documents
//!
//! A [`ConfigDocument`] is one generated addon artifact held in memory: the
//! nested JSON value, its serialized text, and where it belongs inside a
//! project. The text is produced with two-space indentation and template
//! insertion order, and is re-parsed before the document is handed out, so a
//! document that exists always serializes to valid JSON.

use crate::schema::{self, DocumentKind, PackSide};
use crate::{Error, Result};
use serde_json::Value;

/// Where a document is written inside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Pack the file lands in
    pub side: PackSide,
    /// Folder relative to the pack root, `/`-separated
    pub subfolder: String,
}

/// A localization entry to append when the document is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationEntry {
    /// Key such as `item.demo.ruby.name`
    pub key: String,
    /// Display string
    pub value: String,
}

/// One generated addon document.
///
/// # Example
///
/// ```rust
/// use quickide_core::document::ConfigDocument;
/// use quickide_core::schema::DocumentKind;
/// use serde_json::json;
///
/// let doc = ConfigDocument::new(DocumentKind::Item, json!({"a": 1}), "ruby")?;
/// assert_eq!(doc.text(), "{\n  \"a\": 1\n}");
/// assert_eq!(doc.target().subfolder, "items");
/// # Ok::<(), quickide_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    kind: DocumentKind,
    value: Value,
    text: String,
    suggested_name: String,
    target: Target,
    localization: Option<LocalizationEntry>,
}

impl ConfigDocument {
    /// Serialize `value`, verify the text parses back to the same value, and
    /// place the document at its kind's default target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] if the serialized text does not
    /// round-trip.
    pub fn new<S: Into<String>>(kind: DocumentKind, value: Value, suggested_name: S) -> Result<Self> {
        let text = serde_json::to_string_pretty(&value)?;
        let reparsed = parse_json_text(&text)?;
        if reparsed != value {
            return Err(Error::invalid_document(format!(
                "{} document does not round-trip through its JSON text",
                kind
            )));
        }

        let spec = schema::lookup(kind);
        Ok(Self {
            kind,
            value,
            text,
            suggested_name: suggested_name.into(),
            target: Target {
                side: spec.side,
                subfolder: spec.subfolder.to_string(),
            },
            localization: None,
        })
    }

    /// Override the folder inside the pack.
    pub fn with_subfolder<S: Into<String>>(mut self, subfolder: S) -> Self {
        self.target.subfolder = subfolder.into();
        self
    }

    /// Attach a localization entry.
    pub fn with_localization<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.localization = Some(LocalizationEntry {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Document kind.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Parsed document.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Serialized document.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// File name (without extension) proposed for this document.
    pub fn suggested_name(&self) -> &str {
        &self.suggested_name
    }

    /// Target location inside a project.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Localization entry, if the document has a display name.
    pub fn localization(&self) -> Option<&LocalizationEntry> {
        self.localization.as_ref()
    }

    /// Consume the document and return its text.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Parse JSON text, reporting failures as [`Error::InvalidDocument`].
pub fn parse_json_text(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::invalid_document(format!("JSON format error: {}", e)))
}

/// Insert `(key, value)` into a JSON object; no-op on non-objects.
pub(crate) fn insert(target: &mut Value, key: &str, value: Value) {
    if let Value::Object(map) = target {
        map.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RecipeKind;
    use serde_json::json;

    #[test]
    fn test_text_keeps_template_order() {
        let value = json!({
            "format_version": "1.20.0",
            "zeta": 1,
            "alpha": 2
        });
        let doc = ConfigDocument::new(DocumentKind::Item, value, "x").unwrap();
        let zeta = doc.text().find("zeta").unwrap();
        let alpha = doc.text().find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_default_target_follows_schema() {
        let doc = ConfigDocument::new(
            DocumentKind::Recipe(RecipeKind::Furnace),
            json!({}),
            "iron_furnace",
        )
        .unwrap();
        assert_eq!(doc.target().side, PackSide::Behavior);
        assert_eq!(doc.target().subfolder, "recipes");

        let doc = ConfigDocument::new(DocumentKind::TextureDefinition, json!({}), "item_texture")
            .unwrap();
        assert_eq!(doc.target().side, PackSide::Resource);
    }

    #[test]
    fn test_overrides() {
        let doc = ConfigDocument::new(DocumentKind::LootTable, json!({"pools": []}), "chest_loot_table")
            .unwrap()
            .with_subfolder("loot_tables/chests")
            .with_localization("item.demo.ruby.name", "Ruby");
        assert_eq!(doc.target().subfolder, "loot_tables/chests");
        assert_eq!(doc.localization().unwrap().value, "Ruby");
    }

    #[test]
    fn test_parse_json_text() {
        assert!(parse_json_text("{\"a\": [1, 2]}").is_ok());
        assert!(parse_json_text("{\"a\": ").unwrap_err().is_invalid_document());
    }

    #[test]
    fn test_indentation_is_two_spaces() {
        let doc = ConfigDocument::new(DocumentKind::Item, json!({"a": {"b": true}}), "x").unwrap();
        assert_eq!(doc.text(), "{\n  \"a\": {\n    \"b\": true\n  }\n}");
    }
}
