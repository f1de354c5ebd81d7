//! Item texture definitions (`textures/item_texture.json`).

use super::DocumentSource;
use crate::document::ConfigDocument;
use crate::schema::DocumentKind;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// File name of the texture definition inside `textures/`.
pub const FILE_NAME: &str = "item_texture";

/// Maps one item identifier to a texture path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureMapping {
    pub identifier: String,
    pub path: String,
}

impl TextureMapping {
    /// Build a mapping; both parts must be non-blank.
    pub fn new<I: Into<String>, P: Into<String>>(identifier: I, path: P) -> Result<Self> {
        let identifier = identifier.into().trim().to_string();
        let path = path.into().trim().to_string();
        if identifier.is_empty() {
            return Err(Error::validation("identifier", "required field is missing"));
        }
        if path.is_empty() {
            return Err(Error::validation("path", "required field is missing"));
        }
        Ok(Self { identifier, path })
    }
}

/// Ordered list of texture mappings being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureMappings {
    mappings: Vec<TextureMapping>,
}

impl TextureMappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mapping: TextureMapping) {
        self.mappings.push(mapping);
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureMapping> {
        self.mappings.iter()
    }
}

impl FromIterator<TextureMapping> for TextureMappings {
    fn from_iter<I: IntoIterator<Item = TextureMapping>>(iter: I) -> Self {
        Self {
            mappings: iter.into_iter().collect(),
        }
    }
}

impl DocumentSource for TextureMappings {
    fn generate(&self) -> Result<ConfigDocument> {
        if self.mappings.is_empty() {
            return Err(Error::validation(
                "mappings",
                "at least one texture mapping is required",
            ));
        }

        // A repeated identifier keeps its first slot and takes the last path.
        let mut texture_data = Map::new();
        for mapping in &self.mappings {
            texture_data.insert(
                mapping.identifier.clone(),
                json!({ "textures": mapping.path }),
            );
        }

        let value = json!({ "texture_data": Value::Object(texture_data) });
        ConfigDocument::new(DocumentKind::TextureDefinition, value, FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_data_shape() {
        let mappings: TextureMappings = [
            TextureMapping::new("demo:ruby", "textures/items/ruby").unwrap(),
            TextureMapping::new("demo:wand", "textures/items/wand").unwrap(),
        ]
        .into_iter()
        .collect();

        let doc = mappings.generate().unwrap();
        assert_eq!(
            *doc.value(),
            json!({
                "texture_data": {
                    "demo:ruby": {"textures": "textures/items/ruby"},
                    "demo:wand": {"textures": "textures/items/wand"}
                }
            })
        );
        assert_eq!(doc.target().side, crate::schema::PackSide::Resource);
        assert_eq!(doc.target().subfolder, "textures");
        assert_eq!(doc.suggested_name(), "item_texture");
    }

    #[test]
    fn test_duplicate_keeps_first_slot_last_value() {
        let mut mappings = TextureMappings::new();
        mappings.push(TextureMapping::new("demo:ruby", "old").unwrap());
        mappings.push(TextureMapping::new("demo:wand", "wand").unwrap());
        mappings.push(TextureMapping::new("demo:ruby", "new").unwrap());

        let doc = mappings.generate().unwrap();
        let data = doc.value()["texture_data"].as_object().unwrap();
        let keys: Vec<&String> = data.keys().collect();
        assert_eq!(keys, ["demo:ruby", "demo:wand"]);
        assert_eq!(data["demo:ruby"]["textures"], "new");
    }

    #[test]
    fn test_empty_is_rejected() {
        let err = TextureMappings::new().generate().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("mappings"));
    }

    #[test]
    fn test_blank_parts_are_rejected() {
        assert_eq!(
            TextureMapping::new(" ", "x").unwrap_err().field(),
            Some("identifier")
        );
        assert_eq!(
            TextureMapping::new("demo:ruby", "").unwrap_err().field(),
            Some("path")
        );
    }
}
