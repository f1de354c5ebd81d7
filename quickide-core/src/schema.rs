//! # Schema registry
//!
//! Fixed per-kind facts about the addon documents Quick IDE produces: the
//! root key and pinned `format_version` of each document, the minimal set of
//! required form fields, where the file lands inside the project, and which
//! localization prefix its display name uses.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two pack subtrees of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackSide {
    /// `behavior_pack/`: game logic
    Behavior,
    /// `resource_pack/`: presentation assets
    Resource,
}

impl PackSide {
    /// Both sides, behavior pack first.
    pub const ALL: [PackSide; 2] = [PackSide::Behavior, PackSide::Resource];

    /// Directory name of this pack inside a project.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Behavior => "behavior_pack",
            Self::Resource => "resource_pack",
        }
    }

    /// Suffix used in manifest header names.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Behavior => "Behavior Pack",
            Self::Resource => "Resource Pack",
        }
    }

    /// Manifest module type for this pack.
    pub fn module_type(self) -> &'static str {
        match self {
            Self::Behavior => "data",
            Self::Resource => "resources",
        }
    }
}

impl fmt::Display for PackSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for PackSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bp" | "behavior" | "behavior_pack" => Ok(Self::Behavior),
            "rp" | "resource" | "resource_pack" => Ok(Self::Resource),
            other => Err(Error::validation(
                "pack",
                format!("unknown pack '{}', expected behavior or resource", other),
            )),
        }
    }
}

/// Recipe variants supported by the recipe generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeKind {
    CraftingShaped,
    CraftingShapeless,
    Furnace,
    Brewing,
}

impl RecipeKind {
    /// Name used in forms and in suggested file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CraftingShaped => "crafting_shaped",
            Self::CraftingShapeless => "crafting_shapeless",
            Self::Furnace => "furnace",
            Self::Brewing => "brewing",
        }
    }

    /// Tag placed between namespace and output name in derived identifiers.
    pub fn identifier_tag(self) -> &'static str {
        match self {
            Self::CraftingShaped | Self::CraftingShapeless => "recipe",
            Self::Furnace => "furnace",
            Self::Brewing => "brewing",
        }
    }
}

impl FromStr for RecipeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "crafting_shaped" | "shaped" => Ok(Self::CraftingShaped),
            "crafting_shapeless" | "shapeless" => Ok(Self::CraftingShapeless),
            "furnace" => Ok(Self::Furnace),
            "brewing" => Ok(Self::Brewing),
            other => Err(Error::validation(
                "recipe_type",
                format!("unknown recipe type '{}'", other),
            )),
        }
    }
}

/// Kind of a generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Item,
    Block,
    Entity,
    SpawnRules,
    Recipe(RecipeKind),
    LootTable,
    ItemGroup,
    TextureDefinition,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item => f.write_str("item"),
            Self::Block => f.write_str("block"),
            Self::Entity => f.write_str("entity"),
            Self::SpawnRules => f.write_str("spawn_rules"),
            Self::Recipe(kind) => write!(f, "recipe ({})", kind.as_str()),
            Self::LootTable => f.write_str("loot_table"),
            Self::ItemGroup => f.write_str("item_group"),
            Self::TextureDefinition => f.write_str("texture_definition"),
        }
    }
}

/// Flat forms that generate from a [`FieldSet`](crate::fields::FieldSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Item,
    Block,
    Entity,
    SpawnRules,
    Recipe,
}

impl FromStr for FormKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "item" => Ok(Self::Item),
            "block" => Ok(Self::Block),
            "entity" => Ok(Self::Entity),
            "spawn_rules" | "spawn-rules" => Ok(Self::SpawnRules),
            "recipe" => Ok(Self::Recipe),
            other => Err(Error::validation(
                "kind",
                format!("unknown form kind '{}'", other),
            )),
        }
    }
}

/// Static description of one document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaSpec {
    /// Top-level key wrapping the document body, if any
    pub root_key: Option<&'static str>,
    /// Pinned `format_version`, if the document carries one
    pub format_version: Option<&'static str>,
    /// Form fields that must be non-blank
    pub required: &'static [&'static str],
    /// Pack the document is saved into
    pub side: PackSide,
    /// Default folder inside the pack
    pub subfolder: &'static str,
    /// Localization key prefix (`item`, `tile`, `entity`)
    pub lang_prefix: Option<&'static str>,
}

const IDENTIFIED: &[&str] = &["identifier", "display_name"];

const ITEM: SchemaSpec = SchemaSpec {
    root_key: Some("minecraft:item"),
    format_version: Some("1.20.0"),
    required: IDENTIFIED,
    side: PackSide::Behavior,
    subfolder: "items",
    lang_prefix: Some("item"),
};

const BLOCK: SchemaSpec = SchemaSpec {
    root_key: Some("minecraft:block"),
    format_version: Some("1.20.0"),
    required: IDENTIFIED,
    side: PackSide::Behavior,
    subfolder: "blocks",
    lang_prefix: Some("tile"),
};

const ENTITY: SchemaSpec = SchemaSpec {
    root_key: Some("minecraft:entity"),
    format_version: Some("1.20.0"),
    required: IDENTIFIED,
    side: PackSide::Behavior,
    subfolder: "entities",
    lang_prefix: Some("entity"),
};

const SPAWN_RULES: SchemaSpec = SchemaSpec {
    root_key: Some("minecraft:spawn_rules"),
    format_version: Some("1.8.0"),
    required: &["identifier", "biome"],
    side: PackSide::Behavior,
    subfolder: "spawn_rules",
    lang_prefix: None,
};

const RECIPE_SHAPED: SchemaSpec = SchemaSpec {
    root_key: Some("minecraft:recipe_shaped"),
    format_version: Some("1.20.0"),
    required: &["output"],
    side: PackSide::Behavior,
    subfolder: "recipes",
    lang_prefix: None,
};

const RECIPE_SHAPELESS: SchemaSpec = SchemaSpec {
    root_key: Some("minecraft:recipe_shapeless"),
    ..RECIPE_SHAPED
};

const RECIPE_FURNACE: SchemaSpec = SchemaSpec {
    root_key: Some("minecraft:recipe_furnace"),
    required: &["output", "input"],
    ..RECIPE_SHAPED
};

const RECIPE_BREWING: SchemaSpec = SchemaSpec {
    root_key: Some("minecraft:recipe_brewing_mix"),
    required: &["output", "input", "reagent"],
    ..RECIPE_SHAPED
};

const LOOT_TABLE: SchemaSpec = SchemaSpec {
    root_key: None,
    format_version: None,
    required: &[],
    side: PackSide::Behavior,
    subfolder: "loot_tables",
    lang_prefix: None,
};

const ITEM_GROUP: SchemaSpec = SchemaSpec {
    root_key: Some("minecraft:item_group"),
    format_version: Some("1.17.0"),
    required: &[],
    side: PackSide::Behavior,
    subfolder: "items",
    lang_prefix: None,
};

const TEXTURE_DEFINITION: SchemaSpec = SchemaSpec {
    root_key: None,
    format_version: None,
    required: &[],
    side: PackSide::Resource,
    subfolder: "textures",
    lang_prefix: None,
};

/// Look up the schema facts for a document kind.
///
/// # Example
///
/// ```rust
/// use quickide_core::schema::{self, DocumentKind, PackSide};
///
/// let spec = schema::lookup(DocumentKind::Block);
/// assert_eq!(spec.root_key, Some("minecraft:block"));
/// assert_eq!(spec.side, PackSide::Behavior);
/// ```
pub fn lookup(kind: DocumentKind) -> &'static SchemaSpec {
    match kind {
        DocumentKind::Item => &ITEM,
        DocumentKind::Block => &BLOCK,
        DocumentKind::Entity => &ENTITY,
        DocumentKind::SpawnRules => &SPAWN_RULES,
        DocumentKind::Recipe(RecipeKind::CraftingShaped) => &RECIPE_SHAPED,
        DocumentKind::Recipe(RecipeKind::CraftingShapeless) => &RECIPE_SHAPELESS,
        DocumentKind::Recipe(RecipeKind::Furnace) => &RECIPE_FURNACE,
        DocumentKind::Recipe(RecipeKind::Brewing) => &RECIPE_BREWING,
        DocumentKind::LootTable => &LOOT_TABLE,
        DocumentKind::ItemGroup => &ITEM_GROUP,
        DocumentKind::TextureDefinition => &TEXTURE_DEFINITION,
    }
}

/// Derive the localization key for an identifier.
///
/// The namespace separator becomes a dot and the prefix is prepended.
///
/// # Example
///
/// ```rust
/// use quickide_core::schema::localization_key;
///
/// assert_eq!(localization_key("tile", "demo:ruby_block"), "tile.demo.ruby_block.name");
/// ```
pub fn localization_key(prefix: &str, identifier: &str) -> String {
    format!("{}.{}.name", prefix, identifier.replace(':', "."))
}

/// Default file name (without extension) for an identifier-keyed document.
pub fn suggested_file_name(identifier: &str) -> String {
    let mut parts = identifier.split(':');
    match (parts.next(), parts.next()) {
        (Some(_), Some(name)) => name.to_string(),
        _ => identifier.replace(':', "_"),
    }
}

/// Last `:`-separated segment of an item id.
pub fn short_name(identifier: &str) -> &str {
    identifier.rsplit(':').next().unwrap_or(identifier)
}
