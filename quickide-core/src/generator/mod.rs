//! # Document generation
//!
//! Pure functions from form state to [`ConfigDocument`]s. Flat forms (item,
//! block, entity, spawn rules, recipe) take a [`FieldSet`]; loot tables, item
//! groups and texture definitions take a structured draft. Every source
//! implements [`DocumentSource`], so callers can treat them uniformly.
//!
//! Generation is deterministic: the same input always yields byte-identical
//! text, with keys in template order.

pub mod block;
pub mod entity;
pub mod item;
pub mod item_group;
pub mod loot;
pub mod recipe;
pub mod texture;

pub use item_group::{CreativeTab, ItemGroupDraft, TabScope};
pub use loot::{LootCategory, LootEntry, LootPool, LootTableDraft};
pub use texture::{TextureMapping, TextureMappings};

use crate::document::ConfigDocument;
use crate::fields::FieldSet;
use crate::schema::FormKind;
use crate::Result;

/// Anything that can be turned into a [`ConfigDocument`].
pub trait DocumentSource {
    /// Build the document, validating required input first.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending field when input is
    /// missing or malformed; no partial document is produced.
    fn generate(&self) -> Result<ConfigDocument>;
}

/// A flat form together with its kind.
#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub fields: FieldSet,
}

impl DocumentSource for Form {
    fn generate(&self) -> Result<ConfigDocument> {
        generate(self.kind, &self.fields)
    }
}

/// Generate a document for a flat form.
///
/// # Example
///
/// ```rust
/// use quickide_core::fields::FieldSet;
/// use quickide_core::generator;
/// use quickide_core::schema::FormKind;
///
/// let fields = FieldSet::new()
///     .with("identifier", "demo:ruby")
///     .with("display_name", "Ruby");
/// let doc = generator::generate(FormKind::Item, &fields)?;
/// assert_eq!(doc.value()["minecraft:item"]["description"]["identifier"], "demo:ruby");
/// # Ok::<(), quickide_core::Error>(())
/// ```
pub fn generate(kind: FormKind, fields: &FieldSet) -> Result<ConfigDocument> {
    match kind {
        FormKind::Item => item::generate(fields),
        FormKind::Block => block::generate(fields),
        FormKind::Entity => entity::generate(fields),
        FormKind::SpawnRules => entity::generate_spawn_rules(fields),
        FormKind::Recipe => recipe::generate(fields),
    }
}
