//! # Loot tables
//!
//! Pools and entries are edited in memory as a [`LootTableDraft`] and only
//! flattened into a document when generated. Pools keep a name for the
//! editing session; the name is not part of the emitted table.

use super::DocumentSource;
use crate::document::{insert, ConfigDocument};
use crate::schema::DocumentKind;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Conditions offered by the loot form. Any condition name is accepted.
pub const CONDITIONS: &[&str] = &["random_chance", "killed_by_player", "on_fire"];

/// What a loot table drops for; selects its folder and file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LootCategory {
    #[default]
    Entity,
    Block,
    Chest,
}

impl LootCategory {
    /// Category name as used in file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Block => "block",
            Self::Chest => "chest",
        }
    }

    /// Folder inside the behavior pack.
    pub fn subfolder(self) -> &'static str {
        match self {
            Self::Entity => "loot_tables/entities",
            Self::Block => "loot_tables/blocks",
            Self::Chest => "loot_tables/chests",
        }
    }
}

impl fmt::Display for LootCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LootCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "entity" => Ok(Self::Entity),
            "block" => Ok(Self::Block),
            "chest" => Ok(Self::Chest),
            other => Err(Error::validation(
                "category",
                format!("unknown loot category '{}'", other),
            )),
        }
    }
}

fn one() -> u32 {
    1
}

/// One weighted item drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: String,
    #[serde(default = "one")]
    pub weight: u32,
    #[serde(default = "one")]
    pub min_count: u32,
    #[serde(default = "one")]
    pub max_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl LootEntry {
    /// Entry dropping exactly one `item` with weight 1.
    pub fn new<S: Into<String>>(item: S) -> Self {
        Self {
            item: item.into(),
            weight: 1,
            min_count: 1,
            max_count: 1,
            condition: None,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_count(mut self, min_count: u32, max_count: u32) -> Self {
        self.min_count = min_count;
        self.max_count = max_count;
        self
    }

    pub fn with_condition<S: Into<String>>(mut self, condition: S) -> Self {
        self.condition = Some(condition.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.item.trim().is_empty() {
            return Err(Error::validation("item", "loot entry needs an item id"));
        }
        if self.min_count > self.max_count {
            return Err(Error::validation(
                "min_count",
                format!(
                    "minimum count {} exceeds maximum count {} for '{}'",
                    self.min_count, self.max_count, self.item
                ),
            ));
        }
        Ok(())
    }

    fn to_json(&self) -> Value {
        let count = if self.min_count == self.max_count {
            json!(self.min_count)
        } else {
            json!({ "min": self.min_count, "max": self.max_count })
        };

        let mut entry = json!({
            "type": "item",
            "name": self.item.trim(),
            "weight": self.weight,
            "functions": [
                { "function": "set_count", "count": count }
            ]
        });

        if let Some(condition) = self.condition.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            insert(&mut entry, "conditions", json!([{ "condition": condition }]));
        }
        entry
    }
}

/// A named group of entries rolled once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootPool {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<LootEntry>,
}

impl LootPool {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn add_entry(&mut self, entry: LootEntry) {
        self.entries.push(entry);
    }

    /// Remove the entry at `index`, if present.
    pub fn remove_entry(&mut self, index: usize) -> Option<LootEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }
}

/// In-memory loot table being edited.
///
/// # Example
///
/// ```rust
/// use quickide_core::generator::{DocumentSource, LootCategory, LootEntry, LootPool, LootTableDraft};
///
/// let mut pool = LootPool::new("main");
/// pool.add_entry(LootEntry::new("minecraft:feather").with_count(1, 3));
///
/// let mut draft = LootTableDraft::new(LootCategory::Entity);
/// draft.add_pool(pool);
///
/// let doc = draft.generate()?;
/// assert_eq!(doc.target().subfolder, "loot_tables/entities");
/// # Ok::<(), quickide_core::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootTableDraft {
    #[serde(default)]
    pub category: LootCategory,
    #[serde(default)]
    pub pools: Vec<LootPool>,
}

impl LootTableDraft {
    pub fn new(category: LootCategory) -> Self {
        Self {
            category,
            pools: Vec::new(),
        }
    }

    /// Append a pool.
    pub fn add_pool(&mut self, pool: LootPool) {
        self.pools.push(pool);
    }

    /// Remove the pool at `index`, if present.
    pub fn remove_pool(&mut self, index: usize) -> Option<LootPool> {
        (index < self.pools.len()).then(|| self.pools.remove(index))
    }

    /// Mutable access to a pool for adding entries.
    pub fn pool_mut(&mut self, index: usize) -> Option<&mut LootPool> {
        self.pools.get_mut(index)
    }
}

impl DocumentSource for LootTableDraft {
    fn generate(&self) -> Result<ConfigDocument> {
        let mut pools = Vec::new();
        for pool in self.pools.iter().filter(|pool| !pool.entries.is_empty()) {
            let mut entries = Vec::with_capacity(pool.entries.len());
            for entry in &pool.entries {
                entry.validate()?;
                entries.push(entry.to_json());
            }
            pools.push(json!({ "rolls": 1, "entries": entries }));
        }

        if pools.is_empty() {
            return Err(Error::validation(
                "pools",
                "at least one loot pool must contain an entry",
            ));
        }

        let doc = ConfigDocument::new(
            DocumentKind::LootTable,
            json!({ "pools": pools }),
            format!("{}_loot_table", self.category),
        )?;
        Ok(doc.with_subfolder(self.category.subfolder()))
    }
}
