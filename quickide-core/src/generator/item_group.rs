//! Creative inventory item groups (`minecraft:item_group`).

use super::DocumentSource;
use crate::document::ConfigDocument;
use crate::schema::{self, DocumentKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// File name the item group is saved under.
pub const FILE_NAME: &str = "item_tab_config";

/// Tab names a new draft starts with.
pub const DEFAULT_TABS: &[&str] = &[
    "Equipment",
    "Tools",
    "Building Materials",
    "Food",
    "Redstone",
    "Nature",
];

/// One creative tab and its groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreativeTab {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl CreativeTab {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }
}

/// Which tabs serialize their groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabScope {
    /// Every tab carries its groups.
    #[default]
    All,
    /// Only the selected tab carries its groups; the rest are emitted with
    /// an empty list. No selection empties every tab.
    SelectedOnly(Option<usize>),
}

/// In-memory item group being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGroupDraft {
    /// Project name; drives the identifier and display name
    pub project: String,
    #[serde(default)]
    pub tabs: Vec<CreativeTab>,
    #[serde(default)]
    pub scope: TabScope,
}

impl ItemGroupDraft {
    /// Draft with no tabs.
    pub fn new<S: Into<String>>(project: S) -> Self {
        Self {
            project: project.into(),
            tabs: Vec::new(),
            scope: TabScope::All,
        }
    }

    /// Draft pre-filled with the default tab names.
    pub fn with_default_tabs<S: Into<String>>(project: S) -> Self {
        let mut draft = Self::new(project);
        draft.tabs = DEFAULT_TABS.iter().map(|name| CreativeTab::new(*name)).collect();
        draft
    }

    pub fn with_scope(mut self, scope: TabScope) -> Self {
        self.scope = scope;
        self
    }

    /// Append a tab; blank names are rejected.
    pub fn add_tab<S: Into<String>>(&mut self, name: S) -> Result<usize> {
        let name = non_blank("tab", name.into())?;
        self.tabs.push(CreativeTab::new(name));
        Ok(self.tabs.len() - 1)
    }

    /// Add a group to the tab at `tab`; blank names are rejected.
    pub fn add_group<S: Into<String>>(&mut self, tab: usize, group: S) -> Result<()> {
        let group = non_blank("group", group.into())?;
        let tab = self
            .tabs
            .get_mut(tab)
            .ok_or_else(|| Error::not_found(format!("Tab #{}", tab)))?;
        tab.groups.push(group);
        Ok(())
    }

    /// Remove the tab at `index`, if present.
    pub fn remove_tab(&mut self, index: usize) -> Option<CreativeTab> {
        (index < self.tabs.len()).then(|| self.tabs.remove(index))
    }

    fn tab_json(&self, index: usize, tab: &CreativeTab) -> Value {
        let include_groups = match self.scope {
            TabScope::All => true,
            TabScope::SelectedOnly(selected) => selected == Some(index),
        };
        let groups = if include_groups {
            tab.groups.clone()
        } else {
            Vec::new()
        };
        json!({ "name": tab.name, "groups": groups })
    }
}

fn non_blank(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation(field, "name must not be blank"))
    } else {
        Ok(trimmed.to_string())
    }
}

impl DocumentSource for ItemGroupDraft {
    fn generate(&self) -> Result<ConfigDocument> {
        let project = non_blank("project", self.project.clone())?;
        let spec = schema::lookup(DocumentKind::ItemGroup);

        let tabs: Vec<Value> = self
            .tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| self.tab_json(index, tab))
            .collect();

        let body = json!({
            "description": {
                "identifier": format!("{}:item_group", project),
                "category": "items"
            },
            "components": {
                "minecraft:icon": { "texture": "textures/items/group_icon" },
                "minecraft:display_name": { "value": format!("{} Item Group", project) },
                "minecraft:creative_tabs": tabs
            }
        });

        let mut value = Map::new();
        if let Some(format_version) = spec.format_version {
            value.insert("format_version".to_string(), json!(format_version));
        }
        if let Some(root_key) = spec.root_key {
            value.insert(root_key.to_string(), body);
        }

        ConfigDocument::new(DocumentKind::ItemGroup, Value::Object(value), FILE_NAME)
    }
}
