//! # Pack manifests and project metadata
//!
//! Serde models for `manifest.json` (one per pack) and the project-level
//! `project.json`. Fields this crate does not know about are kept in an
//! `extra` map so rewriting a manifest never drops hand-made additions.

use crate::document::parse_json_text;
use crate::schema::PackSide;
use crate::{Error, Result};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use uuid::Uuid;

/// Manifest file name inside each pack.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Project metadata file name at the project root.
pub const PROJECT_FILE: &str = "project.json";

/// `format_version` written into new manifests.
pub const MANIFEST_FORMAT_VERSION: u32 = 2;

/// Timestamp layout used in `project.json`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Semantic version triple.
pub type Version = [u32; 3];

pub const DEFAULT_VERSION: Version = [1, 0, 0];
pub const DEFAULT_ENGINE_VERSION: Version = [1, 20, 0];

/// A version as it appears in a manifest: a triple, or a string in newer
/// manifest formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackVersion {
    Triple(Version),
    Named(String),
}

impl From<Version> for PackVersion {
    fn from(version: Version) -> Self {
        Self::Triple(version)
    }
}

/// Header and module UUIDs of one pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackUuids {
    pub header: Uuid,
    pub module: Uuid,
}

impl PackUuids {
    /// Two fresh random UUIDs.
    pub fn generate() -> Self {
        Self {
            header: Uuid::new_v4(),
            module: Uuid::new_v4(),
        }
    }
}

/// The four UUIDs of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UuidSet {
    pub behavior_pack: PackUuids,
    pub resource_pack: PackUuids,
}

impl UuidSet {
    /// Four fresh random UUIDs.
    pub fn generate() -> Self {
        Self {
            behavior_pack: PackUuids::generate(),
            resource_pack: PackUuids::generate(),
        }
    }

    pub fn get(&self, side: PackSide) -> PackUuids {
        match side {
            PackSide::Behavior => self.behavior_pack,
            PackSide::Resource => self.resource_pack,
        }
    }

    pub fn set(&mut self, side: PackSide, uuids: PackUuids) {
        match side {
            PackSide::Behavior => self.behavior_pack = uuids,
            PackSide::Resource => self.resource_pack = uuids,
        }
    }
}

/// `header` section of a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub uuid: Uuid,
    pub version: PackVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_engine_version: Option<PackVersion>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `modules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestModule {
    #[serde(rename = "type")]
    pub module_type: String,
    pub uuid: Uuid,
    pub version: PackVersion,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `dependencies`: either a pack (by UUID) or a script module
/// (by name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<PackVersion>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dependency {
    /// Dependency on another pack's header.
    pub fn on_pack(uuid: Uuid, version: PackVersion) -> Self {
        Self {
            uuid: Some(uuid),
            module_name: None,
            version: Some(version),
            extra: Map::new(),
        }
    }
}

/// A pack's `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub header: ManifestHeader,
    #[serde(default)]
    pub modules: Vec<ManifestModule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Manifest for one pack of a project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quickide_core::manifest::{Manifest, PackUuids};
    /// use quickide_core::schema::PackSide;
    ///
    /// let manifest = Manifest::for_pack(
    ///     PackSide::Resource,
    ///     "Demo",
    ///     "Gems and more",
    ///     PackUuids::generate(),
    ///     [1, 0, 0],
    ///     [1, 20, 0],
    /// );
    /// assert_eq!(manifest.header.name, "Demo Resource Pack");
    /// assert_eq!(manifest.modules[0].module_type, "resources");
    /// ```
    pub fn for_pack(
        side: PackSide,
        project_name: &str,
        description: &str,
        uuids: PackUuids,
        version: Version,
        engine_version: Version,
    ) -> Self {
        Self {
            format_version: MANIFEST_FORMAT_VERSION,
            header: ManifestHeader {
                name: format!("{} {}", project_name, side.display_name()),
                description: description.to_string(),
                uuid: uuids.header,
                version: version.into(),
                min_engine_version: Some(engine_version.into()),
                extra: Map::new(),
            },
            modules: vec![ManifestModule {
                module_type: side.module_type().to_string(),
                uuid: uuids.module,
                version: version.into(),
                extra: Map::new(),
            }],
            dependencies: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Placeholder manifest written when a missing pack is recreated. It
    /// carries the project's version and minimum engine version.
    pub fn placeholder(side: PackSide, project: &ProjectConfig, uuids: PackUuids) -> Self {
        let description = match side {
            PackSide::Behavior => "Auto-generated behavior pack",
            PackSide::Resource => "Auto-generated resource pack",
        };
        Self::for_pack(
            side,
            &project.name,
            description,
            uuids,
            project.version,
            project.min_engine_version,
        )
    }

    /// Add a dependency on another pack's header.
    pub fn depending_on(mut self, header: Uuid, version: PackVersion) -> Self {
        self.dependencies.push(Dependency::on_pack(header, version));
        self
    }

    /// Read and parse a manifest file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let value = parse_json_text(&content)?;
        serde_json::from_value(value).map_err(|e| {
            Error::invalid_document(format!("{}: {}", path.display(), e))
        })
    }

    /// Pretty-printed JSON text.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// UUID of the first module, if any.
    pub fn module_uuid(&self) -> Option<Uuid> {
        self.modules.first().map(|module| module.uuid)
    }

    /// Whether any dependency points at `header`.
    pub fn depends_on(&self, header: Uuid) -> bool {
        self.dependencies
            .iter()
            .any(|dependency| dependency.uuid == Some(header))
    }

    /// First dependency that references a pack by UUID.
    pub fn pack_dependency(&self) -> Option<Uuid> {
        self.dependencies.iter().find_map(|dependency| dependency.uuid)
    }

    /// Replace the header UUID and the first module's UUID.
    pub fn set_uuids(&mut self, uuids: PackUuids) {
        self.header.uuid = uuids.header;
        if let Some(module) = self.modules.first_mut() {
            module.uuid = uuids.module;
        }
    }

    /// Point the pack dependency at `new_header`.
    ///
    /// The dependency currently naming `old_header` is updated; failing that
    /// the first UUID dependency; failing that a new dependency is appended.
    /// Script-module dependencies are never touched.
    pub fn relink_dependency(&mut self, old_header: Option<Uuid>, new_header: Uuid, version: PackVersion) {
        let position = old_header
            .and_then(|old| {
                self.dependencies
                    .iter()
                    .position(|dependency| dependency.uuid == Some(old))
            })
            .or_else(|| {
                self.dependencies
                    .iter()
                    .position(|dependency| dependency.uuid.is_some())
            });

        match position {
            Some(index) => self.dependencies[index].uuid = Some(new_header),
            None => self.dependencies.push(Dependency::on_pack(new_header, version)),
        }
    }
}

/// `project.json` at the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created: String,
    pub last_modified: String,
    #[serde(rename = "type", default = "addon_type")]
    pub project_type: String,
    pub version: Version,
    pub uuids: UuidSet,
    pub min_engine_version: Version,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn addon_type() -> String {
    "addon".to_string()
}

/// Current local time in the `project.json` layout.
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

impl ProjectConfig {
    pub fn new(
        name: &str,
        description: &str,
        version: Version,
        engine_version: Version,
        uuids: UuidSet,
    ) -> Self {
        let now = timestamp_now();
        Self {
            name: name.to_string(),
            description: description.to_string(),
            created: now.clone(),
            last_modified: now,
            project_type: addon_type(),
            version,
            uuids,
            min_engine_version: engine_version,
            extra: Map::new(),
        }
    }

    /// Read and parse `project.json`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let value = parse_json_text(&content)?;
        serde_json::from_value(value).map_err(|e| {
            Error::invalid_document(format!("{}: {}", path.display(), e))
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set `last_modified` to now.
    pub fn touch(&mut self) {
        self.last_modified = timestamp_now();
    }

    /// Parsed `last_modified`, if it follows the expected layout.
    pub fn last_modified_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.last_modified, TIMESTAMP_FORMAT).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uuid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn test_behavior_manifest_shape() {
        let manifest = Manifest::for_pack(
            PackSide::Behavior,
            "Demo",
            "desc",
            PackUuids { header: uuid(1), module: uuid(2) },
            [1, 2, 3],
            [1, 20, 0],
        )
        .depending_on(uuid(3), [1, 2, 3].into());

        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            value,
            json!({
                "format_version": 2,
                "header": {
                    "name": "Demo Behavior Pack",
                    "description": "desc",
                    "uuid": uuid(1).to_string(),
                    "version": [1, 2, 3],
                    "min_engine_version": [1, 20, 0]
                },
                "modules": [{"type": "data", "uuid": uuid(2).to_string(), "version": [1, 2, 3]}],
                "dependencies": [{"uuid": uuid(3).to_string(), "version": [1, 2, 3]}]
            })
        );
        let text = manifest.to_json_string().unwrap();
        assert!(text.find("format_version").unwrap() < text.find("header").unwrap());
    }

    fn demo_config() -> ProjectConfig {
        ProjectConfig::new("Demo", "", DEFAULT_VERSION, DEFAULT_ENGINE_VERSION, UuidSet::generate())
    }

    #[test]
    fn test_placeholder_uses_project_versions() {
        let config = ProjectConfig::new("Demo", "", [2, 3, 4], [1, 21, 0], UuidSet::generate());
        let manifest = Manifest::placeholder(PackSide::Behavior, &config, PackUuids::generate());
        assert_eq!(manifest.header.name, "Demo Behavior Pack");
        assert_eq!(manifest.header.version, PackVersion::Triple([2, 3, 4]));
        assert_eq!(manifest.modules[0].version, PackVersion::Triple([2, 3, 4]));
        assert_eq!(
            manifest.header.min_engine_version,
            Some(PackVersion::Triple([1, 21, 0]))
        );
    }

    #[test]
    fn test_resource_manifest_has_no_dependencies_key() {
        let manifest = Manifest::placeholder(PackSide::Resource, &demo_config(), PackUuids::generate());
        let value = serde_json::to_value(&manifest).unwrap();
        assert!(value.get("dependencies").is_none());
        assert_eq!(value["header"]["description"], "Auto-generated resource pack");
    }

    #[test]
    fn test_unknown_fields_survive() {
        let text = json!({
            "format_version": 2,
            "header": {
                "name": "X",
                "uuid": uuid(1).to_string(),
                "version": "1.0.0",
                "lock_template_options": true
            },
            "modules": [{"type": "script", "uuid": uuid(2).to_string(), "version": [1, 0, 0], "entry": "scripts/main.js"}],
            "dependencies": [
                {"module_name": "@minecraft/server", "version": "1.8.0"},
                {"uuid": uuid(3).to_string(), "version": [1, 0, 0]}
            ],
            "metadata": {"authors": ["me"]}
        });
        let manifest: Manifest = serde_json::from_value(text.clone()).unwrap();
        assert_eq!(manifest.header.version, PackVersion::Named("1.0.0".into()));
        assert_eq!(manifest.pack_dependency(), Some(uuid(3)));

        let back = serde_json::to_value(&manifest).unwrap();
        assert_eq!(back["metadata"], text["metadata"]);
        assert_eq!(back["header"]["lock_template_options"], true);
        assert_eq!(back["modules"][0]["entry"], "scripts/main.js");
        assert_eq!(back["dependencies"][0]["module_name"], "@minecraft/server");
    }

    #[test]
    fn test_relink_dependency() {
        let base = Manifest::placeholder(PackSide::Behavior, &demo_config(), PackUuids::generate());

        let mut manifest = base.clone().depending_on(uuid(7), DEFAULT_VERSION.into());
        manifest.relink_dependency(Some(uuid(7)), uuid(9), DEFAULT_VERSION.into());
        assert!(manifest.depends_on(uuid(9)));
        assert_eq!(manifest.dependencies.len(), 1);

        let mut manifest = base.clone().depending_on(uuid(7), DEFAULT_VERSION.into());
        manifest.relink_dependency(Some(uuid(1)), uuid(9), DEFAULT_VERSION.into());
        assert_eq!(manifest.dependencies[0].uuid, Some(uuid(9)));

        let mut manifest = base;
        manifest.relink_dependency(None, uuid(9), DEFAULT_VERSION.into());
        assert_eq!(manifest.dependencies.len(), 1);
        assert!(manifest.depends_on(uuid(9)));
    }

    #[test]
    fn test_set_uuids() {
        let mut manifest = Manifest::placeholder(PackSide::Behavior, &demo_config(), PackUuids::generate());
        manifest.set_uuids(PackUuids { header: uuid(4), module: uuid(5) });
        assert_eq!(manifest.header.uuid, uuid(4));
        assert_eq!(manifest.module_uuid(), Some(uuid(5)));
    }

    #[test]
    fn test_project_config_shape() {
        let uuids = UuidSet::generate();
        let mut config = ProjectConfig::new("Demo", "desc", [1, 0, 0], [1, 20, 0], uuids);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["type"], "addon");
        assert_eq!(value["uuids"]["resource_pack"]["header"], uuids.resource_pack.header.to_string());
        assert!(config.last_modified_at().is_some());

        config.last_modified = "yesterday".into();
        assert!(config.last_modified_at().is_none());
        config.touch();
        assert!(config.last_modified_at().is_some());
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Manifest::load(&path).unwrap_err().is_invalid_document());

        std::fs::write(&path, "{\"format_version\": 2}").unwrap();
        assert!(Manifest::load(&path).unwrap_err().is_invalid_document());

        assert!(Manifest::load(dir.path().join("absent.json")).unwrap_err().is_io());
    }
}
