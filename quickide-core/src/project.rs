//! # Project store
//!
//! Projects live as plain directories under a projects root, one directory
//! per project:
//!
//! ```text
//! <root>/<name>/
//!   project.json
//!   behavior_pack/manifest.json, items/, entities/, ...
//!   resource_pack/manifest.json, textures/, texts/, ...
//! ```
//!
//! The behavior pack manifest depends on the resource pack header UUID.
//! Every operation that touches more than one of `project.json` and the two
//! manifests stages its writes and commits them together, so that link is
//! never left pointing at a stale UUID.

use crate::config::ProjectDefaults;
use crate::lang::{self, DEFAULT_LOCALE, LANGUAGES_FILE};
use crate::manifest::{
    Manifest, PackUuids, ProjectConfig, UuidSet, Version, MANIFEST_FILE, PROJECT_FILE,
};
use crate::schema::PackSide;
use crate::staging::StagedWrites;
use crate::{Error, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Folders scaffolded inside `behavior_pack/`.
pub const BEHAVIOR_FOLDERS: &[&str] = &[
    "items",
    "entities",
    "blocks",
    "recipes",
    "scripts",
    "animations",
    "animation_controllers",
    "functions",
    "loot_tables",
    "trading",
];

/// Folders scaffolded inside `resource_pack/`.
pub const RESOURCE_FOLDERS: &[&str] = &[
    "textures/items",
    "textures/entities",
    "textures/blocks",
    "textures/ui",
    "textures/particle",
    "models/entities",
    "models/blocks",
    "sounds",
    "sounds/music",
    "sounds/ambient",
    "texts",
    "font",
    "particles",
];

/// Placeholder dropped into each new pack.
pub const PACK_ICON_PLACEHOLDER: &str = "pack_icon.txt";

const PACK_ICON_TEXT: &str = "Place pack_icon.png here";

/// Behavior pack folders whose absence is reported by [`Project::validate`].
const EXPECTED_BEHAVIOR_FOLDERS: &[&str] = &["items", "entities", "blocks", "recipes", "loot_tables"];

/// Options for [`ProjectStore::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub description: String,
    pub version: Version,
    pub engine_version: Version,
    /// Keep the `scripts` folder
    pub scripts: bool,
    /// Keep the `functions` folder
    pub functions: bool,
    /// Locales written to `languages.json`, each with its own `.lang` file
    pub locales: Vec<String>,
}

impl NewProject {
    /// Options seeded from the configured project defaults.
    pub fn from_defaults(defaults: &ProjectDefaults) -> Self {
        Self {
            description: String::new(),
            version: defaults.version,
            engine_version: defaults.engine_version,
            scripts: defaults.include_scripts,
            functions: defaults.include_functions,
            locales: defaults.locales.clone(),
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }
}

impl Default for NewProject {
    fn default() -> Self {
        Self::from_defaults(&ProjectDefaults::default())
    }
}

/// Check a project name before it is used as a directory name.
pub fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("name", "Project name cannot be empty"));
    }
    if name.trim() != name {
        return Err(Error::validation(
            "name",
            "Project name cannot start or end with whitespace",
        ));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(Error::validation(
            "name",
            "Project name cannot contain path separators or '..'",
        ));
    }
    Ok(())
}

/// The set of projects under one root directory.
///
/// # Example
///
/// ```rust
/// use quickide_core::project::{NewProject, ProjectStore};
///
/// let root = tempfile::tempdir()?;
/// let store = ProjectStore::new(root.path())?;
/// store.create("Demo", &NewProject::default())?;
///
/// assert_eq!(store.list()?, vec!["Demo".to_string()]);
/// let project = store.open("Demo")?;
/// assert!(project.validate().is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!("Project store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a project with this name lives in.
    pub fn project_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Names of sub-directories that contain a `project.json`.
    ///
    /// The order is whatever the filesystem yields.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() || !path.join(PROJECT_FILE).is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!("Skipping project with non UTF-8 name {:?}", raw),
            }
        }
        Ok(names)
    }

    /// Create and scaffold a new project.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name or locale list is unusable
    /// - `AlreadyExists` if a directory of that name exists
    /// - any I/O error from scaffolding, after the partial directory has been
    ///   removed
    pub fn create(&self, name: &str, options: &NewProject) -> Result<Project> {
        validate_project_name(name)?;
        if options.locales.is_empty() {
            return Err(Error::validation("locales", "At least one locale is required"));
        }
        for locale in &options.locales {
            lang::validate_locale(locale)?;
        }

        let path = self.project_path(name);
        if path.exists() {
            return Err(Error::already_exists(format!("Project '{}'", name)));
        }

        fs::create_dir(&path)?;
        match scaffold(name, &path, options) {
            Ok(project) => {
                info!("Created project '{}' at {}", name, path.display());
                Ok(project)
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&path) {
                    warn!("Failed to clean up {}: {}", path.display(), cleanup);
                }
                Err(e)
            }
        }
    }

    /// Open an existing project.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the directory or its `project.json` is absent
    /// - `IncompleteStructure` if a pack directory is missing; see
    ///   [`ProjectStore::repair`]
    pub fn open(&self, name: &str) -> Result<Project> {
        let path = self.existing_project_path(name)?;

        let missing = missing_packs(&path);
        if !missing.is_empty() {
            return Err(Error::incomplete_structure(name, missing));
        }

        let project = Project::load(&path)?;
        debug!("Opened project '{}'", name);
        Ok(project)
    }

    /// Load a project by name without requiring both packs, so its layout
    /// can be inspected with [`Project::validate`].
    pub fn load(&self, name: &str) -> Result<Project> {
        let path = self.existing_project_path(name)?;
        Project::load(path)
    }

    /// Recreate missing pack directories with a minimal manifest.
    ///
    /// Existing packs are never modified. A recreated resource pack takes the
    /// UUID the behavior pack already depends on as its header; a recreated
    /// behavior pack depends on the existing resource pack header.
    pub fn repair(&self, name: &str) -> Result<Project> {
        let path = self.existing_project_path(name)?;
        let mut project = Project::load(&path)?;

        let missing = project.missing_packs();
        if missing.is_empty() {
            debug!("Project '{}' has nothing to repair", name);
            return Ok(project);
        }

        let mut manifests = Vec::new();
        match missing.as_slice() {
            [PackSide::Resource] => {
                let behavior = Manifest::load(project.manifest_path(PackSide::Behavior))?;
                let header = behavior.pack_dependency().unwrap_or_else(|| {
                    warn!("Behavior pack of '{}' has no pack dependency", name);
                    Uuid::new_v4()
                });
                let uuids = PackUuids {
                    header,
                    module: Uuid::new_v4(),
                };
                manifests.push(Manifest::placeholder(PackSide::Resource, &project.config, uuids));
            }
            [PackSide::Behavior] => {
                let resource = Manifest::load(project.manifest_path(PackSide::Resource))?;
                let manifest = Manifest::placeholder(PackSide::Behavior, &project.config, PackUuids::generate())
                    .depending_on(resource.header.uuid, resource.header.version.clone());
                manifests.push(manifest);
            }
            _ => {
                let uuids = UuidSet::generate();
                let resource = Manifest::placeholder(PackSide::Resource, &project.config, uuids.resource_pack);
                let behavior = Manifest::placeholder(PackSide::Behavior, &project.config, uuids.behavior_pack)
                    .depending_on(resource.header.uuid, resource.header.version.clone());
                manifests.push(behavior);
                manifests.push(resource);
            }
        }

        let mut created = Vec::new();
        let result = (|| -> Result<()> {
            let mut writes = StagedWrites::new();
            for manifest in &manifests {
                let side = side_of(manifest);
                let pack = project.pack_path(side);
                fs::create_dir_all(&pack)?;
                created.push(pack);
                writes.stage(project.manifest_path(side), &manifest.to_json_string()?)?;

                let module = manifest.module_uuid().unwrap_or_else(Uuid::new_v4);
                project.config.uuids.set(
                    side,
                    PackUuids {
                        header: manifest.header.uuid,
                        module,
                    },
                );
            }
            project.config.touch();
            writes.stage(project.path.join(PROJECT_FILE), &project.config.to_json_string()?)?;
            writes.commit()?;
            Ok(())
        })();

        if let Err(e) = result {
            for dir in created {
                let _ = fs::remove_dir_all(dir);
            }
            return Err(e);
        }

        info!("Repaired project '{}' (recreated {:?})", name, missing);
        Ok(project)
    }

    /// Recursively delete a project directory.
    ///
    /// This cannot be undone.
    pub fn delete(&self, name: &str) -> Result<()> {
        validate_project_name(name)?;
        let path = self.project_path(name);
        if !path.is_dir() {
            return Err(Error::not_found(format!("Project '{}'", name)));
        }
        fs::remove_dir_all(&path)?;
        info!("Deleted project '{}'", name);
        Ok(())
    }

    /// Open a project and give both packs fresh UUIDs.
    pub fn regenerate_uuids(&self, name: &str) -> Result<UuidSet> {
        let mut project = self.open(name)?;
        project.regenerate_uuids()
    }

    fn existing_project_path(&self, name: &str) -> Result<PathBuf> {
        validate_project_name(name)?;
        let path = self.project_path(name);
        if !path.is_dir() {
            return Err(Error::not_found(format!("Project '{}'", name)));
        }
        if !path.join(PROJECT_FILE).is_file() {
            return Err(Error::not_found(format!("{} of project '{}'", PROJECT_FILE, name)));
        }
        Ok(path)
    }
}

fn side_of(manifest: &Manifest) -> PackSide {
    match manifest.modules.first() {
        Some(module) if module.module_type == PackSide::Resource.module_type() => PackSide::Resource,
        _ => PackSide::Behavior,
    }
}

fn missing_packs(path: &Path) -> Vec<PackSide> {
    PackSide::ALL
        .into_iter()
        .filter(|side| !path.join(side.dir_name()).is_dir())
        .collect()
}

fn scaffold(name: &str, path: &Path, options: &NewProject) -> Result<Project> {
    for side in PackSide::ALL {
        let pack = path.join(side.dir_name());
        let folders = match side {
            PackSide::Behavior => BEHAVIOR_FOLDERS,
            PackSide::Resource => RESOURCE_FOLDERS,
        };
        for folder in folders {
            fs::create_dir_all(pack.join(folder))?;
        }
        fs::write(pack.join(PACK_ICON_PLACEHOLDER), PACK_ICON_TEXT)?;
    }

    let uuids = UuidSet::generate();
    let resource = Manifest::for_pack(
        PackSide::Resource,
        name,
        &options.description,
        uuids.resource_pack,
        options.version,
        options.engine_version,
    );
    let behavior = Manifest::for_pack(
        PackSide::Behavior,
        name,
        &options.description,
        uuids.behavior_pack,
        options.version,
        options.engine_version,
    )
    .depending_on(resource.header.uuid, resource.header.version.clone());

    let config = ProjectConfig::new(
        name,
        &options.description,
        options.version,
        options.engine_version,
        uuids,
    );

    let texts = path.join(PackSide::Resource.dir_name()).join("texts");
    let mut writes = StagedWrites::new();
    writes.stage(
        path.join(PackSide::Behavior.dir_name()).join(MANIFEST_FILE),
        &behavior.to_json_string()?,
    )?;
    writes.stage(
        path.join(PackSide::Resource.dir_name()).join(MANIFEST_FILE),
        &resource.to_json_string()?,
    )?;
    writes.stage_json(texts.join(LANGUAGES_FILE), &options.locales)?;
    for locale in &options.locales {
        writes.stage(texts.join(lang::lang_file_name(locale)), &lang::initial_contents(name))?;
    }
    writes.stage(path.join(PROJECT_FILE), &config.to_json_string()?)?;
    writes.commit()?;

    let behavior_pack = path.join(PackSide::Behavior.dir_name());
    if !options.scripts {
        fs::remove_dir_all(behavior_pack.join("scripts"))?;
    }
    if !options.functions {
        fs::remove_dir_all(behavior_pack.join("functions"))?;
    }

    Ok(Project {
        name: name.to_string(),
        path: path.to_path_buf(),
        config,
    })
}

/// How serious a [`StructureIssue`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One finding of [`Project::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureIssue {
    pub severity: Severity,
    pub message: String,
}

impl StructureIssue {
    fn error<S: Into<String>>(message: S) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning<S: Into<String>>(message: S) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for StructureIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// An opened project.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory name, the project's identity inside its store
    name: String,
    /// Project root directory
    path: PathBuf,
    /// Parsed `project.json`
    config: ProjectConfig,
}

impl Project {
    /// Load a project from its directory without checking the pack layout.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let config = ProjectConfig::load(path.join(PROJECT_FILE))?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| config.name.clone());

        Ok(Self { name, path, config })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn pack_path(&self, side: PackSide) -> PathBuf {
        self.path.join(side.dir_name())
    }

    pub fn manifest_path(&self, side: PackSide) -> PathBuf {
        self.pack_path(side).join(MANIFEST_FILE)
    }

    /// `resource_pack/texts`.
    pub fn texts_path(&self) -> PathBuf {
        self.pack_path(PackSide::Resource).join("texts")
    }

    /// Locales listed in `languages.json`, or just `en_US` if it is
    /// missing or unreadable.
    pub fn locales(&self) -> Vec<String> {
        match lang::read_locales(self.texts_path()) {
            Ok(locales) if !locales.is_empty() => locales,
            Ok(_) => vec![DEFAULT_LOCALE.to_string()],
            Err(e) => {
                debug!("No usable {} in '{}': {}", LANGUAGES_FILE, self.name, e);
                vec![DEFAULT_LOCALE.to_string()]
            }
        }
    }

    /// Pack directories that do not exist.
    pub fn missing_packs(&self) -> Vec<PackSide> {
        missing_packs(&self.path)
    }

    /// Refresh `last_modified` and rewrite `project.json`.
    pub fn touch(&mut self) -> Result<()> {
        self.config.touch();
        let mut writes = StagedWrites::new();
        writes.stage(self.path.join(PROJECT_FILE), &self.config.to_json_string()?)?;
        writes.commit()?;
        Ok(())
    }

    /// Give both packs four fresh UUIDs.
    ///
    /// Both manifests and `project.json` are rewritten in one staged commit;
    /// the behavior pack dependency is moved to the new resource pack header
    /// and every other manifest field is kept.
    pub fn regenerate_uuids(&mut self) -> Result<UuidSet> {
        let mut behavior = Manifest::load(self.manifest_path(PackSide::Behavior))?;
        let mut resource = Manifest::load(self.manifest_path(PackSide::Resource))?;

        let old_header = resource.header.uuid;
        let uuids = UuidSet::generate();
        behavior.set_uuids(uuids.behavior_pack);
        resource.set_uuids(uuids.resource_pack);
        behavior.relink_dependency(
            Some(old_header),
            uuids.resource_pack.header,
            resource.header.version.clone(),
        );

        let mut config = self.config.clone();
        config.uuids = uuids;
        config.touch();

        let mut writes = StagedWrites::new();
        writes.stage(self.manifest_path(PackSide::Behavior), &behavior.to_json_string()?)?;
        writes.stage(self.manifest_path(PackSide::Resource), &resource.to_json_string()?)?;
        writes.stage(self.path.join(PROJECT_FILE), &config.to_json_string()?)?;
        writes.commit()?;

        self.config = config;
        info!("Regenerated UUIDs for project '{}'", self.name);
        Ok(uuids)
    }

    /// Check the on-disk layout.
    ///
    /// Errors make the project unusable in game; warnings are missing
    /// conventional folders.
    pub fn validate(&self) -> Vec<StructureIssue> {
        let mut issues = Vec::new();
        let mut manifests = Vec::new();

        for side in PackSide::ALL {
            let pack = self.pack_path(side);
            if !pack.is_dir() {
                issues.push(StructureIssue::error(format!("{} directory is missing", side.dir_name())));
                continue;
            }

            let manifest_path = self.manifest_path(side);
            if !manifest_path.is_file() {
                issues.push(StructureIssue::error(format!(
                    "{}/{} is missing",
                    side.dir_name(),
                    MANIFEST_FILE
                )));
                continue;
            }

            match Manifest::load(&manifest_path) {
                Ok(manifest) => manifests.push((side, manifest)),
                Err(e) => issues.push(StructureIssue::error(format!(
                    "{}/{} cannot be read: {}",
                    side.dir_name(),
                    MANIFEST_FILE,
                    e
                ))),
            }
        }

        if let [(PackSide::Behavior, behavior), (PackSide::Resource, resource)] = manifests.as_slice() {
            if !behavior.depends_on(resource.header.uuid) {
                issues.push(StructureIssue::error(
                    "behavior pack dependency does not reference the resource pack header UUID",
                ));
            }
        }

        let behavior_pack = self.pack_path(PackSide::Behavior);
        if behavior_pack.is_dir() {
            for folder in EXPECTED_BEHAVIOR_FOLDERS {
                if !behavior_pack.join(folder).is_dir() {
                    issues.push(StructureIssue::warning(format!(
                        "{}/{} folder is missing",
                        PackSide::Behavior.dir_name(),
                        folder
                    )));
                }
            }
        }

        let resource_pack = self.pack_path(PackSide::Resource);
        if resource_pack.is_dir() && !self.texts_path().is_dir() {
            issues.push(StructureIssue::warning(format!(
                "{}/texts folder is missing",
                PackSide::Resource.dir_name()
            )));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::PackVersion;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, ProjectStore) {
        let dir = tempdir().unwrap();
        let store = ProjectStore::new(dir.path().join("projects")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_project_names() {
        assert!(validate_project_name("Demo Pack").is_ok());
        for bad in ["", "  ", " Demo", "a/b", "a\\b", "..", "x..y"] {
            assert_eq!(
                validate_project_name(bad).unwrap_err().field(),
                Some("name"),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_create_scaffolds_layout() {
        let (_dir, store) = store();
        let project = store.create("Demo", &NewProject::default()).unwrap();
        let root = project.path();

        for folder in BEHAVIOR_FOLDERS {
            assert!(root.join("behavior_pack").join(folder).is_dir(), "{}", folder);
        }
        for folder in RESOURCE_FOLDERS {
            assert!(root.join("resource_pack").join(folder).is_dir(), "{}", folder);
        }
        assert!(root.join("behavior_pack/pack_icon.txt").is_file());
        assert_eq!(
            fs::read_to_string(root.join("resource_pack/texts/en_US.lang")).unwrap(),
            "## Demo Resource Pack\n"
        );
        assert_eq!(project.locales(), vec!["en_US"]);

        let behavior = Manifest::load(project.manifest_path(PackSide::Behavior)).unwrap();
        let resource = Manifest::load(project.manifest_path(PackSide::Resource)).unwrap();
        assert!(behavior.depends_on(resource.header.uuid));
        assert_eq!(project.config().uuids.resource_pack.header, resource.header.uuid);
        assert_eq!(project.config().uuids.behavior_pack.module, behavior.module_uuid().unwrap());
        assert!(project.validate().is_empty());
    }

    #[test]
    fn test_create_respects_options() {
        let (_dir, store) = store();
        let options = NewProject {
            scripts: false,
            functions: false,
            version: [2, 1, 0],
            engine_version: [1, 21, 0],
            locales: vec!["en_US".into(), "zh_CN".into()],
            ..NewProject::default()
        };
        let project = store.create("Opts", &options).unwrap();

        assert!(!project.pack_path(PackSide::Behavior).join("scripts").exists());
        assert!(!project.pack_path(PackSide::Behavior).join("functions").exists());
        assert!(project.texts_path().join("zh_CN.lang").is_file());
        assert_eq!(project.locales(), vec!["en_US", "zh_CN"]);

        let resource = Manifest::load(project.manifest_path(PackSide::Resource)).unwrap();
        assert_eq!(resource.header.version, PackVersion::Triple([2, 1, 0]));
        assert_eq!(resource.header.min_engine_version, Some(PackVersion::Triple([1, 21, 0])));
    }

    #[test]
    fn test_create_existing_fails() {
        let (_dir, store) = store();
        fs::create_dir(store.project_path("Taken")).unwrap();
        assert!(store
            .create("Taken", &NewProject::default())
            .unwrap_err()
            .is_already_exists());
    }

    #[test]
    fn test_create_rejects_bad_locales() {
        let (_dir, store) = store();
        for locales in [vec![], vec!["../en_US".to_string()], vec![" ".to_string()]] {
            let options = NewProject {
                locales,
                ..NewProject::default()
            };
            assert!(store.create("Broken", &options).unwrap_err().is_validation());
        }
        assert!(!store.project_path("Broken").exists());
    }

    #[test]
    fn test_list_only_projects() {
        let (_dir, store) = store();
        store.create("A", &NewProject::default()).unwrap();
        store.create("B", &NewProject::default()).unwrap();
        fs::create_dir(store.project_path("not_a_project")).unwrap();
        fs::write(store.root().join("stray.txt"), "x").unwrap();

        let mut names = store.list().unwrap();
        names.sort();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_open_errors() {
        let (_dir, store) = store();
        assert!(store.open("Missing").unwrap_err().is_not_found());

        fs::create_dir(store.project_path("Bare")).unwrap();
        assert!(store.open("Bare").unwrap_err().is_not_found());

        let project = store.create("Half", &NewProject::default()).unwrap();
        fs::remove_dir_all(project.pack_path(PackSide::Resource)).unwrap();
        match store.open("Half").unwrap_err() {
            Error::IncompleteStructure { missing, .. } => {
                assert_eq!(missing, vec![PackSide::Resource])
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_load_skips_pack_check_but_not_name_check() {
        let (dir, store) = store();
        let project = store.create("Half", &NewProject::default()).unwrap();
        fs::remove_dir_all(project.pack_path(PackSide::Resource)).unwrap();

        let loaded = store.load("Half").unwrap();
        assert_eq!(loaded.missing_packs(), vec![PackSide::Resource]);

        fs::create_dir(dir.path().join("Outside")).unwrap();
        assert!(store.load("../Outside").unwrap_err().is_validation());
        assert!(store.load("Missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_repair_missing_resource_pack() {
        let (_dir, store) = store();
        let project = store.create("Demo", &NewProject::default()).unwrap();
        let behavior_before = fs::read_to_string(project.manifest_path(PackSide::Behavior)).unwrap();
        fs::remove_dir_all(project.pack_path(PackSide::Resource)).unwrap();

        let repaired = store.repair("Demo").unwrap();
        assert_eq!(
            fs::read_to_string(repaired.manifest_path(PackSide::Behavior)).unwrap(),
            behavior_before
        );

        let behavior = Manifest::load(repaired.manifest_path(PackSide::Behavior)).unwrap();
        let resource = Manifest::load(repaired.manifest_path(PackSide::Resource)).unwrap();
        assert!(behavior.depends_on(resource.header.uuid));
        assert_eq!(resource.header.description, "Auto-generated resource pack");
        assert_eq!(repaired.config().uuids.resource_pack.header, resource.header.uuid);
        assert!(store.open("Demo").is_ok());
    }

    #[test]
    fn test_repair_keeps_project_versions() {
        let (_dir, store) = store();
        let options = NewProject {
            version: [2, 1, 0],
            engine_version: [1, 21, 0],
            ..NewProject::default()
        };
        let project = store.create("Demo", &options).unwrap();
        fs::remove_dir_all(project.pack_path(PackSide::Behavior)).unwrap();
        fs::remove_dir_all(project.pack_path(PackSide::Resource)).unwrap();

        let repaired = store.repair("Demo").unwrap();
        for side in PackSide::ALL {
            let manifest = Manifest::load(repaired.manifest_path(side)).unwrap();
            assert_eq!(manifest.header.version, PackVersion::Triple([2, 1, 0]));
            assert_eq!(
                manifest.header.min_engine_version,
                Some(PackVersion::Triple([1, 21, 0]))
            );
        }
    }

    #[test]
    fn test_repair_missing_behavior_pack() {
        let (_dir, store) = store();
        let project = store.create("Demo", &NewProject::default()).unwrap();
        fs::remove_dir_all(project.pack_path(PackSide::Behavior)).unwrap();

        let repaired = store.repair("Demo").unwrap();
        let behavior = Manifest::load(repaired.manifest_path(PackSide::Behavior)).unwrap();
        assert!(behavior.depends_on(project.config().uuids.resource_pack.header));
        assert_eq!(behavior.header.description, "Auto-generated behavior pack");

        let errors: Vec<_> = repaired
            .validate()
            .into_iter()
            .filter(|issue| issue.severity == Severity::Error)
            .collect();
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_repair_both_packs() {
        let (_dir, store) = store();
        let project = store.create("Demo", &NewProject::default()).unwrap();
        for side in PackSide::ALL {
            fs::remove_dir_all(project.pack_path(side)).unwrap();
        }

        let repaired = store.repair("Demo").unwrap();
        let behavior = Manifest::load(repaired.manifest_path(PackSide::Behavior)).unwrap();
        let resource = Manifest::load(repaired.manifest_path(PackSide::Resource)).unwrap();
        assert!(behavior.depends_on(resource.header.uuid));
        assert_eq!(ProjectConfig::load(repaired.path().join(PROJECT_FILE)).unwrap().uuids, repaired.config().uuids);
    }

    #[test]
    fn test_regenerate_uuids_keeps_link_and_extras() {
        let (_dir, store) = store();
        let project = store.create("Demo", &NewProject::default()).unwrap();
        let before = project.config().uuids;

        let path = project.manifest_path(PackSide::Behavior);
        let mut value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        value["metadata"] = serde_json::json!({"authors": ["someone"]});
        fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();

        let uuids = store.regenerate_uuids("Demo").unwrap();
        assert_ne!(uuids, before);

        let behavior = Manifest::load(&path).unwrap();
        let resource = Manifest::load(project.manifest_path(PackSide::Resource)).unwrap();
        assert_eq!(behavior.dependencies[0].uuid, Some(resource.header.uuid));
        assert_eq!(resource.header.uuid, uuids.resource_pack.header);
        assert_eq!(behavior.extra["metadata"]["authors"][0], "someone");

        let config = ProjectConfig::load(project.path().join(PROJECT_FILE)).unwrap();
        assert_eq!(config.uuids, uuids);
    }

    #[test]
    fn test_validate_reports_issues() {
        let (_dir, store) = store();
        let project = store.create("Demo", &NewProject::default()).unwrap();

        fs::remove_dir_all(project.pack_path(PackSide::Behavior).join("recipes")).unwrap();
        fs::remove_dir_all(project.texts_path()).unwrap();
        fs::write(project.manifest_path(PackSide::Resource), "{").unwrap();

        let issues = project.validate();
        let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
        let warnings = issues.iter().filter(|i| i.severity == Severity::Warning).count();
        assert_eq!(errors, 1);
        assert_eq!(warnings, 2);
        assert_eq!(project.locales(), vec!["en_US"]);
    }

    #[test]
    fn test_validate_broken_link() {
        let (_dir, store) = store();
        let project = store.create("Demo", &NewProject::default()).unwrap();

        let path = project.manifest_path(PackSide::Resource);
        let mut resource = Manifest::load(&path).unwrap();
        resource.set_uuids(PackUuids::generate());
        fs::write(&path, resource.to_json_string().unwrap()).unwrap();

        let issues = project.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("does not reference"));
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = store();
        store.create("Demo", &NewProject::default()).unwrap();
        store.delete("Demo").unwrap();
        assert!(!store.project_path("Demo").exists());
        assert!(store.delete("Demo").unwrap_err().is_not_found());
        assert!(store.delete("..").unwrap_err().is_validation());
    }
}
