//! # Addon export
//!
//! Packs a project's two packs into a single `.mcaddon` zip archive with
//! `behavior_pack/` and `resource_pack/` at the top level. The packs are
//! first copied into a scratch directory that is removed when the export
//! ends, whatever the outcome.

use crate::project::Project;
use crate::schema::PackSide;
use crate::{Error, Result};
use chrono::Local;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive extension recognised by the game.
pub const ARCHIVE_EXTENSION: &str = "mcaddon";

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub archive: PathBuf,
    /// Files stored in the archive
    pub files: usize,
    /// Archive size on disk
    pub bytes: u64,
}

/// Default archive name: `<project>_<YYYYMMDD>.mcaddon`.
pub fn default_archive_name(project: &Project) -> String {
    format!(
        "{}_{}.{}",
        project.name(),
        Local::now().format("%Y%m%d"),
        ARCHIVE_EXTENSION
    )
}

/// Builds `.mcaddon` archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectExporter;

impl ProjectExporter {
    pub fn new() -> Self {
        Self
    }

    /// Export `project` to `destination`.
    ///
    /// The archive is built in a temporary file beside `destination` and
    /// moved into place only once complete, so a failed export leaves any
    /// existing file at `destination` untouched.
    ///
    /// # Errors
    ///
    /// Every failure is reported as [`Error::Export`] wrapping the cause.
    pub fn export<P: AsRef<Path>>(&self, project: &Project, destination: P) -> Result<ExportSummary> {
        let summary = write_archive(project, destination.as_ref()).map_err(Error::export)?;
        info!(
            "Exported '{}' to {} ({} files)",
            project.name(),
            summary.archive.display(),
            summary.files
        );
        Ok(summary)
    }
}

fn write_archive(project: &Project, destination: &Path) -> Result<ExportSummary> {
    let missing = project.missing_packs();
    if !missing.is_empty() {
        return Err(Error::incomplete_structure(project.name(), missing));
    }

    let scratch = TempDir::new()?;
    for side in PackSide::ALL {
        copy_tree(&project.pack_path(side), &scratch.path().join(side.dir_name()))?;
    }

    let parent = match destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let staged = NamedTempFile::new_in(parent)?;
    let files = zip_tree(scratch.path(), staged.as_file())?;
    staged.persist(destination).map_err(|e| Error::from(e.error))?;

    Ok(ExportSummary {
        archive: destination.to_path_buf(),
        files,
        bytes: fs::metadata(destination)?.len(),
    })
}

/// Deflate every file under `root` into `out`. Returns the file count.
fn zip_tree(root: &Path, out: &File) -> Result<usize> {
    let mut zip = ZipWriter::new(out);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut files = 0;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::generic(e.to_string()))?;
        let name = archive_name(relative);

        zip.start_file(name.as_str(), options)?;
        let mut source = File::open(entry.path())?;
        io::copy(&mut source, &mut zip)?;
        debug!("Added {}", name);
        files += 1;
    }
    zip.finish()?;
    Ok(files)
}

/// `/`-separated entry name regardless of platform.
fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| Error::generic(e.to_string()))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{NewProject, ProjectStore};
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_archive_names_use_forward_slashes() {
        let path = Path::new("behavior_pack").join("items").join("ruby.json");
        assert_eq!(archive_name(&path), "behavior_pack/items/ruby.json");
    }

    #[test]
    fn test_export_contains_both_packs() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::new(dir.path().join("projects")).unwrap();
        let project = store.create("Demo", &NewProject::default()).unwrap();
        fs::write(project.pack_path(PackSide::Behavior).join("items/ruby.json"), "{}").unwrap();

        let out = dir.path().join("out").join(default_archive_name(&project));
        let summary = ProjectExporter::new().export(&project, &out).unwrap();
        assert!(summary.bytes > 0);

        let mut archive = zip::ZipArchive::new(File::open(&out).unwrap()).unwrap();
        assert_eq!(archive.len(), summary.files);

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        assert!(names.contains(&"behavior_pack/items/ruby.json".to_string()));
        assert!(names.contains(&"resource_pack/manifest.json".to_string()));
        assert!(names
            .iter()
            .all(|n| n.starts_with("behavior_pack/") || n.starts_with("resource_pack/")));

        let mut text = String::new();
        archive
            .by_name("resource_pack/texts/en_US.lang")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "## Demo Resource Pack\n");
    }

    #[test]
    fn test_incomplete_project_fails_cleanly() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::new(dir.path().join("projects")).unwrap();
        let project = store.create("Demo", &NewProject::default()).unwrap();
        fs::remove_dir_all(project.pack_path(PackSide::Resource)).unwrap();

        let out = dir.path().join("Demo.mcaddon");
        let err = ProjectExporter::new().export(&project, &out).unwrap_err();
        assert_eq!(err.category(), "Export");
        assert!(!out.exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_default_archive_name() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::new(dir.path()).unwrap();
        let project = store.create("Demo", &NewProject::default()).unwrap();
        let name = default_archive_name(&project);
        assert!(name.starts_with("Demo_"));
        assert!(name.ends_with(".mcaddon"));
        assert_eq!(name.len(), "Demo_20240101.mcaddon".len());
    }
}
