//! # Pack writer
//!
//! Writes JSON documents into a project's packs and keeps its language files
//! in step. Every JSON write is validated by parsing the text first; invalid
//! text is refused and nothing is written. Existing files of the same name
//! are overwritten.

use crate::document::{parse_json_text, ConfigDocument};
use crate::index::FileTree;
use crate::lang::{self, LanguageFile};
use crate::project::Project;
use crate::schema::PackSide;
use crate::{Error, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of [`PackWriter::save_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDocument {
    /// Where the JSON file was written
    pub path: PathBuf,
    /// Number of `.lang` files that received a new entry
    pub lang_entries: usize,
}

/// Writes files into one opened project.
///
/// # Example
///
/// ```rust
/// use quickide_core::fields::FieldSet;
/// use quickide_core::generator;
/// use quickide_core::pack::PackWriter;
/// use quickide_core::project::{NewProject, ProjectStore};
/// use quickide_core::schema::FormKind;
///
/// let root = tempfile::tempdir()?;
/// let store = ProjectStore::new(root.path())?;
/// let mut project = store.create("Demo", &NewProject::default())?;
///
/// let fields = FieldSet::new()
///     .with("identifier", "demo:ruby")
///     .with("display_name", "Ruby");
/// let doc = generator::generate(FormKind::Item, &fields)?;
///
/// let saved = PackWriter::new(&mut project).save_document(&doc, None)?;
/// assert!(saved.path.ends_with("behavior_pack/items/ruby.json"));
/// assert_eq!(saved.lang_entries, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct PackWriter<'a> {
    project: &'a mut Project,
}

impl<'a> PackWriter<'a> {
    pub fn new(project: &'a mut Project) -> Self {
        Self { project }
    }

    /// Save JSON text as `<pack>/<subfolder>/<file_name>`.
    ///
    /// `.json` is appended to `file_name` when missing and the subfolder is
    /// created on demand. `project.json`'s `last_modified` is refreshed.
    ///
    /// # Errors
    ///
    /// - `InvalidDocument` if `text` is not valid JSON
    /// - `Validation` if the file name is blank or either part tries to leave
    ///   the pack
    pub fn save(&mut self, side: PackSide, subfolder: &str, file_name: &str, text: &str) -> Result<PathBuf> {
        let file_name = json_file_name(file_name)?;
        let subfolder = relative_subfolder(subfolder)?;

        parse_json_text(text)?;

        let dir = self.project.pack_path(side).join(subfolder);
        fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);
        fs::write(&path, text)?;
        info!("Saved {}", path.display());

        self.touch();
        Ok(path)
    }

    /// Save a generated document at its target and register its
    /// localization entry in every project locale.
    pub fn save_document(&mut self, document: &ConfigDocument, file_name: Option<&str>) -> Result<SavedDocument> {
        let target = document.target();
        let name = file_name.unwrap_or_else(|| document.suggested_name());
        let path = self.save(target.side, &target.subfolder, name, document.text())?;

        let lang_entries = match document.localization() {
            Some(entry) => match self.append_language_entry(&entry.key, &entry.value, &[]) {
                Ok(count) => count,
                Err(e) => {
                    warn!(
                        "Saved {} but could not add '{}' to the language files: {}",
                        path.display(),
                        entry.key,
                        e
                    );
                    0
                }
            },
            None => 0,
        };

        Ok(SavedDocument { path, lang_entries })
    }

    /// Append `key=value` to each locale's `.lang` file that exists and does
    /// not already define `key`.
    ///
    /// An empty `locales` slice means every locale in `languages.json`.
    /// Returns the number of files written. Locales that would leave
    /// `texts/` are refused before anything is written.
    pub fn append_language_entry(&mut self, key: &str, value: &str, locales: &[String]) -> Result<usize> {
        let key = key.trim();
        if key.is_empty() || key.contains('=') || key.contains(char::is_whitespace) {
            return Err(Error::validation(
                "key",
                "Language key must be non-empty without '=' or whitespace",
            ));
        }
        if value.contains('\n') || value.contains('\r') {
            return Err(Error::validation("value", "Language value must be a single line"));
        }

        let locales = if locales.is_empty() {
            self.project.locales()
        } else {
            locales.to_vec()
        };
        for locale in &locales {
            lang::validate_locale(locale)?;
        }

        let texts = self.project.texts_path();
        let mut written = 0;
        for locale in &locales {
            let path = texts.join(lang::lang_file_name(locale));
            if !path.is_file() {
                debug!("No language file for {}, skipping", locale);
                continue;
            }
            let mut file = LanguageFile::load(&path)?;
            if file.append(key, value)? {
                written += 1;
            }
        }

        if written > 0 {
            info!("Added '{}' to {} language file(s)", key, written);
        }
        Ok(written)
    }

    /// Overwrite an existing JSON file, given relative to the project root,
    /// after checking the edited text parses.
    pub fn write_validated(&mut self, relative: &Path, text: &str) -> Result<PathBuf> {
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(Error::validation(
                "path",
                format!("{} must stay inside the project", relative.display()),
            ));
        }

        let text = text.trim();
        parse_json_text(text)?;

        let path = self.project.path().join(relative);
        fs::write(&path, text)?;
        info!("Saved changes to {}", path.display());

        self.touch();
        Ok(path)
    }

    /// Rebuild the directory tree of one pack from disk.
    pub fn refresh_index(&self, side: PackSide) -> Result<FileTree> {
        FileTree::scan(self.project.pack_path(side))
    }

    fn touch(&mut self) {
        if let Err(e) = self.project.touch() {
            warn!("Failed to update project metadata: {}", e);
        }
    }
}

fn json_file_name(file_name: &str) -> Result<String> {
    let file_name = file_name.trim();
    if file_name.is_empty() || file_name == ".json" {
        return Err(Error::validation("file_name", "File name cannot be empty"));
    }
    if file_name.contains(['/', '\\']) || file_name.contains("..") {
        return Err(Error::validation(
            "file_name",
            "File name cannot contain path separators or '..'",
        ));
    }

    if file_name.ends_with(".json") {
        Ok(file_name.to_string())
    } else {
        Ok(format!("{}.json", file_name))
    }
}

fn relative_subfolder(subfolder: &str) -> Result<PathBuf> {
    let path = Path::new(subfolder.trim().trim_matches('/'));
    if path.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
        return Err(Error::validation(
            "subfolder",
            format!("'{}' must stay inside the pack", subfolder),
        ));
    }
    Ok(path.to_path_buf())
}
