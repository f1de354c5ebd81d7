//! # Language files
//!
//! Bedrock `.lang` files are line-based `key=value` tables. `##` starts a
//! comment, either on its own line or after a tab at the end of an entry.
//! This crate only ever appends: an entry is added when its exact key is not
//! already present, and existing lines are never rewritten.

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Locale list inside `texts/`.
pub const LANGUAGES_FILE: &str = "languages.json";

/// Locale every project starts with.
pub const DEFAULT_LOCALE: &str = "en_US";

/// File name of a locale's `.lang` file.
pub fn lang_file_name(locale: &str) -> String {
    format!("{}.lang", locale)
}

/// Check that `locale` names a file inside `texts/`.
pub fn validate_locale(locale: &str) -> Result<()> {
    if locale.trim().is_empty() || locale.contains(['/', '\\']) || locale.contains("..") {
        return Err(Error::validation(
            "locale",
            format!("'{}' cannot be used as a language file name", locale),
        ));
    }
    Ok(())
}

/// First line of a freshly scaffolded `.lang` file.
pub fn initial_contents(project_name: &str) -> String {
    format!("## {} Resource Pack\n", project_name)
}

/// Parse `.lang` text into its key→value entries. Later duplicates win.
pub fn parse_entries(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .map(str::trim_start)
        .filter(|line| !line.is_empty() && !line.starts_with("##"))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = match value.find("\t##") {
                Some(comment) => &value[..comment],
                None => value,
            };
            (key.trim().to_string(), value.trim_end().to_string())
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// A loaded `.lang` file.
#[derive(Debug, Clone)]
pub struct LanguageFile {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LanguageFile {
    /// Load and parse a `.lang` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)?;
        Ok(Self {
            entries: parse_entries(&content),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exact key lookup.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append `key=value` on a new line unless `key` is already present.
    ///
    /// Returns whether a line was written.
    pub fn append(&mut self, key: &str, value: &str) -> Result<bool> {
        if self.contains_key(key) {
            debug!("{} already defines {}", self.path.display(), key);
            return Ok(false);
        }

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        write!(file, "\n{}={}", key, value)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(true)
    }
}

/// Read the locale list from `languages.json` in `texts_dir`.
pub fn read_locales<P: AsRef<Path>>(texts_dir: P) -> Result<Vec<String>> {
    let content = fs::read_to_string(texts_dir.as_ref().join(LANGUAGES_FILE))?;
    let locales: Vec<String> = serde_json::from_str(&content)?;
    for locale in &locales {
        validate_locale(locale)?;
    }
    Ok(locales)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_entries() {
        let entries = parse_entries(
            "## Demo Resource Pack\n\nitem.demo.ruby.name=Ruby\ttile.x=no\n  tile.demo.block.name=Ruby Block\t## note\nbroken line\n",
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["item.demo.ruby.name"], "Ruby\ttile.x=no");
        assert_eq!(entries["tile.demo.block.name"], "Ruby Block");
    }

    #[test]
    fn test_append_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en_US.lang");
        fs::write(&path, initial_contents("Demo")).unwrap();

        let mut lang = LanguageFile::load(&path).unwrap();
        assert!(lang.append("item.demo.ruby.name", "Ruby").unwrap());
        assert!(!lang.append("item.demo.ruby.name", "Ruby").unwrap());

        let reloaded = LanguageFile::load(&path).unwrap();
        assert_eq!(reloaded.get("item.demo.ruby.name"), Some("Ruby"));
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "## Demo Resource Pack\n\nitem.demo.ruby.name=Ruby");
        assert_eq!(content.matches("item.demo.ruby.name").count(), 1);
    }

    #[test]
    fn test_prefix_key_is_not_a_duplicate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("en_US.lang");
        fs::write(&path, "item.demo.ruby.name.long=Long Ruby").unwrap();

        let mut lang = LanguageFile::load(&path).unwrap();
        assert!(!lang.contains_key("item.demo.ruby.name"));
        assert!(lang.append("item.demo.ruby.name", "Ruby").unwrap());
        assert_eq!(LanguageFile::load(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_read_locales() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(LANGUAGES_FILE), "[\"en_US\", \"de_DE\"]").unwrap();
        assert_eq!(read_locales(dir.path()).unwrap(), vec!["en_US", "de_DE"]);
        assert!(read_locales(dir.path().join("nope")).unwrap_err().is_io());
    }

    #[test]
    fn test_escaping_locales_are_rejected() {
        for locale in ["", "  ", "../en_US", "a/b", "a\\b", "..", "../../../../victim"] {
            let err = validate_locale(locale).unwrap_err();
            assert!(err.is_validation(), "{:?} accepted", locale);
        }
        assert!(validate_locale("en_US").is_ok());

        let dir = tempdir().unwrap();
        fs::write(dir.path().join(LANGUAGES_FILE), "[\"en_US\", \"../victim\"]").unwrap();
        assert!(read_locales(dir.path()).unwrap_err().is_validation());
    }
}
