//! # Quick IDE Core
//!
//! Core functionality for Quick IDE, an authoring tool for Minecraft Bedrock
//! Edition addons. This crate provides the project store, document
//! generation from form input, pack writing with language-file bookkeeping,
//! and `.mcaddon` export.
//!
//! ## Architecture
//!
//! - [`ProjectStore`] scaffolds, opens, repairs and deletes projects under a
//!   projects root
//! - [`generator`] turns a [`FieldSet`] or a structured draft into a
//!   [`ConfigDocument`] without touching the filesystem
//! - [`PackWriter`] validates and writes documents into a project's packs
//! - [`ProjectExporter`] zips both packs into an archive
//!
//! ## Example
//!
//! ```rust
//! use quickide_core::{generator, FieldSet, FormKind, NewProject, PackWriter, ProjectStore};
//!
//! let root = tempfile::tempdir()?;
//! let store = ProjectStore::new(root.path())?;
//! let mut project = store.create("Demo", &NewProject::default())?;
//!
//! let fields = FieldSet::new()
//!     .with("identifier", "demo:ruby")
//!     .with("display_name", "Ruby")
//!     .with("max_stack_size", 64);
//! let doc = generator::generate(FormKind::Item, &fields)?;
//! PackWriter::new(&mut project).save_document(&doc, None)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod fields;
pub mod generator;
pub mod index;
pub mod lang;
pub mod manifest;
pub mod pack;
pub mod project;
pub mod schema;
pub mod staging;

pub use config::Config;
pub use document::ConfigDocument;
pub use error::{Error, Result};
pub use export::{ExportSummary, ProjectExporter};
pub use fields::{FieldSet, FieldValue};
pub use generator::DocumentSource;
pub use index::FileTree;
pub use pack::PackWriter;
pub use project::{NewProject, Project, ProjectStore};
pub use schema::{DocumentKind, FormKind, PackSide};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the application.
///
/// `RUST_LOG` takes precedence over `level`. Logs go to stderr. Calling this
/// more than once is harmless.
///
/// # Example
///
/// ```rust
/// quickide_core::init_tracing("info");
/// tracing::info!("Application started");
/// ```
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed by a test harness or a host app.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing() {
        // Should not panic
        init_tracing("debug");
        init_tracing("info");
    }
}
