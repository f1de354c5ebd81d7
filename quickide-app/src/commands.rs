//! Subcommand handlers.
//!
//! Each handler resolves its arguments, calls into `quickide-core` and prints
//! a short report on stdout. Generated documents go to stdout unless saved.

use anyhow::{anyhow, bail, Context, Result};
use clap::ArgMatches;
use quickide_core::generator::{self, entity, ItemGroupDraft, LootTableDraft, TabScope, TextureMappings};
use quickide_core::manifest::Version;
use quickide_core::project::Severity;
use quickide_core::{
    export, ConfigDocument, Config, DocumentSource, Error, FieldSet, FormKind, NewProject, PackSide,
    PackWriter, Project, ProjectExporter, ProjectStore,
};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Dispatch the selected subcommand.
pub fn run(config: &Config, matches: &ArgMatches) -> Result<()> {
    let store = ProjectStore::new(&config.workspace.projects_root).with_context(|| {
        format!(
            "Cannot use projects root {}",
            config.workspace.projects_root.display()
        )
    })?;

    match matches.subcommand() {
        Some(("list", _)) => list(&store),
        Some(("new", sub)) => create(config, &store, sub),
        Some(("open", sub)) => open(&store, name(sub)?, sub.get_flag("repair")),
        Some(("check", sub)) => check(&store, name(sub)?),
        Some(("delete", sub)) => delete(&store, name(sub)?, sub.get_flag("yes")),
        Some(("regen-uuids", sub)) => regen_uuids(&store, name(sub)?),
        Some(("generate", sub)) => generate(config, &store, sub),
        Some(("put", sub)) => put(&store, sub),
        Some(("lang", sub)) => lang(&store, sub),
        Some(("tree", sub)) => tree(&store, sub),
        Some(("export", sub)) => export_project(config, &store, sub),
        _ => bail!("No command given, see --help"),
    }
}

fn name(matches: &ArgMatches) -> Result<&str> {
    matches
        .get_one::<String>("name")
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing project name"))
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Parse `X.Y.Z`.
fn parse_version(text: &str) -> Result<Version> {
    let parts = text
        .trim()
        .split('.')
        .map(|part| part.parse::<u32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("'{}' is not a version like 1.20.0", text))?;

    match parts.as_slice() {
        [major, minor, patch] => Ok([*major, *minor, *patch]),
        _ => bail!("'{}' is not a version like 1.20.0", text),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_issues(project: &Project) -> bool {
    let issues = project.validate();
    if issues.is_empty() {
        println!("Project '{}' structure is valid", project.name());
        return true;
    }
    for issue in &issues {
        println!("  {}", issue);
    }
    !issues.iter().any(|issue| issue.severity == Severity::Error)
}

fn list(store: &ProjectStore) -> Result<()> {
    let names = store.list()?;
    if names.is_empty() {
        println!("No projects in {}", store.root().display());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn create(config: &Config, store: &ProjectStore, matches: &ArgMatches) -> Result<()> {
    let name = name(matches)?;
    let mut options = NewProject::from_defaults(&config.project);
    if let Some(description) = matches.get_one::<String>("description") {
        options.description = description.clone();
    }
    if let Some(version) = matches.get_one::<String>("version") {
        options.version = parse_version(version)?;
    }
    if let Some(engine) = matches.get_one::<String>("engine") {
        options.engine_version = parse_version(engine)?;
    }
    let locales = strings(matches, "locale");
    if !locales.is_empty() {
        options.locales = locales;
    }
    options.scripts &= !matches.get_flag("no-scripts");
    options.functions &= !matches.get_flag("no-functions");

    let project = store
        .create(name, &options)
        .with_context(|| format!("Failed to create project '{}'", name))?;
    println!("Created project '{}' at {}", project.name(), project.path().display());
    Ok(())
}

fn open(store: &ProjectStore, name: &str, repair: bool) -> Result<()> {
    let project = match store.open(name) {
        Ok(project) => project,
        Err(Error::IncompleteStructure { missing, .. }) if repair => {
            println!("Recreating missing packs: {:?}", missing);
            store.repair(name)?
        }
        Err(e @ Error::IncompleteStructure { .. }) => {
            return Err(anyhow::Error::new(e).context("Run again with --repair to fix the project"));
        }
        Err(e) => return Err(e.into()),
    };

    let config = project.config();
    println!("{} ({})", config.name, project.path().display());
    if !config.description.is_empty() {
        println!("  {}", config.description);
    }
    println!(
        "  version {:?}, engine {:?}, last modified {}",
        config.version, config.min_engine_version, config.last_modified
    );
    print_issues(&project);
    Ok(())
}

fn check(store: &ProjectStore, name: &str) -> Result<()> {
    let project = store
        .load(name)
        .with_context(|| format!("Failed to load project '{}'", name))?;
    if !print_issues(&project) {
        bail!("Project '{}' has structural errors", name);
    }
    Ok(())
}

fn delete(store: &ProjectStore, name: &str, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("Deleting '{}' cannot be undone; pass --yes to confirm", name);
    }
    store.delete(name)?;
    println!("Deleted project '{}'", name);
    Ok(())
}

fn regen_uuids(store: &ProjectStore, name: &str) -> Result<()> {
    let uuids = store.regenerate_uuids(name)?;
    println!("behavior_pack header {}", uuids.behavior_pack.header);
    println!("resource_pack header {}", uuids.resource_pack.header);
    Ok(())
}

fn form_fields(config: &Config, matches: &ArgMatches) -> Result<FieldSet> {
    let mut fields = match matches.get_one::<PathBuf>("fields") {
        Some(path) => read_json::<FieldSet>(path)?,
        None => FieldSet::new(),
    };
    for assignment in strings(matches, "set") {
        let (name, value) = FieldSet::parse_assignment(&assignment)?;
        fields = fields.with(name, value);
    }
    Ok(fields.with_default("namespace", config.generation.default_namespace.as_str()))
}

fn generate(config: &Config, store: &ProjectStore, matches: &ArgMatches) -> Result<()> {
    let kind = matches
        .get_one::<String>("kind")
        .map(String::as_str)
        .unwrap_or("item");
    let project_name = matches.get_one::<String>("project");
    let draft_path = matches.get_one::<PathBuf>("draft");

    let mut documents: Vec<ConfigDocument> = Vec::new();
    match kind {
        "loot-table" => {
            let path = draft_path.ok_or_else(|| anyhow!("loot-table needs --draft <file>"))?;
            documents.push(read_json::<LootTableDraft>(path)?.generate()?);
        }
        "texture" => {
            let path = draft_path.ok_or_else(|| anyhow!("texture needs --draft <file>"))?;
            documents.push(read_json::<TextureMappings>(path)?.generate()?);
        }
        "item-group" => {
            let mut draft = match (draft_path, project_name) {
                (Some(path), _) => read_json::<ItemGroupDraft>(path)?,
                (None, Some(project)) => ItemGroupDraft::with_default_tabs(project.as_str()),
                (None, None) => bail!("item-group needs --draft <file> or --project <name>"),
            };
            if let Some(tab) = matches.get_one::<usize>("selected-tab") {
                draft.scope = TabScope::SelectedOnly(Some(*tab));
            }
            documents.push(draft.generate()?);
        }
        flat => {
            let form: FormKind = flat.parse()?;
            let fields = form_fields(config, matches)?;
            documents.push(generator::generate(form, &fields)?);
            if form == FormKind::Entity && entity::wants_spawn_rules(&fields) {
                documents.push(generator::generate(FormKind::SpawnRules, &fields)?);
            }
        }
    }

    if !matches.get_flag("save") {
        for document in &documents {
            println!("{}", document.text());
        }
        return Ok(());
    }

    let project_name = project_name.ok_or_else(|| anyhow!("--save needs --project <name>"))?;
    let mut project = store.open(project_name)?;
    let mut writer = PackWriter::new(&mut project);
    let file_name = matches.get_one::<String>("file").map(String::as_str);
    for (index, document) in documents.iter().enumerate() {
        // The file name override applies to the main document only.
        let name = if index == 0 { file_name } else { None };
        let saved = writer.save_document(document, name)?;
        println!("Saved {}", saved.path.display());
        if saved.lang_entries > 0 {
            println!("Added language entry to {} file(s)", saved.lang_entries);
        }
    }
    Ok(())
}

fn put(store: &ProjectStore, matches: &ArgMatches) -> Result<()> {
    let mut project = store.open(name(matches)?)?;
    let side: PackSide = matches
        .get_one::<String>("pack")
        .ok_or_else(|| anyhow!("Missing --pack"))?
        .parse()?;
    let folder = matches.get_one::<String>("folder").map(String::as_str).unwrap_or("");
    let file = matches
        .get_one::<String>("file")
        .ok_or_else(|| anyhow!("Missing --file"))?;
    let input = matches
        .get_one::<PathBuf>("input")
        .ok_or_else(|| anyhow!("Missing --input"))?;

    let text = fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let path = PackWriter::new(&mut project).save(side, folder, file, &text)?;
    println!("Saved {}", path.display());
    Ok(())
}

fn lang(store: &ProjectStore, matches: &ArgMatches) -> Result<()> {
    let mut project = store.open(name(matches)?)?;
    let key = matches.get_one::<String>("key").ok_or_else(|| anyhow!("Missing key"))?;
    let value = matches.get_one::<String>("value").ok_or_else(|| anyhow!("Missing value"))?;
    let locales = strings(matches, "locale");

    let written = PackWriter::new(&mut project).append_language_entry(key, value, &locales)?;
    if written == 0 {
        println!("'{}' is already present", key);
    } else {
        println!("Added '{}' to {} language file(s)", key, written);
    }
    Ok(())
}

fn tree(store: &ProjectStore, matches: &ArgMatches) -> Result<()> {
    let mut project = store.open(name(matches)?)?;
    let sides = match matches.get_one::<String>("pack") {
        Some(pack) => vec![pack.parse::<PackSide>()?],
        None => PackSide::ALL.to_vec(),
    };

    let writer = PackWriter::new(&mut project);
    for side in sides {
        print!("{}", writer.refresh_index(side)?.render());
    }
    Ok(())
}

fn export_project(config: &Config, store: &ProjectStore, matches: &ArgMatches) -> Result<()> {
    let project = store.open(name(matches)?)?;
    let destination = match matches.get_one::<PathBuf>("out") {
        Some(path) => path.clone(),
        None => config
            .export
            .default_directory
            .join(export::default_archive_name(&project)),
    };

    let summary = ProjectExporter::new().export(&project, &destination)?;
    println!(
        "Exported {} files to {} ({} bytes)",
        summary.files,
        summary.archive.display(),
        summary.bytes
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("1.20.0").unwrap(), [1, 20, 0]);
        assert_eq!(parse_version(" 2.0.1 ").unwrap(), [2, 0, 1]);
        assert!(parse_version("1.20").is_err());
        assert!(parse_version("1.x.0").is_err());
    }

    fn run_args(config: &Config, args: &[&str]) -> Result<()> {
        let matches = crate::build_cli().try_get_matches_from(args)?;
        run(config, &matches)
    }

    #[test]
    fn test_create_generate_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.workspace.projects_root = dir.path().join("projects");
        config.export.default_directory = dir.path().join("exports");

        run_args(&config, &["quickide", "new", "Demo", "--version", "1.2.0", "--no-scripts"]).unwrap();
        run_args(
            &config,
            &[
                "quickide", "generate", "entity", "--set", "identifier=demo:owl", "--set",
                "display_name=Owl", "--set", "biome=forest", "--project", "Demo", "--save",
            ],
        )
        .unwrap();

        let root = config.workspace.projects_root.join("Demo");
        assert!(root.join("behavior_pack/entities/owl.json").is_file());
        assert!(root.join("behavior_pack/spawn_rules/owl.json").is_file());
        assert!(!root.join("behavior_pack/scripts").exists());

        run_args(&config, &["quickide", "export", "Demo"]).unwrap();
        let exported: Vec<_> = fs::read_dir(&config.export.default_directory)
            .unwrap()
            .collect();
        assert_eq!(exported.len(), 1);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.workspace.projects_root = dir.path().to_path_buf();

        run_args(&config, &["quickide", "new", "Demo"]).unwrap();
        assert!(run_args(&config, &["quickide", "delete", "Demo"]).is_err());
        assert!(dir.path().join("Demo").exists());
        run_args(&config, &["quickide", "delete", "Demo", "--yes"]).unwrap();
        assert!(!dir.path().join("Demo").exists());
    }

    #[test]
    fn test_open_suggests_repair() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.workspace.projects_root = dir.path().to_path_buf();

        run_args(&config, &["quickide", "new", "Demo"]).unwrap();
        fs::remove_dir_all(dir.path().join("Demo/resource_pack")).unwrap();

        let err = run_args(&config, &["quickide", "open", "Demo"]).unwrap_err();
        assert!(err.to_string().contains("--repair"));
        run_args(&config, &["quickide", "open", "Demo", "--repair"]).unwrap();
        assert!(dir.path().join("Demo/resource_pack/manifest.json").is_file());
    }

    #[test]
    fn test_check_stays_inside_projects_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.workspace.projects_root = dir.path().join("projects");

        run_args(&config, &["quickide", "new", "Demo"]).unwrap();
        run_args(&config, &["quickide", "check", "Demo"]).unwrap();

        fs::rename(
            config.workspace.projects_root.join("Demo"),
            dir.path().join("Outside"),
        )
        .unwrap();
        let err = run_args(&config, &["quickide", "check", "../Outside"]).unwrap_err();
        let validation = err.downcast_ref::<Error>().unwrap();
        assert_eq!(validation.field(), Some("name"));
    }
}
