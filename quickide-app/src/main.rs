//! # Quick IDE
//!
//! Command line front end for Quick IDE, an authoring tool for Minecraft
//! Bedrock Edition addons. Every command maps onto one operation of
//! `quickide-core`; errors are reported on stderr with a non-zero exit code.
//!
//! ## Usage
//!
//! ```bash
//! # Create a project and add an item to it
//! quickide new Demo --description "Gems and more"
//! quickide generate item --set identifier=demo:ruby --set display_name=Ruby \
//!     --project Demo --save
//!
//! # Inspect and package it
//! quickide check Demo
//! quickide export Demo
//!
//! # Use another projects root with debug logging
//! quickide --projects-root ./addons --debug list
//! ```

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use quickide_core::Config;
use std::path::PathBuf;

mod commands;

/// Global command line options
#[derive(Debug, Clone, Default)]
pub struct AppArgs {
    /// Configuration file to use instead of the default location
    pub config_path: Option<PathBuf>,
    /// Projects root overriding configuration and environment
    pub projects_root: Option<PathBuf>,
    /// Enable debug logging
    pub debug: bool,
}

impl AppArgs {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches.get_one::<PathBuf>("config").cloned(),
            projects_root: matches.get_one::<PathBuf>("projects-root").cloned(),
            debug: matches.get_flag("debug"),
        }
    }
}

fn project_name_arg() -> Arg {
    Arg::new("name")
        .required(true)
        .value_name("PROJECT")
        .help("Project name")
}

fn pack_arg() -> Arg {
    Arg::new("pack")
        .long("pack")
        .value_name("PACK")
        .help("Pack: bp/behavior or rp/resource")
}

/// Build the command line interface
fn build_cli() -> Command {
    Command::new("quickide")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Authoring tool for Minecraft Bedrock addons")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Configuration file to use")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("projects-root")
                .long("projects-root")
                .value_name("DIR")
                .global(true)
                .help("Directory holding the projects")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .global(true)
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("list").about("List projects"))
        .subcommand(
            Command::new("new")
                .about("Create a project")
                .arg(project_name_arg())
                .arg(Arg::new("description").long("description").value_name("TEXT"))
                .arg(Arg::new("version").long("version").value_name("X.Y.Z").help("Pack version"))
                .arg(Arg::new("engine").long("engine").value_name("X.Y.Z").help("Minimum engine version"))
                .arg(
                    Arg::new("locale")
                        .long("locale")
                        .value_name("LOCALE")
                        .action(ArgAction::Append)
                        .help("Locale to scaffold (repeatable)"),
                )
                .arg(Arg::new("no-scripts").long("no-scripts").action(ArgAction::SetTrue))
                .arg(Arg::new("no-functions").long("no-functions").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("open")
                .about("Open a project and report its structure")
                .arg(project_name_arg())
                .arg(
                    Arg::new("repair")
                        .long("repair")
                        .action(ArgAction::SetTrue)
                        .help("Recreate missing packs"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a project's layout")
                .arg(project_name_arg()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a project permanently")
                .arg(project_name_arg())
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm deletion"),
                ),
        )
        .subcommand(
            Command::new("regen-uuids")
                .about("Give both packs fresh UUIDs")
                .arg(project_name_arg()),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate an addon document")
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .value_parser([
                            "item",
                            "block",
                            "entity",
                            "spawn-rules",
                            "recipe",
                            "loot-table",
                            "item-group",
                            "texture",
                        ]),
                )
                .arg(
                    Arg::new("set")
                        .long("set")
                        .short('s')
                        .value_name("NAME=VALUE")
                        .action(ArgAction::Append)
                        .help("Form field (repeatable)"),
                )
                .arg(
                    Arg::new("fields")
                        .long("fields")
                        .value_name("FILE")
                        .help("JSON object of form fields")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("draft")
                        .long("draft")
                        .value_name("FILE")
                        .help("JSON draft for loot-table, item-group or texture")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("selected-tab")
                        .long("selected-tab")
                        .value_name("INDEX")
                        .help("Item groups: only this tab carries its groups")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(Arg::new("project").long("project").value_name("PROJECT"))
                .arg(
                    Arg::new("save")
                        .long("save")
                        .action(ArgAction::SetTrue)
                        .requires("project")
                        .help("Write the document into the project"),
                )
                .arg(Arg::new("file").long("file").value_name("NAME").help("File name override")),
        )
        .subcommand(
            Command::new("put")
                .about("Write a JSON file into a pack after validating it")
                .arg(project_name_arg())
                .arg(pack_arg().required(true))
                .arg(Arg::new("folder").long("folder").value_name("DIR").help("Folder inside the pack"))
                .arg(Arg::new("file").long("file").value_name("NAME").required(true))
                .arg(
                    Arg::new("input")
                        .long("input")
                        .value_name("FILE")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("lang")
                .about("Add a language entry")
                .arg(project_name_arg())
                .arg(Arg::new("key").required(true))
                .arg(Arg::new("value").required(true))
                .arg(
                    Arg::new("locale")
                        .long("locale")
                        .value_name("LOCALE")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("tree")
                .about("Show a project's files")
                .arg(project_name_arg())
                .arg(pack_arg()),
        )
        .subcommand(
            Command::new("export")
                .about("Package a project as .mcaddon")
                .arg(project_name_arg())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .value_name("FILE")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

/// Load configuration, then apply environment and flag overrides
fn load_config(args: &AppArgs) -> anyhow::Result<Config> {
    let mut config = match &args.config_path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load_or_default()?,
    };

    config
        .apply_env_overrides()
        .context("Invalid QUICKIDE_* environment override")?;
    if let Some(root) = &args.projects_root {
        config.workspace.projects_root = root.clone();
    }
    if args.debug {
        config.logging.level = "debug".to_string();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    let args = AppArgs::from_matches(&matches);
    let config = load_config(&args)?;

    quickide_core::init_tracing(&config.logging.level);
    tracing::debug!("Starting Quick IDE v{}", env!("CARGO_PKG_VERSION"));

    commands::run(&config, &matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(["quickide", "list", "--projects-root", "/tmp/p", "--debug"])
            .unwrap();
        let args = AppArgs::from_matches(&matches);
        assert_eq!(args.projects_root, Some(PathBuf::from("/tmp/p")));
        assert!(args.debug);
    }

    #[test]
    fn test_save_requires_project() {
        assert!(build_cli()
            .try_get_matches_from(["quickide", "generate", "item", "--save"])
            .is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save_to_file(&path).unwrap();

        let args = AppArgs {
            config_path: Some(path),
            projects_root: Some(dir.path().join("projects")),
            debug: true,
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.workspace.projects_root, dir.path().join("projects"));
        assert_eq!(config.logging.level, "debug");
    }
}
