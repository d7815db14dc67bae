//! Command dispatch: loads settings, runs services, prints results

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::Dataset;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, InputArgs};
use crate::cli::output;
use crate::cli::render::{graph_lines, levels_lines, share_line, ToTermTree};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{GroupHeader, LeafShare};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

#[derive(Serialize)]
struct SharesView<'a> {
    groups: &'a [GroupHeader],
    leaves: &'a [LeafShare],
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?,
    };
    let settings = Settings::load(Some(config_dir.as_path()))?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Tree {
            input,
            attrs,
            json,
            points,
        }) => cmd_tree(&container, input, attrs, *json, *points),
        Some(Commands::Levels { input, attrs, json }) => cmd_levels(&container, input, attrs, *json),
        Some(Commands::Shares { input, attrs, json }) => cmd_shares(&container, input, attrs, *json),
        Some(Commands::Graph { input, json }) => cmd_graph(&container, input, *json),
        Some(Commands::Config { command }) => cmd_config(&container, &config_dir, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `cohort --help`".to_string(),
        )),
    }
}

fn dataset_path(container: &ServiceContainer, input: &InputArgs) -> CliResult<PathBuf> {
    input
        .file
        .clone()
        .or_else(|| container.settings.data_file.clone())
        .ok_or_else(|| ApplicationError::NoDataset.into())
}

fn load_dataset(container: &ServiceContainer, input: &InputArgs) -> CliResult<Dataset> {
    let path = dataset_path(container, input)?;
    let dataset = container.dataset_service()?.load(&path)?;
    if dataset.is_empty() {
        output::warning(&format!("{} holds no records", path.display()));
    }
    Ok(dataset)
}

fn source_label(dataset: &Dataset) -> String {
    dataset
        .source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dataset.source.display().to_string())
}

#[instrument(skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    input: &InputArgs,
    attrs: &[String],
    json: bool,
    points: bool,
) -> CliResult<()> {
    let dataset = load_dataset(container, input)?;
    let hierarchy = container.hierarchy_service().build(&dataset, attrs);

    if json {
        let hierarchy = if points {
            hierarchy
        } else {
            hierarchy.without_points()
        };
        output::info(&serde_json::to_string_pretty(&hierarchy)?);
    } else {
        output::info(&hierarchy.to_term_tree(&source_label(&dataset)));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_levels(
    container: &ServiceContainer,
    input: &InputArgs,
    attrs: &[String],
    json: bool,
) -> CliResult<()> {
    let dataset = load_dataset(container, input)?;
    let levels = container.hierarchy_service().levels(&dataset, attrs);

    if json {
        output::info(&serde_json::to_string_pretty(&levels)?);
    } else {
        for line in levels_lines(&levels) {
            output::info(&line);
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_shares(
    container: &ServiceContainer,
    input: &InputArgs,
    attrs: &[String],
    json: bool,
) -> CliResult<()> {
    let dataset = load_dataset(container, input)?;
    let (groups, leaves) = container.hierarchy_service().shares(&dataset, attrs);

    if json {
        let view = SharesView {
            groups: &groups,
            leaves: &leaves,
        };
        output::info(&serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    output::header("Groups");
    for group in &groups {
        output::detail(&format!(
            "{}: {} ({})",
            group.entry.attr, group.entry.name, group.value
        ));
    }
    output::header("Leaves");
    for share in &leaves {
        output::detail(&share_line(share));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_graph(container: &ServiceContainer, input: &InputArgs, json: bool) -> CliResult<()> {
    let dataset = load_dataset(container, input)?;
    let graph = container.graph_service()?.build(&dataset);

    if json {
        output::info(&serde_json::to_string_pretty(&graph)?);
        return Ok(());
    }

    let (nodes, links) = graph_lines(&graph);
    output::header("Nodes");
    for line in nodes {
        output::detail(&line);
    }
    output::header("Links");
    for line in links {
        output::detail(&line);
    }
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    config_dir: &Path,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &describe(container, &path)),
                None => output::action("global", &"(no config directory on this platform)"),
            }
            output::action("local", &describe(container, &local_config_path(config_dir)));
            Ok(())
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(config_dir)
            };
            if container.fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                container
                    .fs
                    .create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}

fn describe(container: &ServiceContainer, path: &Path) -> String {
    if container.fs.exists(path) {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}
