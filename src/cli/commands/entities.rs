//! One-shot CRUD commands over the remote entities.
//!
//! Text renderings are shared with the interactive scaffolds; `--output
//! json`/`csv` re-fetch the structured data and serialize it directly.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::actions::scaffold::{execute, Entity, Verb};
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::remote::RemoteClient;

use super::{client_from, emit};

/// Shared arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output file path (stdout if not specified).
    #[arg(short = 'O', long = "out")]
    pub output_file: Option<PathBuf>,

    /// Append to the output file instead of truncating it.
    #[arg(long)]
    pub append: bool,
}

/// Macro operations.
#[derive(Debug, Subcommand)]
pub enum MacroCommands {
    /// List macros.
    #[command(alias = "ls")]
    List(ListArgs),
    /// Create a macro.
    Create {
        /// Invocation name.
        name: String,
        /// Replacement text.
        expansion: String,
        /// Free-form description.
        description: Vec<String>,
    },
    /// Delete a macro by ID.
    #[command(alias = "rm")]
    Delete {
        /// Macro ID.
        id: String,
    },
}

/// Kit operations.
#[derive(Debug, Subcommand)]
pub enum KitCommands {
    /// List kits.
    #[command(alias = "ls")]
    List(ListArgs),
    /// Show one kit.
    Info {
        /// Kit ID.
        id: String,
    },
    /// Delete a kit by ID.
    #[command(alias = "rm")]
    Delete {
        /// Kit ID.
        id: String,
    },
}

/// Dashboard operations.
#[derive(Debug, Subcommand)]
pub enum DashboardCommands {
    /// List dashboards.
    #[command(alias = "ls")]
    List(ListArgs),
    /// Delete a dashboard by ID.
    #[command(alias = "rm")]
    Delete {
        /// Dashboard ID.
        id: String,
    },
}

/// Extractor operations.
#[derive(Debug, Subcommand)]
pub enum ExtractorCommands {
    /// List extractors.
    #[command(alias = "ls")]
    List(ListArgs),
    /// Create an extractor.
    Create {
        /// Extractor name.
        name: String,
        /// Tag the extractor applies to.
        tag: String,
        /// Extraction expression.
        expression: String,
    },
    /// Delete an extractor by ID.
    #[command(alias = "rm")]
    Delete {
        /// Extractor ID.
        id: String,
    },
}

/// Scheduled-search operations.
#[derive(Debug, Subcommand)]
pub enum ScheduledCommands {
    /// List scheduled searches.
    #[command(alias = "ls")]
    List(ListArgs),
    /// Delete a scheduled search by ID.
    #[command(alias = "rm")]
    Delete {
        /// Scheduled search ID.
        id: String,
    },
}

/// Run a macro command.
pub fn run_macros(cli: &Cli, config: &Config, cmd: &MacroCommands) -> Result<()> {
    let client = client_from(config)?;
    match cmd {
        MacroCommands::List(args) => list(cli, args, &client, Entity::Macros, |c| {
            c.list_macros().map(csv_ready)
        }),
        MacroCommands::Create {
            name,
            expansion,
            description,
        } => {
            let mut tokens = vec![name.clone(), expansion.clone()];
            tokens.extend(description.iter().cloned());
            print_result(&client, Entity::Macros, Verb::Create, &tokens)
        }
        MacroCommands::Delete { id } => {
            print_result(&client, Entity::Macros, Verb::Delete, &[id.clone()])
        }
    }
}

/// Run a kit command.
pub fn run_kits(cli: &Cli, config: &Config, cmd: &KitCommands) -> Result<()> {
    let client = client_from(config)?;
    match cmd {
        KitCommands::List(args) => list(cli, args, &client, Entity::Kits, |c| {
            c.list_kits().map(csv_ready)
        }),
        KitCommands::Info { id } => print_result(&client, Entity::Kits, Verb::Info, &[id.clone()]),
        KitCommands::Delete { id } => {
            print_result(&client, Entity::Kits, Verb::Delete, &[id.clone()])
        }
    }
}

/// Run a dashboard command.
pub fn run_dashboards(cli: &Cli, config: &Config, cmd: &DashboardCommands) -> Result<()> {
    let client = client_from(config)?;
    match cmd {
        DashboardCommands::List(args) => list(cli, args, &client, Entity::Dashboards, |c| {
            c.list_dashboards().map(csv_ready)
        }),
        DashboardCommands::Delete { id } => {
            print_result(&client, Entity::Dashboards, Verb::Delete, &[id.clone()])
        }
    }
}

/// Run an extractor command.
pub fn run_extractors(cli: &Cli, config: &Config, cmd: &ExtractorCommands) -> Result<()> {
    let client = client_from(config)?;
    match cmd {
        ExtractorCommands::List(args) => list(cli, args, &client, Entity::Extractors, |c| {
            c.list_extractors().map(csv_ready)
        }),
        ExtractorCommands::Create {
            name,
            tag,
            expression,
        } => print_result(
            &client,
            Entity::Extractors,
            Verb::Create,
            &[name.clone(), tag.clone(), expression.clone()],
        ),
        ExtractorCommands::Delete { id } => {
            print_result(&client, Entity::Extractors, Verb::Delete, &[id.clone()])
        }
    }
}

/// Run a scheduled-search command.
pub fn run_scheduled(cli: &Cli, config: &Config, cmd: &ScheduledCommands) -> Result<()> {
    let client = client_from(config)?;
    match cmd {
        ScheduledCommands::List(args) => list(cli, args, &client, Entity::Scheduled, |c| {
            c.list_scheduled().map(csv_ready)
        }),
        ScheduledCommands::Delete { id } => {
            print_result(&client, Entity::Scheduled, Verb::Delete, &[id.clone()])
        }
    }
}

fn print_result(client: &RemoteClient, entity: Entity, verb: Verb, tokens: &[String]) -> Result<()> {
    let output = execute(client, entity, verb, tokens)?;
    println!("{output}");
    Ok(())
}

fn list<F>(
    cli: &Cli,
    args: &ListArgs,
    client: &RemoteClient,
    entity: Entity,
    fetch: F,
) -> Result<()>
where
    F: Fn(&RemoteClient) -> Result<(String, Vec<Vec<String>>)>,
{
    let content = match cli.output {
        OutputFormat::Text => execute(client, entity, Verb::List, &[])?,
        OutputFormat::Json | OutputFormat::Csv => {
            let (json, rows) = fetch(client)?;
            if cli.output == OutputFormat::Json {
                json
            } else {
                rows.iter()
                    .map(|row| {
                        row.iter()
                            .map(|cell| csv_escape(cell))
                            .collect::<Vec<_>>()
                            .join(",")
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    };
    emit(args.output_file.as_ref(), args.append, &content)
}

/// Serialize entities once into both JSON and CSV-ready row form.
fn csv_ready<T: Serialize>(items: Vec<T>) -> (String, Vec<Vec<String>>) {
    let json = serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string());
    let rows = items
        .iter()
        .map(|item| {
            match serde_json::to_value(item) {
                Ok(serde_json::Value::Object(map)) => map
                    .values()
                    .map(|v| match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
                _ => Vec::new(),
            }
        })
        .collect();
    (json, rows)
}

fn csv_escape(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
