//! Commands listing.
//!
//! Prints every registered command with its usage line, grouped under the
//! command whose scope it belongs to.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use crate::command::{CommandDefinition, CommandRegistry};
use crate::config::Config;
use crate::default_registry;
use crate::error::{EaselError, Result};
use crate::output::Printer;

/// List available commands
#[derive(Args, Debug)]
pub struct CommandsArgs {
    /// Print the listing as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Config file (default: easel.yaml in the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// One command as shown by `easel commands --json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub usage: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl From<&CommandDefinition> for CommandSummary {
    fn from(command: &CommandDefinition) -> Self {
        Self {
            name: command.name().to_string(),
            parent: command.parent().map(str::to_string),
            usage: command.usage(),
            description: command.description().to_string(),
            aliases: command.aliases().to_vec(),
        }
    }
}

/// Top-level commands in name order, each followed by its scoped children.
pub fn summaries(registry: &CommandRegistry) -> Vec<CommandSummary> {
    let mut out = Vec::with_capacity(registry.len());
    for command in registry.top_level() {
        out.push(CommandSummary::from(command));
        out.extend(
            registry
                .children_of(command.name())
                .into_iter()
                .map(CommandSummary::from),
        );
    }
    out
}

pub fn run(args: CommandsArgs, printer: &Printer) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(Path::new("."))?,
    };
    let registry = default_registry(&config)?;
    let commands = summaries(&registry);

    if args.json {
        let json = serde_json::to_string_pretty(&commands).map_err(|e| EaselError::Render {
            message: format!("Failed to serialize command list: {}", e),
            help: None,
        })?;
        println!("{}", json);
        return Ok(());
    }

    for command in &commands {
        let verb = if command.parent.is_some() { "Scoped" } else { "Command" };
        printer.info(
            verb,
            &format!("{} {}", command.usage, printer.dim(&command.description)),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summaries_group_children_under_parent() {
        let registry = default_registry(&Config::default()).unwrap();
        let names: Vec<String> = summaries(&registry).into_iter().map(|s| s.name).collect();

        assert_eq!(names.len(), registry.len());
        let create = names.iter().position(|n| n == "$createCanvas").unwrap();
        let render = names.iter().position(|n| n == "$renderCanvas").unwrap();
        assert!(create < render);
    }

    #[test]
    fn test_summary_json_omits_empty_fields() {
        let registry = default_registry(&Config::default()).unwrap();
        let summary = CommandSummary::from(registry.get("$getVar").unwrap());
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["name"], "$getVar");
        assert!(json.get("parent").is_none());
        assert!(json.get("aliases").is_none());
    }

    #[test]
    fn test_scoped_summary_names_parent() {
        let registry = default_registry(&Config::default()).unwrap();
        let summary = CommandSummary::from(registry.get("$addTextLayer").unwrap());

        assert_eq!(summary.parent.as_deref(), Some("$createCanvas"));
        assert!(summary.usage.starts_with("$addTextLayer["));
    }
}
