//! Init command implementation.
//!
//! Writes a default `easel.yaml` into a project directory.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::cli::render::collect_scripts;
use crate::config::{Config, CONFIG_FILENAME};
use crate::error::{EaselError, Result};
use crate::output::{display_path, plural, Printer};

/// Initialize an easel project by writing easel.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Directory rendered images are written to
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Overwrite existing easel.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(EaselError::Config {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let mut config = Config::default();
    if let Some(output) = args.output {
        config.output = output;
    }

    fs::create_dir_all(&args.path).map_err(|e| EaselError::Io {
        path: args.path.clone(),
        message: format!("Failed to create project directory: {}", e),
    })?;

    printer.status("Scanning", &display_path(&args.path));
    let scripts = collect_scripts(std::slice::from_ref(&args.path), &config.extension)?;

    fs::write(&config_path, config.to_yaml()?).map_err(|e| EaselError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.success(
        "Created",
        &format!(
            "{} ({} found)",
            CONFIG_FILENAME,
            plural(scripts.len(), "script", "scripts")
        ),
    );

    Ok(())
}
