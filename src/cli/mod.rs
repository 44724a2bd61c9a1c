pub mod commands;
pub mod completions;
pub mod init;
pub mod render;

use clap::{Parser, Subcommand};
use tracing::Level;

/// easel - render canvases described in script text
#[derive(Parser, Debug)]
#[command(name = "easel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log command calls and rendering details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate script files and render their canvases
    Render(render::RenderArgs),

    /// List available commands and their usage
    Commands(commands::CommandsArgs),

    /// Initialize an easel project (generates easel.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Install the stderr log subscriber: `debug` when verbose, `warn` otherwise.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
