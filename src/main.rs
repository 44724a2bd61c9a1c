use clap::Parser;
use easel::cli::{init_tracing, Cli, Commands};
use easel::output::Printer;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let printer = Printer::new();

    match cli.command {
        Commands::Render(args) => easel::cli::render::run(args, &printer)?,
        Commands::Commands(args) => easel::cli::commands::run(args, &printer)?,
        Commands::Init(args) => easel::cli::init::run(args, &printer)?,
        Commands::Completions(args) => easel::cli::completions::run(args)?,
    }

    Ok(())
}
