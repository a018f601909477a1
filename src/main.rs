use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;
use treekmz::cli::{load_config, Cli, Commands};
use treekmz::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("treekmz=debug,info")
    } else {
        EnvFilter::new("treekmz=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let printer = Printer::new();

    match cli.command {
        Commands::Convert(args) => {
            let config = load_config(cli.config.as_deref())?;
            treekmz::cli::convert::run(args, config, &printer)?
        }
        Commands::Validate(args) => {
            let config = load_config(cli.config.as_deref())?;
            treekmz::cli::validate::run(args, config, &printer)?
        }
        Commands::Palette(args) => {
            let config = load_config(cli.config.as_deref())?;
            treekmz::cli::palette::run(args, config, &printer)?
        }
        Commands::Init(args) => treekmz::cli::init::run(args, &printer)?,
    }

    Ok(())
}
