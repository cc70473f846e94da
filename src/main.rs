//! Label Sheet - barcode label sheet layout and export
//!
//! Reads a sheet file, checks every cell assignment against the chosen
//! layout and exports a printable PDF or draws a preview in the terminal.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labelsheet::cli::{
    CheckArgs, CliResult, ConfigArgs, ExitCode, ExportArgs, LayoutsArgs, PreviewArgs,
};

/// Label Sheet - barcode label sheet layout and export
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a sheet file to PDF
    Export(ExportArgs),
    /// Draw a sheet file in the terminal
    Preview(PreviewArgs),
    /// Check a sheet file for rejected cells
    Check(CheckArgs),
    /// List the available layouts
    Layouts(LayoutsArgs),
    /// Show configuration
    Config(ConfigArgs),
}

impl Command {
    fn execute(&self) -> CliResult<()> {
        match self {
            Self::Export(args) => args.execute(),
            Self::Preview(args) => args.execute(),
            Self::Check(args) => args.execute(),
            Self::Layouts(args) => args.execute(),
            Self::Config(args) => args.execute(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match cli.command.execute() {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            eprintln!("Error: {err}");
            err.code
        }
    };

    std::process::exit(code.code());
}
