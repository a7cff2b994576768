use anyhow::Result;
use clap::{Parser, Subcommand};
use fu_cli::{UnfoldArgs, logger, run_unfold};

#[derive(Parser, Debug)]
#[command(name = "fiber_unfold")]
#[command(about = "Straighten curved fibers traced on multi-channel images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Unfold every curve of a curves file and export ribbons and profiles
    #[command(name = "unfold")]
    Unfold(UnfoldArgs),
}

fn main() -> Result<()> {
    logger::init()?;
    let cli = Cli::parse();

    match cli.cmd {
        Command::Unfold(args) => run_unfold(&args).map(|_| ()),
    }
}
