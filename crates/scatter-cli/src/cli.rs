//! Root CLI structure for scatter

use clap::{Parser, Subcommand};

use crate::commands::{export::ExportArgs, inspect::InspectArgs, render::RenderArgs};

#[derive(Parser)]
#[command(name = "scatter")]
#[command(about = "Turn images into interactive particle fields", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show where an image lands on a viewport and how many particles it yields
    Inspect(InspectArgs),

    /// Simulate headless frames and save the last one as a PNG
    Render(RenderArgs),

    /// Write a self-contained HTML replay of an image
    Export(ExportArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_flags_are_global() {
        let cli = Cli::try_parse_from(["scatter", "inspect", "cat.png", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
        assert!(matches!(cli.command, Commands::Inspect(_)));
    }
}
