mod cmd;
mod completions;
mod logging;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mog", version, about = "Compile schema files and check documents against them")]
pub(crate) struct Cli {
    /// Path to config.toml (defaults to ~/.config/mog/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a JSON or YAML document against a schema file
    Check(CheckArgs),

    /// Show the fields parsed from a schema file
    Parse(ParseArgs),

    /// List the registered type names
    Types(TypesArgs),

    /// Validate configuration and print resolved settings
    Doctor,

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Schema file to compile
    #[arg(long)]
    pub schema: PathBuf,

    /// Document to check (JSON, or YAML for .yaml/.yml); reads stdin when omitted
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Schema file to parse
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TypesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => cmd::check::run(cli.config.as_deref(), &args),
        Commands::Parse(args) => cmd::parse::run(cli.config.as_deref(), &args),
        Commands::Types(args) => cmd::types::run(cli.config.as_deref(), &args),
        Commands::Doctor => {
            cmd::doctor::run(cli.config.as_deref());
            Ok(())
        }
        Commands::Completions { shell } => {
            completions::print(shell);
            Ok(())
        }
    }
}
