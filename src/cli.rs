use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "renotax",
    version,
    about = "Renovation tax-deduction calculator for home-renovation certificates"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate one certificate file
    Calc(CalcCommand),
    /// Evaluate every certificate under a directory
    Batch(BatchCommand),
    /// Print the effective deduction rules
    Rules(RulesCommand),
}

#[derive(Args)]
pub struct CalcCommand {
    pub file: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Directory holding renotax.toml (defaults to the certificate's directory)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct BatchCommand {
    pub dir: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Directory holding renotax.toml (defaults to the batch directory)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct RulesCommand {
    /// Directory holding renotax.toml (defaults to the current directory)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

impl Commands {
    /// Directory whose layered config applies to this command.
    pub fn config_root(&self) -> PathBuf {
        match self {
            Commands::Calc(cmd) => cmd.config_dir.clone().unwrap_or_else(|| {
                cmd.file
                    .parent()
                    .filter(|parent| !parent.as_os_str().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."))
            }),
            Commands::Batch(cmd) => cmd.config_dir.clone().unwrap_or_else(|| cmd.dir.clone()),
            Commands::Rules(cmd) => cmd.config_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}
