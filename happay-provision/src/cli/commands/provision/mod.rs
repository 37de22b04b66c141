//! Provision command arguments

pub mod handler;

use clap::Args;
use std::path::PathBuf;

pub use handler::handle_provision_command;

/// Input sheet used when no file is given, resolved against the working directory
pub const DEFAULT_INPUT_FILE: &str = "sample_file.csv";

#[derive(Args, Debug, Clone, Default)]
pub struct ProvisionArgs {
    /// Input sheet (.csv or .xlsx); defaults to ./sample_file.csv
    pub file: Option<PathBuf>,

    /// Config file (defaults to <config dir>/happay-provision/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Map rows and print the JSON payloads without calling the API
    #[arg(long)]
    pub dry_run: bool,

    /// Write per-row results to this CSV file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Exit with status 1 if any row failed to provision
    #[arg(long)]
    pub fail_on_error: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
