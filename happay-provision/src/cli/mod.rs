//! Command-line interface

pub mod commands;

use clap::Parser;

use commands::provision::ProvisionArgs;

#[derive(Parser, Debug)]
#[command(
    name = "happay-provision",
    version,
    about = "Bulk-provision Happay users from a CSV or XLSX sheet"
)]
pub struct Cli {
    #[command(flatten)]
    pub provision: ProvisionArgs,
}
