use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use derive_getters::Getters;

#[derive(Parser, Debug, Getters)]
#[command(name = "log-auditor", version)]
#[command(about = "Audit a web-server access log for busy clients, hot paths and failed logins", long_about = None)]
pub struct CliArgs {
    /// Access log to ingest, one entry per line.
    #[arg(long, default_value = "sample.log")]
    input: PathBuf,

    /// Database file holding the parsed entries; recreated on every run.
    #[arg(long, default_value = "log_analysis.db")]
    database: PathBuf,

    /// Destination of the CSV report.
    #[arg(long, default_value = "log_analysis_results.csv")]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = StoreKind::Sqlite)]
    store: StoreKind,

    /// Also print the result tables to stdout.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    debug: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Sqlite,
    Memory,
}
