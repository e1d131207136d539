use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use derive_getters::Getters;

#[derive(Parser, Debug, Getters)]
#[command(name = "noise-maker")]
#[command(about = "Generate fake access logs for log-auditor", long_about = None)]
pub struct CliArgs {
    #[arg(long, default_value_t = 1000)]
    lines: usize,

    /// Write to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Seed for reproducible output; timestamps then start at a fixed instant.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = LogFormat::Combined)]
    format: LogFormat,

    /// Share of lines, in percent, that are deliberately unparseable.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
    malformed_percent: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// No trailing quoted field.
    Common,
    /// Trailing quoted referrer or error message.
    Combined,
}
