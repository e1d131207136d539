mod analytics;
mod args;
mod export;
mod ingest;
mod invariants;
mod logging;
mod models;
mod parser;
mod store;

use std::{fs::File, io::BufReader};

use analytics::Report;
use anyhow::Context;
use args::{CliArgs, StoreKind};
use clap::Parser;
use ingest::ingest;
use store::{LogStore, MemoryStore, SqliteStore};
use tracing::info;

fn main() -> anyhow::Result<()> {
    logging::init();
    let args = CliArgs::parse();
    run(&args)
}

fn run(args: &CliArgs) -> anyhow::Result<()> {
    let mut store = open_store(args)?;

    info!(input = %args.input().display(), "log read start");
    let input = File::open(args.input())
        .with_context(|| format!("failed to open log file {}", args.input().display()))?;
    let ingested = ingest(BufReader::new(input), store.as_mut())?;
    ingested.log_summary();
    info!(rows = store.row_count()?, "store committed");

    let report = Report::collect(store.as_ref())?;
    export::write_csv(args.output(), &report)
        .with_context(|| format!("failed to write {}", args.output().display()))?;
    info!(output = %args.output().display(), "csv report written");

    if *args.debug() {
        export::print_tables(&report);
    }

    info!("log analysis done");
    Ok(())
}

fn open_store(args: &CliArgs) -> anyhow::Result<Box<dyn LogStore>> {
    let database = args.database();
    Ok(match args.store() {
        StoreKind::Sqlite => {
            let store = SqliteStore::reset_and_open(database)
                .with_context(|| format!("failed to open database {}", database.display()))?;
            info!(path = %store.path().display(), "sqlite store ready");
            Box::new(store)
        }
        StoreKind::Memory => {
            let store = MemoryStore::reset_and_open(&database.to_string_lossy());
            info!(store = store.identifier(), "memory store ready");
            Box::new(store)
        }
    })
}
