mod args;
mod generator;
mod stream;

use std::{
    fs::File,
    io::{self, BufWriter},
};

use args::CliArgs;
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use stream::write_log_stream;

fn main() -> io::Result<()> {
    let args = CliArgs::parse();
    let (mut rng, start) = match args.seed() {
        Some(seed) => (StdRng::seed_from_u64(*seed), seeded_start()),
        None => (StdRng::from_os_rng(), Local::now().fixed_offset()),
    };

    match args.output() {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_log_stream(&mut out, &mut rng, &args, start)?;
            eprintln!("Wrote {} log lines to {}", args.lines(), path.display());
        }
        None => write_log_stream(&mut io::stdout().lock(), &mut rng, &args, start)?,
    }
    Ok(())
}

fn seeded_start() -> DateTime<FixedOffset> {
    FixedOffset::west_opt(7 * 3600)
        .and_then(|tz| tz.with_ymd_and_hms(2023, 10, 10, 13, 0, 0).single())
        .unwrap_or_else(|| Local::now().fixed_offset())
}
