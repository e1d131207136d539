use std::io::{self, BufRead};

use num_format::{Locale, ToFormattedString};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    parser::{ParseError, parse_line},
    store::{LogStore, StoreError},
};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read log input: {0}")]
    Read(#[from] io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why a line was left out of the store.
#[derive(Debug, Error)]
pub enum SkipCause {
    #[error(transparent)]
    Malformed(#[from] ParseError),

    #[error(transparent)]
    Rejected(StoreError),
}

#[derive(Debug)]
pub struct SkippedLine {
    /// 1-based physical line number.
    pub line: usize,
    pub cause: SkipCause,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub lines: usize,
    pub stored: usize,
    pub skipped: Vec<SkippedLine>,
}

impl IngestReport {
    pub fn malformed(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.cause, SkipCause::Malformed(_)))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.cause, SkipCause::Rejected(_)))
            .count()
    }

    pub fn log_summary(&self) {
        info!(
            lines = %self.lines.to_formatted_string(&Locale::en),
            stored = %self.stored.to_formatted_string(&Locale::en),
            malformed = %self.malformed().to_formatted_string(&Locale::en),
            rejected = %self.rejected().to_formatted_string(&Locale::en),
            first_skipped = ?self.skipped.first().map(|s| s.line),
            "ingestion finished"
        );
    }

    fn skip(&mut self, line: usize, cause: SkipCause) {
        match &cause {
            SkipCause::Malformed(err) => {
                warn!(line, reason = %err.reason(), error = %cause, "skipping malformed log line")
            }
            SkipCause::Rejected(_) => warn!(line, error = %cause, "skipping rejected log entry"),
        }
        self.skipped.push(SkippedLine { line, cause });
    }
}

/// Parses every line of `reader` into `store`, then commits.
///
/// Malformed lines and rejected rows are recorded and skipped; only read
/// failures and an unavailable store stop the batch.
pub fn ingest<R, S>(mut reader: R, store: &mut S) -> Result<IngestReport, IngestError>
where
    R: BufRead,
    S: LogStore + ?Sized,
{
    let mut report = IngestReport::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        report.lines += 1;
        let number = report.lines;
        let text = String::from_utf8_lossy(&buf);

        match parse_line(text.trim()) {
            Ok(entry) => match store.insert(&entry) {
                Ok(()) => report.stored += 1,
                Err(rejected @ StoreError::InsertRejected { .. }) => {
                    report.skip(number, SkipCause::Rejected(rejected))
                }
                Err(fatal) => return Err(fatal.into()),
            },
            Err(malformed) => report.skip(number, malformed.into()),
        }
    }
    store.commit()?;
    Ok(report)
}
