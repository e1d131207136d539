use std::sync::LazyLock;

use chrono::NaiveDateTime;
use derive_more::Display;
use regex::Regex;
use thiserror::Error;

use crate::models::{ERROR_SENTINEL, LogEntry};

const IP_MARKER: &str = " - - ";

// Timestamp body inside the brackets, offset excluded: 10/Oct/2023:13:55:36
const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

// Unanchored: the first three-digit number followed by a digit run wins, even
// when it sits inside the request line rather than after it.
static STATUS_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{3})\s+([0-9]+)").expect("status/size pattern compiles")
});
// chrono's %Y takes any digit count; the log format only allows four.
static TIMESTAMP_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,2}/[A-Za-z]{3}/[0-9]{4}:[0-9]{1,2}:[0-9]{1,2}:[0-9]{1,2}$")
        .expect("timestamp shape pattern compiles")
});
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(.*?)""#).expect("quoted segment pattern compiles"));

/// The extraction step that rejected a line.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    #[display("ip")]
    Ip,
    #[display("status_size")]
    StatusSize,
    #[display("timestamp")]
    Timestamp,
    #[display("request")]
    Request,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed line ({reason}): {text:?}")]
    MalformedLine { text: String, reason: LineField },
}

impl ParseError {
    pub fn reason(&self) -> LineField {
        match self {
            Self::MalformedLine { reason, .. } => *reason,
        }
    }
}

/// Parses one access-log line of the form
///
/// ```text
/// <ip> - - [<dd>/<Mon>/<yyyy>:<HH>:<MM>:<SS> <tz>] "<METHOD> <resource> <proto>" <status> <size> ["<error>"]
/// ```
///
/// Each field is extracted independently, in the order ip, status/size,
/// timestamp, request; the first one missing decides the failure reason.
pub fn parse_line(line: &str) -> Result<LogEntry, ParseError> {
    let malformed = |reason: LineField| ParseError::MalformedLine {
        text: line.to_string(),
        reason,
    };

    let ip_address = line
        .find(IP_MARKER)
        .map(|end| &line[..end])
        .filter(|ip| !ip.is_empty())
        .ok_or_else(|| malformed(LineField::Ip))?;

    let status_size = STATUS_SIZE
        .captures(line)
        .ok_or_else(|| malformed(LineField::StatusSize))?;
    let status_code: u16 = status_size[1]
        .parse()
        .map_err(|_| malformed(LineField::StatusSize))?;
    let size = status_size[2].to_string();

    let timestamp = bracketed(line)
        .and_then(|inner| inner.split(' ').next())
        .filter(|ts| TIMESTAMP_SHAPE.is_match(ts))
        .and_then(|ts| NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).ok())
        .ok_or_else(|| malformed(LineField::Timestamp))?;

    let mut quoted = QUOTED
        .captures_iter(line)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str());
    let mut request = quoted.next().unwrap_or_default().split_whitespace();
    let (method, resource) = match (request.next(), request.next()) {
        (Some(method), Some(resource)) => (method, resource),
        _ => return Err(malformed(LineField::Request)),
    };
    let error = quoted.next().unwrap_or(ERROR_SENTINEL);

    Ok(LogEntry {
        date: timestamp.date(),
        time: timestamp.time(),
        ip_address: ip_address.into(),
        status_code,
        size,
        method: method.to_string(),
        resource: resource.into(),
        error: error.to_string(),
    })
}

/// Text between the first `[` and the next `]`.
fn bracketed(line: &str) -> Option<&str> {
    let start = line.find('[')? + 1;
    let len = line[start..].find(']')?;
    Some(&line[start..start + len])
}
