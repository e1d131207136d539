use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::invariants::{ClientIp, Resource};

/// Stored in `error` when a line carries no second quoted field.
pub const ERROR_SENTINEL: &str = "N/A";
/// The only status counted as a failed authentication attempt.
pub const AUTH_FAILURE_STATUS: u16 = 401;

const DATE_FORMAT: &str = "%d/%b/%Y";
const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub ip_address: ClientIp,
    pub status_code: u16,
    pub size: String,
    pub method: String,
    pub resource: Resource,
    pub error: String,
}

impl LogEntry {
    /// `DD/Mon/YYYY`
    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// `HH:MM:SS`
    pub fn time_text(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }

    /// Checks the row shape every store enforces before accepting an entry.
    pub fn validate(&self) -> Result<(), String> {
        if self.ip_address.as_str().is_empty() {
            return Err("ip_address is empty".into());
        }
        if self.method.is_empty() {
            return Err("method is empty".into());
        }
        if self.resource.as_str().is_empty() {
            return Err("resource is empty".into());
        }
        if self.size.is_empty() || !self.size.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("size {:?} is not a byte count", self.size));
        }
        Ok(())
    }
}

/// The three fixed aggregations a store can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    ActivityPerIp,
    MostAccessed,
    SuspiciousActivity,
}

impl Aggregate {
    pub const ALL: [Aggregate; 3] = [
        Self::ActivityPerIp,
        Self::MostAccessed,
        Self::SuspiciousActivity,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::ActivityPerIp => "Requests per IP",
            Self::MostAccessed => "Most Accessed Endpoint",
            Self::SuspiciousActivity => "Suspicious Activity",
        }
    }

    pub fn headers(self) -> [&'static str; 2] {
        match self {
            Self::ActivityPerIp => ["IP Address", "Request Count"],
            Self::MostAccessed => ["Endpoint", "Access Count"],
            Self::SuspiciousActivity => ["IP Address", "Failed Login Count"],
        }
    }
}

/// One `(key, count)` tuple of a grouped count; the key is an IP or a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRow {
    pub key: String,
    pub count: u64,
}

impl AggregateRow {
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}
