use chrono::{DateTime, FixedOffset};
use rand::{Rng, seq::IndexedRandom};

use crate::args::LogFormat;

const TS_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

const METHODS: [(&str, u8); 4] = [("GET", 6), ("POST", 2), ("PUT", 1), ("DELETE", 1)];
const PATHS: [(&str, u8); 6] = [
    ("/", 10),
    ("/login", 10),
    ("/api", 50),
    ("/admin", 5),
    ("/splash", 20),
    ("/gallery", 10),
];
const STATUS: [(u16, u8); 6] = [
    (200, 50),
    (201, 10),
    (400, 10),
    (401, 20),
    (404, 50),
    (500, 5),
];
const REFERRERS: [(&str, u8); 3] = [
    ("-", 40),
    ("https://example.com/", 20),
    ("https://example.com/login", 5),
];
const LOGIN_ERRORS: [(&str, u8); 3] = [
    ("Invalid credentials", 15),
    ("Token expired", 5),
    ("Account locked", 1),
];

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, table: &'a [(T, u8)]) -> &'a T {
    &table
        .choose_weighted(rng, |(_, w)| *w)
        .expect("weight tables are non-empty with positive weights")
        .0
}

fn client_ip<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "192.168.{}.{}",
        rng.random_range(0..256),
        rng.random_range(0..256)
    )
}

pub fn generate_access_log<R: Rng + ?Sized>(
    rng: &mut R,
    format: LogFormat,
    at: DateTime<FixedOffset>,
) -> String {
    let ip = client_ip(rng);
    let timestamp = at.format(TS_FORMAT);
    let method = pick(rng, &METHODS);
    let path = pick(rng, &PATHS);
    let status = *pick(rng, &STATUS);
    let size = rng.random_range(100..2000);

    let line = format!("{ip} - - [{timestamp}] \"{method} {path} HTTP/1.1\" {status} {size}");
    match format {
        LogFormat::Common => line,
        LogFormat::Combined => {
            // Failed logins carry the reason; everything else a referrer.
            let trailer = if status == 401 {
                pick(rng, &LOGIN_ERRORS)
            } else {
                pick(rng, &REFERRERS)
            };
            format!("{line} \"{trailer}\"")
        }
    }
}

/// A line that log-auditor has to skip: each variant breaks one field.
pub fn generate_malformed_log<R: Rng + ?Sized>(rng: &mut R, at: DateTime<FixedOffset>) -> String {
    let ip = client_ip(rng);
    let timestamp = at.format(TS_FORMAT);
    match rng.random_range(0..4) {
        0 => format!("{ip} [{timestamp}] \"GET / HTTP/1.1\" 200 512"),
        1 => format!("{ip} - - [{timestamp}] \"GET / HTTP/1.1\" 200 -"),
        2 => format!(
            "{ip} - - [{}] \"GET / HTTP/1.1\" 200 512",
            at.format("%Y-%m-%dT%H:%M:%S")
        ),
        _ => format!("{ip} - - [{timestamp}] \"GET\" 200 512"),
    }
}
