use std::io::{self, Write};

use chrono::{DateTime, FixedOffset, TimeDelta};
use rand::Rng;

use crate::args::CliArgs;
use crate::generator::{generate_access_log, generate_malformed_log};

const MAX_STEP_SECONDS: i64 = 5;

/// Writes `args.lines()` log lines to `out`, timestamps advancing from `start`.
pub fn write_log_stream<W, R>(
    out: &mut W,
    rng: &mut R,
    args: &CliArgs,
    start: DateTime<FixedOffset>,
) -> io::Result<()>
where
    W: Write,
    R: Rng + ?Sized,
{
    let mut moment = start;
    for _ in 0..*args.lines() {
        moment = moment + TimeDelta::seconds(rng.random_range(0..MAX_STEP_SECONDS));
        let line = if rng.random_range(0..100u8) < *args.malformed_percent() {
            generate_malformed_log(rng, moment)
        } else {
            generate_access_log(rng, *args.format(), moment)
        };
        writeln!(out, "{line}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;
    use chrono::Local;
    use clap::Parser;
    use rand::{SeedableRng, rngs::StdRng};

    fn render(argv: &[&str]) -> String {
        let args = CliArgs::try_parse_from(argv.iter().copied()).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut out = Vec::new();
        write_log_stream(&mut out, &mut rng, &args, Local::now().fixed_offset()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn writes_requested_line_count() {
        let text = render(&["noise-maker", "--lines", "17"]);
        assert_that!(text.lines().count()).is_equal_to(17usize);
    }

    #[test]
    fn fully_malformed_stream_has_no_valid_request_lines() {
        let text = render(&["noise-maker", "--lines", "30", "--malformed-percent", "100"]);
        for line in text.lines() {
            assert!(!line.contains("HTTP/1.1\" 200 512 \""), "{line}");
            assert!(!line.contains("\" 401 "), "{line}");
        }
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let text = render(&["noise-maker", "--lines", "40", "--format", "common"]);
        let stamps: Vec<_> = text
            .lines()
            .map(|l| {
                let inner = &l[l.find('[').unwrap() + 1..l.find(']').unwrap()];
                DateTime::parse_from_str(inner, "%d/%b/%Y:%H:%M:%S %z").unwrap()
            })
            .collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }
}
