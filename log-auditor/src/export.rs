use std::{fs, io, path::Path};

use csv::{Terminator, WriterBuilder};
use thiserror::Error;

use crate::{analytics::Report, models::AggregateRow};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Renders the report as stacked CSV sections: a title row, a header row and
/// the data rows, with one blank line between sections.
pub fn render_csv(report: &Report) -> Result<String, ExportError> {
    let mut sections = Vec::with_capacity(3);
    for (aggregate, rows) in report.sections() {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record([aggregate.title()])?;
        writer.write_record(aggregate.headers())?;
        for row in rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| io::Error::other(e.to_string()))?;
        sections.push(String::from_utf8_lossy(&bytes).into_owned());
    }
    Ok(sections.join("\n"))
}

pub fn write_csv(path: &Path, report: &Report) -> Result<(), ExportError> {
    fs::write(path, render_csv(report)?)?;
    Ok(())
}

/// Left-aligned columns padded to their widest cell, joined by tabs.
pub fn render_table(headers: [&str; 2], rows: &[AggregateRow]) -> String {
    let cells: Vec<[String; 2]> = rows
        .iter()
        .map(|row| [row.key.clone(), row.count.to_string()])
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers, widths);
    for row in &cells {
        push_row(&mut out, [row[0].as_str(), row[1].as_str()], widths);
    }
    out
}

fn push_row(out: &mut String, cells: [&str; 2], widths: [usize; 2]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(&padded.join("\t"));
    out.push('\n');
}

pub fn print_tables(report: &Report) {
    for (aggregate, rows) in report.sections() {
        print!("{}", render_table(aggregate.headers(), rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;

    fn report() -> Report {
        Report {
            activity_per_ip: vec![AggregateRow::new("10.0.0.1", 2), AggregateRow::new("10.0.0.2", 1)],
            most_accessed: vec![AggregateRow::new("/search?q=a,b", 3)],
            suspicious_activity: vec![
                AggregateRow::new("10.0.0.2", 1),
                AggregateRow::new("10.0.0.1", 0),
            ],
        }
    }

    #[test]
    fn csv_stacks_sections_with_blank_separators() {
        let expected = "\
Requests per IP
IP Address,Request Count
10.0.0.1,2
10.0.0.2,1

Most Accessed Endpoint
Endpoint,Access Count
\"/search?q=a,b\",3

Suspicious Activity
IP Address,Failed Login Count
10.0.0.2,1
10.0.0.1,0
";
        assert_that!(render_csv(&report()).unwrap()).is_equal_to(expected.to_string());
    }

    #[test]
    fn csv_keeps_headers_for_empty_sections() {
        let csv = render_csv(&Report::default()).unwrap();
        assert_that!(csv).is_equal_to(
            "Requests per IP\nIP Address,Request Count\n\n\
             Most Accessed Endpoint\nEndpoint,Access Count\n\n\
             Suspicious Activity\nIP Address,Failed Login Count\n"
                .to_string(),
        );
    }

    #[test]
    fn write_csv_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &report()).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_that!(written).is_equal_to(render_csv(&report()).unwrap());
    }

    #[test]
    fn write_csv_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.csv");
        assert!(matches!(write_csv(&path, &report()), Err(ExportError::Io(_))));
    }

    #[test]
    fn table_pads_to_widest_cell() {
        let rows = [AggregateRow::new("192.168.100.200", 12), AggregateRow::new("::1", 3)];
        let table = render_table(["IP Address", "Request Count"], &rows);
        let lines: Vec<_> = table.lines().collect();
        assert_that!(lines).is_equal_to(vec![
            "IP Address     \tRequest Count",
            "192.168.100.200\t12           ",
            "::1            \t3            ",
        ]);
    }

    #[test]
    fn table_with_no_rows_is_header_only() {
        let table = render_table(["Endpoint", "Access Count"], &[]);
        assert_that!(table).is_equal_to("Endpoint\tAccess Count\n".to_string());
    }
}
