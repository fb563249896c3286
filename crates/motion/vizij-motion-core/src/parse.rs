//! Row parser for long-form motion CSV.
//!
//! ```text
//! time_ms,target,channel,axis,value
//! 0,Module_A,position,x,0
//! 1000,Module_A,position,x,10
//! 2000,Module_A,rotation_deg,z,90
//! ```
//!
//! Parsing is lossy: anything that is not a valid row
//! is dropped and counted in [`ParseReport`], never reported as an error.

use serde::{Deserialize, Serialize};

use crate::channel::{Axis, Channel};
use crate::config::Config;

/// One typed sample produced by the parser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    pub time_ms: f64,
    pub target: String,
    pub channel: Channel,
    pub axis: Axis,
    pub value: f64,
}

/// Line accounting for one parse pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    /// Physical lines in the input.
    pub lines: usize,
    /// Blank, whitespace-only or comment lines.
    pub comments_or_blank: usize,
    pub header_skipped: bool,
    /// Retained lines that did not form a valid row.
    pub dropped: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedRows {
    pub rows: Vec<SampleRow>,
    pub report: ParseReport,
}

/// Numeric in the loose sense used for header detection: empty, or parses and is not NaN.
/// An empty field is not a header; the row it starts is dropped as malformed instead.
fn is_numeric(field: &str) -> bool {
    field.is_empty() || field.parse::<f64>().map_or(false, |v| !v.is_nan())
}

fn parse_finite(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_row(fields: &[&str]) -> Option<SampleRow> {
    let [time, target, channel, axis, value, ..] = fields else {
        return None;
    };
    Some(SampleRow {
        time_ms: parse_finite(time)?,
        target: (*target).to_string(),
        channel: channel.parse().ok()?,
        axis: axis.parse().ok()?,
        value: parse_finite(value)?,
    })
}

/// Parse delimited motion text into sample rows.
pub fn parse_rows(text: &str, cfg: &Config) -> ParsedRows {
    let mut out = ParsedRows::default();
    let comment = cfg.comment_prefix.as_str();
    let mut first_retained = true;

    // `lines()` also strips a trailing '\r'.
    for line in text.lines() {
        out.report.lines += 1;
        let line = line.trim();
        if line.is_empty() || (!comment.is_empty() && line.starts_with(comment)) {
            out.report.comments_or_blank += 1;
            continue;
        }

        let fields: Vec<&str> = line.split(cfg.delimiter).map(str::trim).collect();
        if first_retained {
            first_retained = false;
            if !is_numeric(fields[0]) {
                out.report.header_skipped = true;
                continue;
            }
        }

        match parse_row(&fields) {
            Some(row) => out.rows.push(row),
            None => out.report.dropped += 1,
        }
    }

    if out.report.dropped > 0 {
        log::debug!(
            "[motion] dropped {} malformed row(s) of {} line(s)",
            out.report.dropped,
            out.report.lines
        );
    }
    out
}
