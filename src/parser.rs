//! Ingestion of sheet exports into a validated [`TimelineData`].
//!
//! Input is JSON (or JSON5) holding lanes either as a bare array or under a
//! `lanes`/`sheets` key. Each lane has a `name` and either `events`
//! (`{start, end?, label}` objects) or `rows` (`[start, end, label]` cells as
//! exported from a spreadsheet, optionally preceded by a header row).

use crate::ir::{Event, Lane, TimelineData};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const MAX_LANES: usize = 5;

static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid leading integer pattern"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unsupported input format: {0}")]
    FileFormat(String),
    #[error("lane '{lane}' row {row}: missing start year or label")]
    MissingColumns { lane: String, row: usize },
    #[error("lane '{lane}' row {row}: invalid year '{value}'")]
    InvalidYear { lane: String, row: usize, value: String },
    #[error("too many lanes: found {found}, at most {max} are supported")]
    TooManyLanes { found: usize, max: usize },
    #[error("no valid data found in input")]
    NoData,
}

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Reject malformed rows and surplus lanes instead of skipping them.
    pub strict: bool,
    pub max_lanes: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_lanes: MAX_LANES,
        }
    }
}

pub fn parse_timeline(input: &str) -> Result<TimelineData, ParseError> {
    parse_timeline_with_options(input, ParseOptions::default())
}

pub fn parse_timeline_with_options(
    input: &str,
    options: ParseOptions,
) -> Result<TimelineData, ParseError> {
    let root: Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(_) => json5::from_str(input).map_err(|err| ParseError::FileFormat(err.to_string()))?,
    };

    let raw_lanes = match &root {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("lanes").or_else(|| map.get("sheets")) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => {
                return Err(ParseError::FileFormat(
                    "expected a `lanes` or `sheets` array".to_string(),
                ));
            }
        },
        _ => {
            return Err(ParseError::FileFormat(
                "expected an array of lanes".to_string(),
            ));
        }
    };

    if raw_lanes.len() > options.max_lanes {
        if options.strict {
            return Err(ParseError::TooManyLanes {
                found: raw_lanes.len(),
                max: options.max_lanes,
            });
        }
        warn!(
            found = raw_lanes.len(),
            max = options.max_lanes,
            "ignoring lanes beyond the supported maximum"
        );
    }

    let mut lanes = Vec::new();
    for (idx, raw) in raw_lanes.iter().take(options.max_lanes).enumerate() {
        let name = raw
            .get("name")
            .and_then(cell_text)
            .unwrap_or_else(|| format!("Sheet{}", idx + 1));
        let events = parse_lane_events(&name, raw, options)?;
        if events.is_empty() {
            debug!(lane = %name, "skipping lane without usable events");
            continue;
        }
        lanes.push(Lane::new(name, events));
    }

    if lanes.is_empty() {
        return Err(ParseError::NoData);
    }
    Ok(TimelineData::new(lanes))
}

fn parse_lane_events(name: &str, raw: &Value, options: ParseOptions) -> Result<Vec<Event>, ParseError> {
    if let Some(Value::Array(rows)) = raw.get("rows") {
        let skip_header = rows
            .first()
            .map(|first| row_cell(first, 0).and_then(parse_year).is_none())
            .unwrap_or(false);
        let cells = rows
            .iter()
            .enumerate()
            .skip(usize::from(skip_header))
            .map(|(row_idx, row)| (row_idx, (row_cell(row, 0), row_cell(row, 1), row_cell(row, 2))));
        return collect_events(name, cells, options);
    }

    if let Some(Value::Array(items)) = raw.get("events") {
        let cells = items
            .iter()
            .enumerate()
            .map(|(row_idx, item)| (row_idx, (item.get("start"), item.get("end"), item.get("label"))));
        return collect_events(name, cells, options);
    }

    Err(ParseError::FileFormat(format!(
        "lane '{name}' has neither `events` nor `rows`"
    )))
}

type RowCells<'a> = (Option<&'a Value>, Option<&'a Value>, Option<&'a Value>);

/// Builds the events of one lane. Rows missing a start or label are always
/// skipped; strict mode reports `MissingColumns` only when the lane had rows
/// and none of them were usable.
fn collect_events<'a>(
    lane: &str,
    rows: impl Iterator<Item = (usize, RowCells<'a>)>,
    options: ParseOptions,
) -> Result<Vec<Event>, ParseError> {
    let mut events = Vec::new();
    let mut first_incomplete = None;
    for (row_idx, cells) in rows {
        match build_event(lane, row_idx, cells, options)? {
            Some(event) => events.push(event),
            None => {
                first_incomplete.get_or_insert(row_idx);
            }
        }
    }
    if options.strict
        && events.is_empty()
        && let Some(row) = first_incomplete
    {
        return Err(ParseError::MissingColumns {
            lane: lane.to_string(),
            row,
        });
    }
    Ok(events)
}

fn row_cell(row: &Value, idx: usize) -> Option<&Value> {
    row.as_array().and_then(|cells| cells.get(idx))
}

fn build_event(
    lane: &str,
    row: usize,
    (start, end, label): RowCells<'_>,
    options: ParseOptions,
) -> Result<Option<Event>, ParseError> {
    let label = label.and_then(cell_text).filter(|text| !text.is_empty());
    let (Some(start_cell), Some(label)) = (start.filter(|v| !v.is_null()), label) else {
        debug!(lane, row, "skipping row with missing start or label");
        return Ok(None);
    };

    let Some(start) = parse_year(start_cell).filter(|year| *year > 0) else {
        if options.strict {
            return Err(ParseError::InvalidYear {
                lane: lane.to_string(),
                row,
                value: start_cell.to_string(),
            });
        }
        debug!(lane, row, value = %start_cell, "skipping row with invalid start year");
        return Ok(None);
    };

    let end = match end.filter(|v| !is_blank(v)) {
        None => None,
        Some(cell) => match parse_year(cell).filter(|year| *year >= start) {
            Some(year) => Some(year),
            None if options.strict => {
                return Err(ParseError::InvalidYear {
                    lane: lane.to_string(),
                    row,
                    value: cell.to_string(),
                });
            }
            None => {
                debug!(lane, row, value = %cell, "treating row with unusable end year as a point event");
                None
            }
        },
    };

    Ok(Some(Event {
        end,
        ..Event::point(start, label)
    }))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Integer coercion of a year cell: numbers truncate, strings use their
/// leading integer (`"2000年"` is 2000).
pub fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                i32::try_from(int).ok()
            } else {
                number
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .and_then(|f| i32::try_from(f.trunc() as i64).ok())
            }
        }
        Value::String(text) => LEADING_INT
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok()),
        _ => None,
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
