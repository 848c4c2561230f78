//! Contest parameters (spec §3) and the `-dir`/`@file` grammar of §6.

use crate::error::ScpError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fs;
use std::path::{Path, PathBuf};

/// One contest's directory, start time, and duration, plus the derived
/// half-open acceptance window.
#[derive(Debug, Clone)]
pub struct ContestSpec {
    pub dir: PathBuf,
    pub start: i64,
    pub hours: u32,
}

impl ContestSpec {
    /// Exclusive end of the contest window: `t_start + hours * 3600`.
    pub fn end(&self) -> i64 {
        self.start + i64::from(self.hours) * 3600
    }

    /// `true` iff `t` falls in `[t_start, t_start + hours*3600)`.
    pub fn in_window(&self, t: i64) -> bool {
        t >= self.start && t < self.end()
    }

    /// Minutes elapsed since contest start for an in-window timestamp.
    pub fn rel_mins(&self, t: i64) -> i64 {
        (t - self.start) / 60
    }

    /// `hours * 60 - 1`, the largest legal relative minute.
    pub fn max_rel_mins(&self) -> i64 {
        i64::from(self.hours) * 60 - 1
    }
}

/// Parse `-start <YYYY-MM-DD[THH[:MM[:SS]]]>` into a UTC epoch-seconds
/// timestamp. Missing time components default to zero.
pub fn parse_start_timestamp(s: &str) -> Result<i64, ScpError> {
    let (date_part, time_part) = match s.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (s, None),
    };

    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| ScpError::BadStartTimestamp(s.to_string()))?;

    let time = match time_part {
        None => NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        Some(t) => {
            let candidates = ["%H:%M:%S", "%H:%M", "%H"];
            candidates
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(t, fmt).ok())
                .ok_or_else(|| ScpError::BadStartTimestamp(s.to_string()))?
        }
    };

    let naive = NaiveDateTime::new(date, time);
    Ok(naive.and_utc().timestamp())
}

/// Resolve the `-dir`/`-start`/`-hrs` flags (spec §6) into the list of
/// contests to process. `-dir @path` names a list file; otherwise `-dir`
/// is a single directory and `-start`/`-hrs` are required.
pub fn resolve_contests(
    dir_arg: &str,
    start: Option<&str>,
    hrs: Option<u32>,
) -> Result<Vec<ContestSpec>, ScpError> {
    if let Some(list_path) = dir_arg.strip_prefix('@') {
        return resolve_contest_list(Path::new(list_path), start, hrs);
    }

    let start = start.ok_or(ScpError::MissingStartOrHours)?;
    let hours = hrs.ok_or(ScpError::MissingStartOrHours)?;
    let start_ts = parse_start_timestamp(start)?;
    Ok(vec![ContestSpec {
        dir: PathBuf::from(dir_arg),
        start: start_ts,
        hours,
    }])
}

fn resolve_contest_list(
    list_path: &Path,
    default_start: Option<&str>,
    default_hrs: Option<u32>,
) -> Result<Vec<ContestSpec>, ScpError> {
    let text = fs::read_to_string(list_path)
        .map_err(|_| ScpError::ContestListUnreadable(list_path.to_path_buf()))?;

    let mut specs = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.len() {
            1 => {
                let start = default_start.ok_or(ScpError::MissingStartOrHours)?;
                let hours = default_hrs.ok_or(ScpError::MissingStartOrHours)?;
                specs.push(ContestSpec {
                    dir: PathBuf::from(fields[0]),
                    start: parse_start_timestamp(start)?,
                    hours,
                });
            }
            3 => {
                let hours: u32 = fields[2]
                    .parse()
                    .map_err(|_| ScpError::BadContestListLine(line.to_string()))?;
                specs.push(ContestSpec {
                    dir: PathBuf::from(fields[0]),
                    start: parse_start_timestamp(fields[1])?,
                    hours,
                });
            }
            _ => return Err(ScpError::BadContestListLine(line.to_string())),
        }
    }

    Ok(specs)
}
