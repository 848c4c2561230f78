//! Log Ingestor (component C3): turn one directory of log files into
//! per-sender QSO sets, filtered to the contest window.

use crate::config::RunConfig;
use crate::contest::ContestSpec;
use crate::diagnostics;
use crate::error::ScpError;
use crate::qso::QSO;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::sync::OnceLock;

static WHITESPACE: OnceLock<Regex> = OnceLock::new();

fn whitespace_re() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Tabs to spaces, whitespace runs squashed to one space, uppercased.
fn normalize_line(line: &str) -> String {
    let spaced = line.replace('\t', " ");
    whitespace_re()
        .replace_all(spaced.trim(), " ")
        .to_ascii_uppercase()
}

/// Result of ingesting one contest's log directory.
pub struct IngestResult {
    pub all_qsos: HashMap<String, Vec<QSO>>,
    pub entrants: HashSet<String>,
    pub n_valid_logs: usize,
}

/// Ingest every file in `contest.dir`, dropping QSOs outside the contest
/// window and assigning relative minutes to the ones kept. Fails if the
/// directory doesn't exist or yields zero valid logs.
pub fn ingest_directory(
    contest: &ContestSpec,
    config: &RunConfig,
) -> Result<IngestResult, ScpError> {
    if !contest.dir.is_dir() {
        return Err(ScpError::DirectoryNotFound(contest.dir.clone()));
    }

    let mut all_qsos: HashMap<String, Vec<QSO>> = HashMap::new();
    let mut entrants: HashSet<String> = HashSet::new();
    let mut n_valid_logs = 0usize;

    let entries = fs::read_dir(&contest.dir)
        .map_err(|_| ScpError::DirectoryNotFound(contest.dir.clone()))?;

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        let file_name = path.display().to_string();

        let mut file_qsos: HashMap<String, Vec<QSO>> = HashMap::new();

        for raw_line in content.lines() {
            let normalized = normalize_line(raw_line);
            if !normalized.starts_with("QSO:") {
                continue;
            }

            match QSO::parse_cabrillo_line(&normalized) {
                Some(mut qso) => {
                    if !contest.in_window(qso.time) {
                        continue;
                    }
                    qso.set_rel_mins(contest.rel_mins(qso.time));
                    file_qsos.entry(qso.tcall.clone()).or_default().push(qso);
                }
                None => diagnostics::bad_qso_line(config, &file_name, &normalized),
            }
        }

        if file_qsos.values().any(|v| !v.is_empty()) {
            n_valid_logs += 1;
        }

        for (tcall, qsos) in file_qsos {
            if qsos.len() >= config.tl_limit {
                entrants.insert(tcall.clone());
            }
            all_qsos.entry(tcall).or_default().extend(qsos);
        }
    }

    if n_valid_logs == 0 {
        return Err(ScpError::NoValidLogs(contest.dir.clone()));
    }

    for qsos in all_qsos.values_mut() {
        qsos.sort();
    }

    Ok(IngestResult {
        all_qsos,
        entrants,
        n_valid_logs,
    })
}
