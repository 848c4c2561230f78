//! The QSO record: an immutable, once-parsed logged contact (component C2).
//!
//! Construction is the only place a `QSO` can come from; callers never build
//! one field-by-field. `QSO::parse_cabrillo_line` returns `None` for anything
//! that fails validation, matching the "sentinel empty QSO the ingestor
//! discards" behavior from the QSO line spec without needing a sentinel type.

use chrono::{NaiveDate, NaiveTime};
use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed)
}

/// Amateur radio HF contest band, derived from a QSO's frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    B160,
    B80,
    B40,
    B20,
    B15,
    B10,
    Bad,
}

impl Band {
    /// All bands a Directory Pipeline ever fans a Band Pruner out over.
    pub const ALL: [Band; 6] = [
        Band::B160,
        Band::B80,
        Band::B40,
        Band::B20,
        Band::B15,
        Band::B10,
    ];

    /// kHz range table from spec §4.2. Inclusive on both ends, matching the
    /// "band edge" boundary-case requirement (e.g. 7300 stays on 40m).
    pub fn from_qrg(qrg: u32) -> Band {
        match qrg {
            1800..=2000 => Band::B160,
            3500..=4000 => Band::B80,
            7000..=7300 => Band::B40,
            14000..=14350 => Band::B20,
            21000..=21450 => Band::B15,
            28000..=29700 => Band::B10,
            _ => Band::Bad,
        }
    }

    /// The default band-edge frequency used by the no-frequency-info test.
    pub fn default_edge_qrg(self) -> Option<u32> {
        match self {
            Band::B160 => Some(1800),
            Band::B80 => Some(3500),
            Band::B40 => Some(7000),
            Band::B20 => Some(14000),
            Band::B15 => Some(21000),
            Band::B10 => Some(28000),
            Band::Bad => None,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Band::B160 => "160",
            Band::B80 => "80",
            Band::B40 => "40",
            Band::B20 => "20",
            Band::B15 => "15",
            Band::B10 => "10",
            Band::Bad => "BAD",
        };
        write!(f, "{}", s)
    }
}

/// One logged contact. Immutable after construction, except that
/// `rel_mins` is assigned exactly once, when the QSO is accepted into a
/// contest window (see `ingest.rs`).
#[derive(Debug, Clone)]
pub struct QSO {
    pub id: u64,
    pub tcall: String,
    pub rcall: String,
    pub band: Band,
    pub qrg: u32,
    pub time: i64,
    pub rel_mins: Option<i64>,
}

impl PartialEq for QSO {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for QSO {}

impl PartialOrd for QSO {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A QSO sorts by time, then by id (spec §3).
impl Ord for QSO {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time).then(self.id.cmp(&other.id))
    }
}

/// Trailing suffixes stripped from both tcall and rcall before validation.
const STRIPPED_SUFFIXES: [&str; 2] = ["/QRP", "/QRPP"];

/// Strict callsign alphabet/shape check from spec §3: only {A-Z,0-9,/},
/// length >= 3, at least one letter and one digit.
pub fn is_valid_callsign(call: &str) -> bool {
    if call.len() < 3 {
        return false;
    }
    if !call
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '/')
    {
        return false;
    }
    let has_letter = call.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = call.chars().any(|c| c.is_ascii_digit());
    has_letter && has_digit
}

fn normalize_call(raw: &str) -> String {
    let upper = raw.to_ascii_uppercase();
    for suffix in STRIPPED_SUFFIXES {
        if let Some(stripped) = upper.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    upper
}

impl QSO {
    /// Parse one whitespace-squashed, already-uppercased Cabrillo `QSO:`
    /// line. Returns `None` if the line is short, the frequency doesn't
    /// parse or falls outside every contest band, the date/time doesn't
    /// parse, or either callsign fails validation (including the
    /// `tcall != rcall` self-QSO rule).
    pub fn parse_cabrillo_line(line: &str) -> Option<QSO> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 9 {
            return None;
        }

        let qrg: u32 = parts[1].parse().ok()?;
        let band = Band::from_qrg(qrg);
        if band == Band::Bad {
            return None;
        }
        let date = NaiveDate::parse_from_str(parts[3], "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(parts[4], "%H%M").ok()?;
        let tcall = normalize_call(parts[5]);
        let rcall = normalize_call(parts[8]);

        if !is_valid_callsign(&tcall) || !is_valid_callsign(&rcall) || tcall == rcall {
            return None;
        }

        let naive = date.and_time(time);
        let epoch_secs = naive.and_utc().timestamp();

        Some(QSO {
            id: next_id(),
            tcall,
            rcall,
            band,
            qrg,
            time: epoch_secs,
            rel_mins: None,
        })
    }

    /// One-time assignment of minutes relative to the owning contest's
    /// start. Never called twice on the same QSO in this codebase.
    pub fn set_rel_mins(&mut self, rel_mins: i64) {
        self.rel_mins = Some(rel_mins);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(qrg: &str, date: &str, time: &str, tcall: &str, rcall: &str) -> String {
        format!(
            "QSO: {} CW {} {} {} 599 001 {} 599 001 0",
            qrg, date, time, tcall, rcall
        )
    }

    #[test]
    fn parses_a_valid_line() {
        let l = line("14050", "2023-10-01", "1200", "W1AW", "K1ABC");
        let qso = QSO::parse_cabrillo_line(&l).unwrap();
        assert_eq!(qso.tcall, "W1AW");
        assert_eq!(qso.rcall, "K1ABC");
        assert_eq!(qso.qrg, 14050);
        assert!(matches!(qso.band, Band::B20));
    }

    #[test]
    fn rejects_short_line() {
        assert!(QSO::parse_cabrillo_line("QSO: 14050 CW").is_none());
    }

    #[test]
    fn rejects_self_qso() {
        let l = line("14050", "2023-10-01", "1200", "W1AW", "W1AW");
        assert!(QSO::parse_cabrillo_line(&l).is_none());
    }

    #[test]
    fn strips_qrp_suffix() {
        let l = line("14050", "2023-10-01", "1200", "W1AW/QRP", "K1ABC");
        let qso = QSO::parse_cabrillo_line(&l).unwrap();
        assert_eq!(qso.tcall, "W1AW");
    }

    #[test]
    fn band_edge_is_inclusive() {
        assert!(matches!(Band::from_qrg(7300), Band::B40));
        assert!(matches!(Band::from_qrg(7301), Band::Bad));
    }

    #[test]
    fn rejects_out_of_band_frequency() {
        let l = line("5000", "2023-10-01", "1200", "W1AW", "K1ABC");
        assert!(QSO::parse_cabrillo_line(&l).is_none());
    }

    #[test]
    fn callsign_validation() {
        assert!(is_valid_callsign("W1AW"));
        assert!(is_valid_callsign("VE3/KA5WSS"));
        assert!(!is_valid_callsign("NOCALL")); // no digit
        assert!(!is_valid_callsign("12"));
    }

    #[test]
    fn qso_sorts_by_time_then_id() {
        let mut a = QSO::parse_cabrillo_line(&line("14050", "2023-10-01", "1200", "W1AW", "K1ABC"))
            .unwrap();
        let mut b = QSO::parse_cabrillo_line(&line("14050", "2023-10-01", "1200", "W1AW", "K1XYZ"))
            .unwrap();
        a.id = 5;
        b.id = 6;
        assert!(a < b);
    }
}
