//! Frequency Quality Classifier (component C4): partitions senders into
//! {good, none, poor} frequency-information classes.

use crate::qso::QSO;
use std::collections::{HashMap, HashSet};

/// Reciprocal cross-check time window, minutes.
pub const RUN_TIME_RANGE: i64 = 5;
/// Reciprocal cross-check frequency agreement window, kHz.
pub const FREQ_SKEW: u32 = 2;
/// Minimum good/total ratio to avoid being classified "poor".
pub const POOR_FREQ_THRESHOLD: f64 = 0.9;

/// Senders for which every logged QRG equals their band's default edge
/// frequency.
pub fn calls_with_no_freq_info(all_qsos: &HashMap<String, Vec<QSO>>) -> HashSet<String> {
    all_qsos
        .iter()
        .filter(|(_, qsos)| {
            !qsos.is_empty()
                && qsos
                    .iter()
                    .all(|q| q.band.default_edge_qrg() == Some(q.qrg))
        })
        .map(|(call, _)| call.clone())
        .collect()
}

fn qrg_diff(a: u32, b: u32) -> u32 {
    a.abs_diff(b)
}

fn find_reciprocal<'a>(
    b_log: &'a [QSO],
    a_call: &str,
    band: crate::qso::Band,
    t_a: i64,
) -> Option<&'a QSO> {
    b_log.iter().find(|q| {
        q.rcall == a_call && q.band == band && (q.time - t_a).abs() < RUN_TIME_RANGE * 60
    })
}

/// Senders whose cross-checked frequency agreement with peers falls below
/// `POOR_FREQ_THRESHOLD`.
pub fn calls_with_poor_freq_info(
    all_qsos: &HashMap<String, Vec<QSO>>,
    entrants: &HashSet<String>,
    no_freq: &HashSet<String>,
) -> HashSet<String> {
    let mut poor = HashSet::new();

    for a_call in entrants {
        if no_freq.contains(a_call) {
            continue;
        }
        let Some(a_log) = all_qsos.get(a_call) else {
            continue;
        };

        let mut good = 0u32;
        let mut total = 0u32;

        for qa in a_log {
            let b_call = &qa.rcall;
            if !entrants.contains(b_call) || no_freq.contains(b_call) {
                continue;
            }
            let Some(b_log) = all_qsos.get(b_call) else {
                continue;
            };
            if let Some(qb) = find_reciprocal(b_log, a_call, qa.band, qa.time) {
                total += 1;
                if qrg_diff(qa.qrg, qb.qrg) < FREQ_SKEW {
                    good += 1;
                }
            }
        }

        if total > 0 && (good as f64) / (total as f64) < POOR_FREQ_THRESHOLD {
            poor.insert(a_call.clone());
        }
    }

    poor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qso::QSO;

    fn q(tcall: &str, rcall: &str, qrg: u32, time: i64) -> QSO {
        QSO::parse_cabrillo_line(&format!(
            "QSO: {} CW 2023-10-01 1200 {} 599 001 {} 599 001 0",
            qrg, tcall, rcall
        ))
        .map(|mut qso| {
            qso.time = time;
            qso
        })
        .unwrap()
    }

    #[test]
    fn detects_no_freq_sender() {
        let mut all = HashMap::new();
        all.insert(
            "W1AW".to_string(),
            vec![q("W1AW", "K1ABC", 14000, 0), q("W1AW", "K1XYZ", 14000, 60)],
        );
        let no_freq = calls_with_no_freq_info(&all);
        assert!(no_freq.contains("W1AW"));
    }

    #[test]
    fn good_frequency_agreement_is_not_poor() {
        let mut all = HashMap::new();
        all.insert("A".to_string(), vec![q("A", "B", 14050, 0)]);
        all.insert("B".to_string(), vec![q("B", "A", 14050, 30)]);
        let entrants: HashSet<String> = ["A".to_string(), "B".to_string()].into_iter().collect();
        let no_freq = HashSet::new();
        let poor = calls_with_poor_freq_info(&all, &entrants, &no_freq);
        assert!(poor.is_empty());
    }

    #[test]
    fn frequency_skew_marks_poor() {
        let mut all = HashMap::new();
        all.insert("A".to_string(), vec![q("A", "B", 14050, 0)]);
        all.insert("B".to_string(), vec![q("B", "A", 14080, 30)]);
        let entrants: HashSet<String> = ["A".to_string(), "B".to_string()].into_iter().collect();
        let no_freq = HashSet::new();
        let poor = calls_with_poor_freq_info(&all, &entrants, &no_freq);
        assert!(poor.contains("A"));
    }
}
