//! Band Pruner (component C6): per-band bust detection and run-detection.
//! Passes A through D run in order on a single working copy of QSOs.

use crate::callsign::{is_bust, possible_busts};
use crate::config::RunConfig;
use crate::diagnostics;
use crate::freq::{FREQ_SKEW, RUN_TIME_RANGE};
use crate::qso::QSO;
use crate::timeindex::{get_bounds, TimeIndex};
use std::collections::{HashMap, HashSet};

/// Symmetric bust cross-check time window, minutes.
pub const CLOCK_SKEW: i64 = 2;

fn freq_match(
    q1: &QSO,
    q2: &QSO,
    lenient: bool,
    no_freq: &HashSet<String>,
    poor_freq: &HashSet<String>,
) -> bool {
    let diff = q1.qrg.abs_diff(q2.qrg);
    if lenient {
        let weak = |call: &str| no_freq.contains(call) || poor_freq.contains(call);
        weak(&q1.tcall) || weak(&q2.tcall) || diff <= FREQ_SKEW
    } else {
        !no_freq.contains(&q1.tcall) && !no_freq.contains(&q2.tcall) && diff <= FREQ_SKEW
    }
}

fn flatten_sorted(by_tcall: &HashMap<String, Vec<QSO>>) -> Vec<QSO> {
    let mut out: Vec<QSO> = by_tcall.values().flatten().cloned().collect();
    out.sort();
    out
}

fn compact(qsos: Vec<QSO>, marked: &HashSet<u64>) -> Vec<QSO> {
    qsos.into_iter().filter(|q| !marked.contains(&q.id)).collect()
}

/// Prune one band's QSOs. `pruned_by_tcall` is this band's working copy
/// (already restricted to this band); `all_by_tcall` is this band's
/// read-only complete set. Returns the validated received callsigns.
pub fn prune_band(
    pruned_by_tcall: &HashMap<String, Vec<QSO>>,
    all_by_tcall: &HashMap<String, Vec<QSO>>,
    entrants: &HashSet<String>,
    no_freq: &HashSet<String>,
    poor_freq: &HashSet<String>,
    max_rel_mins: i64,
    config: &RunConfig,
) -> HashSet<String> {
    let mut p = flatten_sorted(pruned_by_tcall);
    let a = flatten_sorted(all_by_tcall);

    if p.is_empty() || a.is_empty() {
        return HashSet::new();
    }

    p = pass_a_symmetric_bust(p, &a, max_rel_mins, no_freq, poor_freq, config);
    p = pass_b_running_station_bust(p, all_by_tcall, entrants, no_freq, poor_freq, config);
    p = pass_c_non_entrant_runner_bust(p, no_freq, poor_freq, max_rel_mins, config);
    p = pass_d_cutoff(p, config);

    p.into_iter().map(|q| q.rcall).collect()
}

/// Pass A — symmetric bust between two entrant logs.
fn pass_a_symmetric_bust(
    p: Vec<QSO>,
    a: &[QSO],
    max_rel_mins: i64,
    no_freq: &HashSet<String>,
    poor_freq: &HashSet<String>,
    config: &RunConfig,
) -> Vec<QSO> {
    let p_index = TimeIndex::build(&p, max_rel_mins);
    let mut marked: HashSet<u64> = HashSet::new();

    for m in 0..=max_rel_mins {
        let bounds = get_bounds(m, 0, max_rel_mins, CLOCK_SKEW, a);
        for rq in &p[p_index.minute_range(m)] {
            for tq in &a[bounds.clone()] {
                if !freq_match(tq, rq, true, no_freq, poor_freq) {
                    continue;
                }
                let reverse_recorded_correctly = is_bust(&tq.tcall, &rq.rcall) && tq.rcall == rq.tcall;
                let both_busted = is_bust(&rq.tcall, &tq.rcall) && is_bust(&tq.tcall, &rq.rcall);
                if reverse_recorded_correctly || both_busted {
                    marked.insert(rq.id);
                    diagnostics::trace_call(config, &rq.rcall, "A", "marked");
                    break;
                }
            }
        }
    }

    compact(p, &marked)
}

fn is_stn_running(
    call: &str,
    t: i64,
    f: u32,
    ignore_call: &str,
    all_by_tcall: &HashMap<String, Vec<QSO>>,
    entrants: &HashSet<String>,
    no_freq: &HashSet<String>,
    poor_freq: &HashSet<String>,
) -> bool {
    if !entrants.contains(call) {
        return false;
    }

    let has_good_freq_info = !no_freq.contains(call) && !poor_freq.contains(call);
    if has_good_freq_info {
        let Some(own_log) = all_by_tcall.get(call) else {
            return false;
        };
        own_log
            .iter()
            .any(|q| (q.rel_mins.unwrap() - t).abs() <= CLOCK_SKEW && q.qrg.abs_diff(f) <= FREQ_SKEW)
    } else {
        all_by_tcall.iter().any(|(other_tcall, log)| {
            other_tcall != ignore_call
                && entrants.contains(other_tcall)
                && log.iter().any(|q| {
                    q.rcall == call
                        && (q.rel_mins.unwrap() - t).abs() <= CLOCK_SKEW
                        && q.qrg.abs_diff(f) <= FREQ_SKEW
                })
        })
    }
}

/// Pass B — bust of a running station.
fn pass_b_running_station_bust(
    p: Vec<QSO>,
    all_by_tcall: &HashMap<String, Vec<QSO>>,
    entrants: &HashSet<String>,
    no_freq: &HashSet<String>,
    poor_freq: &HashSet<String>,
    config: &RunConfig,
) -> Vec<QSO> {
    let mut marked: HashSet<u64> = HashSet::new();

    for rq in &p {
        for t in entrants {
            if is_bust(t, &rq.rcall)
                && is_stn_running(
                    t,
                    rq.rel_mins.unwrap(),
                    rq.qrg,
                    &rq.tcall,
                    all_by_tcall,
                    entrants,
                    no_freq,
                    poor_freq,
                )
            {
                marked.insert(rq.id);
                diagnostics::trace_call(config, &rq.rcall, "B", "marked");
                break;
            }
        }
    }

    compact(p, &marked)
}

/// Pass C — bust of a non-entrant runner.
fn pass_c_non_entrant_runner_bust(
    p: Vec<QSO>,
    no_freq: &HashSet<String>,
    poor_freq: &HashSet<String>,
    max_rel_mins: i64,
    config: &RunConfig,
) -> Vec<QSO> {
    let mut by_rcall: HashMap<String, Vec<QSO>> = HashMap::new();
    for q in &p {
        by_rcall.entry(q.rcall.clone()).or_default().push(q.clone());
    }
    for log in by_rcall.values_mut() {
        log.sort();
    }

    let rcalls: Vec<String> = by_rcall.keys().cloned().collect();
    let busts = possible_busts(&rcalls);

    let mut counts: Vec<(String, usize)> = by_rcall.iter().map(|(k, v)| (k.clone(), v.len())).collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut marked: HashSet<u64> = HashSet::new();

    for (rcall, _) in counts {
        let mut combined: Vec<QSO> = by_rcall[&rcall].clone();
        if let Some(bust_calls) = busts.get(&rcall) {
            for bust in bust_calls {
                if let Some(log) = by_rcall.get(bust) {
                    combined.extend(log.iter().cloned());
                }
            }
        }
        combined.sort();
        let combined_index = TimeIndex::build(&combined, max_rel_mins);

        for rq in &by_rcall[&rcall] {
            let t = rq.rel_mins.unwrap();
            let window = combined_index.window_range(t - RUN_TIME_RANGE, t + RUN_TIME_RANGE);
            for qso in &combined[window] {
                if qso.rcall != rcall && freq_match(qso, rq, false, no_freq, poor_freq) {
                    marked.insert(rq.id);
                    diagnostics::trace_call(config, &rq.rcall, "C", "marked");
                    break;
                }
            }
        }
    }

    compact(p, &marked)
}

/// Pass D — cutoff. The histogram counts the number of distinct logs
/// (tcalls) that heard each rcall, not raw surviving QSOs: a call heard
/// twice by the same log is still one log's worth of corroboration
/// (spec §8 scenario 4).
fn pass_d_cutoff(p: Vec<QSO>, config: &RunConfig) -> Vec<QSO> {
    let mut heard_by: HashMap<&str, HashSet<&str>> = HashMap::new();
    for q in &p {
        heard_by.entry(q.rcall.as_str()).or_default().insert(q.tcall.as_str());
    }

    p.into_iter()
        .filter(|q| heard_by[q.rcall.as_str()].len() > config.cutoff_limit as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qso(tcall: &str, rcall: &str, qrg: u32, rel_mins: i64) -> QSO {
        let mut q = QSO::parse_cabrillo_line(&format!(
            "QSO: {} CW 2023-10-01 1200 {} 599 001 {} 599 001 0",
            qrg, tcall, rcall
        ))
        .unwrap();
        q.set_rel_mins(rel_mins);
        q
    }

    fn by_tcall(qsos: Vec<QSO>) -> HashMap<String, Vec<QSO>> {
        let mut map: HashMap<String, Vec<QSO>> = HashMap::new();
        for q in qsos {
            map.entry(q.tcall.clone()).or_default().push(q);
        }
        map
    }

    #[test]
    fn cutoff_counts_distinct_logs_not_raw_qso_occurrences() {
        // Heard twice, but by only one log: one log's worth of
        // corroboration does not clear cutoff_limit(1).
        let one_log_twice = vec![
            qso("A", "KX9XYZ", 14050, 0),
            qso("A", "KX9XYZ", 14050, 5),
        ];
        let config = RunConfig::default();
        let result = pass_d_cutoff(one_log_twice, &config);
        assert!(result.is_empty());

        // Heard once each by two distinct logs: clears cutoff_limit(1).
        let two_logs = vec![
            qso("A", "KX9XYZ", 14050, 0),
            qso("B", "KX9XYZ", 14050, 5),
        ];
        let result_two = pass_d_cutoff(two_logs, &config);
        assert_eq!(result_two.len(), 2);
    }

    #[test]
    fn run_bust_is_removed_in_pass_b() {
        // A5A runs on 14050 at minute 10 (own log).
        let mut all_by_tcall = HashMap::new();
        all_by_tcall.insert("A5A".to_string(), vec![qso("A5A", "B", 14050, 10)]);

        let entrants: HashSet<String> = ["A5A".to_string()].into_iter().collect();
        let no_freq = HashSet::new();
        let poor_freq = HashSet::new();

        // Log C records a bust: A5B instead of A5A, at the same time/freq.
        let rq = qso("C", "A5B", 14050, 10);

        assert!(is_bust("A5A", "A5B"));
        assert!(is_stn_running(
            "A5A",
            10,
            14050,
            "C",
            &all_by_tcall,
            &entrants,
            &no_freq,
            &poor_freq
        ));

        let p = vec![rq];
        let result = pass_b_running_station_bust(p, &all_by_tcall, &entrants, &no_freq, &poor_freq, &RunConfig::default());
        assert!(result.is_empty());
    }

    #[test]
    fn prune_band_returns_empty_on_empty_input() {
        let config = RunConfig::default();
        let entrants = HashSet::new();
        let no_freq = HashSet::new();
        let poor_freq = HashSet::new();
        let result = prune_band(
            &HashMap::new(),
            &HashMap::new(),
            &entrants,
            &no_freq,
            &poor_freq,
            100,
            &config,
        );
        assert!(result.is_empty());
    }

    #[test]
    fn prune_band_survives_legitimate_traffic() {
        // K1ABC and W1AW each need a second, distinct corroborating log to
        // clear the default cutoff (1): a call heard by only one other
        // log, however many times, doesn't survive pass D.
        let qsos = vec![
            qso("W1AW", "K1ABC", 14050, 0),
            qso("W1AW", "K1ABC", 14050, 5),
            qso("K1ABC", "W1AW", 14050, 0),
            qso("K1ABC", "W1AW", 14050, 5),
            qso("N1XYZ", "K1ABC", 14050, 10),
            qso("N1XYZ", "W1AW", 14050, 10),
        ];
        let all = by_tcall(qsos.clone());
        let entrants: HashSet<String> = ["W1AW".to_string(), "K1ABC".to_string(), "N1XYZ".to_string()]
            .into_iter()
            .collect();
        let config = RunConfig::default();
        let result = prune_band(&all, &all, &entrants, &HashSet::new(), &HashSet::new(), 60, &config);
        assert!(result.contains("K1ABC"));
        assert!(result.contains("W1AW"));
    }
}
