//! Directory Pipeline (component C7): orchestrates one contest's
//! ingest -> frequency classification -> per-band pruner fan-out.

use crate::config::RunConfig;
use crate::contest::ContestSpec;
use crate::diagnostics;
use crate::error::ScpError;
use crate::freq;
use crate::ingest;
use crate::pruner;
use crate::qso::{Band, QSO};
use std::collections::{HashMap, HashSet};
use std::thread;

/// Restrict a per-sender QSO map to one band, dropping senders left empty.
fn project_band(by_tcall: &HashMap<String, Vec<QSO>>, band: Band) -> HashMap<String, Vec<QSO>> {
    by_tcall
        .iter()
        .filter_map(|(tcall, qsos)| {
            let on_band: Vec<QSO> = qsos.iter().filter(|q| q.band == band).cloned().collect();
            if on_band.is_empty() {
                None
            } else {
                Some((tcall.clone(), on_band))
            }
        })
        .collect()
}

/// Run one Directory Pipeline to completion, returning the call -> count
/// appearance map for this contest.
pub fn run_pipeline(
    contest: &ContestSpec,
    config: &RunConfig,
) -> Result<HashMap<String, u64>, ScpError> {
    // (a) ingest
    let ingest::IngestResult {
        all_qsos,
        entrants,
        n_valid_logs,
    } = ingest::ingest_directory(contest, config)?;

    diagnostics::progress(
        config,
        &format!(
            "{}: {} valid logs, {} entrants",
            contest.dir.display(),
            n_valid_logs,
            entrants.len()
        ),
    );

    // (b) all_qsos is already sorted chronologically per sender by ingest.

    // (c) seed pruned_qsos, crediting direct entrant-to-entrant contacts
    let mut output: HashMap<String, u64> = HashMap::new();
    let mut pruned_qsos: HashMap<String, Vec<QSO>> = HashMap::new();

    for (tcall, qsos) in &all_qsos {
        let mut kept = Vec::new();
        for q in qsos {
            if entrants.contains(&q.rcall) {
                *output.entry(q.rcall.clone()).or_insert(0) += 1;
            } else {
                kept.push(q.clone());
            }
        }
        if !kept.is_empty() {
            pruned_qsos.insert(tcall.clone(), kept);
        }
    }
    // (d) senders left with an empty pruned list are already absent above.

    // (e) frequency quality classification
    let no_freq = freq::calls_with_no_freq_info(&all_qsos);
    let poor_freq = freq::calls_with_poor_freq_info(&all_qsos, &entrants, &no_freq);

    let max_rel_mins = contest.max_rel_mins();

    // (f) + (g) per-band fan-out
    let mut returned_calls: HashSet<String> = HashSet::new();
    thread::scope(|scope| {
        let mut handles = Vec::new();
        for band in Band::ALL {
            let all_b = project_band(&all_qsos, band);
            let pruned_b = project_band(&pruned_qsos, band);
            if all_b.is_empty() || pruned_b.is_empty() {
                continue;
            }

            let entrants = &entrants;
            let no_freq = &no_freq;
            let poor_freq = &poor_freq;

            handles.push(scope.spawn(move || {
                pruner::prune_band(
                    &pruned_b,
                    &all_b,
                    entrants,
                    no_freq,
                    poor_freq,
                    max_rel_mins,
                    config,
                )
            }));
        }
        for handle in handles {
            returned_calls.extend(handle.join().expect("band pruner thread panicked"));
        }
    });

    // (h) done above via extend.

    // (i) credit every all_qsos QSO whose rcall was validated by a pruner
    for qsos in all_qsos.values() {
        for q in qsos {
            if returned_calls.contains(&q.rcall) {
                *output.entry(q.rcall.clone()).or_insert(0) += 1;
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_log(dir: &std::path::Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn pipeline_credits_entrant_to_entrant_contacts() {
        let tmp = tempfile::tempdir().unwrap();
        write_log(
            tmp.path(),
            "w1aw.log",
            "QSO: 14050 CW 2023-10-01 1200 W1AW 599 001 K1ABC 599 001 0\n\
             QSO: 14050 CW 2023-10-01 1205 W1AW 599 001 K1ABC 599 001 0\n",
        );
        write_log(
            tmp.path(),
            "k1abc.log",
            "QSO: 14050 CW 2023-10-01 1200 K1ABC 599 001 W1AW 599 001 0\n\
             QSO: 14050 CW 2023-10-01 1205 K1ABC 599 001 W1AW 599 001 0\n",
        );

        let contest = ContestSpec {
            dir: tmp.path().to_path_buf(),
            start: crate::contest::parse_start_timestamp("2023-10-01").unwrap(),
            hours: 24,
        };
        let config = RunConfig::default();
        let output = run_pipeline(&contest, &config).unwrap();
        assert_eq!(output.get("K1ABC"), Some(&2));
        assert_eq!(output.get("W1AW"), Some(&2));
    }
}
