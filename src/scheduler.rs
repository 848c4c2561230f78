//! Contest Scheduler (component C8): runs a list of contests' Directory
//! Pipelines up to a configured parallelism bound, merging their
//! call -> count maps.
//!
//! The original tool polled a sleep loop to find a free pipeline slot;
//! design note §9 explicitly steers away from that. This scheduler instead
//! uses a bounded worker pool fed by a job queue (`crossbeam_channel`),
//! the same fan-out-and-join shape `shred-ingest::fan_in` uses for its
//! transaction sources — readiness is event-driven, not timed.

use crate::config::RunConfig;
use crate::contest::ContestSpec;
use crate::diagnostics;
use crate::error::ScpError;
use crate::pipeline;
use std::collections::HashMap;
use std::thread;

/// Run every contest in `specs`, at most `config.parallel` Directory
/// Pipelines concurrently, and merge their call -> count maps by summing
/// counts per key. Fails on the first contest that fails.
pub fn run_contests(
    specs: &[ContestSpec],
    config: &RunConfig,
) -> Result<HashMap<String, u64>, ScpError> {
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<ContestSpec>();
    for spec in specs {
        job_tx.send(spec.clone()).expect("job queue receiver dropped early");
    }
    drop(job_tx);

    let (result_tx, result_rx) =
        crossbeam_channel::unbounded::<Result<HashMap<String, u64>, ScpError>>();

    let n_workers = config.parallel.max(1).min(specs.len().max(1));

    thread::scope(|scope| {
        for worker in 0..n_workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            thread::Builder::new()
                .name(format!("scp-pipeline-{}", worker))
                .spawn_scoped(scope, move || {
                    while let Ok(spec) = job_rx.recv() {
                        let result = pipeline::run_pipeline(&spec, config);
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                })
                .expect("failed to spawn pipeline worker thread");
        }
        drop(result_tx);
    });

    let mut merged: HashMap<String, u64> = HashMap::new();
    for result in result_rx.try_iter() {
        let counts = result?;
        for (call, count) in counts {
            *merged.entry(call).or_insert(0) += count;
        }
    }

    diagnostics::progress(
        config,
        &format!("merged {} contest(s) into {} calls", specs.len(), merged.len()),
    );

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_log(dir: &std::path::Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn merges_counts_across_contests() {
        let tmp1 = tempfile::tempdir().unwrap();
        write_log(
            tmp1.path(),
            "a.log",
            "QSO: 14050 CW 2023-10-01 1200 W1AW 599 001 K1ABC 599 001 0\n\
             QSO: 14050 CW 2023-10-01 1205 W1AW 599 001 K1ABC 599 001 0\n",
        );
        write_log(
            tmp1.path(),
            "b.log",
            "QSO: 14050 CW 2023-10-01 1200 K1ABC 599 001 W1AW 599 001 0\n\
             QSO: 14050 CW 2023-10-01 1205 K1ABC 599 001 W1AW 599 001 0\n",
        );

        let tmp2 = tempfile::tempdir().unwrap();
        write_log(
            tmp2.path(),
            "a.log",
            "QSO: 14050 CW 2023-11-01 1200 W1AW 599 001 K1ABC 599 001 0\n",
        );
        write_log(
            tmp2.path(),
            "b.log",
            "QSO: 14050 CW 2023-11-01 1200 K1ABC 599 001 W1AW 599 001 0\n",
        );

        let specs = vec![
            ContestSpec {
                dir: tmp1.path().to_path_buf(),
                start: crate::contest::parse_start_timestamp("2023-10-01").unwrap(),
                hours: 24,
            },
            ContestSpec {
                dir: tmp2.path().to_path_buf(),
                start: crate::contest::parse_start_timestamp("2023-11-01").unwrap(),
                hours: 24,
            },
        ];

        let mut config = RunConfig::default();
        config.parallel = 2;
        let merged = run_contests(&specs, &config).unwrap();
        assert_eq!(merged.get("W1AW"), Some(&3));
        assert_eq!(merged.get("K1ABC"), Some(&3));
    }

    #[test]
    fn fails_when_any_contest_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let specs = vec![ContestSpec {
            dir: tmp.path().to_path_buf(),
            start: 0,
            hours: 24,
        }];
        let config = RunConfig::default();
        assert!(run_contests(&specs, &config).is_err());
    }
}
