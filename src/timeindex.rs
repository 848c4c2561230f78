//! Time-Indexed QSO View (component C5): O(log N) lookup by minute over a
//! chronological QSO sequence.

use crate::qso::QSO;
use std::ops::Range;

/// Precomputed per-minute index into a chronological `&[QSO]` slice.
/// `index[k]` is the position of the first QSO with `rel_mins >= k`;
/// `index[max_rel_mins + 1]` is the slice length (the end sentinel).
pub struct TimeIndex {
    index: Vec<usize>,
    max_rel_mins: i64,
}

impl TimeIndex {
    /// Build the index. `qsos` must already be sorted by `rel_mins`
    /// ascending (true whenever sorted by time, since `rel_mins` is a
    /// monotonic function of time within one contest).
    pub fn build(qsos: &[QSO], max_rel_mins: i64) -> TimeIndex {
        let mut index = Vec::with_capacity((max_rel_mins + 2).max(0) as usize);
        for k in 0..=(max_rel_mins + 1) {
            let pos = qsos.partition_point(|q| q.rel_mins.expect("rel_mins not set") < k);
            index.push(pos);
        }
        TimeIndex { index, max_rel_mins }
    }

    /// Half-open slice-index range of QSOs whose relative minute equals
    /// `minute`.
    pub fn minute_range(&self, minute: i64) -> Range<usize> {
        let lo = self.index[minute as usize];
        let hi = self.index[(minute + 1) as usize];
        lo..hi
    }

    /// Half-open slice-index range of QSOs whose relative minute falls in
    /// the inclusive window `[lo_min, hi_min]`, composed from `minute_range`
    /// per spec §4.5 ("by composition the range for any window of
    /// minutes"). Out-of-contest bounds are clamped to `[0, max_rel_mins]`.
    pub fn window_range(&self, lo_min: i64, hi_min: i64) -> Range<usize> {
        let lo_min = lo_min.clamp(0, self.max_rel_mins);
        let hi_min = hi_min.clamp(0, self.max_rel_mins);
        let lo = self.index[lo_min as usize];
        let hi = self.index[(hi_min + 1) as usize];
        lo..hi
    }
}

/// Binary-search helper: the half-open slice-index range of QSOs whose
/// relative minute lies in `[max(t - skew, t_min), min(t + skew, t_max)]`.
pub fn get_bounds(t: i64, t_min: i64, t_max: i64, skew: i64, qsos: &[QSO]) -> Range<usize> {
    let lo = (t - skew).max(t_min);
    let hi = (t + skew).min(t_max);
    if lo > hi {
        return 0..0;
    }
    let lo_idx = qsos.partition_point(|q| q.rel_mins.expect("rel_mins not set") < lo);
    let hi_idx = qsos.partition_point(|q| q.rel_mins.expect("rel_mins not set") <= hi);
    lo_idx..hi_idx
}
