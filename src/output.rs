//! SCP/XSCP rendering: callsign ordering, `-xpc` top-percent truncation,
//! and the two line formats from spec §6.

use std::collections::HashMap;

/// Extract the digit run used as a callsign's "area" for ordering purposes
/// — the first contiguous run of digits in the call. Every call accepted
/// by `qso::is_valid_callsign` has at least one digit, so this always
/// succeeds on real input; a call with no digits sorts as area 0.
fn digit_suffix_area(call: &str) -> u32 {
    let digits: String = call
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Domain ordering key: by digit area first, then the full callsign, so
/// that calls sharing an area group together and ties break
/// alphabetically (design note §9, "call ordering" open question).
fn sort_key(call: &str) -> (u32, &str) {
    (digit_suffix_area(call), call)
}

/// Apply `-xpc n` top-percent-by-count truncation. `n >= 100` is a no-op.
/// Calls are dropped by whole count-tier: if any call at count `k`
/// survives, every call with count `>= k` also survives (spec §8,
/// scenario 6).
pub fn apply_xpc(counts: &HashMap<String, u64>, xpc: u32) -> HashMap<String, u64> {
    if xpc >= 100 || counts.is_empty() {
        return counts.clone();
    }

    let total: u64 = counts.values().sum();
    if total == 0 {
        return HashMap::new();
    }
    let needed = (total * u64::from(xpc) + 99) / 100;

    let mut distinct_counts: Vec<u64> = counts.values().copied().collect();
    distinct_counts.sort_unstable_by(|a, b| b.cmp(a));
    distinct_counts.dedup();

    let mut cumulative = 0u64;
    let mut threshold = 0u64;
    for c in distinct_counts {
        if cumulative >= needed {
            break;
        }
        cumulative += counts.values().filter(|&&v| v == c).sum::<u64>();
        threshold = c;
    }

    counts
        .iter()
        .filter(|(_, &count)| count >= threshold)
        .map(|(call, &count)| (call.clone(), count))
        .collect()
}

/// Render the plain SCP format: one callsign per line, domain-ordered.
pub fn render_scp(counts: &HashMap<String, u64>) -> String {
    let mut calls: Vec<&String> = counts.keys().collect();
    calls.sort_by_key(|c| sort_key(c));
    let mut out = String::new();
    for call in calls {
        out.push_str(call);
        out.push('\n');
    }
    out
}

/// Render the XSCP format: `CALL count` per line, domain-ordered.
pub fn render_xscp(counts: &HashMap<String, u64>) -> String {
    let mut entries: Vec<(&String, &u64)> = counts.iter().collect();
    entries.sort_by_key(|(call, _)| sort_key(call));
    let mut out = String::new();
    for (call, count) in entries {
        out.push_str(call);
        out.push(' ');
        out.push_str(&count.to_string());
        out.push('\n');
    }
    out
}
