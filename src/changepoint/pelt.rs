//! PELT (Pruned Exact Linear Time) algorithm for changepoint detection.
//!
//! An exact method for the penalized segmentation problem with O(n) average
//! complexity.

use super::cost::{CostFunction, PrefixSums};

/// Find the segmentation minimizing total cost plus `penalty` per changepoint.
///
/// Returns changepoint indices (first index of each new segment), ascending.
/// Every segment is at least `min_segment_length` long. Among equally good
/// last changepoints the earliest one wins.
pub fn pelt(
    prefix: &PrefixSums,
    cost_fn: CostFunction,
    penalty: f64,
    min_segment_length: usize,
) -> Vec<usize> {
    let n = prefix.len();
    let min_len = min_segment_length.max(1);

    if n < 2 * min_len {
        return Vec::new();
    }

    // f[t] = minimum penalized cost of segmenting series[0..t]
    let mut f = vec![f64::INFINITY; n + 1];
    f[0] = -penalty; // so the first segment is not penalized
    let mut last_cp: Vec<usize> = vec![0; n + 1];
    let mut candidates: Vec<usize> = vec![0];

    for t in min_len..=n {
        let mut best_cost = f64::INFINITY;
        let mut best_cp = 0;

        for &s in &candidates {
            if t - s >= min_len {
                let total = f[s] + prefix.cost(s, t, cost_fn) + penalty;
                if total < best_cost {
                    best_cost = total;
                    best_cp = s;
                }
            }
        }

        f[t] = best_cost;
        last_cp[t] = best_cp;

        // Pruning: drop candidates that can never be optimal again
        candidates.retain(|&s| t - s < min_len || f[s] + prefix.cost(s, t, cost_fn) <= f[t]);

        if t + min_len <= n {
            candidates.push(t);
        }
    }

    let mut changepoints = Vec::new();
    let mut t = n;
    while t > 0 {
        let prev = last_cp[t];
        if prev > 0 {
            changepoints.push(prev);
        }
        t = prev;
    }
    changepoints.reverse();
    changepoints
}

/// Drop the weakest changepoints until at most `max` remain.
///
/// Repeatedly removes the changepoint whose removal raises the total cost
/// the least (ties: the earliest). Removing a changepoint only merges
/// segments, so minimum segment lengths are preserved.
pub fn prune_to_max(
    prefix: &PrefixSums,
    cost_fn: CostFunction,
    mut changepoints: Vec<usize>,
    max: usize,
) -> Vec<usize> {
    while changepoints.len() > max {
        let n = prefix.len();
        let mut weakest = 0;
        let mut weakest_gain = f64::INFINITY;
        for (i, &cp) in changepoints.iter().enumerate() {
            let start = if i == 0 { 0 } else { changepoints[i - 1] };
            let end = changepoints.get(i + 1).copied().unwrap_or(n);
            let gain = prefix.split_gain(start, cp, end, cost_fn);
            if gain < weakest_gain {
                weakest_gain = gain;
                weakest = i;
            }
        }
        changepoints.remove(weakest);
    }
    changepoints
}
