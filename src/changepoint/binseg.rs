//! Binary segmentation for changepoint detection.
//!
//! Greedy approximate search: split the segment whose best split yields the
//! largest cost reduction, and repeat while that reduction exceeds the
//! penalty.

use super::cost::{CostFunction, PrefixSums};

/// Best split of `[start, end)` as `(split, gain)`.
///
/// Only splits leaving at least `min_len` observations on both sides are
/// considered; equal gains resolve to the earliest index.
fn best_split(
    prefix: &PrefixSums,
    start: usize,
    end: usize,
    cost_fn: CostFunction,
    min_len: usize,
) -> Option<(usize, f64)> {
    if end - start < 2 * min_len {
        return None;
    }
    let mut best: Option<(usize, f64)> = None;
    for split in start + min_len..=end - min_len {
        let gain = prefix.split_gain(start, split, end, cost_fn);
        match best {
            Some((_, best_gain)) if gain <= best_gain => {}
            _ => best = Some((split, gain)),
        }
    }
    best
}

/// Detect changepoints by binary segmentation.
///
/// Stops when no split gains more than `penalty` or when `max_changepoints`
/// have been placed. Returns indices ascending.
pub fn binary_segmentation(
    prefix: &PrefixSums,
    cost_fn: CostFunction,
    penalty: f64,
    min_segment_length: usize,
    max_changepoints: Option<usize>,
) -> Vec<usize> {
    let n = prefix.len();
    let min_len = min_segment_length.max(1);
    let mut segments: Vec<(usize, usize)> = vec![(0, n)];
    let mut changepoints: Vec<usize> = Vec::new();

    loop {
        if max_changepoints.is_some_and(|max| changepoints.len() >= max) {
            break;
        }

        // Strongest split over all current segments, earliest on ties
        let mut chosen: Option<(usize, usize, f64)> = None;
        for (i, &(start, end)) in segments.iter().enumerate() {
            if let Some((split, gain)) = best_split(prefix, start, end, cost_fn, min_len) {
                let better = match chosen {
                    None => true,
                    Some((_, best_split, best_gain)) => {
                        gain > best_gain || (gain == best_gain && split < best_split)
                    }
                };
                if better {
                    chosen = Some((i, split, gain));
                }
            }
        }

        match chosen {
            Some((i, split, gain)) if gain > penalty => {
                let (start, end) = segments[i];
                segments[i] = (start, split);
                segments.insert(i + 1, (split, end));
                changepoints.push(split);
            }
            _ => break,
        }
    }

    changepoints.sort_unstable();
    changepoints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(series: &[f64], penalty: f64, min_len: usize, max: Option<usize>) -> Vec<usize> {
        binary_segmentation(&PrefixSums::new(series), CostFunction::L2, penalty, min_len, max)
    }

    #[test]
    fn binseg_single_shift() {
        let mut series = vec![1.0; 15];
        series.extend(vec![6.0; 15]);
        assert_eq!(run(&series, 1.0, 3, None), vec![15]);
    }

    #[test]
    fn binseg_three_levels() {
        let mut series = vec![0.0; 10];
        series.extend(vec![10.0; 10]);
        series.extend(vec![0.0; 10]);
        assert_eq!(run(&series, 1.0, 2, None), vec![10, 20]);
    }

    #[test]
    fn binseg_respects_max_changepoints() {
        let mut series = vec![0.0; 10];
        series.extend(vec![10.0; 10]);
        series.extend(vec![30.0; 10]);
        // The 10 -> 30 jump is the larger one and is found first
        assert_eq!(run(&series, 1.0, 2, Some(1)), vec![20]);
    }

    #[test]
    fn binseg_constant_series_has_no_split() {
        assert!(run(&[4.0; 30], 0.0, 2, None).is_empty());
    }

    #[test]
    fn binseg_ties_resolve_to_earliest_index() {
        // Symmetric series: splits at 5 and 10 have equal gain
        let mut series = vec![0.0; 5];
        series.extend(vec![1.0; 5]);
        series.extend(vec![0.0; 5]);
        let cps = run(&series, 0.1, 5, Some(1));
        assert_eq!(cps, vec![5]);
    }

    #[test]
    fn binseg_short_series() {
        assert!(run(&[1.0, 9.0, 1.0], 0.0, 2, None).is_empty());
    }
}
