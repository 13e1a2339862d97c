/// Round to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Parse an answer text as an integer, ignoring surrounding whitespace.
pub fn parse_numeric(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Bucket values into `bins` equal-width bins over their full range.
///
/// Returns the per-bin counts and the `bins + 1` bin edges. The last bin is
/// closed on both sides so the maximum value is counted. A single distinct
/// value widens the range by 0.5 on each side; no values at all produce zero
/// counts over the range 0.0 to 1.0.
pub fn histogram(values: &[f64], bins: usize) -> (Vec<u64>, Vec<f64>) {
    let bins = bins.max(1);
    let range = values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    });
    let (lo, hi) = match range {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
        Some(range) => range,
    };
    let span = hi - lo;

    let mut counts = vec![0u64; bins];
    for &v in values {
        let idx = if v >= hi {
            bins - 1
        } else {
            (((v - lo) / span) * bins as f64) as usize
        };
        counts[idx.min(bins - 1)] += 1;
    }

    let edges = (0..=bins)
        .map(|i| lo + span * i as f64 / bins as f64)
        .collect();
    (counts, edges)
}
