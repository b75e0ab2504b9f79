use crate::model::HistogramBucket;

pub const DEFAULT_BUCKET_COUNT: usize = 20;

/// bucket profits into `bucket_count` equal-width ranges over [min, max].
/// values are expected to be finite; callers validate payloads first (see `risk::summarize_risk`)
pub fn build_histogram(profits: &[f64], bucket_count: usize) -> Vec<HistogramBucket> {
    if profits.is_empty() || bucket_count == 0 { return Vec::new(); }
    let min = profits.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = profits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        // zero variance: one bucket, no width to divide by
        return vec![HistogramBucket {
            range_label: format!("{min:.2}"),
            range_start: min,
            range_end: max,
            count: profits.len() as u64,
        }];
    }
    // halve everything when max - min overflows f64; boundaries are scaled back for labels
    let scale = if (max - min).is_finite() { 1.0 } else { 0.5 };
    let lo = min * scale;
    let width = (max * scale - lo) / bucket_count as f64;
    let bound = |i: usize| (lo + i as f64 * width) / scale;
    let mut counts = vec![0u64; bucket_count];
    for &p in profits {
        counts[bucket_index(p * scale, lo, width, bucket_count)] += 1;
    }
    counts.iter().enumerate().map(|(i, &c)| {
        let start = bound(i);
        HistogramBucket {
            range_label: format!("{:.0}", start.round()), // ties away from zero
            range_start: start,
            range_end: if i + 1 == bucket_count { max } else { bound(i + 1) },
            count: c,
        }
    }).collect()
}

/// floor((value - min) / width), clamped to [0, bucket_count - 1].
/// the upper clamp is what puts `max` in the last bucket; rounding can also push
/// values just below `max` to `bucket_count`
pub fn bucket_index(value: f64, min: f64, width: f64, bucket_count: usize) -> usize {
    let raw = ((value - min) / width).floor();
    if raw <= 0.0 { return 0; } // also catches NaN
    (raw as usize).min(bucket_count - 1)
}
