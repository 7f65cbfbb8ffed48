//! Descriptive statistics: moments, order statistics, histograms.

/// Arithmetic mean. Returns 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n−1 denominator). Returns 0 when fewer
/// than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    variance.max(0.0).sqrt()
}

/// The `p`-th percentile (0..=100) of a sorted slice, with linear
/// interpolation between closest ranks.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] + weight * (sorted[upper] - sorted[lower])
}

/// Median of a sorted slice.
pub fn median(sorted: &[f64]) -> f64 {
    percentile(sorted, 50.0)
}

/// `count` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Density histogram over `bins` equal-width bins spanning the observed
/// range. Returns `(densities, edges)` with `edges.len() == bins + 1`;
/// each density is `count / (n · bin_width)`, so the bar areas sum to 1.
///
/// A zero-width range is expanded by ±0.5 around the single value, the
/// same convention the original service's histogramming used.
pub fn histogram_density(values: &[f64], bins: usize) -> (Vec<f64>, Vec<f64>) {
    if values.is_empty() || bins == 0 {
        return (Vec::new(), Vec::new());
    }
    let mut low = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut high = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if low == high {
        low -= 0.5;
        high += 0.5;
    }
    let width = (high - low) / bins as f64;

    let mut counts = vec![0u64; bins];
    for &v in values {
        let mut bin = ((v - low) / width) as usize;
        if bin >= bins {
            bin = bins - 1; // the maximum lands in the last bin
        }
        counts[bin] += 1;
    }

    let n = values.len() as f64;
    let densities = counts.iter().map(|&c| c as f64 / (n * width)).collect();
    let edges = linspace(low, high, bins + 1);
    (densities, edges)
}
