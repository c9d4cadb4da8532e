//! Descriptive distributions: match length quartiles, ECDF and histograms

use serde::Serialize;

/// Box-plot summary of match lengths
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Furthest points within 1.5 IQR of the quartiles
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: usize,
}

impl DurationSummary {
    pub fn from_durations(durations: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(durations);
        if sorted.is_empty() {
            return None;
        }

        let q1 = quantile(&sorted, 0.25);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let inside: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| *v >= low_fence && *v <= high_fence)
            .collect();
        // Quartiles always lie inside the fences, so `inside` is never empty
        let lower_whisker = inside.first().copied().unwrap_or(q1);
        let upper_whisker = inside.last().copied().unwrap_or(q3);

        Some(DurationSummary {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median: quantile(&sorted, 0.5),
            q3,
            max: sorted[sorted.len() - 1],
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            lower_whisker,
            upper_whisker,
            outliers: sorted.len() - inside.len(),
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile with linear interpolation between order statistics
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Empirical CDF: each sorted value paired with the fraction of values at or below it
pub fn ecdf(values: &[f64]) -> Vec<(f64, f64)> {
    let sorted = sorted_finite(values);
    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, v)| (v, (i + 1) as f64 / n))
        .collect()
}

/// Equal-width histogram over the data's own range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// The last bin is closed on the right. When every value is equal the
    /// range is widened to one unit centred on that value.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        let sorted = sorted_finite(values);
        if sorted.is_empty() || bins == 0 {
            return None;
        }

        let (mut lower, mut upper) = (sorted[0], sorted[sorted.len() - 1]);
        if lower == upper {
            lower -= 0.5;
            upper += 0.5;
        }

        let width = (upper - lower) / bins as f64;
        let mut counts = vec![0usize; bins];
        for v in sorted {
            let idx = (((v - lower) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Histogram {
            lower,
            upper,
            counts,
        })
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    /// `(bin_start, bin_end, count)` for each bin
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        let width = self.bin_width();
        self.counts.iter().enumerate().map(move |(i, &count)| {
            let start = self.lower + i as f64 * width;
            (start, start + width, count)
        })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_quartiles() {
        let durations = [20.0, 25.0, 30.0, 35.0, 40.0];
        let s = DurationSummary::from_durations(&durations).unwrap();
        assert_eq!(s.count, 5);
        assert_eq!(s.min, 20.0);
        assert_eq!(s.q1, 25.0);
        assert_eq!(s.median, 30.0);
        assert_eq!(s.q3, 35.0);
        assert_eq!(s.max, 40.0);
        assert_eq!(s.mean, 30.0);
        assert_eq!(s.iqr(), 10.0);
        assert_eq!(s.outliers, 0);
        assert_eq!(s.lower_whisker, 20.0);
        assert_eq!(s.upper_whisker, 40.0);
    }

    #[test]
    fn test_summary_interpolates() {
        let s = DurationSummary::from_durations(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_eq!(s.median, 25.0);
        assert_eq!(s.q1, 17.5);
        assert_eq!(s.q3, 32.5);
    }

    #[test]
    fn test_summary_outliers() {
        let s = DurationSummary::from_durations(&[30.0, 31.0, 32.0, 33.0, 34.0, 90.0]).unwrap();
        assert_eq!(s.outliers, 1);
        assert_eq!(s.upper_whisker, 34.0);
        assert_eq!(s.max, 90.0);
    }

    #[test]
    fn test_summary_empty() {
        assert!(DurationSummary::from_durations(&[]).is_none());
        assert!(DurationSummary::from_durations(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_ecdf() {
        let points = ecdf(&[3.0, 1.0, 2.0, 2.0]);
        assert_eq!(
            points,
            vec![(1.0, 0.25), (2.0, 0.5), (2.0, 0.75), (3.0, 1.0)]
        );
        assert!(ecdf(&[]).is_empty());
    }

    #[test]
    fn test_histogram_counts() {
        let h = Histogram::from_values(&[0.0, 1.0, 2.0, 3.0, 4.0, 10.0], 5).unwrap();
        assert_eq!(h.lower, 0.0);
        assert_eq!(h.upper, 10.0);
        assert_eq!(h.bin_width(), 2.0);
        assert_eq!(h.counts, vec![2, 2, 1, 0, 1]);
        assert_eq!(h.total(), 6);
        assert_eq!(h.max_count(), 2);

        let bins: Vec<_> = h.bins().collect();
        assert_eq!(bins[0], (0.0, 2.0, 2));
        assert_eq!(bins[4], (8.0, 10.0, 1));
    }

    #[test]
    fn test_histogram_degenerate() {
        let h = Histogram::from_values(&[7.0, 7.0], 4).unwrap();
        assert_eq!(h.lower, 6.5);
        assert_eq!(h.upper, 7.5);
        assert_eq!(h.total(), 2);
        assert!(Histogram::from_values(&[], 10).is_none());
        assert!(Histogram::from_values(&[1.0], 0).is_none());
    }
}
