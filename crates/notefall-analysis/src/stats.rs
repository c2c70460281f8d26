//! Summary statistics over power grids.

/// Upper median: the element at sorted index `len / 2`.
///
/// For even lengths this is the higher of the two middle values rather than
/// their mean. Returns `None` for an empty slice.
///
/// ```rust
/// use notefall_analysis::stats::upper_median;
///
/// assert_eq!(upper_median(&[4.0, 1.0, 3.0, 2.0]), Some(3.0));
/// assert_eq!(upper_median(&[]), None);
/// ```
pub fn upper_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    Some(sorted[sorted.len() / 2])
}

/// Population mean and standard deviation in one pass (Welford).
///
/// Returns `None` for an empty slice.
pub fn mean_std_dev(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }

    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &x) in values.iter().enumerate() {
        let delta = x - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (x - mean);
    }
    let variance = m2 / values.len() as f64;
    Some((mean, variance.max(0.0).sqrt()))
}

/// Running minimum/maximum tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningRange {
    min: f64,
    max: f64,
    count: usize,
}

impl Default for RunningRange {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningRange {
    /// Empty range
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        }
    }

    /// Fold one value into the range
    pub fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.count += 1;
    }

    /// Number of observed values
    pub fn count(&self) -> usize {
        self.count
    }

    /// True until the first value is observed
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Smallest observed value, 0.0 when empty
    pub fn min(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.min }
    }

    /// Largest observed value, 0.0 when empty
    pub fn max(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max }
    }

    /// `max - min`, 0.0 when empty
    pub fn span(&self) -> f64 {
        self.max() - self.min()
    }

    /// Map `value` into [0, 1] relative to the range; 0.0 for a zero span
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span > 0.0 {
            ((value - self.min()) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_median_even_and_odd() {
        assert_eq!(upper_median(&[1.0, 2.0, 3.0, 4.0]), Some(3.0));
        assert_eq!(upper_median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(upper_median(&[7.0]), Some(7.0));
    }

    #[test]
    fn test_std_dev_of_one_to_four() {
        let (mean, sd) = mean_std_dev(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((mean - 2.5).abs() < 1e-12);
        assert!((sd - 1.25f64.sqrt()).abs() < 1e-12);
        assert!((sd - 1.118).abs() < 1e-3);
    }

    #[test]
    fn test_std_dev_constant_is_zero() {
        let (mean, sd) = mean_std_dev(&[0.3; 1000]).unwrap();
        assert!((mean - 0.3).abs() < 1e-12);
        assert!(sd < 1e-9);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(mean_std_dev(&[]).is_none());
        assert!(upper_median(&[]).is_none());
    }

    #[test]
    fn test_running_range() {
        let mut range = RunningRange::new();
        assert!(range.is_empty());
        assert_eq!(range.min(), 0.0);
        assert_eq!(range.normalize(5.0), 0.0);

        for v in [2.0, -1.0, 4.0] {
            range.observe(v);
        }
        assert_eq!(range.count(), 3);
        assert_eq!(range.min(), -1.0);
        assert_eq!(range.max(), 4.0);
        assert_eq!(range.span(), 5.0);
        assert!((range.normalize(1.5) - 0.5).abs() < 1e-12);
        assert_eq!(range.normalize(10.0), 1.0);
    }
}
