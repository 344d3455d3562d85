// Stores every sample and keeps running aggregates over them
use std::fmt;

#[derive(Debug, Default, Clone)]
pub struct LatencySeries {
    times: Vec<f64>,
    latencies: Vec<f64>,
    sum: f64,
    min: f64,
    max: f64,
    // sum of |latency[i] - latency[i - 1]|
    diff_sum: f64,
}

/// Derived statistics over all samples of a series, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// Mean absolute difference between consecutive samples.
    pub jitter: f64,
    pub last: f64,
}

impl LatencySeries {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Records one sample and returns the statistics including it.
    pub fn push(&mut self, time: f64, latency: f64) -> Summary {
        if let Some(&prev) = self.latencies.last() {
            self.diff_sum += (latency - prev).abs();
            self.min = self.min.min(latency);
            self.max = self.max.max(latency);
        } else {
            self.min = latency;
            self.max = latency;
        }
        self.sum += latency;
        self.times.push(time);
        self.latencies.push(latency);
        self.summarize(latency)
    }

    #[must_use]
    pub fn len(&self) -> usize { self.latencies.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.latencies.is_empty() }

    #[must_use]
    pub fn times(&self) -> &[f64] { &self.times }

    #[must_use]
    pub fn latencies(&self) -> &[f64] { &self.latencies }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.latencies.iter().copied())
    }

    #[must_use]
    pub fn summary(&self) -> Option<Summary> {
        self.latencies.last().map(|&last| self.summarize(last))
    }

    #[allow(clippy::cast_precision_loss)]
    fn summarize(&self, last: f64) -> Summary {
        let count = self.latencies.len();
        let jitter = if count > 1 {
            self.diff_sum / (count - 1) as f64
        } else {
            0.0
        };
        Summary {
            count,
            min: self.min,
            max: self.max,
            avg: self.sum / count as f64,
            jitter,
            last,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Min: {:.2}, Max: {:.2}, Avg: {:.2}, Jitter: {:.2}, Last: {:.2}",
            self.min, self.max, self.avg, self.jitter, self.last
        )
    }
}

#[cfg(test)]
mod tests {
    use proptest::{collection::vec, prelude::*};

    use super::*;

    fn series(latencies: &[f64]) -> LatencySeries {
        let mut s = LatencySeries::new();
        for (i, &l) in latencies.iter().enumerate() {
            s.push(f64::from(u32::try_from(i).unwrap()), l);
        }
        s
    }

    #[test]
    fn empty_has_no_summary() {
        assert!(LatencySeries::new().summary().is_none());
    }

    #[test]
    fn single_sample_has_zero_jitter() {
        let s = series(&[12.5]).summary().unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.jitter, 0.0);
        assert_eq!(s.min, 12.5);
        assert_eq!(s.max, 12.5);
        assert_eq!(s.last, 12.5);
    }

    #[test]
    fn aggregates_match_samples() {
        let s = series(&[10.0, 14.0, 11.0, 20.0]).summary().unwrap();
        assert_eq!(s.min, 10.0);
        assert_eq!(s.max, 20.0);
        assert!((s.avg - 13.75).abs() < 1e-9);
        // |4| + |-3| + |9| over three gaps
        assert!((s.jitter - 16.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.last, 20.0);
    }

    #[test]
    fn summary_line_format() {
        let s = series(&[10.0, 12.0]).summary().unwrap();
        assert_eq!(
            s.to_string(),
            "Min: 10.00, Max: 12.00, Avg: 11.00, Jitter: 2.00, Last: 12.00"
        );
    }

    #[test]
    fn push_returns_running_summary() {
        let mut s = LatencySeries::new();
        let first = s.push(0.0, 8.0);
        assert_eq!(first.count, 1);
        assert_eq!(first.last, 8.0);

        let second = s.push(1.0, 12.0);
        assert_eq!(Some(second), s.summary());
        assert_eq!(second.jitter, 4.0);
        assert_eq!(second.avg, 10.0);
    }

    #[test]
    fn points_pair_times_with_latencies() {
        let mut s = LatencySeries::new();
        s.push(0.0, 5.0);
        s.push(1.5, 6.0);
        assert_eq!(s.points().collect::<Vec<_>>(), vec![(0.0, 5.0), (1.5, 6.0)]);
    }

    proptest! {
        #[test]
        fn mean_is_bounded(latencies in vec(0.0f64..5000.0, 1..200)) {
            let s = series(&latencies).summary().unwrap();
            prop_assert!(s.min <= s.avg + 1e-9);
            prop_assert!(s.avg <= s.max + 1e-9);
            prop_assert!(s.jitter >= 0.0);
            prop_assert!(s.jitter <= s.max - s.min + 1e-9);
        }

        #[test]
        fn constant_series_has_no_jitter(v in 0.0f64..5000.0, n in 1usize..50) {
            let s = series(&vec![v; n]).summary().unwrap();
            prop_assert_eq!(s.jitter, 0.0);
            prop_assert_eq!(s.count, n);
        }
    }
}
