use serde::Serialize;
use statrs::statistics::Statistics;

/// Summary of the valid scores in one matrix row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreStats {
    pub min: u8,
    pub max: u8,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub samples: usize,
}

impl ScoreStats {
    /// Returns `None` when there are no scores to summarise.
    pub fn from_scores<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let scores: Vec<u8> = scores.into_iter().collect();
        let min = Iterator::min(scores.iter().copied())?;
        let max = Iterator::max(scores.iter().copied())?;
        let values: Vec<f64> = scores.iter().map(|&score| f64::from(score)).collect();
        Some(Self {
            min,
            max,
            mean: values.iter().mean(),
            std_dev: values.iter().population_std_dev(),
            samples: values.len(),
        })
    }

    pub fn mean_plus_std(&self) -> f64 {
        self.mean + self.std_dev
    }

    pub fn mean_minus_std(&self) -> f64 {
        self.mean - self.std_dev
    }
}

#[cfg(test)]
mod tests {
    use super::ScoreStats;

    #[test]
    fn summarises_min_max_mean_and_spread() {
        let stats = ScoreStats::from_scores([2u8, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert_eq!(stats.min, 2);
        assert_eq!(stats.max, 9);
        assert_eq!(stats.samples, 8);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert!((stats.mean_plus_std() - 7.0).abs() < 1e-12);
        assert!((stats.mean_minus_std() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn single_sample_has_zero_spread() {
        let stats = ScoreStats::from_scores([6u8]).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.mean, 6.0);
    }

    #[test]
    fn empty_rows_have_no_stats() {
        assert!(ScoreStats::from_scores(Vec::new()).is_none());
    }
}
