//! Simulated A/B performance metrics.
//!
//! Purely illustrative: uniform draws from fixed ranges, no statistical
//! basis and no seeding discipline. Each value is a percentage in 0-100.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Click-through rate range, percent.
pub const CTR_RANGE: (f64, f64) = (2.1, 8.5);
/// Engagement range, percent.
pub const ENGAGEMENT_RANGE: (f64, f64) = (15.0, 45.0);
/// Conversion range, percent.
pub const CONVERSION_RANGE: (f64, f64) = (1.2, 4.8);

/// Simulated metric set for one variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatedMetrics {
    pub ctr: f64,
    pub engagement: f64,
    pub conversion: f64,
}

impl SimulatedMetrics {
    /// Draw a fresh metric set.
    pub fn simulate() -> Self {
        let mut rng = rand::rng();
        Self {
            ctr: round_to(rng.random_range(CTR_RANGE.0..=CTR_RANGE.1), 2),
            engagement: round_to(rng.random_range(ENGAGEMENT_RANGE.0..=ENGAGEMENT_RANGE.1), 1),
            conversion: round_to(rng.random_range(CONVERSION_RANGE.0..=CONVERSION_RANGE.1), 2),
        }
    }

    /// Combined score used to pick the recommended variant.
    pub fn combined_score(&self) -> f64 {
        self.ctr + self.engagement * 0.1 + self.conversion * 2.0
    }

    /// Whether every value sits inside its documented range.
    pub fn in_bounds(&self) -> bool {
        (CTR_RANGE.0..=CTR_RANGE.1).contains(&self.ctr)
            && (ENGAGEMENT_RANGE.0..=ENGAGEMENT_RANGE.1).contains(&self.engagement)
            && (CONVERSION_RANGE.0..=CONVERSION_RANGE.1).contains(&self.conversion)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_within_bounds() {
        for _ in 0..200 {
            let metrics = SimulatedMetrics::simulate();
            assert!(metrics.in_bounds(), "out of bounds: {:?}", metrics);
        }
    }

    #[test]
    fn test_combined_score() {
        let metrics = SimulatedMetrics {
            ctr: 5.0,
            engagement: 30.0,
            conversion: 2.5,
        };
        assert!((metrics.combined_score() - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounding_precision() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(29.97, 1), 30.0);
    }
}
