//! Named measurements for a histogram's scalar view

use core::fmt;
use core::str::FromStr;

use crate::error::ConfigError;

/// Which statistic a histogram reports through [`Metric::val`](crate::traits::Metric::val)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Measurement {
    Min,
    Max,
    Sum,
    Count,
    Variance,
    #[default]
    Mean,
    Ema,
    Median,
    P75,
    P95,
    P99,
    P999,
}

impl Measurement {
    /// Every measurement, in report order
    pub const ALL: [Measurement; 12] = [
        Measurement::Min,
        Measurement::Max,
        Measurement::Sum,
        Measurement::Count,
        Measurement::Variance,
        Measurement::Mean,
        Measurement::Ema,
        Measurement::Median,
        Measurement::P75,
        Measurement::P95,
        Measurement::P99,
        Measurement::P999,
    ];

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Measurement::Min => "min",
            Measurement::Max => "max",
            Measurement::Sum => "sum",
            Measurement::Count => "count",
            Measurement::Variance => "variance",
            Measurement::Mean => "mean",
            Measurement::Ema => "ema",
            Measurement::Median => "median",
            Measurement::P75 => "p75",
            Measurement::P95 => "p95",
            Measurement::P99 => "p99",
            Measurement::P999 => "p999",
        }
    }

    /// Percentile rank for the sample-derived measurements
    pub fn percentile(self) -> Option<f64> {
        match self {
            Measurement::Median => Some(0.5),
            Measurement::P75 => Some(0.75),
            Measurement::P95 => Some(0.95),
            Measurement::P99 => Some(0.99),
            Measurement::P999 => Some(0.999),
            _ => None,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measurement {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measurement::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ConfigError::UnknownMeasurement(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for m in Measurement::ALL {
            assert_eq!(m.name().parse::<Measurement>(), Ok(m));
            assert_eq!(m.to_string(), m.name());
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            "p42".parse::<Measurement>(),
            Err(ConfigError::UnknownMeasurement("p42".to_string()))
        );
        assert!("".parse::<Measurement>().is_err());
        assert!("Median".parse::<Measurement>().is_err());
    }

    #[test]
    fn test_percentile_ranks() {
        assert_eq!(Measurement::Median.percentile(), Some(0.5));
        assert_eq!(Measurement::P999.percentile(), Some(0.999));
        assert_eq!(Measurement::Mean.percentile(), None);
        assert_eq!(Measurement::Count.percentile(), None);
    }
}
