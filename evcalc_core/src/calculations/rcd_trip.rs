//! # RCD Trip-Time Check
//!
//! Maximum permitted disconnection times for RCD testing (BS EN 61008 /
//! 61009), and classification of a measured trip time against them.
//!
//! | Rating | 1 × IΔn | 5 × IΔn |
//! |--------|---------|---------|
//! | 30mA   | 300 ms  | 40 ms   |
//! | 100mA  | 300 ms  | 40 ms   |
//! | 300mA  | 500 ms  | 150 ms  |
//!
//! 300mA devices are assumed to be time-delayed (S type).
//!
//! ## Example
//!
//! ```rust
//! use evcalc_core::calculations::rcd_trip::{assess, RcdTestInput, RiskLevel};
//!
//! let input = RcdTestInput::new("30mA".parse().unwrap(), "5x".parse().unwrap(), Some(25.0));
//! let result = assess(&input).unwrap();
//! assert_eq!(result.max_trip_time_ms, 40);
//! assert_eq!(result.risk_level, Some(RiskLevel::Medium));
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{require_finite, CalcError, CalcResult};
use crate::units::Milliseconds;

/// Rated residual operating current IΔn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RcdRating {
    #[serde(rename = "30mA")]
    Ma30,
    #[serde(rename = "100mA")]
    Ma100,
    #[serde(rename = "300mA")]
    Ma300,
}

impl RcdRating {
    pub const ALL: [RcdRating; 3] = [RcdRating::Ma30, RcdRating::Ma100, RcdRating::Ma300];

    pub fn key(&self) -> &'static str {
        match self {
            RcdRating::Ma30 => "30mA",
            RcdRating::Ma100 => "100mA",
            RcdRating::Ma300 => "300mA",
        }
    }
}

impl FromStr for RcdRating {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RcdRating::ALL
            .into_iter()
            .find(|r| r.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::unknown_key("RCD rating", s))
    }
}

impl std::fmt::Display for RcdRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Test current as a multiple of IΔn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestMultiplier {
    #[serde(rename = "1x")]
    X1,
    #[serde(rename = "5x")]
    X5,
}

impl TestMultiplier {
    pub const ALL: [TestMultiplier; 2] = [TestMultiplier::X1, TestMultiplier::X5];

    pub fn key(&self) -> &'static str {
        match self {
            TestMultiplier::X1 => "1x",
            TestMultiplier::X5 => "5x",
        }
    }
}

impl FromStr for TestMultiplier {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestMultiplier::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::unknown_key("test multiplier", s))
    }
}

impl std::fmt::Display for TestMultiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Maximum permitted trip time (ms).
pub fn lookup(rating: RcdRating, multiplier: TestMultiplier) -> u32 {
    match (rating, multiplier) {
        (RcdRating::Ma30 | RcdRating::Ma100, TestMultiplier::X1) => 300,
        (RcdRating::Ma30 | RcdRating::Ma100, TestMultiplier::X5) => 40,
        // 300mA row is the time-delayed S type only; a general-type
        // 300mA device trips within 300 ms at 1x.
        (RcdRating::Ma300, TestMultiplier::X1) => 500,
        (RcdRating::Ma300, TestMultiplier::X5) => 150,
    }
}

/// Risk classification of a measured trip time, as a share of the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// ≤ 50 % of the maximum
    Low,
    /// ≤ 80 %
    Medium,
    /// ≤ 100 %
    High,
    /// Over the maximum: fails
    Critical,
}

impl RiskLevel {
    pub fn classify(actual: Milliseconds, max: Milliseconds) -> Self {
        if actual.0 <= max.0 * 0.5 {
            RiskLevel::Low
        } else if actual.0 <= max.0 * 0.8 {
            RiskLevel::Medium
        } else if actual.0 <= max.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// RCD test to look up or assess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcdTestInput {
    pub rating: RcdRating,
    pub multiplier: TestMultiplier,
    /// Measured trip time (ms), if a test has been carried out
    #[serde(default)]
    pub actual_trip_time_ms: Option<f64>,
}

impl RcdTestInput {
    pub fn new(rating: RcdRating, multiplier: TestMultiplier, actual_trip_time_ms: Option<f64>) -> Self {
        RcdTestInput {
            rating,
            multiplier,
            actual_trip_time_ms,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        if let Some(actual) = self.actual_trip_time_ms {
            require_finite("actualTripTimeMs", actual)?;
            if actual < 0.0 {
                return Err(CalcError::invalid_input(
                    "actualTripTimeMs",
                    actual.to_string(),
                    "Trip time cannot be negative",
                ));
            }
        }
        Ok(())
    }
}

/// Lookup result, with assessment fields filled when a measured time was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcdTestResult {
    pub max_trip_time_ms: u32,
    pub is_compliant: Option<bool>,
    /// (max − actual) / max × 100; negative when the device is too slow
    pub safety_margin_percent: Option<f64>,
    pub risk_level: Option<RiskLevel>,
}

/// Look up the limit and, if a measured time is present, assess it.
pub fn assess(input: &RcdTestInput) -> CalcResult<RcdTestResult> {
    input.validate()?;

    let max_trip_time_ms = lookup(input.rating, input.multiplier);
    let max = Milliseconds(f64::from(max_trip_time_ms));

    let Some(actual) = input.actual_trip_time_ms.map(Milliseconds) else {
        return Ok(RcdTestResult {
            max_trip_time_ms,
            is_compliant: None,
            safety_margin_percent: None,
            risk_level: None,
        });
    };

    let risk = RiskLevel::classify(actual, max);
    debug!(rating = %input.rating, multiplier = %input.multiplier, actual_ms = actual.0, ?risk, "RCD assessed");

    Ok(RcdTestResult {
        max_trip_time_ms,
        is_compliant: Some(actual.0 <= max.0),
        safety_margin_percent: Some((max - actual).0 / max.0 * 100.0),
        risk_level: Some(risk),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lookup_table() {
        assert_eq!(lookup(RcdRating::Ma30, TestMultiplier::X1), 300);
        assert_eq!(lookup(RcdRating::Ma30, TestMultiplier::X5), 40);
        assert_eq!(lookup(RcdRating::Ma100, TestMultiplier::X5), 40);
        assert_eq!(lookup(RcdRating::Ma300, TestMultiplier::X1), 500);
        assert_eq!(lookup(RcdRating::Ma300, TestMultiplier::X5), 150);
    }

    #[test]
    fn test_30ma_5x_25ms_is_medium() {
        let input = RcdTestInput::new(RcdRating::Ma30, TestMultiplier::X5, Some(25.0));
        let result = assess(&input).unwrap();

        assert_eq!(result.max_trip_time_ms, 40);
        assert_eq!(result.is_compliant, Some(true));
        assert_relative_eq!(result.safety_margin_percent.unwrap(), 37.5, epsilon = 1e-9);
        // 25 > 0.5 × 40 = 20, 25 ≤ 0.8 × 40 = 32
        assert_eq!(result.risk_level, Some(RiskLevel::Medium));
    }

    #[test]
    fn test_300ma_5x_160ms_is_critical() {
        let input = RcdTestInput::new(RcdRating::Ma300, TestMultiplier::X5, Some(160.0));
        let result = assess(&input).unwrap();

        assert_eq!(result.max_trip_time_ms, 150);
        assert_eq!(result.is_compliant, Some(false));
        assert!(result.safety_margin_percent.unwrap() < 0.0);
        assert_eq!(result.risk_level, Some(RiskLevel::Critical));
    }

    #[test]
    fn test_risk_boundaries() {
        let max = Milliseconds(40.0);
        assert_eq!(RiskLevel::classify(Milliseconds(20.0), max), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(Milliseconds(32.0), max), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(Milliseconds(40.0), max), RiskLevel::High);
        assert_eq!(RiskLevel::classify(Milliseconds(40.1), max), RiskLevel::Critical);
    }

    #[test]
    fn test_lookup_only() {
        let input = RcdTestInput::new(RcdRating::Ma100, TestMultiplier::X1, None);
        let result = assess(&input).unwrap();
        assert_eq!(result.max_trip_time_ms, 300);
        assert!(result.is_compliant.is_none());
        assert!(result.risk_level.is_none());
    }

    #[test]
    fn test_invalid_trip_time() {
        let input = RcdTestInput::new(RcdRating::Ma30, TestMultiplier::X1, Some(-1.0));
        assert!(assess(&input).is_err());
        let input = RcdTestInput::new(RcdRating::Ma30, TestMultiplier::X1, Some(f64::NAN));
        assert!(assess(&input).is_err());
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("30mA".parse::<RcdRating>().unwrap(), RcdRating::Ma30);
        assert_eq!("300ma".parse::<RcdRating>().unwrap(), RcdRating::Ma300);
        assert_eq!("5X".parse::<TestMultiplier>().unwrap(), TestMultiplier::X5);
        assert_eq!("10mA".parse::<RcdRating>().unwrap_err().error_code(), "UNKNOWN_KEY");
    }

    #[test]
    fn test_json_shape() {
        let input: RcdTestInput =
            serde_json::from_str(r#"{ "rating": "300mA", "multiplier": "5x", "actualTripTimeMs": 160 }"#).unwrap();
        let result = assess(&input).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["riskLevel"], "critical");
        assert_eq!(json["maxTripTimeMs"], 150);
    }
}
