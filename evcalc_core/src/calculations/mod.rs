//! # Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input(s)` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - a pure function `(&input) -> CalcResult<*Result>` with no side effects
//!
//! ## Available Calculations
//!
//! - [`ev_load`] - EV charging point load, cable and protection sizing
//! - [`rcd_trip`] - RCD maximum trip time lookup and test assessment

pub mod ev_load;
pub mod rcd_trip;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::settings::DesignLimits;

// Re-export commonly used types
pub use ev_load::{CalculationInputs, CalculationResult, ChargingPoint};
pub use rcd_trip::{RcdTestInput, RcdTestResult};

/// A completed calculation with the inputs that produced it.
///
/// Lets a report hold different calculation types in one list while keeping
/// clean tagged JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// EV charging load calculation
    EvLoad {
        label: String,
        inputs: CalculationInputs,
        result: CalculationResult,
    },
    /// RCD trip-time check
    RcdTrip {
        label: String,
        input: RcdTestInput,
        result: RcdTestResult,
    },
}

impl CalculationItem {
    /// Run an EV load calculation and wrap it.
    pub fn ev_load(label: impl Into<String>, inputs: CalculationInputs, limits: &DesignLimits) -> CalcResult<Self> {
        let result = ev_load::calculate_with_limits(&inputs, limits)?;
        Ok(CalculationItem::EvLoad {
            label: label.into(),
            inputs,
            result,
        })
    }

    /// Run an RCD assessment and wrap it.
    pub fn rcd_trip(label: impl Into<String>, input: RcdTestInput) -> CalcResult<Self> {
        let result = rcd_trip::assess(&input)?;
        Ok(CalculationItem::RcdTrip {
            label: label.into(),
            input,
            result,
        })
    }

    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::EvLoad { label, .. } => label,
            CalculationItem::RcdTrip { label, .. } => label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::EvLoad { .. } => "EV Load",
            CalculationItem::RcdTrip { .. } => "RCD Trip Time",
        }
    }

    /// Whether the wrapped result passes its checks
    pub fn passes(&self) -> bool {
        match self {
            CalculationItem::EvLoad { result, .. } => result.passes(),
            CalculationItem::RcdTrip { result, .. } => result.is_compliant.unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::rcd_trip::{RcdRating, TestMultiplier};

    #[test]
    fn test_item_wraps_result() {
        let item = CalculationItem::ev_load("Driveway", CalculationInputs::default(), &DesignLimits::default()).unwrap();
        assert_eq!(item.label(), "Driveway");
        assert_eq!(item.calc_type(), "EV Load");
    }

    #[test]
    fn test_item_propagates_errors() {
        let inputs = CalculationInputs {
            charging_points: Vec::new(),
            ..CalculationInputs::default()
        };
        assert!(CalculationItem::ev_load("Empty", inputs, &DesignLimits::default()).is_err());
    }

    #[test]
    fn test_tagged_json() {
        let input = RcdTestInput::new(RcdRating::Ma30, TestMultiplier::X5, Some(45.0));
        let item = CalculationItem::rcd_trip("Board 1 RCD", input).unwrap();
        assert!(!item.passes());

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"RcdTrip\""));
        let back: CalculationItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
