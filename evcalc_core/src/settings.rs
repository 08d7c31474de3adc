//! # Design Limits
//!
//! Thresholds used by the compliance checks and recommendation rules. The
//! defaults follow BS 7671 and common UK practice; a host can load a
//! different set from JSON (see the CLI's `--limits` flag).

use serde::{Deserialize, Serialize};

use crate::errors::{require_finite, CalcError, CalcResult};

/// Tunable compliance and advisory thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignLimits {
    /// Maximum voltage drop from origin to charging point (%)
    pub max_voltage_drop_percent: f64,
    /// Headroom below this (A) triggers the expansion warning
    pub low_headroom_amps: f64,
    /// Single-phase design current above this (A) suggests a 3-phase supply
    pub single_phase_current_limit: f64,
    /// Combined derating below this triggers a route review note
    pub heavy_derating_threshold: f64,
}

impl Default for DesignLimits {
    fn default() -> Self {
        DesignLimits {
            max_voltage_drop_percent: 5.0,
            low_headroom_amps: 10.0,
            single_phase_current_limit: 100.0,
            heavy_derating_threshold: 0.7,
        }
    }
}

impl DesignLimits {
    /// Validate limits loaded from an external source.
    pub fn validate(&self) -> CalcResult<()> {
        require_finite("maxVoltageDropPercent", self.max_voltage_drop_percent)?;
        require_finite("lowHeadroomAmps", self.low_headroom_amps)?;
        require_finite("singlePhaseCurrentLimit", self.single_phase_current_limit)?;
        require_finite("heavyDeratingThreshold", self.heavy_derating_threshold)?;

        if self.max_voltage_drop_percent <= 0.0 {
            return Err(CalcError::invalid_input(
                "maxVoltageDropPercent",
                self.max_voltage_drop_percent.to_string(),
                "Voltage drop limit must be positive",
            ));
        }
        if self.single_phase_current_limit <= 0.0 {
            return Err(CalcError::invalid_input(
                "singlePhaseCurrentLimit",
                self.single_phase_current_limit.to_string(),
                "Current limit must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.heavy_derating_threshold) {
            return Err(CalcError::invalid_input(
                "heavyDeratingThreshold",
                self.heavy_derating_threshold.to_string(),
                "Derating threshold must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let limits = DesignLimits::default();
        assert!(limits.validate().is_ok());
        assert_eq!(limits.max_voltage_drop_percent, 5.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let limits: DesignLimits = serde_json::from_str(r#"{ "maxVoltageDropPercent": 3.0 }"#).unwrap();
        assert_eq!(limits.max_voltage_drop_percent, 3.0);
        assert_eq!(limits.low_headroom_amps, 10.0);
    }

    #[test]
    fn test_rejects_bad_limits() {
        let mut limits = DesignLimits::default();
        limits.max_voltage_drop_percent = 0.0;
        assert!(limits.validate().is_err());

        let mut limits = DesignLimits::default();
        limits.heavy_derating_threshold = 1.5;
        assert!(limits.validate().is_err());
    }
}
