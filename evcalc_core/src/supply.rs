//! # Supply Characteristics
//!
//! Single- vs three-phase supply detection and the power-to-current
//! conversion used for both the design current and the available-capacity
//! headroom, so the two always follow the same convention.
//!
//! ```text
//! single-phase:  I = P / (V × PF)
//! three-phase:   I = P / (√3 × V_L × PF)
//! ```

use serde::{Deserialize, Serialize};

use crate::units::{Amps, Kilowatts, Volts, Watts};

/// Lowest accepted nominal supply voltage. Below this the supply is
/// extra-low voltage and cannot feed a charging point.
pub const MIN_SUPPLY_VOLTAGE: f64 = 50.0;

/// Supplies at or above this line voltage are treated as three-phase
/// (400 V / 415 V nominal in the UK).
pub const THREE_PHASE_MIN_VOLTAGE: f64 = 380.0;

/// Number of phases in the incoming supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupplyPhase {
    /// 230 V single-phase
    Single,
    /// 400/415 V three-phase
    Three,
}

impl SupplyPhase {
    /// Classify a supply by its nominal voltage.
    pub fn from_voltage(voltage: Volts) -> Self {
        if voltage.0 >= THREE_PHASE_MIN_VOLTAGE {
            SupplyPhase::Three
        } else {
            SupplyPhase::Single
        }
    }

    /// Phase count (1 or 3)
    pub fn phases(&self) -> u8 {
        match self {
            SupplyPhase::Single => 1,
            SupplyPhase::Three => 3,
        }
    }

    /// Line current drawn by `power` at `voltage` and `power_factor`.
    pub fn current_for_power(&self, power: Kilowatts, voltage: Volts, power_factor: f64) -> Amps {
        let watts: Watts = power.into();
        let divisor = match self {
            SupplyPhase::Single => voltage.0 * power_factor,
            SupplyPhase::Three => voltage.0 * 3f64.sqrt() * power_factor,
        };
        Amps(watts.0 / divisor)
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            SupplyPhase::Single => "Single-phase",
            SupplyPhase::Three => "Three-phase",
        }
    }
}

impl std::fmt::Display for SupplyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
