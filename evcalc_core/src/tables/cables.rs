//! SWA Cable Ratings
//!
//! Steel-wire-armoured XLPE multicore cable, reference method C (clipped
//! direct), copper conductors. Current ratings are the tabulated values
//! before correction factors; voltage drop is mV/A/m at conductor operating
//! temperature.
//!
//! Two voltage drop columns are carried: two-core (single-phase, line to
//! neutral loop) and four-core (three-phase, line to line).

use serde::{Deserialize, Serialize};

use crate::supply::SupplyPhase;
use crate::units::Amps;

/// One row of the cable table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CableRating {
    /// Conductor cross-section (mm²)
    pub size_mm2: f64,
    /// Tabulated current-carrying capacity It (A)
    pub tabulated_a: f64,
    /// Voltage drop, single-phase (mV/A/m)
    pub mv_per_a_m_single: f64,
    /// Voltage drop, three-phase (mV/A/m)
    pub mv_per_a_m_three: f64,
}

impl CableRating {
    /// Voltage drop per amp per metre for the given supply
    pub fn mv_per_a_m(&self, phase: SupplyPhase) -> f64 {
        match phase {
            SupplyPhase::Single => self.mv_per_a_m_single,
            SupplyPhase::Three => self.mv_per_a_m_three,
        }
    }

    /// Capacity after applying the combined derating factor
    pub fn derated_capacity(&self, combined_factor: f64) -> Amps {
        Amps(self.tabulated_a * combined_factor)
    }

    /// Display label, e.g. "6mm² SWA"
    pub fn label(&self) -> String {
        format!("{}mm² SWA", self.size_mm2)
    }
}

const fn rating(size_mm2: f64, tabulated_a: f64, single: f64, three: f64) -> CableRating {
    CableRating {
        size_mm2,
        tabulated_a,
        mv_per_a_m_single: single,
        mv_per_a_m_three: three,
    }
}

/// Standard sizes, smallest first.
pub const SWA_CABLES: [CableRating; 17] = [
    rating(1.5, 32.0, 29.0, 25.0),
    rating(2.5, 43.0, 18.0, 15.0),
    rating(4.0, 57.0, 11.0, 9.5),
    rating(6.0, 73.0, 7.3, 6.4),
    rating(10.0, 98.0, 4.4, 3.8),
    rating(16.0, 131.0, 2.8, 2.4),
    rating(25.0, 168.0, 1.75, 1.5),
    rating(35.0, 201.0, 1.25, 1.1),
    rating(50.0, 242.0, 0.93, 0.80),
    rating(70.0, 310.0, 0.64, 0.55),
    rating(95.0, 375.0, 0.46, 0.41),
    rating(120.0, 431.0, 0.37, 0.33),
    rating(150.0, 491.0, 0.30, 0.26),
    rating(185.0, 557.0, 0.25, 0.21),
    rating(240.0, 641.0, 0.19, 0.165),
    rating(300.0, 738.0, 0.16, 0.135),
    rating(400.0, 855.0, 0.13, 0.11),
];

/// Smallest cable whose derated capacity carries `design_current`.
pub fn select_cable(design_current: Amps, combined_factor: f64) -> Option<&'static CableRating> {
    SWA_CABLES
        .iter()
        .find(|c| c.derated_capacity(combined_factor).0 >= design_current.0)
}

/// Find a table row by its label (e.g. "6mm² SWA").
pub fn by_label(label: &str) -> Option<&'static CableRating> {
    SWA_CABLES.iter().find(|c| c.label() == label)
}
