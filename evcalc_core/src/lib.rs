//! # evcalc_core - EV Charging Installation Calculation Engine
//!
//! `evcalc_core` is the computational heart of Evcalc, a set of calculators
//! for UK electricians. All inputs and outputs are JSON-serializable so the
//! same engine can sit behind a CLI, an HTTP handler or a desktop form.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Advisory**: Results support, never replace, professional design
//!
//! ## Quick Start
//!
//! ```rust
//! use evcalc_core::calculations::ev_load::{calculate, CalculationInputs, ChargingPoint};
//!
//! let inputs = CalculationInputs {
//!     charging_points: vec![ChargingPoint::new("7kw-ac", 2)],
//!     supply_voltage: 415.0,
//!     diversity_scenario: "multi-dwelling".to_string(),
//!     power_factor: 0.95,
//!     available_capacity: 69.0,
//!     ..CalculationInputs::default()
//! };
//!
//! let result = calculate(&inputs).unwrap();
//! println!("Design current: {:.1} A", result.design_current);
//! println!("Cable: {}", result.selected_cable.as_deref().unwrap_or("TBD"));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - EV load and RCD trip-time calculations
//! - [`tables`] - Charger, earthing, diversity, derating, cable and device data
//! - [`supply`] - Single/three-phase current conversion
//! - [`settings`] - Design limits
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`report`] - Report container for finished calculations
//! - [`file_io`] - JSON input loading and atomic report saves

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod report;
pub mod settings;
pub mod supply;
pub mod tables;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::ev_load::calculate;
pub use calculations::{CalculationInputs, CalculationItem, CalculationResult, ChargingPoint};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_json, load_report, save_report};
pub use report::{Report, ReportMetadata, ADVISORY_NOTICE};
pub use settings::DesignLimits;
