//! # Reference Tables
//!
//! Immutable lookup data shared by every calculation: charger ratings,
//! earthing arrangements, diversity and derating factors, cable ratings and
//! protective device sizes.
//!
//! Selector-keyed tables expose `from_key(&str) -> Option<Self>`. Whether a
//! miss is an error or falls back to a neutral factor is decided by the
//! calculation that consumes the table, not here.
//!
//! ## Example
//!
//! ```rust
//! use evcalc_core::tables::{ChargerType, DiversityScenario};
//!
//! let charger = ChargerType::from_key("22kw-ac").unwrap();
//! assert_eq!(charger.phases(), 3);
//!
//! let factor = DiversityScenario::from_key("unknown")
//!     .map(|d| d.factor())
//!     .unwrap_or(1.0);
//! assert_eq!(factor, 1.0);
//! ```

pub mod cables;
pub mod chargers;
pub mod derating;
pub mod diversity;
pub mod earthing;
pub mod protection;

pub use cables::{CableRating, SWA_CABLES};
pub use chargers::ChargerType;
pub use derating::{AmbientTemp, DeratingFactors, Grouping, ThermalInsulation};
pub use diversity::DiversityScenario;
pub use earthing::EarthingSystem;
pub use protection::DEVICE_RATINGS;
