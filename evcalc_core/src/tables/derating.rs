//! # Cable Derating Factors
//!
//! Correction factors applied to a cable's tabulated current-carrying
//! capacity (BS 7671 Appendix 4):
//!
//! ```text
//! Iz = It × Ca × Ci × Cg
//! ```
//!
//! | Factor | Description          | Table      | Range       |
//! |--------|----------------------|------------|-------------|
//! | Ca     | Ambient temperature  | 4B1 (90°C) | 0.82 - 1.02 |
//! | Ci     | Thermal insulation   | 52.2       | 0.50 - 1.00 |
//! | Cg     | Grouping             | 4C1        | 0.38 - 1.00 |
//!
//! Values are for thermosetting (XLPE) insulation, matching the SWA cable
//! table in [`crate::tables::cables`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Ambient temperature around the cable route (Ca)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AmbientTemp {
    #[serde(rename = "25c")]
    C25,
    /// Reference temperature
    #[default]
    #[serde(rename = "30c")]
    C30,
    #[serde(rename = "35c")]
    C35,
    #[serde(rename = "40c")]
    C40,
    #[serde(rename = "45c")]
    C45,
    #[serde(rename = "50c")]
    C50,
}

static AMBIENT_BY_KEY: Lazy<HashMap<&'static str, AmbientTemp>> =
    Lazy::new(|| AmbientTemp::ALL.iter().map(|a| (a.key(), *a)).collect());

impl AmbientTemp {
    pub const ALL: [AmbientTemp; 6] = [
        AmbientTemp::C25,
        AmbientTemp::C30,
        AmbientTemp::C35,
        AmbientTemp::C40,
        AmbientTemp::C45,
        AmbientTemp::C50,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        AMBIENT_BY_KEY.get(key).copied()
    }

    pub fn key(&self) -> &'static str {
        match self {
            AmbientTemp::C25 => "25c",
            AmbientTemp::C30 => "30c",
            AmbientTemp::C35 => "35c",
            AmbientTemp::C40 => "40c",
            AmbientTemp::C45 => "45c",
            AmbientTemp::C50 => "50c",
        }
    }

    /// Ca per Table 4B1, 90°C thermosetting
    pub fn factor(&self) -> f64 {
        match self {
            AmbientTemp::C25 => 1.02,
            AmbientTemp::C30 => 1.00,
            AmbientTemp::C35 => 0.96,
            AmbientTemp::C40 => 0.91,
            AmbientTemp::C45 => 0.87,
            AmbientTemp::C50 => 0.82,
        }
    }
}

/// Length of cable run surrounded by thermal insulation (Ci)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ThermalInsulation {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "50mm")]
    Mm50,
    #[serde(rename = "100mm")]
    Mm100,
    #[serde(rename = "200mm")]
    Mm200,
    #[serde(rename = "400mm")]
    Mm400,
    /// 500 mm or more
    #[serde(rename = "500mm")]
    Mm500,
}

static INSULATION_BY_KEY: Lazy<HashMap<&'static str, ThermalInsulation>> =
    Lazy::new(|| ThermalInsulation::ALL.iter().map(|t| (t.key(), *t)).collect());

impl ThermalInsulation {
    pub const ALL: [ThermalInsulation; 6] = [
        ThermalInsulation::None,
        ThermalInsulation::Mm50,
        ThermalInsulation::Mm100,
        ThermalInsulation::Mm200,
        ThermalInsulation::Mm400,
        ThermalInsulation::Mm500,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        INSULATION_BY_KEY.get(key).copied()
    }

    pub fn key(&self) -> &'static str {
        match self {
            ThermalInsulation::None => "none",
            ThermalInsulation::Mm50 => "50mm",
            ThermalInsulation::Mm100 => "100mm",
            ThermalInsulation::Mm200 => "200mm",
            ThermalInsulation::Mm400 => "400mm",
            ThermalInsulation::Mm500 => "500mm",
        }
    }

    /// Ci per Table 52.2
    pub fn factor(&self) -> f64 {
        match self {
            ThermalInsulation::None => 1.0,
            ThermalInsulation::Mm50 => 0.88,
            ThermalInsulation::Mm100 => 0.78,
            ThermalInsulation::Mm200 => 0.63,
            ThermalInsulation::Mm400 => 0.51,
            ThermalInsulation::Mm500 => 0.50,
        }
    }
}

/// Number of circuits grouped together (Cg), bunched or clipped touching.
///
/// Serialized as the circuit count string the selector submits ("1".."20").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Grouping(u8);

/// (circuits, Cg) per Table 4C1
const GROUPING_TABLE: [(u8, f64); 12] = [
    (1, 1.00),
    (2, 0.80),
    (3, 0.70),
    (4, 0.65),
    (5, 0.60),
    (6, 0.57),
    (7, 0.54),
    (8, 0.52),
    (9, 0.50),
    (12, 0.45),
    (16, 0.41),
    (20, 0.38),
];

impl Default for Grouping {
    fn default() -> Self {
        Grouping(1)
    }
}

impl Grouping {
    /// Circuit counts offered in the selector
    pub fn all() -> impl Iterator<Item = Grouping> {
        GROUPING_TABLE.iter().map(|(n, _)| Grouping(*n))
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let circuits: u8 = key.trim().parse().ok()?;
        GROUPING_TABLE
            .iter()
            .find(|(n, _)| *n == circuits)
            .map(|(n, _)| Grouping(*n))
    }

    pub fn circuits(&self) -> u8 {
        self.0
    }

    pub fn factor(&self) -> f64 {
        GROUPING_TABLE
            .iter()
            .find(|(n, _)| *n == self.0)
            .map(|(_, cg)| *cg)
            .unwrap_or(1.0)
    }
}

impl TryFrom<String> for Grouping {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Grouping::from_key(&value).ok_or_else(|| format!("unknown grouping '{}'", value))
    }
}

impl From<Grouping> for String {
    fn from(g: Grouping) -> Self {
        g.0.to_string()
    }
}

/// Applied derating factors and their product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeratingFactors {
    /// Ambient temperature factor
    pub ca: f64,
    /// Thermal insulation factor
    pub ci: f64,
    /// Grouping factor
    pub cg: f64,
    /// ca × ci × cg
    pub combined: f64,
}

impl DeratingFactors {
    pub fn new(ca: f64, ci: f64, cg: f64) -> Self {
        DeratingFactors {
            ca,
            ci,
            cg,
            combined: ca * ci * cg,
        }
    }
}

impl Default for DeratingFactors {
    fn default() -> Self {
        DeratingFactors::new(1.0, 1.0, 1.0)
    }
}
