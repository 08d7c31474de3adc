//! EV Charger Types
//!
//! Rated output and phase count for the charger categories offered in the
//! load calculator. Keys match the values the form selector submits
//! (e.g. `"7kw-ac"`).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::units::Kilowatts;

/// Standard charging point categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargerType {
    /// 3.6 kW single-phase (16 A) wallbox
    #[serde(rename = "3kw-ac")]
    Ac3kw,
    /// 7 kW single-phase (32 A) wallbox
    #[serde(rename = "7kw-ac")]
    Ac7kw,
    /// 11 kW three-phase (16 A/phase)
    #[serde(rename = "11kw-ac")]
    Ac11kw,
    /// 22 kW three-phase (32 A/phase)
    #[serde(rename = "22kw-ac")]
    Ac22kw,
    /// 50 kW DC rapid charger
    #[serde(rename = "50kw-dc")]
    Dc50kw,
    /// 150 kW DC ultra-rapid charger
    #[serde(rename = "150kw-dc")]
    Dc150kw,
    /// 350 kW DC high-power charger
    #[serde(rename = "350kw-dc")]
    Dc350kw,
}

static BY_KEY: Lazy<HashMap<&'static str, ChargerType>> =
    Lazy::new(|| ChargerType::ALL.iter().map(|c| (c.key(), *c)).collect());

impl ChargerType {
    /// All charger types for UI selection (smallest first)
    pub const ALL: [ChargerType; 7] = [
        ChargerType::Ac3kw,
        ChargerType::Ac7kw,
        ChargerType::Ac11kw,
        ChargerType::Ac22kw,
        ChargerType::Dc50kw,
        ChargerType::Dc150kw,
        ChargerType::Dc350kw,
    ];

    /// Look up a charger by its selector key.
    pub fn from_key(key: &str) -> Option<Self> {
        BY_KEY.get(key).copied()
    }

    /// Selector key (e.g. "7kw-ac")
    pub fn key(&self) -> &'static str {
        match self {
            ChargerType::Ac3kw => "3kw-ac",
            ChargerType::Ac7kw => "7kw-ac",
            ChargerType::Ac11kw => "11kw-ac",
            ChargerType::Ac22kw => "22kw-ac",
            ChargerType::Dc50kw => "50kw-dc",
            ChargerType::Dc150kw => "150kw-dc",
            ChargerType::Dc350kw => "350kw-dc",
        }
    }

    /// Rated output power
    pub fn rated_power(&self) -> Kilowatts {
        Kilowatts(match self {
            ChargerType::Ac3kw => 3.6,
            ChargerType::Ac7kw => 7.0,
            ChargerType::Ac11kw => 11.0,
            ChargerType::Ac22kw => 22.0,
            ChargerType::Dc50kw => 50.0,
            ChargerType::Dc150kw => 150.0,
            ChargerType::Dc350kw => 350.0,
        })
    }

    /// Number of supply phases the charger connects to
    pub fn phases(&self) -> u8 {
        match self {
            ChargerType::Ac3kw | ChargerType::Ac7kw => 1,
            _ => 3,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            ChargerType::Ac3kw => "3.6kW AC (single-phase)",
            ChargerType::Ac7kw => "7kW AC (single-phase)",
            ChargerType::Ac11kw => "11kW AC (three-phase)",
            ChargerType::Ac22kw => "22kW AC (three-phase)",
            ChargerType::Dc50kw => "50kW DC rapid",
            ChargerType::Dc150kw => "150kW DC ultra-rapid",
            ChargerType::Dc350kw => "350kW DC high-power",
        }
    }
}

impl std::fmt::Display for ChargerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_resolve() {
        for charger in ChargerType::ALL {
            assert_eq!(ChargerType::from_key(charger.key()), Some(charger));
        }
        assert_eq!(ChargerType::from_key("9kw-ac"), None);
    }

    #[test]
    fn test_serde_uses_selector_key() {
        let json = serde_json::to_string(&ChargerType::Ac7kw).unwrap();
        assert_eq!(json, "\"7kw-ac\"");
    }

    #[test]
    fn test_ratings() {
        assert_eq!(ChargerType::Ac7kw.rated_power(), Kilowatts(7.0));
        assert_eq!(ChargerType::Ac7kw.phases(), 1);
        assert_eq!(ChargerType::Ac22kw.phases(), 3);
    }
}
