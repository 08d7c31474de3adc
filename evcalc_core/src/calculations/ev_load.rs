//! # EV Charger Load Calculation
//!
//! Sizes the supply cable and protective device for one or more EV charging
//! points and checks the result against voltage drop and supply capacity.
//!
//! ## Method
//!
//! 1. Connected load: Σ rated power × quantity
//! 2. Diversified load: connected load × diversity factor
//! 3. Design current Ib from the diversified load (single- or three-phase)
//! 4. Derating: Ca × Ci × Cg
//! 5. Smallest SWA cable with It × Ca × Ci × Cg ≥ Ib, then the smallest
//!    device rating with Ib ≤ In ≤ Iz
//! 6. Voltage drop: Ib × mV/A/m × L / (V × 1000) × 100
//! 7. Headroom: available supply current − Ib
//!
//! Results are advisory. Professional design is still required before
//! installation; nothing here replaces certified design sign-off.
//!
//! ## Example
//!
//! ```rust
//! use evcalc_core::calculations::ev_load::{calculate, CalculationInputs, ChargingPoint};
//!
//! let inputs = CalculationInputs {
//!     charging_points: vec![ChargingPoint::new("7kw-ac", 1)],
//!     supply_voltage: 230.0,
//!     power_factor: 1.0,
//!     cable_length: 10.0,
//!     ..CalculationInputs::default()
//! };
//!
//! let result = calculate(&inputs).unwrap();
//! assert_eq!(result.total_nominal_power, 7.0);
//! assert!((result.design_current - 30.43).abs() < 0.01);
//! assert_eq!(result.selected_protection.as_deref(), Some("32A Type B MCB"));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{require_finite, CalcError, CalcResult};
use crate::settings::DesignLimits;
use crate::supply::{SupplyPhase, MIN_SUPPLY_VOLTAGE};
use crate::tables::{
    cables, protection, AmbientTemp, ChargerType, DeratingFactors, DiversityScenario, EarthingSystem, Grouping,
    ThermalInsulation,
};
use crate::units::{Amps, Kilowatts, Metres, Volts};

/// Loads up to 16 A per phase (3.68 kW single-phase) fall under connect-and-notify
/// without prior DNO involvement.
pub const DNO_NO_NOTIFICATION_KW: f64 = 3.68;
/// Upper bound for the post-installation notification route
pub const DNO_NOTIFY_KW: f64 = 32.0;
/// Upper bound for a standard application before installation
pub const DNO_APPLICATION_KW: f64 = 100.0;

/// One or more identical charging points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingPoint {
    /// Charger selector key (e.g. "7kw-ac")
    pub charger_type: String,
    /// Number of chargers of this type (≥ 1)
    pub quantity: u32,
}

impl ChargingPoint {
    pub fn new(charger_type: impl Into<String>, quantity: u32) -> Self {
        ChargingPoint {
            charger_type: charger_type.into(),
            quantity,
        }
    }
}

/// Inputs for the EV load calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "chargingPoints": [{ "chargerType": "7kw-ac", "quantity": 2 }],
///   "supplyVoltage": 415.0,
///   "earthingSystem": "tn-c-s",
///   "availableCapacity": 69.0,
///   "cableLength": 25.0,
///   "diversityScenario": "multi-dwelling",
///   "powerFactor": 0.95,
///   "ambientTemp": "30c",
///   "thermalInsulation": "none",
///   "groupedCircuits": "1"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculationInputs {
    pub charging_points: Vec<ChargingPoint>,

    /// Nominal supply voltage (V), line-to-line for three-phase
    pub supply_voltage: f64,

    /// Earthing selector key ("tn-s", "tn-c-s", "tt", any case); unknown
    /// keys give no PME warning and no earthing notes
    pub earthing_system: String,

    /// Spare supply capacity (kW); zero is allowed
    pub available_capacity: f64,

    /// Route length from origin to the furthest charging point (m)
    pub cable_length: f64,

    /// Diversity selector key; unknown keys apply no diversity
    pub diversity_scenario: String,

    /// Power factor in (0, 1]
    pub power_factor: f64,

    /// Ambient temperature selector key (Ca)
    pub ambient_temp: String,

    /// Thermal insulation selector key (Ci)
    pub thermal_insulation: String,

    /// Grouped circuits selector key (Cg)
    pub grouped_circuits: String,
}

impl Default for CalculationInputs {
    /// Form defaults: one 7 kW charger on a 100 A single-phase PME supply.
    fn default() -> Self {
        CalculationInputs {
            charging_points: vec![ChargingPoint::new(ChargerType::Ac7kw.key(), 1)],
            supply_voltage: 230.0,
            earthing_system: EarthingSystem::TnCS.key().to_string(),
            available_capacity: 23.0,
            cable_length: 10.0,
            diversity_scenario: DiversityScenario::None.key().to_string(),
            power_factor: 1.0,
            ambient_temp: AmbientTemp::C30.key().to_string(),
            thermal_insulation: ThermalInsulation::None.key().to_string(),
            grouped_circuits: "1".to_string(),
        }
    }
}

impl CalculationInputs {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.charging_points.is_empty() {
            return Err(CalcError::missing_field("chargingPoints"));
        }
        for (i, point) in self.charging_points.iter().enumerate() {
            if point.quantity == 0 {
                return Err(CalcError::invalid_input(
                    format!("chargingPoints[{}].quantity", i),
                    "0",
                    "Quantity must be at least 1",
                ));
            }
        }

        require_finite("supplyVoltage", self.supply_voltage)?;
        if self.supply_voltage < MIN_SUPPLY_VOLTAGE {
            return Err(CalcError::invalid_input(
                "supplyVoltage",
                self.supply_voltage.to_string(),
                format!("Supply voltage must be at least {} V", MIN_SUPPLY_VOLTAGE),
            ));
        }

        require_finite("availableCapacity", self.available_capacity)?;
        if self.available_capacity < 0.0 {
            return Err(CalcError::invalid_input(
                "availableCapacity",
                self.available_capacity.to_string(),
                "Available capacity cannot be negative",
            ));
        }

        require_finite("cableLength", self.cable_length)?;
        if self.cable_length < 0.0 {
            return Err(CalcError::invalid_input(
                "cableLength",
                self.cable_length.to_string(),
                "Cable length cannot be negative",
            ));
        }

        require_finite("powerFactor", self.power_factor)?;
        if self.power_factor <= 0.0 || self.power_factor > 1.0 {
            return Err(CalcError::invalid_input(
                "powerFactor",
                self.power_factor.to_string(),
                "Power factor must be greater than 0 and at most 1",
            ));
        }

        Ok(())
    }

    /// Resolve each charging point's charger type.
    ///
    /// Charger ratings cannot be guessed, so an unknown key is an error.
    pub fn resolved_points(&self) -> CalcResult<Vec<(ChargerType, u32)>> {
        self.charging_points
            .iter()
            .map(|p| {
                ChargerType::from_key(&p.charger_type)
                    .map(|c| (c, p.quantity))
                    .ok_or_else(|| CalcError::unknown_key("charger type", p.charger_type.as_str()))
            })
            .collect()
    }

    /// Resolve the earthing system, `None` when the key is unknown.
    pub fn earthing(&self) -> Option<EarthingSystem> {
        let earthing = EarthingSystem::from_key(&self.earthing_system);
        if earthing.is_none() {
            warn!(
                field = "earthingSystem",
                key = %self.earthing_system,
                "unknown earthing system, skipping PME and TT checks"
            );
        }
        earthing
    }

    pub fn supply_phase(&self) -> SupplyPhase {
        SupplyPhase::from_voltage(Volts(self.supply_voltage))
    }

    /// Diversity multiplier, 1.0 when the scenario key is unknown.
    pub fn diversity_factor(&self) -> f64 {
        factor_or_unity(
            "diversityScenario",
            &self.diversity_scenario,
            DiversityScenario::from_key(&self.diversity_scenario).map(|d| d.factor()),
        )
    }

    /// Ca, Ci and Cg for the selected installation conditions, each 1.0 when
    /// its key is unknown.
    pub fn derating_factors(&self) -> DeratingFactors {
        let ca = factor_or_unity(
            "ambientTemp",
            &self.ambient_temp,
            AmbientTemp::from_key(&self.ambient_temp).map(|a| a.factor()),
        );
        let ci = factor_or_unity(
            "thermalInsulation",
            &self.thermal_insulation,
            ThermalInsulation::from_key(&self.thermal_insulation).map(|t| t.factor()),
        );
        let cg = factor_or_unity(
            "groupedCircuits",
            &self.grouped_circuits,
            Grouping::from_key(&self.grouped_circuits).map(|g| g.factor()),
        );
        DeratingFactors::new(ca, ci, cg)
    }
}

fn factor_or_unity(field: &str, key: &str, factor: Option<f64>) -> f64 {
    factor.unwrap_or_else(|| {
        warn!(field, key, "unknown selector key, applying factor 1.0");
        1.0
    })
}

/// Advisory compliance flags.
///
/// `earth_fault_loop` and `rcd_protection` are simplified checks, not an
/// earth fault loop impedance calculation: they only confirm that a cable
/// and an RCD-capable protective device could be selected at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compliance {
    pub voltage_drop: bool,
    pub earth_fault_loop: bool,
    pub rcd_protection: bool,
}

impl Compliance {
    pub fn all(&self) -> bool {
        self.voltage_drop && self.earth_fault_loop && self.rcd_protection
    }
}

/// Results from the EV load calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Connected load (kW)
    pub total_nominal_power: f64,
    /// Load after diversity (kW)
    pub total_diversified_load: f64,
    /// Diversity multiplier actually applied
    pub diversity_factor: f64,
    pub supply_phase: SupplyPhase,
    /// Ib (A)
    pub design_current: f64,
    /// `None` when no standard cable is large enough
    pub selected_cable: Option<String>,
    pub selected_protection: Option<String>,
    /// In (A) of the selected device
    pub protection_rating: Option<u32>,
    pub voltage_drop_percent: f64,
    /// Available supply capacity expressed as current (A)
    pub available_capacity_current: f64,
    /// Available current minus Ib (A); negative means overload
    pub headroom: f64,
    pub derating_factors: DeratingFactors,
    /// Iz = It × combined derating (A)
    pub derated_capacity: f64,
    /// It, tabulated capacity before derating (A)
    pub cable_capacity: f64,
    pub pme_warning: bool,
    pub dno_guidance: String,
    pub compliance: Compliance,
    pub recommendations: Vec<String>,
}

impl CalculationResult {
    /// True when every compliance flag holds
    pub fn passes(&self) -> bool {
        self.compliance.all()
    }

    /// True when the design current fits within the available supply
    pub fn within_supply_capacity(&self) -> bool {
        self.headroom >= 0.0
    }

    /// First failing compliance check, if any
    pub fn governing_issue(&self) -> Option<&'static str> {
        if !self.compliance.voltage_drop {
            Some("Voltage drop")
        } else if !self.compliance.earth_fault_loop {
            Some("Earth fault loop")
        } else if !self.compliance.rcd_protection {
            Some("RCD protection")
        } else {
            None
        }
    }
}

/// Calculate with the default UK design limits.
pub fn calculate(input: &CalculationInputs) -> CalcResult<CalculationResult> {
    calculate_with_limits(input, &DesignLimits::default())
}

/// Calculate the EV charging installation.
///
/// # Returns
///
/// * `Ok(CalculationResult)` - Calculation results
/// * `Err(CalcError)` - Empty charging point list, unknown charger key,
///   an out-of-range numeric input or invalid limits
pub fn calculate_with_limits(input: &CalculationInputs, limits: &DesignLimits) -> CalcResult<CalculationResult> {
    input.validate()?;
    limits.validate()?;
    let points = input.resolved_points()?;
    let earthing = input.earthing();

    let voltage = Volts(input.supply_voltage);
    let phase = input.supply_phase();

    // === Load ===
    let nominal = points
        .iter()
        .fold(Kilowatts(0.0), |acc, (charger, qty)| acc + charger.rated_power() * f64::from(*qty));
    let diversity_factor = input.diversity_factor();
    let diversified = nominal * diversity_factor;

    let design_current = phase.current_for_power(diversified, voltage, input.power_factor);
    debug!(
        nominal_kw = nominal.0,
        diversified_kw = diversified.0,
        design_current_a = design_current.0,
        %phase,
        "load calculated"
    );

    // === Cable and protection ===
    let derating = input.derating_factors();
    let cable = cables::select_cable(design_current, derating.combined);
    let (cable_capacity, derated_capacity) = match cable {
        Some(c) => (Amps(c.tabulated_a), c.derated_capacity(derating.combined)),
        None => (Amps(0.0), Amps(0.0)),
    };
    let protection_rating = cable.and_then(|_| protection::select_rating(design_current, derated_capacity));

    // === Voltage drop ===
    let length = Metres(input.cable_length);
    let voltage_drop_percent = match cable {
        Some(c) => design_current.0 * c.mv_per_a_m(phase) * length.0 / (voltage.0 * 1000.0) * 100.0,
        None => 0.0,
    };

    // === Supply headroom ===
    let available_current = phase.current_for_power(Kilowatts(input.available_capacity), voltage, input.power_factor);
    let headroom = available_current - design_current;

    let compliance = Compliance {
        voltage_drop: cable.is_some() && voltage_drop_percent <= limits.max_voltage_drop_percent,
        earth_fault_loop: cable.is_some() && protection_rating.is_some(),
        rcd_protection: protection_rating.is_some(),
    };
    let pme_warning = earthing.is_some_and(|e| e.is_pme());

    let mut result = CalculationResult {
        total_nominal_power: nominal.0,
        total_diversified_load: diversified.0,
        diversity_factor,
        supply_phase: phase,
        design_current: design_current.0,
        selected_cable: cable.map(|c| c.label()),
        selected_protection: protection_rating.map(protection::describe),
        protection_rating,
        voltage_drop_percent,
        available_capacity_current: available_current.0,
        headroom: headroom.0,
        derating_factors: derating,
        derated_capacity: derated_capacity.0,
        cable_capacity: cable_capacity.0,
        pme_warning,
        dno_guidance: dno_guidance(diversified).to_string(),
        compliance,
        recommendations: Vec::new(),
    };
    result.recommendations = recommendations(&result, &points, earthing, limits);

    if !result.passes() {
        debug!(issue = ?result.governing_issue(), "design does not comply");
    }

    Ok(result)
}

/// DNO notification route for a diversified load.
pub fn dno_guidance(diversified: Kilowatts) -> &'static str {
    if diversified.0 <= DNO_NO_NOTIFICATION_KW {
        "No notification required: load within 3.68kW (16A per phase)"
    } else if diversified.0 <= DNO_NOTIFY_KW {
        "Notification required: submit the ENA connect-and-notify form within 28 days of installation"
    } else if diversified.0 <= DNO_APPLICATION_KW {
        "Application required: apply to the DNO before installation, a supply assessment may be needed"
    } else {
        "Major connection: formal DNO application required, supply upgrade likely"
    }
}

fn recommendations(
    result: &CalculationResult,
    points: &[(ChargerType, u32)],
    earthing: Option<EarthingSystem>,
    limits: &DesignLimits,
) -> Vec<String> {
    let mut recs = Vec::new();

    if result.selected_cable.is_some() && !result.compliance.voltage_drop {
        recs.push(format!(
            "Voltage drop {:.2}% exceeds {:.1}% - increase cable size or shorten the cable route",
            result.voltage_drop_percent, limits.max_voltage_drop_percent
        ));
    }
    if result.selected_cable.is_none() {
        recs.push(format!(
            "No standard cable carries {:.1}A - use parallel cables, split the circuit or add load management",
            result.design_current
        ));
    } else if result.selected_protection.is_none() {
        recs.push(format!(
            "No standard device rating fits between {:.1}A and {:.1}A - select the next cable size up",
            result.design_current, result.derated_capacity
        ));
    }

    if result.supply_phase == SupplyPhase::Single {
        let mut warned: Vec<ChargerType> = Vec::new();
        for (charger, _) in points {
            if charger.phases() == 3 && !warned.contains(charger) {
                recs.push(format!("{} requires a three-phase supply", charger.display_name()));
                warned.push(*charger);
            }
        }
        if result.design_current > limits.single_phase_current_limit {
            recs.push(format!(
                "Design current {:.1}A exceeds {:.0}A - consider a 3-phase supply",
                result.design_current, limits.single_phase_current_limit
            ));
        }
    }

    if result.headroom < 0.0 {
        recs.push(format!(
            "Design current exceeds available supply capacity by {:.1}A - supply upgrade or dynamic load management required",
            -result.headroom
        ));
    } else if result.headroom < limits.low_headroom_amps {
        recs.push(format!(
            "Low headroom ({:.1}A) - plan for expansion or fit load management",
            result.headroom
        ));
    }

    if result.derating_factors.combined < limits.heavy_derating_threshold {
        recs.push(format!(
            "Combined derating {:.2} is severe - review the cable route, insulation and grouping",
            result.derating_factors.combined
        ));
    }

    match earthing {
        Some(EarthingSystem::TnCS) => recs.push(
            "PME supply: Reg 722.411.4.1 applies - use a charger with PEN fault detection or a TT earth electrode"
                .to_string(),
        ),
        Some(EarthingSystem::Tt) => {
            recs.push("TT system: confirm earth electrode resistance (RA) coordinates with the RCD".to_string())
        }
        Some(EarthingSystem::TnS) | None => {}
    }

    recs.push("Provide a Type A RCD with 6mA DC fault detection, or a Type B RCD, for each charging point".to_string());
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Scenario A: one 7 kW charger, 230 V, no diversity, unity PF
    fn single_7kw() -> CalculationInputs {
        CalculationInputs {
            charging_points: vec![ChargingPoint::new("7kw-ac", 1)],
            supply_voltage: 230.0,
            earthing_system: "tn-s".to_string(),
            available_capacity: 23.0,
            cable_length: 10.0,
            diversity_scenario: "none".to_string(),
            power_factor: 1.0,
            ..CalculationInputs::default()
        }
    }

    /// Scenario B: two 7 kW chargers, 415 V three-phase, 0.8 diversity, 0.95 PF
    fn two_7kw_three_phase() -> CalculationInputs {
        CalculationInputs {
            charging_points: vec![ChargingPoint::new("7kw-ac", 1), ChargingPoint::new("7kw-ac", 1)],
            supply_voltage: 415.0,
            earthing_system: "tn-c-s".to_string(),
            available_capacity: 69.0,
            cable_length: 25.0,
            diversity_scenario: "multi-dwelling".to_string(),
            power_factor: 0.95,
            ..CalculationInputs::default()
        }
    }

    #[test]
    fn test_scenario_a_single_phase() {
        let result = calculate(&single_7kw()).unwrap();

        assert_eq!(result.total_nominal_power, 7.0);
        assert_eq!(result.total_diversified_load, 7.0);
        assert_eq!(result.supply_phase, SupplyPhase::Single);
        // 7000 / 230 = 30.43 A
        assert_relative_eq!(result.design_current, 30.434_78, epsilon = 1e-4);

        assert_eq!(result.selected_cable.as_deref(), Some("1.5mm² SWA"));
        assert_eq!(result.cable_capacity, 32.0);
        assert_eq!(result.derated_capacity, 32.0);
        assert_eq!(result.protection_rating, Some(32));

        // 30.43 × 29 × 10 / 230000 × 100 = 3.84 %
        assert_relative_eq!(result.voltage_drop_percent, 3.837, epsilon = 1e-3);
        assert!(result.compliance.voltage_drop);

        // 23 kW / 230 V = 100 A available
        assert_relative_eq!(result.available_capacity_current, 100.0, epsilon = 1e-9);
        assert_relative_eq!(result.headroom, 69.565, epsilon = 1e-3);
        assert!(result.passes());
        assert!(!result.pme_warning);
    }

    #[test]
    fn test_scenario_b_three_phase_with_diversity() {
        let result = calculate(&two_7kw_three_phase()).unwrap();

        assert_eq!(result.total_nominal_power, 14.0);
        assert_relative_eq!(result.total_diversified_load, 11.2, epsilon = 1e-9);
        assert_eq!(result.supply_phase, SupplyPhase::Three);
        // 11200 / (415 × 1.732 × 0.95) = 16.40 A
        assert_relative_eq!(result.design_current, 16.40, epsilon = 0.01);
        assert_eq!(result.protection_rating, Some(20));
        assert!(result.pme_warning);
    }

    #[test]
    fn test_diversity_never_amplifies() {
        let result = calculate(&two_7kw_three_phase()).unwrap();
        assert!(result.total_diversified_load <= result.total_nominal_power);
    }

    #[test]
    fn test_unknown_selectors_fall_back_to_unity() {
        let mut input = single_7kw();
        input.diversity_scenario = "stadium".to_string();
        input.ambient_temp = "99c".to_string();
        input.thermal_insulation = "straw".to_string();
        input.grouped_circuits = "11".to_string();

        let result = calculate(&input).unwrap();
        assert_eq!(result.diversity_factor, 1.0);
        assert_eq!(result.derating_factors, DeratingFactors::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_combined_derating_is_product() {
        let mut input = single_7kw();
        input.ambient_temp = "40c".to_string();
        input.thermal_insulation = "100mm".to_string();
        input.grouped_circuits = "4".to_string();

        let result = calculate(&input).unwrap();
        let f = result.derating_factors;
        assert_eq!(f.combined, f.ca * f.ci * f.cg);
        assert_relative_eq!(f.combined, 0.91 * 0.78 * 0.65, epsilon = 1e-12);

        // Iz = It × 0.461 must still carry 30.4 A -> 4mm² (57 × 0.461 = 26.3) is too small, 6mm² (33.7) fits
        assert_eq!(result.selected_cable.as_deref(), Some("6mm² SWA"));
        assert!(result.recommendations.iter().any(|r| r.contains("derating")));
    }

    #[test]
    fn test_empty_charging_points_is_error() {
        let mut input = single_7kw();
        input.charging_points.clear();
        let err = calculate(&input).unwrap_err();
        assert_eq!(err, CalcError::missing_field("chargingPoints"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_invalid_numeric_inputs() {
        let mut input = single_7kw();
        input.power_factor = 0.0;
        assert!(calculate(&input).is_err());

        input.power_factor = 1.05;
        assert!(calculate(&input).is_err());

        let mut input = single_7kw();
        input.supply_voltage = f64::NAN;
        assert_eq!(calculate(&input).unwrap_err().error_code(), "INVALID_INPUT");

        let mut input = single_7kw();
        input.supply_voltage = -230.0;
        assert!(calculate(&input).is_err());

        for voltage in [0.0, 1e-320, 12.0, 49.9] {
            let mut input = single_7kw();
            input.supply_voltage = voltage;
            assert_eq!(calculate(&input).unwrap_err().error_code(), "INVALID_INPUT");
        }

        let mut input = single_7kw();
        input.supply_voltage = MIN_SUPPLY_VOLTAGE;
        let result = calculate(&input).unwrap();
        assert!(result.design_current.is_finite());
        assert!(result.headroom.is_finite());

        let mut input = single_7kw();
        input.charging_points[0].quantity = 0;
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn test_zero_capacity_and_length_allowed() {
        let mut input = single_7kw();
        input.available_capacity = 0.0;
        input.cable_length = 0.0;
        let result = calculate(&input).unwrap();
        assert_eq!(result.voltage_drop_percent, 0.0);
        assert!(!result.within_supply_capacity());
    }

    #[test]
    fn test_unknown_charger_is_error() {
        let mut input = single_7kw();
        input.charging_points[0].charger_type = "9kw-ac".to_string();
        assert_eq!(calculate(&input).unwrap_err().error_code(), "UNKNOWN_KEY");
    }

    #[test]
    fn test_earthing_key_ignores_case() {
        let mut input = single_7kw();
        input.earthing_system = "TN-C-S".to_string();
        let result = calculate(&input).unwrap();
        assert!(result.pme_warning);
        assert!(result.recommendations.iter().any(|r| r.starts_with("PME supply")));
    }

    #[test]
    fn test_unknown_earthing_falls_back() {
        let baseline = calculate(&single_7kw()).unwrap();

        for key in ["", "it", "TN-C"] {
            let mut input = single_7kw();
            input.earthing_system = key.to_string();
            let result = calculate(&input).unwrap();

            assert!(!result.pme_warning);
            assert!(!result.recommendations.iter().any(|r| r.starts_with("PME supply") || r.starts_with("TT system")));
            assert!(result.recommendations.iter().any(|r| r.contains("Type A RCD")));
            assert_eq!(result.design_current, baseline.design_current);
            assert_eq!(result.selected_cable, baseline.selected_cable);
            assert_eq!(result.compliance, baseline.compliance);
        }
    }

    #[test]
    fn test_idempotent() {
        let input = two_7kw_three_phase();
        assert_eq!(calculate(&input).unwrap(), calculate(&input).unwrap());
    }

    #[test]
    fn test_voltage_drop_failure() {
        let mut input = single_7kw();
        input.cable_length = 50.0;
        let result = calculate(&input).unwrap();

        assert!(result.voltage_drop_percent > 5.0);
        assert!(!result.compliance.voltage_drop);
        assert_eq!(result.governing_issue(), Some("Voltage drop"));
        assert!(result.recommendations[0].contains("increase cable size"));
    }

    #[test]
    fn test_no_cable_large_enough() {
        let mut input = two_7kw_three_phase();
        input.charging_points = vec![ChargingPoint::new("350kw-dc", 10)];
        input.diversity_scenario = "none".to_string();
        let result = calculate(&input).unwrap();

        assert!(result.selected_cable.is_none());
        assert!(result.selected_protection.is_none());
        assert_eq!(result.voltage_drop_percent, 0.0);
        assert_eq!(result.cable_capacity, 0.0);
        assert!(!result.compliance.voltage_drop);
        assert!(!result.compliance.earth_fault_loop);
        assert!(!result.compliance.rcd_protection);
        assert!(result.recommendations.iter().any(|r| r.contains("No standard cable")));
    }

    #[test]
    fn test_headroom_warnings() {
        let mut input = single_7kw();
        // 9 kW -> 39.1 A available, 8.7 A headroom
        input.available_capacity = 9.0;
        let result = calculate(&input).unwrap();
        assert!(result.headroom > 0.0 && result.headroom < 10.0);
        assert!(result.recommendations.iter().any(|r| r.starts_with("Low headroom")));

        // 5 kW -> 21.7 A available, overloaded
        input.available_capacity = 5.0;
        let result = calculate(&input).unwrap();
        assert!(result.headroom < 0.0);
        assert!(result.recommendations.iter().any(|r| r.contains("exceeds available supply capacity")));
    }

    #[test]
    fn test_large_single_phase_load_suggests_three_phase() {
        let mut input = single_7kw();
        input.charging_points = vec![ChargingPoint::new("7kw-ac", 4)];
        input.available_capacity = 40.0;
        let result = calculate(&input).unwrap();

        // 28000 / 230 = 121.7 A
        assert!(result.design_current > 100.0);
        assert_eq!(result.selected_cable.as_deref(), Some("16mm² SWA"));
        assert_eq!(result.protection_rating, Some(125));
        assert!(result.recommendations.iter().any(|r| r.contains("consider a 3-phase supply")));
    }

    #[test]
    fn test_three_phase_charger_on_single_phase_supply() {
        let mut input = single_7kw();
        input.charging_points = vec![ChargingPoint::new("22kw-ac", 2)];
        input.available_capacity = 60.0;
        let result = calculate(&input).unwrap();
        let warnings = result
            .recommendations
            .iter()
            .filter(|r| r.contains("requires a three-phase supply"))
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_dno_guidance_thresholds() {
        assert!(dno_guidance(Kilowatts(3.6)).starts_with("No notification required"));
        assert!(dno_guidance(Kilowatts(7.0)).starts_with("Notification required"));
        assert!(dno_guidance(Kilowatts(50.0)).starts_with("Application required"));
        assert!(dno_guidance(Kilowatts(150.0)).starts_with("Major connection"));
    }

    #[test]
    fn test_dno_guidance_band_edges_are_inclusive() {
        assert!(dno_guidance(Kilowatts(3.68)).starts_with("No notification required"));
        assert!(dno_guidance(Kilowatts(3.69)).starts_with("Notification required"));
        assert!(dno_guidance(Kilowatts(32.0)).starts_with("Notification required"));
        assert!(dno_guidance(Kilowatts(32.01)).starts_with("Application required"));
        assert!(dno_guidance(Kilowatts(100.0)).starts_with("Application required"));
        assert!(dno_guidance(Kilowatts(100.01)).starts_with("Major connection"));
    }

    #[test]
    fn test_custom_limits() {
        let limits = DesignLimits {
            max_voltage_drop_percent: 3.0,
            ..DesignLimits::default()
        };
        // 3.84 % passes at 5 % but fails at 3 %
        let result = calculate_with_limits(&single_7kw(), &limits).unwrap();
        assert!(!result.compliance.voltage_drop);
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let limits = DesignLimits {
            max_voltage_drop_percent: f64::NAN,
            ..DesignLimits::default()
        };
        let err = calculate_with_limits(&single_7kw(), &limits).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_inputs_json_uses_form_field_names() {
        let json = r#"{
            "chargingPoints": [{ "chargerType": "7kw-ac", "quantity": 2 }],
            "supplyVoltage": 415.0,
            "diversityScenario": "multi-dwelling",
            "powerFactor": 0.95
        }"#;
        let input: CalculationInputs = serde_json::from_str(json).unwrap();
        assert_eq!(input.charging_points[0].quantity, 2);
        // Missing fields take the form defaults
        assert_eq!(input.earthing_system, "tn-c-s");
        assert_eq!(input.grouped_circuits, "1");

        let result = calculate(&input).unwrap();
        let out = serde_json::to_value(&result).unwrap();
        assert!(out.get("designCurrent").is_some());
        assert!(out["compliance"].get("rcdProtection").is_some());
    }
}
