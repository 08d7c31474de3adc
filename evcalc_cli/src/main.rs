//! # Evcalc CLI
//!
//! Command-line host for the EV charging calculators. Collects inputs from
//! flags or a JSON document, runs the engine and prints the results.
//!
//! ```sh
//! # Two 7 kW chargers on a 415 V PME supply
//! evcalc load --charger 7kw-ac:2 --voltage 415 --diversity multi-dwelling
//!
//! # Inputs from a file, report saved alongside
//! evcalc load --input site.json --save site-report.json --site "12 High Street"
//!
//! # RCD test at 5x rated current
//! evcalc rcd --rating 30mA --multiplier 5x --actual 25
//!
//! # List every selector key
//! evcalc tables
//!
//! # Summarise a saved report
//! evcalc report site-report.json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use evcalc_core::calculations::rcd_trip::{self, RcdRating, RcdTestInput, RcdTestResult, TestMultiplier};
use evcalc_core::tables::{
    cables, protection, AmbientTemp, ChargerType, DiversityScenario, EarthingSystem, Grouping, ThermalInsulation,
};
use evcalc_core::{
    load_json, load_report, save_report, CalcError, CalcResult, CalculationInputs, CalculationItem, CalculationResult,
    ChargingPoint, DesignLimits, Report, ADVISORY_NOTICE,
};

/// EV charging installation calculator for UK electricians.
#[derive(Parser, Debug)]
#[command(
    name = "evcalc",
    version,
    about = "EV charger load, cable sizing and RCD trip-time calculations",
    long_about = "Evcalc - advisory EV charging calculations (BS 7671 / IET Code of Practice).\n\n\
                  Results support, and never replace, professional design."
)]
struct Cli {
    /// Log level or filter directive (trace, debug, info, warn, error).
    #[arg(short, long, global = true, env = "EVCALC_LOG")]
    log_level: Option<String>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Design limits JSON file (voltage drop, headroom and derating thresholds).
    #[arg(long, global = true)]
    limits: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// EV charging load, cable, protection and voltage drop calculation.
    Load(LoadArgs),
    /// RCD maximum trip time lookup and test assessment.
    Rcd(RcdArgs),
    /// List charger, earthing, diversity, derating, cable and RCD tables.
    Tables,
    /// Summarise a saved report.
    Report {
        /// Report JSON file written by `--save`.
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Inputs JSON document; flags below override its fields.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Charging point as KEY or KEY:QTY (repeatable), e.g. 7kw-ac:2
    #[arg(short, long = "charger", value_parser = parse_charging_point)]
    chargers: Vec<ChargingPoint>,

    /// Supply voltage (V); 380 V and above is three-phase.
    #[arg(long)]
    voltage: Option<f64>,

    /// Earthing system key (tn-s, tn-c-s, tt).
    #[arg(long)]
    earthing: Option<String>,

    /// Available supply capacity (kW).
    #[arg(long)]
    capacity: Option<f64>,

    /// Cable route length (m).
    #[arg(long)]
    length: Option<f64>,

    /// Diversity scenario key.
    #[arg(long)]
    diversity: Option<String>,

    /// Power factor, greater than 0 and at most 1.
    #[arg(long)]
    power_factor: Option<f64>,

    /// Ambient temperature key (e.g. 30c).
    #[arg(long)]
    ambient: Option<String>,

    /// Thermal insulation key (e.g. none, 100mm).
    #[arg(long)]
    insulation: Option<String>,

    /// Number of grouped circuits key (e.g. 1, 4, 12).
    #[arg(long)]
    grouping: Option<String>,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Args, Debug)]
struct RcdArgs {
    /// RCD rated residual current (30mA, 100mA, 300mA).
    #[arg(short, long)]
    rating: RcdRating,

    /// Test current multiplier (1x, 5x).
    #[arg(short, long, default_value = "1x")]
    multiplier: TestMultiplier,

    /// Measured trip time (ms).
    #[arg(short, long)]
    actual: Option<f64>,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Save the calculation as a JSON report.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Label for the calculation within the report.
    #[arg(long, default_value = "Calculation 1")]
    label: String,

    /// Installer or designer name for the report.
    #[arg(long, env = "EVCALC_INSTALLER", default_value = "")]
    installer: String,

    /// Site address or job reference for the report.
    #[arg(long, default_value = "")]
    site: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

/// Install the subscriber: `--log-level` wins, then `RUST_LOG`, then `warn`.
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> CalcResult<()> {
    let limits = match &cli.limits {
        Some(path) => {
            let limits: DesignLimits = load_json(path)?;
            limits.validate()?;
            info!(path = %path.display(), "design limits loaded");
            limits
        }
        None => DesignLimits::default(),
    };

    match &cli.command {
        Command::Load(args) => run_load(args, &limits, cli.json),
        Command::Rcd(args) => run_rcd(args, &limits, cli.json),
        Command::Tables => {
            print_tables();
            Ok(())
        }
        Command::Report { path } => show_report(path, cli.json),
    }
}

fn run_load(args: &LoadArgs, limits: &DesignLimits, json: bool) -> CalcResult<()> {
    let inputs = build_inputs(args)?;
    debug!(points = inputs.charging_points.len(), "inputs assembled");

    let item = CalculationItem::ev_load(args.report.label.clone(), inputs, limits)?;
    if let CalculationItem::EvLoad { inputs, result, .. } = &item {
        if json {
            print_json(result)?;
        } else {
            print_load_result(inputs, result, limits);
        }
    }

    maybe_save(&args.report, limits, item)
}

fn run_rcd(args: &RcdArgs, limits: &DesignLimits, json: bool) -> CalcResult<()> {
    let input = RcdTestInput::new(args.rating, args.multiplier, args.actual);
    let item = CalculationItem::rcd_trip(args.report.label.clone(), input)?;
    if let CalculationItem::RcdTrip { input, result, .. } = &item {
        if json {
            print_json(result)?;
        } else {
            print_rcd_result(input, result);
        }
    }

    maybe_save(&args.report, limits, item)
}

/// Start from the input document (or form defaults) and apply flag overrides.
fn build_inputs(args: &LoadArgs) -> CalcResult<CalculationInputs> {
    let mut inputs = match &args.input {
        Some(path) => load_json::<CalculationInputs>(path)?,
        None => CalculationInputs::default(),
    };

    if !args.chargers.is_empty() {
        inputs.charging_points = args.chargers.clone();
    }
    if let Some(v) = args.voltage {
        inputs.supply_voltage = v;
    }
    if let Some(ref e) = args.earthing {
        inputs.earthing_system = e.clone();
    }
    if let Some(c) = args.capacity {
        inputs.available_capacity = c;
    }
    if let Some(l) = args.length {
        inputs.cable_length = l;
    }
    if let Some(ref d) = args.diversity {
        inputs.diversity_scenario = d.clone();
    }
    if let Some(pf) = args.power_factor {
        inputs.power_factor = pf;
    }
    if let Some(ref a) = args.ambient {
        inputs.ambient_temp = a.clone();
    }
    if let Some(ref i) = args.insulation {
        inputs.thermal_insulation = i.clone();
    }
    if let Some(ref g) = args.grouping {
        inputs.grouped_circuits = g.clone();
    }

    Ok(inputs)
}

fn parse_charging_point(s: &str) -> Result<ChargingPoint, String> {
    let (key, quantity) = match s.split_once(':') {
        Some((key, qty)) => {
            let qty = qty
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid quantity '{}' in '{}'", qty, s))?;
            (key.trim(), qty)
        }
        None => (s.trim(), 1),
    };
    if ChargerType::from_key(key).is_none() {
        let keys: Vec<&str> = ChargerType::ALL.iter().map(|c| c.key()).collect();
        return Err(format!("unknown charger '{}' (expected one of: {})", key, keys.join(", ")));
    }
    Ok(ChargingPoint::new(key, quantity))
}

fn maybe_save(args: &ReportArgs, limits: &DesignLimits, item: CalculationItem) -> CalcResult<()> {
    let Some(path) = &args.save else {
        return Ok(());
    };

    let mut report = Report::with_limits(args.installer.clone(), args.site.clone(), *limits);
    report.add_item(item);
    save_report(&report, path)?;
    eprintln!("Report saved to {}", path.display());
    Ok(())
}

fn show_report(path: &Path, json: bool) -> CalcResult<()> {
    let report = load_report(path)?;
    if json {
        return print_json(&report);
    }

    println!("Report {} ({})", report.meta.id, report.meta.created.format("%Y-%m-%d %H:%M UTC"));
    println!("  Installer: {}", report.meta.installer);
    println!("  Site:      {}", report.meta.site);
    println!();

    for item in &report.items {
        println!("  {} [{}] {}", status_icon(item.passes()), item.calc_type(), item.label());
        match item {
            CalculationItem::EvLoad { result, .. } => {
                let cable = result.selected_cable.as_deref().and_then(cables::by_label);
                match cable {
                    Some(c) => println!(
                        "      {:.2} A on {} ({:.0} A tabulated), {:.2}% drop",
                        result.design_current,
                        c.label(),
                        c.tabulated_a,
                        result.voltage_drop_percent
                    ),
                    None => println!("      {:.2} A, cable TBD", result.design_current),
                }
            }
            CalculationItem::RcdTrip { input, result, .. } => {
                println!(
                    "      {} at {}: max {} ms",
                    input.rating, input.multiplier, result.max_trip_time_ms
                );
            }
        }
    }

    println!();
    let failing = report.failing_labels();
    if failing.is_empty() {
        println!("RESULT: PASS ({} items)", report.item_count());
    } else {
        println!("RESULT: FAIL ({})", failing.join(", "));
    }
    println!();
    println!("{}", ADVISORY_NOTICE);
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    println!("{}", json);
    Ok(())
}

fn print_load_result(inputs: &CalculationInputs, result: &CalculationResult, limits: &DesignLimits) {
    let rule = "═══════════════════════════════════════";
    println!("{}", rule);
    println!("  EV LOAD CALCULATION");
    println!("{}", rule);
    println!();
    println!("Load:");
    for point in &inputs.charging_points {
        let name = ChargerType::from_key(&point.charger_type)
            .map(|c| c.display_name())
            .unwrap_or("Unknown charger");
        println!("  {} x {}", point.quantity, name);
    }
    println!("  Nominal power:     {:.2} kW", result.total_nominal_power);
    println!("  Diversity factor:  {:.2}", result.diversity_factor);
    println!("  Diversified load:  {:.2} kW", result.total_diversified_load);
    println!("  Supply:            {}, {:.0} V", result.supply_phase, inputs.supply_voltage);
    println!("  Design current:    {:.2} A", result.design_current);
    println!();

    let f = &result.derating_factors;
    println!("Cable & Protection:");
    println!(
        "  Derating:          Ca {:.2} x Ci {:.2} x Cg {:.2} = {:.3}",
        f.ca, f.ci, f.cg, f.combined
    );
    match &result.selected_cable {
        Some(cable) => println!(
            "  Cable:             {} ({:.0} A tabulated, {:.1} A derated)",
            cable, result.cable_capacity, result.derated_capacity
        ),
        None => println!("  Cable:             TBD"),
    }
    println!(
        "  Protection:        {}",
        result.selected_protection.as_deref().unwrap_or("TBD")
    );
    println!();

    println!("Checks:");
    println!(
        "  Voltage drop:      {:.2}% (limit {:.1}%) {}",
        result.voltage_drop_percent,
        limits.max_voltage_drop_percent,
        status_icon(result.compliance.voltage_drop)
    );
    println!("  Earth fault loop:  {}", status_icon(result.compliance.earth_fault_loop));
    println!("  RCD protection:    {}", status_icon(result.compliance.rcd_protection));
    println!();

    println!("Supply:");
    println!("  Available current: {:.1} A", result.available_capacity_current);
    println!(
        "  Headroom:          {:.1} A {}",
        result.headroom,
        status_icon(result.within_supply_capacity())
    );
    println!("  DNO:               {}", result.dno_guidance);
    if result.pme_warning {
        println!("  PME:               earthing arrangements need review");
    }

    if !result.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for rec in &result.recommendations {
            println!("  - {}", rec);
        }
    }

    println!();
    println!("{}", rule);
    match result.governing_issue() {
        None => println!("  RESULT: PASS"),
        Some(issue) => println!("  RESULT: FAIL (governs: {})", issue),
    }
    println!("{}", rule);
    println!();
    println!("{}", ADVISORY_NOTICE);
}

fn print_rcd_result(input: &RcdTestInput, result: &RcdTestResult) {
    println!("RCD {} at {}:", input.rating, input.multiplier);
    println!("  Maximum trip time: {} ms", result.max_trip_time_ms);

    if let (Some(actual), Some(compliant)) = (input.actual_trip_time_ms, result.is_compliant) {
        println!("  Measured:          {:.1} ms {}", actual, status_icon(compliant));
    }
    if let Some(margin) = result.safety_margin_percent {
        println!("  Safety margin:     {:.1}%", margin);
    }
    if let Some(risk) = result.risk_level {
        println!("  Risk level:        {}", risk);
    }

    println!();
    println!("{}", ADVISORY_NOTICE);
}

fn print_tables() {
    println!("Chargers:");
    for c in ChargerType::ALL {
        println!("  {:<10} {:<28} {:>6.1} kW  {}ph", c.key(), c.display_name(), c.rated_power().0, c.phases());
    }

    println!();
    println!("Earthing systems:");
    for e in EarthingSystem::ALL {
        println!("  {:<10} {}", e.key(), e.description());
    }

    println!();
    println!("Diversity scenarios:");
    for d in DiversityScenario::ALL {
        println!("  {:<20} {:.2}  {}", d.key(), d.factor(), d.display_name());
    }

    println!();
    println!("Ambient temperature (Ca):");
    for a in AmbientTemp::ALL {
        println!("  {:<6} {:.2}", a.key(), a.factor());
    }

    println!();
    println!("Thermal insulation (Ci):");
    for t in ThermalInsulation::ALL {
        println!("  {:<6} {:.2}", t.key(), t.factor());
    }

    println!();
    println!("Grouped circuits (Cg):");
    for g in Grouping::all() {
        println!("  {:<6} {:.2}", g.circuits(), g.factor());
    }

    println!();
    println!("Cables (SWA XLPE, method C):");
    for c in cables::SWA_CABLES.iter() {
        println!(
            "  {:<14} {:>5.0} A  {:>7.3} / {:>7.3} mV/A/m",
            c.label(),
            c.tabulated_a,
            c.mv_per_a_m_single,
            c.mv_per_a_m_three
        );
    }

    println!();
    println!("Protective devices:");
    for rating in protection::DEVICE_RATINGS {
        println!("  {}", protection::describe(rating));
    }

    println!();
    println!("RCD maximum trip times:");
    for rating in RcdRating::ALL {
        let times: Vec<String> = TestMultiplier::ALL
            .iter()
            .map(|&m| format!("{} {} ms", m, rcd_trip::lookup(rating, m)))
            .collect();
        println!("  {:<6} {}", rating.key(), times.join(", "));
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
