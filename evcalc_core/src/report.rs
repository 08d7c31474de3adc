//! # Calculation Reports
//!
//! A `Report` collects finished calculations for one site so a host can
//! keep or hand over a record of what was calculated, with which limits,
//! and when. Reports serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Report
//! ├── meta: ReportMetadata (version, id, installer, site, timestamp)
//! ├── limits: DesignLimits (thresholds the results were checked against)
//! └── items: Vec<CalculationItem> (in the order they were run)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use evcalc_core::calculations::{CalculationInputs, CalculationItem};
//! use evcalc_core::report::Report;
//!
//! let mut report = Report::new("A. Sparks", "12 High Street");
//! let item = CalculationItem::ev_load("Driveway", CalculationInputs::default(), &report.limits).unwrap();
//! report.add_item(item);
//!
//! let json = serde_json::to_string_pretty(&report).unwrap();
//! assert!(json.contains("Driveway"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::CalculationItem;
use crate::settings::DesignLimits;

/// Current schema version for report files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Shown with every set of results.
pub const ADVISORY_NOTICE: &str =
    "Advisory only: professional design is required. These results do not replace certified design sign-off.";

/// Root report container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMetadata,

    /// Limits the results were checked against
    #[serde(default)]
    pub limits: DesignLimits,

    pub items: Vec<CalculationItem>,
}

impl Report {
    /// Create an empty report with default limits.
    pub fn new(installer: impl Into<String>, site: impl Into<String>) -> Self {
        Report::with_limits(installer, site, DesignLimits::default())
    }

    pub fn with_limits(installer: impl Into<String>, site: impl Into<String>, limits: DesignLimits) -> Self {
        Report {
            meta: ReportMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                installer: installer.into(),
                site: site.into(),
                created: Utc::now(),
            },
            limits,
            items: Vec::new(),
        }
    }

    /// Append a finished calculation.
    pub fn add_item(&mut self, item: CalculationItem) {
        self.items.push(item);
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// True when every item passes its checks
    pub fn passes(&self) -> bool {
        self.items.iter().all(|item| item.passes())
    }

    /// Labels of items that fail their checks
    pub fn failing_labels(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| !item.passes())
            .map(|item| item.label())
            .collect()
    }
}

/// Report metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub id: Uuid,

    /// Installer or designer name
    pub installer: String,

    /// Site address or job reference
    pub site: String,

    pub created: DateTime<Utc>,
}
