//! Reporting engine for the retail dataset.
//!
//! Every report is a pure function over a borrowed [`Dataset`] and a
//! [`ReportParams`]; nothing here reads the wall clock or mutates input.

pub mod errors;
pub mod kind;
pub mod numeric;
pub mod output;
pub mod params;
pub mod rank;
pub mod render;
pub mod reports;
pub mod rows;
pub mod set;

pub use errors::{ReportError, Result};
pub use kind::ReportKind;
pub use output::{ArtifactEntry, write_report_csv, write_report_set};
pub use params::{DateWindow, ReportParams};
pub use render::render_markdown;
pub use reports::{
    best_selling_day, category_claims, claims_in_year, claims_within_window,
    country_claim_risk, high_volume_months, least_selling_product, recent_launch_claims,
    store_growth,
};
pub use rows::{
    BestSellingDayRow, CategoryClaimsRow, CountryRiskRow, HighVolumeMonthRow,
    LeastSellingProductRow, RecentLaunchClaimsRow, StoreGrowthRow,
};
pub use set::{ReportResult, ReportSet};

pub use retailscope_core::Dataset;
