use std::thread;

use serde::Serialize;

use retailscope_core::Dataset;

use crate::kind::ReportKind;
use crate::params::ReportParams;
use crate::reports;
use crate::rows::{
    BestSellingDayRow, CategoryClaimsRow, CountryRiskRow, HighVolumeMonthRow,
    LeastSellingProductRow, RecentLaunchClaimsRow, StoreGrowthRow,
};

/// Output of a single report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "report", content = "result", rename_all = "kebab-case")]
pub enum ReportResult {
    ClaimsInYear(u64),
    BestSellingDay(Vec<BestSellingDayRow>),
    LeastSellingProduct(Vec<LeastSellingProductRow>),
    ClaimsWithinWindow(u64),
    RecentLaunchClaims(Vec<RecentLaunchClaimsRow>),
    HighVolumeMonths(Vec<HighVolumeMonthRow>),
    CategoryClaims(Vec<CategoryClaimsRow>),
    CountryClaimRisk(Vec<CountryRiskRow>),
    StoreGrowth(Vec<StoreGrowthRow>),
}

impl ReportResult {
    /// Compute one report.
    pub fn compute(kind: ReportKind, dataset: &Dataset, params: &ReportParams) -> Self {
        match kind {
            ReportKind::ClaimsInYear => {
                ReportResult::ClaimsInYear(reports::claims_in_year(dataset, params))
            }
            ReportKind::BestSellingDay => {
                ReportResult::BestSellingDay(reports::best_selling_day(dataset, params))
            }
            ReportKind::LeastSellingProduct => {
                ReportResult::LeastSellingProduct(reports::least_selling_product(dataset, params))
            }
            ReportKind::ClaimsWithinWindow => {
                ReportResult::ClaimsWithinWindow(reports::claims_within_window(dataset, params))
            }
            ReportKind::RecentLaunchClaims => {
                ReportResult::RecentLaunchClaims(reports::recent_launch_claims(dataset, params))
            }
            ReportKind::HighVolumeMonths => {
                ReportResult::HighVolumeMonths(reports::high_volume_months(dataset, params))
            }
            ReportKind::CategoryClaims => {
                ReportResult::CategoryClaims(reports::category_claims(dataset, params))
            }
            ReportKind::CountryClaimRisk => {
                ReportResult::CountryClaimRisk(reports::country_claim_risk(dataset, params))
            }
            ReportKind::StoreGrowth => {
                ReportResult::StoreGrowth(reports::store_growth(dataset, params))
            }
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            ReportResult::ClaimsInYear(_) => ReportKind::ClaimsInYear,
            ReportResult::BestSellingDay(_) => ReportKind::BestSellingDay,
            ReportResult::LeastSellingProduct(_) => ReportKind::LeastSellingProduct,
            ReportResult::ClaimsWithinWindow(_) => ReportKind::ClaimsWithinWindow,
            ReportResult::RecentLaunchClaims(_) => ReportKind::RecentLaunchClaims,
            ReportResult::HighVolumeMonths(_) => ReportKind::HighVolumeMonths,
            ReportResult::CategoryClaims(_) => ReportKind::CategoryClaims,
            ReportResult::CountryClaimRisk(_) => ReportKind::CountryClaimRisk,
            ReportResult::StoreGrowth(_) => ReportKind::StoreGrowth,
        }
    }

    /// Rows in the result; count reports always have one.
    pub fn row_count(&self) -> usize {
        match self {
            ReportResult::ClaimsInYear(_) | ReportResult::ClaimsWithinWindow(_) => 1,
            ReportResult::BestSellingDay(rows) => rows.len(),
            ReportResult::LeastSellingProduct(rows) => rows.len(),
            ReportResult::RecentLaunchClaims(rows) => rows.len(),
            ReportResult::HighVolumeMonths(rows) => rows.len(),
            ReportResult::CategoryClaims(rows) => rows.len(),
            ReportResult::CountryClaimRisk(rows) => rows.len(),
            ReportResult::StoreGrowth(rows) => rows.len(),
        }
    }
}

/// A batch of report results computed against one dataset snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSet {
    pub params: ReportParams,
    pub reports: Vec<ReportResult>,
}

impl ReportSet {
    /// Compute the selected reports one after another, in canonical order.
    pub fn run(dataset: &Dataset, params: &ReportParams, kinds: &[ReportKind]) -> Self {
        let reports = normalize(kinds)
            .into_iter()
            .map(|kind| {
                tracing::debug!(event = "report_computed", report = kind.slug());
                ReportResult::compute(kind, dataset, params)
            })
            .collect();

        Self {
            params: params.clone(),
            reports,
        }
    }

    pub fn run_all(dataset: &Dataset, params: &ReportParams) -> Self {
        Self::run(dataset, params, &ReportKind::ALL)
    }

    /// Compute the selected reports on scoped threads.
    ///
    /// The dataset is shared read-only, so the result is identical to
    /// [`ReportSet::run`].
    pub fn run_parallel(dataset: &Dataset, params: &ReportParams, kinds: &[ReportKind]) -> Self {
        let kinds = normalize(kinds);
        let reports: Vec<ReportResult> = thread::scope(|scope| {
            let handles: Vec<_> = kinds
                .iter()
                .map(|kind| {
                    let kind = *kind;
                    scope.spawn(move || ReportResult::compute(kind, dataset, params))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        });

        Self {
            params: params.clone(),
            reports,
        }
    }

    pub fn get(&self, kind: ReportKind) -> Option<&ReportResult> {
        self.reports.iter().find(|result| result.kind() == kind)
    }
}

fn normalize(kinds: &[ReportKind]) -> Vec<ReportKind> {
    let mut kinds = kinds.to_vec();
    kinds.sort();
    kinds.dedup();
    kinds
}
