use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ReportError;

/// The nine reports, in their canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    ClaimsInYear,
    BestSellingDay,
    LeastSellingProduct,
    ClaimsWithinWindow,
    RecentLaunchClaims,
    HighVolumeMonths,
    CategoryClaims,
    CountryClaimRisk,
    StoreGrowth,
}

impl ReportKind {
    pub const ALL: [ReportKind; 9] = [
        ReportKind::ClaimsInYear,
        ReportKind::BestSellingDay,
        ReportKind::LeastSellingProduct,
        ReportKind::ClaimsWithinWindow,
        ReportKind::RecentLaunchClaims,
        ReportKind::HighVolumeMonths,
        ReportKind::CategoryClaims,
        ReportKind::CountryClaimRisk,
        ReportKind::StoreGrowth,
    ];

    /// Stable identifier used on the command line and for artifact names.
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::ClaimsInYear => "claims-in-year",
            ReportKind::BestSellingDay => "best-selling-day",
            ReportKind::LeastSellingProduct => "least-selling-product",
            ReportKind::ClaimsWithinWindow => "claims-within-window",
            ReportKind::RecentLaunchClaims => "recent-launch-claims",
            ReportKind::HighVolumeMonths => "high-volume-months",
            ReportKind::CategoryClaims => "category-claims",
            ReportKind::CountryClaimRisk => "country-claim-risk",
            ReportKind::StoreGrowth => "store-growth",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::ClaimsInYear => "Warranty claims filed in year",
            ReportKind::BestSellingDay => "Best-selling day per store",
            ReportKind::LeastSellingProduct => "Least-selling product per country",
            ReportKind::ClaimsWithinWindow => "Claims filed shortly after sale",
            ReportKind::RecentLaunchClaims => "Claims for recently launched products",
            ReportKind::HighVolumeMonths => "High-volume months",
            ReportKind::CategoryClaims => "Claims per category",
            ReportKind::CountryClaimRisk => "Claim risk per country",
            ReportKind::StoreGrowth => "Year-over-year store growth",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace('_', "-");
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == normalized)
            .ok_or_else(|| ReportError::UnknownReport(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip_through_from_str() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.slug().parse::<ReportKind>().unwrap(), kind);
        }
        assert_eq!(
            "COUNTRY_CLAIM_RISK".parse::<ReportKind>().unwrap(),
            ReportKind::CountryClaimRisk
        );
        assert!("churn".parse::<ReportKind>().is_err());
    }

    #[test]
    fn serde_uses_slug() {
        let json = serde_json::to_string(&ReportKind::StoreGrowth).unwrap();
        assert_eq!(json, "\"store-growth\"");
    }
}
