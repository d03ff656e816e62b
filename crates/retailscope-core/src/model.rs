use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A retail location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Store {
    pub store_id: String,
    pub store_name: String,
    pub city: String,
    pub country: String,
}

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Category {
    pub category_id: String,
    pub category_name: String,
}

/// A sellable product; `category_id` references [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub category_id: String,
    pub launch_date: NaiveDate,
    /// Unit price in the dataset currency.
    pub price: Decimal,
}

/// A single sale line: `quantity` units of one product at one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Sale {
    pub sale_id: String,
    pub sale_date: NaiveDate,
    pub store_id: String,
    pub product_id: String,
    pub quantity: i64,
}

/// Warranty claim filed against a sale.
///
/// `sale_id` is optional: orphan claims exist in real exports and behave
/// like a SQL outer-join null in every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WarrantyClaim {
    pub claim_id: String,
    pub claim_date: NaiveDate,
    pub sale_id: Option<String>,
    #[schemars(with = "String")]
    pub repair_status: RepairStatus,
}

/// Repair outcome recorded on a claim. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RepairStatus {
    Pending,
    InProgress,
    Completed,
    Rejected,
    Other(String),
}

impl RepairStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RepairStatus::Pending => "Pending",
            RepairStatus::InProgress => "In Progress",
            RepairStatus::Completed => "Completed",
            RepairStatus::Rejected => "Rejected",
            RepairStatus::Other(label) => label,
        }
    }
}

impl From<String> for RepairStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "pending" => RepairStatus::Pending,
            "in progress" | "in_progress" => RepairStatus::InProgress,
            "completed" => RepairStatus::Completed,
            "rejected" => RepairStatus::Rejected,
            _ => RepairStatus::Other(value),
        }
    }
}

impl From<&str> for RepairStatus {
    fn from(value: &str) -> Self {
        RepairStatus::from(value.to_string())
    }
}

impl From<RepairStatus> for String {
    fn from(value: RepairStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repair_status_parses_known_labels() {
        assert_eq!(RepairStatus::from("In Progress"), RepairStatus::InProgress);
        assert_eq!(RepairStatus::from(" completed "), RepairStatus::Completed);
        assert_eq!(
            RepairStatus::from("Awaiting Parts"),
            RepairStatus::Other("Awaiting Parts".to_string())
        );
    }

    #[test]
    fn claim_serializes_status_as_label() {
        let claim = WarrantyClaim {
            claim_id: "CL-1".to_string(),
            claim_date: NaiveDate::from_ymd_opt(2021, 3, 4).unwrap(),
            sale_id: None,
            repair_status: RepairStatus::InProgress,
        };
        let json = serde_json::to_value(&claim).expect("serialize claim");
        assert_eq!(json["repair_status"], "In Progress");
        assert_eq!(json["claim_date"], "2021-03-04");
        assert!(json["sale_id"].is_null());
    }
}
