use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::dataset::Dataset;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// Structured validation issue with location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: String,
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        severity: IssueSeverity,
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Aggregated validation report with errors and warnings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        match issue.severity {
            IssueSeverity::Error => self.errors.push(issue),
            IssueSeverity::Warning => self.warnings.push(issue),
        }
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Check the integrity rules the reports assume.
///
/// This checks:
/// - duplicate primary keys in every table
/// - foreign keys that point at missing rows
/// - non-positive sale quantities and negative prices
/// - claims dated before their sale (warning)
pub fn validate_dataset(dataset: &Dataset) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_unique(
        &mut report,
        "stores",
        dataset.stores().iter().map(|row| row.store_id.as_str()),
    );
    check_unique(
        &mut report,
        "category",
        dataset.categories().iter().map(|row| row.category_id.as_str()),
    );
    check_unique(
        &mut report,
        "products",
        dataset.products().iter().map(|row| row.product_id.as_str()),
    );
    check_unique(
        &mut report,
        "sales",
        dataset.sales().iter().map(|row| row.sale_id.as_str()),
    );
    check_unique(
        &mut report,
        "warranty",
        dataset.claims().iter().map(|row| row.claim_id.as_str()),
    );

    for product in dataset.products() {
        if dataset.category(&product.category_id).is_none() {
            report.push(dangling(
                "products",
                &product.product_id,
                "category_id",
                &product.category_id,
            ));
        }
        if product.price < Decimal::ZERO {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "negative_price",
                format!("products.{}.price", product.product_id),
                format!("price {} is negative", product.price),
            ));
        }
    }

    for sale in dataset.sales() {
        if dataset.store(&sale.store_id).is_none() {
            report.push(dangling("sales", &sale.sale_id, "store_id", &sale.store_id));
        }
        if dataset.product(&sale.product_id).is_none() {
            report.push(dangling(
                "sales",
                &sale.sale_id,
                "product_id",
                &sale.product_id,
            ));
        }
        if sale.quantity <= 0 {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "non_positive_quantity",
                format!("sales.{}.quantity", sale.sale_id),
                format!("quantity {} must be positive", sale.quantity),
            ));
        }
    }

    for claim in dataset.claims() {
        let Some(sale_id) = claim.sale_id.as_deref() else {
            continue;
        };
        match dataset.sale(sale_id) {
            None => report.push(dangling("warranty", &claim.claim_id, "sale_id", sale_id)),
            Some(sale) if claim.claim_date < sale.sale_date => {
                report.push(ValidationIssue::new(
                    IssueSeverity::Warning,
                    "claim_before_sale",
                    format!("warranty.{}.claim_date", claim.claim_id),
                    format!(
                        "claim dated {} precedes sale {} dated {}",
                        claim.claim_date, sale.sale_id, sale.sale_date
                    ),
                ));
            }
            Some(_) => {}
        }
    }

    report
}

fn check_unique<'a>(
    report: &mut ValidationReport,
    table: &str,
    keys: impl Iterator<Item = &'a str>,
) {
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    for key in keys {
        if !seen.insert(key) && reported.insert(key) {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "duplicate_key",
                format!("{table}.{key}"),
                format!("duplicate primary key '{key}'"),
            ));
        }
    }
}

fn dangling(table: &str, row_key: &str, column: &str, value: &str) -> ValidationIssue {
    ValidationIssue::new(
        IssueSeverity::Error,
        "dangling_reference",
        format!("{table}.{row_key}.{column}"),
        format!("referenced row '{value}' not found"),
    )
}
