use crate::set::{ReportResult, ReportSet};

/// Render a deterministic markdown summary of a report set.
///
/// `row_counts` lists the dataset tables and their sizes; `fingerprint` is
/// printed verbatim when present.
pub fn render_markdown(
    set: &ReportSet,
    row_counts: &[(&str, usize)],
    fingerprint: Option<&str>,
) -> String {
    let mut lines = Vec::new();

    lines.push("# Retail Report".to_string());
    lines.push(String::new());
    lines.push("## Run summary".to_string());
    lines.push(format!("- as_of: {}", set.params.as_of));
    if let Some(fingerprint) = fingerprint {
        lines.push(format!("- dataset_fingerprint: {fingerprint}"));
    }
    lines.push(String::new());

    lines.push("## Dataset".to_string());
    lines.push("| table | rows |".to_string());
    lines.push("| --- | --- |".to_string());
    for (table, rows) in row_counts {
        lines.push(format!("| {table} | {rows} |"));
    }
    lines.push(String::new());

    for result in &set.reports {
        lines.push(format!("## {}", result.kind().title()));
        push_result(&mut lines, set, result);
        lines.push(String::new());
    }

    lines.join("\n")
}

fn push_result(lines: &mut Vec<String>, set: &ReportSet, result: &ReportResult) {
    let params = &set.params;
    match result {
        ReportResult::ClaimsInYear(count) => {
            lines.push(format!("Claims filed in {}: **{count}**", params.claims_year));
        }
        ReportResult::ClaimsWithinWindow(count) => {
            lines.push(format!(
                "Claims filed within {} days of sale: **{count}**",
                params.claim_window_days
            ));
        }
        ReportResult::BestSellingDay(rows) => push_table(
            lines,
            &["store", "weekday", "units"],
            rows.iter().map(|row| {
                vec![
                    label(&row.store_id, row.store_name.as_deref()),
                    row.weekday.clone(),
                    row.total_quantity.to_string(),
                ]
            }),
        ),
        ReportResult::LeastSellingProduct(rows) => push_table(
            lines,
            &["country", "product", "units"],
            rows.iter().map(|row| {
                vec![
                    row.country.clone(),
                    label(&row.product_id, Some(row.product_name.as_str())),
                    row.total_quantity.to_string(),
                ]
            }),
        ),
        ReportResult::RecentLaunchClaims(rows) => push_table(
            lines,
            &["product", "claims", "sales"],
            rows.iter().map(|row| {
                vec![
                    label(&row.product_id, Some(row.product_name.as_str())),
                    row.claim_count.to_string(),
                    row.sale_count.to_string(),
                ]
            }),
        ),
        ReportResult::HighVolumeMonths(rows) => {
            lines.push(format!(
                "{} months above {} units:",
                params.high_volume_country, params.high_volume_threshold
            ));
            push_table(
                lines,
                &["month", "units"],
                rows.iter()
                    .map(|row| vec![row.month.clone(), row.total_quantity.to_string()]),
            );
        }
        ReportResult::CategoryClaims(rows) => push_table(
            lines,
            &["category", "claims"],
            rows.iter().map(|row| {
                vec![
                    label(&row.category_id, Some(row.category_name.as_str())),
                    row.claim_count.to_string(),
                ]
            }),
        ),
        ReportResult::CountryClaimRisk(rows) => push_table(
            lines,
            &["country", "units", "claims", "risk_pct"],
            rows.iter().map(|row| {
                vec![
                    row.country.clone(),
                    row.total_units.to_string(),
                    row.total_claims.to_string(),
                    row.risk.to_string(),
                ]
            }),
        ),
        ReportResult::StoreGrowth(rows) => push_table(
            lines,
            &["store", "year", "prior_revenue", "current_revenue", "growth_pct"],
            rows.iter().map(|row| {
                vec![
                    label(&row.store_id, Some(row.store_name.as_str())),
                    row.year.to_string(),
                    row.prior_revenue.to_string(),
                    row.current_revenue.to_string(),
                    row.growth_ratio.to_string(),
                ]
            }),
        ),
    }
}

fn push_table(
    lines: &mut Vec<String>,
    headers: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
) {
    let rows: Vec<Vec<String>> = rows.collect();
    if rows.is_empty() {
        lines.push("_no rows_".to_string());
        return;
    }

    lines.push(format!("| {} |", headers.join(" | ")));
    lines.push(format!("|{}", " --- |".repeat(headers.len())));
    for row in rows {
        lines.push(format!("| {} |", row.join(" | ")));
    }
}

fn label(id: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => format!("{name} ({id})"),
        _ => id.to_string(),
    }
}
