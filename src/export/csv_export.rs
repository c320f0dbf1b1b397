use anyhow::{Context, Result};
use std::path::Path;

use crate::budget::{MonthlyBudgetView, YearSummary};

const HEADER: [&str; 7] = [
    "Month",
    "Planned Budget",
    "Actual Spend",
    "Variance",
    "Variance %",
    "Media Type",
    "Notes",
];

/// Write a year of monthly budgets to `path`, one row per month followed by
/// a totals row. Returns the number of month rows written.
pub(crate) fn export_year(
    path: &Path,
    views: &[MonthlyBudgetView],
    summary: &YearSummary,
) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record(HEADER).context("Failed to write CSV header")?;
    for view in views {
        wtr.write_record([
            view.month_label(),
            format!("{:.2}", view.planned_budget),
            format!("{:.2}", view.actual_spend),
            format!("{:.2}", view.variance),
            format!("{:.1}", view.variance_percentage),
            view.media_type.as_str().to_string(),
            view.notes.clone(),
        ])
        .with_context(|| format!("Failed to write row for {}", view.month_label()))?;
    }
    wtr.write_record([
        "Total".to_string(),
        format!("{:.2}", summary.total_planned),
        format!("{:.2}", summary.total_actual),
        format!("{:.2}", summary.total_variance),
        format!("{:.1}", summary.total_variance_percentage),
        String::new(),
        String::new(),
    ])
    .context("Failed to write totals row")?;
    wtr.flush().context("Failed to flush CSV file")?;

    Ok(views.len())
}

#[cfg(test)]
#[path = "csv_export_tests.rs"]
mod tests;
