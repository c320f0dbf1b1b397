use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{MediaType, MonthlySpend};

/// Planned vs. actual figures for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MonthlyBudgetView {
    /// Spend record id; `None` for a month with nothing saved.
    pub(crate) id: Option<String>,
    pub(crate) project_id: String,
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) planned_budget: Decimal,
    pub(crate) actual_spend: Decimal,
    pub(crate) variance: Decimal,
    pub(crate) variance_percentage: Decimal,
    pub(crate) media_type: MediaType,
    pub(crate) notes: String,
}

impl MonthlyBudgetView {
    pub(crate) fn new(
        project_id: &str,
        year: i32,
        month: u32,
        planned_budget: Decimal,
        actual_spend: Decimal,
    ) -> Self {
        Self {
            id: None,
            project_id: project_id.to_string(),
            year,
            month,
            planned_budget,
            actual_spend,
            variance: actual_spend - planned_budget,
            variance_percentage: variance_percentage(planned_budget, actual_spend),
            media_type: MediaType::default(),
            notes: String::new(),
        }
    }

    /// Zero-filled entry for a month without a record.
    pub(crate) fn empty(project_id: &str, year: i32, month: u32) -> Self {
        Self::new(project_id, year, month, Decimal::ZERO, Decimal::ZERO)
    }

    pub(crate) fn from_spend(spend: &MonthlySpend) -> Self {
        Self {
            id: Some(spend.id.clone()),
            media_type: spend.media_type,
            notes: spend.notes.clone(),
            ..Self::new(
                &spend.project_id,
                spend.year,
                spend.month,
                spend.total_budget,
                spend.total_spend,
            )
        }
    }

    pub(crate) fn month_label(&self) -> String {
        crate::models::ProjectMonth::label_for(self.year, self.month)
    }
}

/// (actual - planned) / planned * 100; zero when nothing is planned.
pub(crate) fn variance_percentage(planned: Decimal, actual: Decimal) -> Decimal {
    if planned > Decimal::ZERO {
        (actual - planned) / planned * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Spread sparse per-month records over the full calendar. Records for
/// other projects or years, or with an out-of-range month, are ignored.
pub(crate) fn materialize_year(
    project_id: &str,
    year: i32,
    records: &[MonthlySpend],
) -> [MonthlyBudgetView; 12] {
    std::array::from_fn(|i| {
        let month = i as u32 + 1;
        records
            .iter()
            .find(|r| r.project_id == project_id && r.year == year && r.month == month)
            .map(MonthlyBudgetView::from_spend)
            .unwrap_or_else(|| MonthlyBudgetView::empty(project_id, year, month))
    })
}

/// Totals across a year of monthly views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YearSummary {
    pub(crate) total_planned: Decimal,
    pub(crate) total_actual: Decimal,
    pub(crate) total_variance: Decimal,
    pub(crate) total_variance_percentage: Decimal,
    pub(crate) utilization: Decimal,
}

impl YearSummary {
    pub(crate) fn from_views(views: &[MonthlyBudgetView]) -> Self {
        let total_planned: Decimal = views.iter().map(|v| v.planned_budget).sum();
        let total_actual: Decimal = views.iter().map(|v| v.actual_spend).sum();
        Self {
            total_planned,
            total_actual,
            total_variance: total_actual - total_planned,
            total_variance_percentage: variance_percentage(total_planned, total_actual),
            utilization: crate::models::budget_utilization(total_planned, total_actual),
        }
    }
}
