use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::BudgetError;
use crate::models::{MediaType, SpendChanges};

pub(crate) const MIN_YEAR: i32 = 2020;
pub(crate) const MAX_YEAR: i32 = 2030;

/// Amounts are stored with two decimal places and at most 13 integer digits.
fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999_999, 2)
}

/// Query for a project's year of monthly budgets.
#[derive(Debug, Clone)]
pub(crate) struct BudgetQuery {
    pub(crate) project_id: String,
    pub(crate) year: i32,
}

impl BudgetQuery {
    pub(crate) fn validate(&self) -> std::result::Result<(), BudgetError> {
        check_project_id(&self.project_id)?;
        check_year(self.year)
    }
}

/// Full set of figures for one month.
#[derive(Debug, Clone)]
pub(crate) struct BudgetInput {
    pub(crate) project_id: String,
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) planned_budget: Decimal,
    pub(crate) actual_spend: Decimal,
    pub(crate) media_type: MediaType,
    pub(crate) notes: Option<String>,
}

impl BudgetInput {
    /// Range-check the input and round amounts to storage precision.
    pub(crate) fn normalized(mut self) -> std::result::Result<Self, BudgetError> {
        check_project_id(&self.project_id)?;
        check_year(self.year)?;
        check_month(self.month)?;
        self.planned_budget = check_amount("plannedBudget", self.planned_budget)?;
        self.actual_spend = check_amount("actualSpend", self.actual_spend)?;
        Ok(self)
    }
}

/// Partial update of one month. Every field is optional on the wire; the
/// identifying ones are required by `key`.
#[derive(Debug, Clone, Default)]
pub(crate) struct BudgetUpdate {
    pub(crate) project_id: Option<String>,
    pub(crate) year: Option<i32>,
    pub(crate) month: Option<u32>,
    pub(crate) planned_budget: Option<Decimal>,
    pub(crate) actual_spend: Option<Decimal>,
    pub(crate) media_type: Option<MediaType>,
    pub(crate) notes: Option<String>,
}

impl BudgetUpdate {
    /// The (project, year, month) the update targets.
    pub(crate) fn key(&self) -> std::result::Result<(&str, i32, u32), BudgetError> {
        let (Some(project_id), Some(year), Some(month)) =
            (self.project_id.as_deref(), self.year, self.month)
        else {
            return Err(BudgetError::validation(
                "Project ID, year, and month are required",
            ));
        };
        check_project_id(project_id)?;
        check_year(year)?;
        check_month(month)?;
        Ok((project_id, year, month))
    }

    pub(crate) fn changes(&self) -> std::result::Result<SpendChanges, BudgetError> {
        Ok(SpendChanges {
            planned_budget: self
                .planned_budget
                .map(|v| check_amount("plannedBudget", v))
                .transpose()?,
            actual_spend: self
                .actual_spend
                .map(|v| check_amount("actualSpend", v))
                .transpose()?,
            media_type: self.media_type,
            notes: self.notes.clone(),
        })
    }
}

fn check_project_id(project_id: &str) -> std::result::Result<(), BudgetError> {
    if project_id.trim().is_empty() {
        return Err(BudgetError::validation("Project ID is required"));
    }
    Ok(())
}

fn check_year(year: i32) -> std::result::Result<(), BudgetError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(BudgetError::validation(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
        )));
    }
    Ok(())
}

fn check_month(month: u32) -> std::result::Result<(), BudgetError> {
    if !(1..=12).contains(&month) {
        return Err(BudgetError::validation(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }
    Ok(())
}

fn check_amount(field: &str, value: Decimal) -> std::result::Result<Decimal, BudgetError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(BudgetError::validation(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    let rounded = value.round_dp(2);
    if rounded > max_amount() {
        return Err(BudgetError::validation(format!(
            "{field} exceeds the maximum of {}",
            max_amount()
        )));
    }
    Ok(rounded.abs())
}

/// Parse a user-entered amount. Currency symbols and thousands separators
/// are ignored; parentheses mean negative.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s
        .replace(['$', '¥', ',', '_'], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        anyhow::bail!("Amount is empty");
    }
    Decimal::from_str(&cleaned).context(format!("Failed to parse '{}' as decimal", s))
}

/// Parse a media type name, listing the accepted names on failure.
pub(crate) fn parse_media_type(s: &str) -> Result<MediaType> {
    MediaType::parse(s).ok_or_else(|| {
        let names: Vec<&str> = MediaType::all().iter().map(|m| m.as_str()).collect();
        anyhow::anyhow!(
            "Unknown media type '{s}' (expected one of: {})",
            names.join(", ")
        )
    })
}
