//! Monthly advertising budget reconciliation: a dense 12-month view over
//! sparse per-month spend records, plus create-or-update and partial update
//! of a single month. Every operation is gated on project ownership.

mod error;
mod input;
mod view;

pub(crate) use error::BudgetError;
pub(crate) use input::{parse_amount, parse_media_type, BudgetInput, BudgetQuery, BudgetUpdate};
pub(crate) use view::{materialize_year, MonthlyBudgetView, YearSummary};

use crate::db::{Database, SpendWrite};
use crate::models::Project;

type Result<T> = std::result::Result<T, BudgetError>;

/// True only when the project exists and `user_id` is its owner.
pub(crate) fn has_project_access(db: &Database, project_id: &str, user_id: &str) -> Result<bool> {
    Ok(db.get_owned_project(project_id, user_id)?.is_some())
}

fn require_owned_project(db: &Database, project_id: &str, user_id: &str) -> Result<Project> {
    match db.get_owned_project(project_id, user_id)? {
        Some(project) => {
            tracing::debug!(project_id, user_id, "project access granted");
            Ok(project)
        }
        None => {
            tracing::warn!(project_id, user_id, "project access denied");
            Err(BudgetError::AccessDenied)
        }
    }
}

/// The project's twelve months for `query.year`, zero-filled where nothing
/// has been saved. Read-only.
pub(crate) fn get_monthly_budgets(
    db: &Database,
    query: &BudgetQuery,
    user_id: &str,
) -> Result<[MonthlyBudgetView; 12]> {
    query.validate()?;
    require_owned_project(db, &query.project_id, user_id)?;

    let records = db.get_monthly_spend_for_year(&query.project_id, query.year)?;
    tracing::debug!(
        project_id = %query.project_id,
        year = query.year,
        stored = records.len(),
        "materializing monthly budgets"
    );
    Ok(materialize_year(&query.project_id, query.year, &records))
}

/// Create or overwrite one month's planned and actual figures.
pub(crate) fn save_monthly_budget(
    db: &mut Database,
    input: BudgetInput,
    user_id: &str,
) -> Result<MonthlyBudgetView> {
    let input = input.normalized()?;
    let project = require_owned_project(db, &input.project_id, user_id)?;
    let notes = input.notes.unwrap_or_default();

    let saved = db.upsert_monthly_spend(&SpendWrite {
        project: &project,
        year: input.year,
        month: input.month,
        planned_budget: input.planned_budget,
        actual_spend: input.actual_spend,
        media_type: input.media_type,
        notes: &notes,
        user_id,
    })?;
    tracing::info!(
        project_id = %project.id,
        year = input.year,
        month = input.month,
        spend_id = %saved.spend_id,
        project_month_id = %saved.project_month_id,
        created_month = saved.created_month,
        created_spend = saved.created_spend,
        "saved monthly budget"
    );

    Ok(MonthlyBudgetView {
        id: Some(saved.spend_id),
        media_type: input.media_type,
        notes,
        ..MonthlyBudgetView::new(
            &project.id,
            input.year,
            input.month,
            input.planned_budget,
            input.actual_spend,
        )
    })
}

/// Merge the supplied fields into an existing month. Never creates a
/// period; a month that was never saved is `NotFound`.
pub(crate) fn update_monthly_budget(
    db: &mut Database,
    update: &BudgetUpdate,
    user_id: &str,
) -> Result<MonthlyBudgetView> {
    let (project_id, year, month) = update.key()?;
    let changes = update.changes()?;
    require_owned_project(db, project_id, user_id)?;

    if changes.is_empty() {
        tracing::debug!(
            project_id,
            year,
            month,
            "no fields supplied; refreshing derived figures"
        );
    }
    let now = chrono::Utc::now().to_rfc3339();
    let merged = db
        .modify_monthly_spend(project_id, year, month, |spend| {
            spend.apply_changes(&changes, user_id, &now)
        })?
        .ok_or(BudgetError::NotFound)?;
    tracing::info!(
        project_id,
        year,
        month,
        spend_id = %merged.id,
        "updated monthly budget"
    );

    Ok(MonthlyBudgetView::from_spend(&merged))
}
