mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::models::*;

const SPEND_COLUMNS: &str = "id, project_id, year, month, total_spend, total_budget,
    budget_utilization, media_type, notes, generated_at, generated_by_id";

/// One month's figures for a create-or-update.
pub(crate) struct SpendWrite<'a> {
    pub(crate) project: &'a Project,
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) planned_budget: Decimal,
    pub(crate) actual_spend: Decimal,
    pub(crate) media_type: MediaType,
    pub(crate) notes: &'a str,
    pub(crate) user_id: &'a str,
}

/// Stored columns of a spend record that only the write path sets.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct SpendDetail {
    pub(crate) project_month_id: Option<String>,
    pub(crate) organization_id: Option<String>,
    pub(crate) breakdown: SpendBreakdown,
    pub(crate) currency: String,
    pub(crate) created_at: String,
}

/// What `upsert_monthly_spend` touched.
#[derive(Debug)]
pub(crate) struct SpendSaved {
    pub(crate) spend_id: String,
    pub(crate) project_month_id: String,
    pub(crate) created_month: bool,
    pub(crate) created_spend: bool,
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        conn.busy_timeout(Duration::from_secs(5))
            .context("Failed to set busy timeout")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::debug!(version = schema::CURRENT_VERSION, "created database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(
                from = current,
                to = schema::CURRENT_VERSION,
                "migrated database schema"
            );
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?)
    }

    // ── Projects ──────────────────────────────────────────────

    pub(crate) fn insert_project(&self, project: &Project) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO projects (id, name, status, organization_id, owner_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    project.id,
                    project.name,
                    project.status.as_str(),
                    project.organization_id,
                    project.owner_id,
                    project.created_at,
                    project.updated_at,
                ],
            )
            .with_context(|| format!("Failed to insert project '{}'", project.id))?;
        Ok(())
    }

    /// The project with `id`, but only when `owner_id` owns it.
    pub(crate) fn get_owned_project(&self, id: &str, owner_id: &str) -> Result<Option<Project>> {
        let result = self.conn.query_row(
            "SELECT id, name, status, organization_id, owner_id, created_at, updated_at
             FROM projects WHERE id = ?1 AND owner_id = ?2",
            params![id, owner_id],
            project_from_row,
        );
        match result {
            Ok(p) => Ok(Some(p)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_projects_for_owner(&self, owner_id: &str) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, status, organization_id, owner_id, created_at, updated_at
             FROM projects WHERE owner_id = ?1 ORDER BY name, id",
        )?;
        let rows = stmt.query_map(params![owner_id], project_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Project months ────────────────────────────────────────

    #[cfg(test)]
    pub(crate) fn get_project_month(
        &self,
        project_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<ProjectMonth>> {
        let result = self.conn.query_row(
            "SELECT id, project_id, year, month, month_label, status, currency,
                    created_by_id, updated_by_id, created_at, updated_at
             FROM project_months WHERE project_id = ?1 AND year = ?2 AND month = ?3",
            params![project_id, year, month],
            |row| {
                Ok(ProjectMonth {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    year: row.get(2)?,
                    month: row.get(3)?,
                    month_label: row.get(4)?,
                    status: row.get(5)?,
                    currency: row.get(6)?,
                    created_by_id: row.get(7)?,
                    updated_by_id: row.get(8)?,
                    created_at: row.get(9)?,
                    updated_at: row.get(10)?,
                })
            },
        );
        match result {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(test)]
    pub(crate) fn count_project_months(&self, project_id: &str) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM project_months WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?)
    }

    // ── Monthly advertising spend ─────────────────────────────

    pub(crate) fn get_monthly_spend_for_year(
        &self,
        project_id: &str,
        year: i32,
    ) -> Result<Vec<MonthlySpend>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SPEND_COLUMNS} FROM monthly_advertising_spend
             WHERE project_id = ?1 AND year = ?2
             ORDER BY month"
        ))?;
        let rows = stmt.query_map(params![project_id, year], spend_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    #[cfg(test)]
    pub(crate) fn get_monthly_spend(
        &self,
        project_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<MonthlySpend>> {
        let result = self.conn.query_row(
            &format!(
                "SELECT {SPEND_COLUMNS} FROM monthly_advertising_spend
                 WHERE project_id = ?1 AND year = ?2 AND month = ?3"
            ),
            params![project_id, year, month],
            spend_from_row,
        );
        match result {
            Ok(s) => Ok(Some(s)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(test)]
    pub(crate) fn get_spend_detail(
        &self,
        project_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<SpendDetail>> {
        let result = self.conn.query_row(
            "SELECT project_month_id, organization_id, online_spend, print_spend,
                    broadcast_spend, social_media_spend, other_spend, currency, created_at
             FROM monthly_advertising_spend
             WHERE project_id = ?1 AND year = ?2 AND month = ?3",
            params![project_id, year, month],
            |row| {
                Ok(SpendDetail {
                    project_month_id: row.get(0)?,
                    organization_id: row.get(1)?,
                    breakdown: SpendBreakdown {
                        online: decimal_at(row, 2)?,
                        print: decimal_at(row, 3)?,
                        broadcast: decimal_at(row, 4)?,
                        social_media: decimal_at(row, 5)?,
                        other: decimal_at(row, 6)?,
                    },
                    currency: row.get(7)?,
                    created_at: row.get(8)?,
                })
            },
        );
        match result {
            Ok(d) => Ok(Some(d)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(test)]
    pub(crate) fn count_monthly_spend(&self, project_id: &str) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM monthly_advertising_spend WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?)
    }

    /// Create-or-update one month's spend record, allocating the project
    /// month on first write. Both rows are written in a single transaction and
    /// keyed on (project_id, year, month), so concurrent writers converge on
    /// one record instead of racing a lookup against an insert.
    pub(crate) fn upsert_monthly_spend(&mut self, write: &SpendWrite<'_>) -> Result<SpendSaved> {
        let now = chrono::Utc::now().to_rfc3339();
        let utilization = budget_utilization(write.planned_budget, write.actual_spend);
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let candidate = ProjectMonth::new(
            new_id(),
            write.project.id.clone(),
            write.year,
            write.month,
            write.user_id,
        );
        let created_month = tx.execute(
            "INSERT INTO project_months (id, project_id, year, month, month_label, status, currency,
                                         created_by_id, updated_by_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(project_id, year, month) DO NOTHING",
            params![
                candidate.id,
                candidate.project_id,
                candidate.year,
                candidate.month,
                candidate.month_label,
                candidate.status,
                candidate.currency,
                candidate.created_by_id,
                candidate.updated_by_id,
                candidate.created_at,
                candidate.updated_at,
            ],
        )? == 1;
        let project_month_id: String = tx.query_row(
            "SELECT id FROM project_months WHERE project_id = ?1 AND year = ?2 AND month = ?3",
            params![write.project.id, write.year, write.month],
            |row| row.get(0),
        )?;

        // The bucket column comes from a closed enum, never from input.
        let bucket = write.media_type.bucket().column();
        let record_id = new_id();
        let spend_id: String = tx.query_row(
            &format!(
                "INSERT INTO monthly_advertising_spend (id, project_id, project_month_id, organization_id,
                     year, month, {bucket}, total_spend, total_budget, budget_utilization,
                     media_type, notes, currency, generated_at, generated_by_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?13)
                 ON CONFLICT(project_id, year, month) DO UPDATE SET
                     project_month_id = COALESCE(project_month_id, excluded.project_month_id),
                     {bucket} = excluded.{bucket},
                     total_spend = excluded.total_spend,
                     total_budget = excluded.total_budget,
                     budget_utilization = excluded.budget_utilization,
                     media_type = excluded.media_type,
                     notes = excluded.notes,
                     generated_at = excluded.generated_at,
                     generated_by_id = excluded.generated_by_id
                 RETURNING id"
            ),
            params![
                record_id,
                write.project.id,
                project_month_id,
                write.project.organization_id,
                write.year,
                write.month,
                write.actual_spend.to_string(),
                write.planned_budget.to_string(),
                utilization.to_string(),
                write.media_type.as_str(),
                write.notes,
                DEFAULT_CURRENCY,
                now,
                write.user_id,
            ],
            |row| row.get(0),
        )?;
        tx.commit()?;

        Ok(SpendSaved {
            created_spend: spend_id == record_id,
            spend_id,
            project_month_id,
            created_month,
        })
    }

    /// Load the record for the period, let `apply` merge into it, and write
    /// back the columns it changed along with the derived utilization and
    /// generation metadata, all under one write lock. `None` when the period
    /// has no record; nothing is created in that case.
    pub(crate) fn modify_monthly_spend<F>(
        &mut self,
        project_id: &str,
        year: i32,
        month: u32,
        apply: F,
    ) -> Result<Option<MonthlySpend>>
    where
        F: FnOnce(&mut MonthlySpend),
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let result = tx.query_row(
            &format!(
                "SELECT {SPEND_COLUMNS} FROM monthly_advertising_spend
                 WHERE project_id = ?1 AND year = ?2 AND month = ?3"
            ),
            params![project_id, year, month],
            spend_from_row,
        );
        let stored = match result {
            Ok(s) => s,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut spend = stored.clone();
        apply(&mut spend);

        let mut sets: Vec<String> = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
        let mut set = |column: &str, value: Box<dyn rusqlite::types::ToSql>| {
            param_values.push(value);
            sets.push(format!("{column} = ?{}", param_values.len()));
        };

        if spend.total_budget != stored.total_budget {
            set("total_budget", Box::new(spend.total_budget.to_string()));
        }
        if spend.total_spend != stored.total_spend {
            set("total_spend", Box::new(spend.total_spend.to_string()));
        }
        if spend.media_type != stored.media_type {
            set("media_type", Box::new(spend.media_type.as_str()));
        }
        if spend.notes != stored.notes {
            set("notes", Box::new(spend.notes.clone()));
        }
        set(
            "budget_utilization",
            Box::new(spend.budget_utilization.to_string()),
        );
        set("generated_at", Box::new(spend.generated_at.clone()));
        set("generated_by_id", Box::new(spend.generated_by_id.clone()));

        param_values.push(Box::new(spend.id.clone()));
        let sql = format!(
            "UPDATE monthly_advertising_spend SET {} WHERE id = ?{}",
            sets.join(", "),
            param_values.len()
        );
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        tx.execute(&sql, params_ref.as_slice())?;
        tx.commit()?;
        Ok(Some(spend))
    }
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        status: ProjectStatus::parse(&row.get::<_, String>(2)?),
        organization_id: row.get(3)?,
        owner_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn spend_from_row(row: &Row<'_>) -> rusqlite::Result<MonthlySpend> {
    Ok(MonthlySpend {
        id: row.get(0)?,
        project_id: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        total_spend: decimal_at(row, 4)?,
        total_budget: decimal_at(row, 5)?,
        budget_utilization: decimal_at(row, 6)?,
        media_type: MediaType::parse(&row.get::<_, String>(7)?).unwrap_or_default(),
        notes: row.get(8)?,
        generated_at: row.get(9)?,
        generated_by_id: row.get(10)?,
    })
}

fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Ok(Decimal::from_str(&text).unwrap_or_default())
}

#[cfg(test)]
mod tests;
