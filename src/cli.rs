use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::budget::{
    self, parse_amount, parse_media_type, BudgetInput, BudgetQuery, BudgetUpdate,
    MonthlyBudgetView, YearSummary,
};
use crate::db::Database;
use crate::models::{MediaType, Project, ProjectStatus};

/// adbudget - monthly advertising budgets for agency projects
#[derive(Parser, Debug)]
#[command(name = "adbudget")]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Path to the database file (default: platform data directory)
    #[arg(long, env = "ADBUDGET_DB", global = true)]
    pub(crate) db: Option<PathBuf>,

    /// Acting user id
    #[arg(short, long, env = "ADBUDGET_USER", global = true)]
    pub(crate) user: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ADBUDGET_LOG", default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub(crate) json: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Show a project's twelve monthly budgets for a year
    #[command(alias = "b")]
    Budgets {
        /// Project ID
        project: String,
        /// Calendar year
        year: i32,
    },

    /// Create or overwrite one month's budget
    Save {
        /// Project ID
        project: String,
        /// Calendar year
        year: i32,
        /// Month (1-12)
        month: u32,
        /// Planned budget
        #[arg(long, value_parser = parse_amount)]
        planned: Decimal,
        /// Actual spend
        #[arg(long, value_parser = parse_amount)]
        actual: Decimal,
        /// Media type (digital, tv, newspaper, magazine, outdoor, radio, other)
        #[arg(long, default_value = "digital", value_parser = parse_media_type)]
        media: MediaType,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Change selected fields of a month that was already saved
    Update {
        /// Project ID
        #[arg(long)]
        project: Option<String>,
        /// Calendar year
        #[arg(long)]
        year: Option<i32>,
        /// Month (1-12)
        #[arg(long)]
        month: Option<u32>,
        /// Planned budget
        #[arg(long, value_parser = parse_amount)]
        planned: Option<Decimal>,
        /// Actual spend
        #[arg(long, value_parser = parse_amount)]
        actual: Option<Decimal>,
        /// Media type
        #[arg(long, value_parser = parse_media_type)]
        media: Option<MediaType>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Export a year of monthly budgets to CSV
    Export {
        /// Project ID
        project: String,
        /// Calendar year
        year: i32,
        /// Output path (default: ~/adbudget-<project>-<year>.csv)
        path: Option<String>,
    },

    /// Check whether the acting user may manage a project's budgets
    Access {
        /// Project ID
        project: String,
    },

    /// Project registration
    #[command(subcommand)]
    Project(ProjectCommand),

    /// List projects owned by the acting user
    Projects,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ProjectCommand {
    /// Register a project
    Add {
        /// Project ID
        id: String,
        /// Owner user id (default: the acting user)
        #[arg(long)]
        owner: Option<String>,
        /// Display name (default: the project ID)
        #[arg(long)]
        name: Option<String>,
        /// Organization id
        #[arg(long)]
        org: Option<String>,
        /// Status (planning, active, on_hold, completed, cancelled)
        #[arg(long, default_value = "planning", value_parser = parse_status)]
        status: ProjectStatus,
    },
}

#[derive(Serialize)]
struct YearReport<'a> {
    months: &'a [MonthlyBudgetView],
    summary: &'a YearSummary,
}

pub(crate) fn as_cli(cli: Cli, db: &mut Database) -> Result<()> {
    let user = cli.user.as_deref();
    match cli.command {
        Command::Budgets { project, year } => {
            cli_budgets(db, acting_user(user)?, project, year, cli.json)
        }
        Command::Save {
            project,
            year,
            month,
            planned,
            actual,
            media,
            notes,
        } => {
            let input = BudgetInput {
                project_id: project,
                year,
                month,
                planned_budget: planned,
                actual_spend: actual,
                media_type: media,
                notes,
            };
            let view = budget::save_monthly_budget(db, input, acting_user(user)?)?;
            print_saved(&view, "Saved", cli.json)
        }
        Command::Update {
            project,
            year,
            month,
            planned,
            actual,
            media,
            notes,
        } => {
            let update = BudgetUpdate {
                project_id: project,
                year,
                month,
                planned_budget: planned,
                actual_spend: actual,
                media_type: media,
                notes,
            };
            let view = budget::update_monthly_budget(db, &update, acting_user(user)?)?;
            print_saved(&view, "Updated", cli.json)
        }
        Command::Export {
            project,
            year,
            path,
        } => cli_export(db, acting_user(user)?, project, year, path.as_deref()),
        Command::Access { project } => {
            let allowed = budget::has_project_access(db, &project, acting_user(user)?)?;
            if cli.json {
                let body = serde_json::json!({ "projectId": project, "access": allowed });
                println!("{body}");
            } else if allowed {
                println!("Access granted to {project}");
            } else {
                println!("No access to {project}");
            }
            Ok(())
        }
        Command::Project(ProjectCommand::Add {
            id,
            owner,
            name,
            org,
            status,
        }) => {
            let owner = match owner {
                Some(o) => o,
                None => acting_user(user)?.to_string(),
            };
            let mut project = Project::new(id.clone(), name.unwrap_or(id), owner);
            project.organization_id = org;
            project.status = status;
            db.insert_project(&project)?;
            tracing::info!(
                project_id = %project.id,
                owner_id = %project.owner_id,
                "registered project"
            );
            println!("Added project {} (owner: {})", project.id, project.owner_id);
            Ok(())
        }
        Command::Projects => cli_projects(db, acting_user(user)?),
    }
}

fn acting_user(user: Option<&str>) -> Result<&str> {
    match user.map(str::trim) {
        Some(u) if !u.is_empty() => Ok(u),
        _ => anyhow::bail!("No acting user: pass --user <id> or set ADBUDGET_USER"),
    }
}

fn parse_status(s: &str) -> Result<ProjectStatus> {
    let wanted = s.trim().to_lowercase();
    ProjectStatus::all()
        .iter()
        .copied()
        .find(|st| st.as_str() == wanted)
        .ok_or_else(|| {
            let names: Vec<&str> = ProjectStatus::all().iter().map(|st| st.as_str()).collect();
            anyhow::anyhow!(
                "Unknown status '{s}' (expected one of: {})",
                names.join(", ")
            )
        })
}

fn cli_budgets(db: &Database, user: &str, project: String, year: i32, json: bool) -> Result<()> {
    let query = BudgetQuery {
        project_id: project,
        year,
    };
    let months = budget::get_monthly_budgets(db, &query, user)?;
    let summary = YearSummary::from_views(&months);

    if json {
        let report = YearReport {
            months: &months,
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Advertising budget: {} {}", query.project_id, query.year);
    println!("{}", "─".repeat(86));
    println!(
        "{:<8} {:>14} {:>14} {:>14} {:>8}  {:<10} Notes",
        "Month", "Planned", "Actual", "Variance", "Var %", "Media"
    );
    for view in &months {
        println!(
            "{:<8} {:>14.2} {:>14.2} {:>14.2} {:>7.1}%  {:<10} {}",
            view.month_label(),
            view.planned_budget,
            view.actual_spend,
            view.variance,
            view.variance_percentage,
            if view.id.is_some() {
                view.media_type.as_str()
            } else {
                "-"
            },
            view.notes,
        );
    }
    println!("{}", "─".repeat(86));
    println!(
        "{:<8} {:>14.2} {:>14.2} {:>14.2} {:>7.1}%",
        "Total",
        summary.total_planned,
        summary.total_actual,
        summary.total_variance,
        summary.total_variance_percentage,
    );
    println!("  Utilization: {:.1}%", summary.utilization);
    Ok(())
}

fn print_saved(view: &MonthlyBudgetView, verb: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }
    println!(
        "{verb} {} {}: planned {:.2}, actual {:.2}, variance {:.2} ({:.1}%), media {}",
        view.project_id,
        view.month_label(),
        view.planned_budget,
        view.actual_spend,
        view.variance,
        view.variance_percentage,
        view.media_type,
    );
    Ok(())
}

fn cli_export(
    db: &Database,
    user: &str,
    project: String,
    year: i32,
    path: Option<&str>,
) -> Result<()> {
    let output_path = path.map(shellexpand).unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/adbudget-{project}-{year}.csv")
    });
    let query = BudgetQuery {
        project_id: project,
        year,
    };
    let months = budget::get_monthly_budgets(db, &query, user)?;
    let summary = YearSummary::from_views(&months);
    let count = crate::export::export_year(Path::new(&output_path), &months, &summary)?;
    println!("Exported {count} months to {output_path}");
    Ok(())
}

fn cli_projects(db: &Database, user: &str) -> Result<()> {
    let projects = db.get_projects_for_owner(user)?;
    if projects.is_empty() {
        println!("No projects");
        return Ok(());
    }

    println!("{:<20} {:<24} {:<10} Organization", "ID", "Name", "Status");
    println!("{}", "─".repeat(70));
    for project in &projects {
        println!(
            "{:<20} {:<24} {:<10} {}",
            project.id,
            project.name,
            project.status.as_str(),
            project.organization_id.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
