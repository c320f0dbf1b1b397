#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn seed_project(db: &Database, id: &str, owner: &str) -> Project {
    let mut project = Project::new(id.into(), format!("Project {id}"), owner.into());
    project.organization_id = Some("org-1".into());
    db.insert_project(&project).unwrap();
    project
}

fn write<'a>(
    project: &'a Project,
    month: u32,
    planned: Decimal,
    actual: Decimal,
) -> SpendWrite<'a> {
    SpendWrite {
        project,
        year: 2024,
        month,
        planned_budget: planned,
        actual_spend: actual,
        media_type: MediaType::Digital,
        notes: "",
        user_id: "alice",
    }
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_has_current_version() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
}

#[test]
fn test_reopen_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("adbudget.db");

    {
        let mut db = Database::open(&path).unwrap();
        let project = seed_project(&db, "p1", "alice");
        db.upsert_monthly_spend(&write(&project, 1, dec!(100), dec!(90)))
            .unwrap();
    }

    let db = Database::open(&path).unwrap();
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
    let spend = db.get_monthly_spend("p1", 2024, 1).unwrap().unwrap();
    assert_eq!(spend.total_spend, dec!(90));
}

// ── Projects ──────────────────────────────────────────────────

#[test]
fn test_owned_project_lookup() {
    let db = Database::open_in_memory().unwrap();
    seed_project(&db, "p1", "alice");

    let found = db.get_owned_project("p1", "alice").unwrap().unwrap();
    assert_eq!(found.name, "Project p1");
    assert_eq!(found.organization_id.as_deref(), Some("org-1"));

    assert!(db.get_owned_project("p1", "bob").unwrap().is_none());
    assert!(db.get_owned_project("missing", "alice").unwrap().is_none());
}

#[test]
fn test_duplicate_project_id_rejected() {
    let db = Database::open_in_memory().unwrap();
    seed_project(&db, "p1", "alice");
    let dup = Project::new("p1".into(), "Again".into(), "bob".into());
    assert!(db.insert_project(&dup).is_err());
}

#[test]
fn test_projects_for_owner_sorted() {
    let db = Database::open_in_memory().unwrap();
    db.insert_project(&Project::new("p2".into(), "Zeta".into(), "alice".into()))
        .unwrap();
    db.insert_project(&Project::new("p1".into(), "Alpha".into(), "alice".into()))
        .unwrap();
    db.insert_project(&Project::new("p3".into(), "Beta".into(), "bob".into()))
        .unwrap();

    let names: Vec<String> = db
        .get_projects_for_owner("alice")
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
}

// ── Monthly spend upsert ──────────────────────────────────────

#[test]
fn test_upsert_creates_month_and_record() {
    let mut db = Database::open_in_memory().unwrap();
    let project = seed_project(&db, "p1", "alice");

    let saved = db
        .upsert_monthly_spend(&write(&project, 3, dec!(100000), dec!(120000)))
        .unwrap();
    assert!(saved.created_month);
    assert!(saved.created_spend);

    let month = db.get_project_month("p1", 2024, 3).unwrap().unwrap();
    assert_eq!(month.id, saved.project_month_id);
    assert_eq!(month.month_label, "2024-03");
    assert_eq!(month.created_by_id, "alice");
    assert_eq!(month.updated_by_id.as_deref(), Some("alice"));

    let spend = db.get_monthly_spend("p1", 2024, 3).unwrap().unwrap();
    assert_eq!(spend.id, saved.spend_id);
    assert_eq!(spend.total_budget, dec!(100000));
    assert_eq!(spend.total_spend, dec!(120000));
    assert_eq!(spend.budget_utilization, dec!(120));
    assert_eq!(spend.generated_by_id, "alice");

    let detail = db.get_spend_detail("p1", 2024, 3).unwrap().unwrap();
    assert_eq!(detail.project_month_id.as_deref(), Some(month.id.as_str()));
    assert_eq!(detail.organization_id.as_deref(), Some("org-1"));
    assert_eq!(detail.breakdown.online, dec!(120000));
    assert_eq!(detail.breakdown.print, Decimal::ZERO);
    assert_eq!(detail.breakdown.social_media, Decimal::ZERO);
    assert_eq!(detail.currency, "JPY");
    assert_eq!(detail.created_at, spend.generated_at);
}

#[test]
fn test_upsert_twice_updates_in_place() {
    let mut db = Database::open_in_memory().unwrap();
    let project = seed_project(&db, "p1", "alice");

    let first = db
        .upsert_monthly_spend(&write(&project, 6, dec!(500), dec!(400)))
        .unwrap();
    let second = db
        .upsert_monthly_spend(&write(&project, 6, dec!(700), dec!(350)))
        .unwrap();

    assert!(!second.created_month);
    assert!(!second.created_spend);
    assert_eq!(first.spend_id, second.spend_id);
    assert_eq!(first.project_month_id, second.project_month_id);
    assert_eq!(db.count_monthly_spend("p1").unwrap(), 1);
    assert_eq!(db.count_project_months("p1").unwrap(), 1);

    let spend = db.get_monthly_spend("p1", 2024, 6).unwrap().unwrap();
    assert_eq!(spend.total_budget, dec!(700));
    assert_eq!(spend.total_spend, dec!(350));
    assert_eq!(spend.budget_utilization, dec!(50));
}

#[test]
fn test_upsert_sets_only_the_mapped_bucket() {
    let mut db = Database::open_in_memory().unwrap();
    let project = seed_project(&db, "p1", "alice");

    let mut w = write(&project, 2, dec!(1000), dec!(300));
    w.media_type = MediaType::Tv;
    db.upsert_monthly_spend(&w).unwrap();

    let mut w = write(&project, 2, dec!(1000), dec!(450));
    w.media_type = MediaType::Magazine;
    db.upsert_monthly_spend(&w).unwrap();

    let spend = db.get_monthly_spend("p1", 2024, 2).unwrap().unwrap();
    let detail = db.get_spend_detail("p1", 2024, 2).unwrap().unwrap();
    // Earlier bucket is left as it was; the new one gets the new total.
    assert_eq!(detail.breakdown.broadcast, dec!(300));
    assert_eq!(detail.breakdown.print, dec!(450));
    assert_eq!(detail.breakdown.online, Decimal::ZERO);
    assert_eq!(spend.total_spend, dec!(450));
    assert_eq!(spend.media_type, MediaType::Magazine);
}

#[test]
fn test_upsert_outdoor_lands_in_other_bucket() {
    let mut db = Database::open_in_memory().unwrap();
    let project = seed_project(&db, "p1", "alice");

    let mut w = write(&project, 9, dec!(100), dec!(80));
    w.media_type = MediaType::Outdoor;
    db.upsert_monthly_spend(&w).unwrap();

    let spend = db.get_monthly_spend("p1", 2024, 9).unwrap().unwrap();
    let detail = db.get_spend_detail("p1", 2024, 9).unwrap().unwrap();
    assert_eq!(detail.breakdown.other, dec!(80));
    assert_eq!(spend.media_type, MediaType::Outdoor);
}

#[test]
fn test_upsert_for_missing_project_fails() {
    let mut db = Database::open_in_memory().unwrap();
    let ghost = Project::new("ghost".into(), "Ghost".into(), "alice".into());
    assert!(db
        .upsert_monthly_spend(&write(&ghost, 1, dec!(1), dec!(1)))
        .is_err());
    // Rolled back: no orphaned project month either.
    assert_eq!(db.count_project_months("ghost").unwrap(), 0);
}

#[test]
fn test_year_query_sorted_and_scoped() {
    let mut db = Database::open_in_memory().unwrap();
    let p1 = seed_project(&db, "p1", "alice");
    let p2 = seed_project(&db, "p2", "alice");

    for month in [11, 2, 7] {
        db.upsert_monthly_spend(&write(&p1, month, dec!(10), dec!(5)))
            .unwrap();
    }
    db.upsert_monthly_spend(&write(&p2, 4, dec!(10), dec!(5)))
        .unwrap();
    let mut other_year = write(&p1, 4, dec!(10), dec!(5));
    other_year.year = 2025;
    db.upsert_monthly_spend(&other_year).unwrap();

    let months: Vec<u32> = db
        .get_monthly_spend_for_year("p1", 2024)
        .unwrap()
        .iter()
        .map(|s| s.month)
        .collect();
    assert_eq!(months, vec![2, 7, 11]);
}

// ── Monthly spend modify ──────────────────────────────────────

#[test]
fn test_modify_missing_record_returns_none() {
    let mut db = Database::open_in_memory().unwrap();
    seed_project(&db, "p1", "alice");

    let mut called = false;
    let result = db
        .modify_monthly_spend("p1", 2024, 1, |_| called = true)
        .unwrap();
    assert!(result.is_none());
    assert!(!called);
    assert_eq!(db.count_monthly_spend("p1").unwrap(), 0);
}

#[test]
fn test_modify_persists_merged_copy() {
    let mut db = Database::open_in_memory().unwrap();
    let project = seed_project(&db, "p1", "alice");
    db.upsert_monthly_spend(&write(&project, 5, dec!(1000), dec!(800)))
        .unwrap();

    let changes = SpendChanges {
        notes: Some("paused mid-month".into()),
        actual_spend: Some(dec!(650)),
        ..Default::default()
    };
    let merged = db
        .modify_monthly_spend("p1", 2024, 5, |spend| {
            spend.apply_changes(&changes, "bob", "2024-06-01T00:00:00Z")
        })
        .unwrap()
        .unwrap();
    assert_eq!(merged.total_spend, dec!(650));

    let stored = db.get_monthly_spend("p1", 2024, 5).unwrap().unwrap();
    assert_eq!(stored.total_budget, dec!(1000));
    assert_eq!(stored.total_spend, dec!(650));
    assert_eq!(stored.budget_utilization, dec!(65));
    assert_eq!(stored.notes, "paused mid-month");
    assert_eq!(stored.generated_by_id, "bob");
    assert_eq!(stored.generated_at, "2024-06-01T00:00:00Z");
}

#[test]
fn test_modify_leaves_breakdown_and_links_alone() {
    let mut db = Database::open_in_memory().unwrap();
    let project = seed_project(&db, "p1", "alice");
    db.upsert_monthly_spend(&write(&project, 2, dec!(300), dec!(300)))
        .unwrap();
    let before = db.get_spend_detail("p1", 2024, 2).unwrap().unwrap();

    let changes = SpendChanges {
        media_type: Some(MediaType::Tv),
        actual_spend: Some(dec!(280)),
        ..Default::default()
    };
    db.modify_monthly_spend("p1", 2024, 2, |spend| {
        spend.apply_changes(&changes, "bob", "2024-03-01T00:00:00Z")
    })
    .unwrap()
    .unwrap();

    let after = db.get_spend_detail("p1", 2024, 2).unwrap().unwrap();
    assert_eq!(after.breakdown, before.breakdown);
    assert_eq!(after.breakdown.online, dec!(300));
    assert_eq!(after.breakdown.broadcast, Decimal::ZERO);
    assert_eq!(after.project_month_id, before.project_month_id);
    assert_eq!(after.created_at, before.created_at);

    let spend = db.get_monthly_spend("p1", 2024, 2).unwrap().unwrap();
    assert_eq!(spend.media_type, MediaType::Tv);
    assert_eq!(spend.total_spend, dec!(280));
    assert_eq!(spend.total_budget, dec!(300));
}

#[test]
fn test_modify_without_changes_touches_only_metadata() {
    let mut db = Database::open_in_memory().unwrap();
    let project = seed_project(&db, "p1", "alice");
    db.upsert_monthly_spend(&write(&project, 8, dec!(40), dec!(10)))
        .unwrap();

    db.modify_monthly_spend("p1", 2024, 8, |spend| {
        spend.apply_changes(&SpendChanges::default(), "carol", "2024-09-01T00:00:00Z")
    })
    .unwrap()
    .unwrap();

    let stored = db.get_monthly_spend("p1", 2024, 8).unwrap().unwrap();
    assert_eq!(stored.total_budget, dec!(40));
    assert_eq!(stored.total_spend, dec!(10));
    assert_eq!(stored.budget_utilization, dec!(25));
    assert_eq!(stored.media_type, MediaType::Digital);
    assert_eq!(stored.generated_by_id, "carol");
}
