#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── MediaType ─────────────────────────────────────────────────

#[test]
fn test_media_type_parse() {
    assert_eq!(MediaType::parse("digital"), Some(MediaType::Digital));
    assert_eq!(MediaType::parse("DIGITAL"), Some(MediaType::Digital));
    assert_eq!(MediaType::parse(" tv "), Some(MediaType::Tv));
    assert_eq!(MediaType::parse("newspaper"), Some(MediaType::Newspaper));
    assert_eq!(MediaType::parse("magazine"), Some(MediaType::Magazine));
    assert_eq!(MediaType::parse("outdoor"), Some(MediaType::Outdoor));
    assert_eq!(MediaType::parse("radio"), Some(MediaType::Radio));
    assert_eq!(MediaType::parse("other"), Some(MediaType::Other));
    assert_eq!(MediaType::parse("billboard"), None);
    assert_eq!(MediaType::parse(""), None);
}

#[test]
fn test_media_type_roundtrip() {
    for m in MediaType::all() {
        assert_eq!(MediaType::parse(m.as_str()), Some(*m), "Roundtrip failed for {m}");
    }
    assert_eq!(MediaType::all().len(), 7);
}

#[test]
fn test_media_type_default_is_digital() {
    assert_eq!(MediaType::default(), MediaType::Digital);
}

#[test]
fn test_media_type_bucket_mapping() {
    assert_eq!(MediaType::Digital.bucket(), SpendBucket::Online);
    assert_eq!(MediaType::Tv.bucket(), SpendBucket::Broadcast);
    assert_eq!(MediaType::Radio.bucket(), SpendBucket::Broadcast);
    assert_eq!(MediaType::Newspaper.bucket(), SpendBucket::Print);
    assert_eq!(MediaType::Magazine.bucket(), SpendBucket::Print);
    assert_eq!(MediaType::Other.bucket(), SpendBucket::Other);
    assert_eq!(MediaType::Outdoor.bucket(), SpendBucket::Other);
}

#[test]
fn test_bucket_columns_are_distinct() {
    let mut columns: Vec<&str> = SpendBucket::all().iter().map(|b| b.column()).collect();
    columns.sort();
    columns.dedup();
    assert_eq!(columns.len(), SpendBucket::all().len());
}

// ── SpendBreakdown ────────────────────────────────────────────

#[test]
fn test_breakdown_get_reads_one_bucket() {
    let breakdown = SpendBreakdown {
        print: dec!(250),
        ..Default::default()
    };
    for bucket in SpendBucket::all() {
        let expected = if *bucket == SpendBucket::Print {
            dec!(250)
        } else {
            Decimal::ZERO
        };
        assert_eq!(breakdown.get(*bucket), expected);
    }
}

// ── Utilization ───────────────────────────────────────────────

#[test]
fn test_budget_utilization() {
    assert_eq!(budget_utilization(dec!(100000), dec!(120000)), dec!(120));
    assert_eq!(budget_utilization(dec!(200), dec!(50)), dec!(25));
    assert_eq!(budget_utilization(dec!(3), dec!(1)), dec!(33.33));
}

#[test]
fn test_budget_utilization_zero_planned() {
    assert_eq!(budget_utilization(Decimal::ZERO, dec!(500)), Decimal::ZERO);
    assert_eq!(budget_utilization(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
}

// ── MonthlySpend::apply_changes ───────────────────────────────

fn make_spend() -> MonthlySpend {
    MonthlySpend {
        id: "spend-1".into(),
        project_id: "p1".into(),
        year: 2024,
        month: 5,
        total_spend: dec!(800),
        total_budget: dec!(1000),
        budget_utilization: dec!(80),
        media_type: MediaType::Digital,
        notes: "spring push".into(),
        generated_at: "2024-05-01T00:00:00Z".into(),
        generated_by_id: "alice".into(),
    }
}

#[test]
fn test_apply_changes_actual_only() {
    let mut spend = make_spend();
    let changes = SpendChanges {
        actual_spend: Some(dec!(1200)),
        ..Default::default()
    };
    spend.apply_changes(&changes, "bob", "2024-06-01T00:00:00Z");

    assert_eq!(spend.total_budget, dec!(1000));
    assert_eq!(spend.total_spend, dec!(1200));
    assert_eq!(spend.budget_utilization, dec!(120));
    assert_eq!(spend.media_type, MediaType::Digital);
    assert_eq!(spend.notes, "spring push");
    assert_eq!(spend.generated_by_id, "bob");
    assert_eq!(spend.generated_at, "2024-06-01T00:00:00Z");
}

#[test]
fn test_apply_changes_planned_only() {
    let mut spend = make_spend();
    let changes = SpendChanges {
        planned_budget: Some(dec!(400)),
        ..Default::default()
    };
    spend.apply_changes(&changes, "alice", "now");

    assert_eq!(spend.total_budget, dec!(400));
    assert_eq!(spend.total_spend, dec!(800));
    assert_eq!(spend.budget_utilization, dec!(200));
    assert_eq!(spend.notes, "spring push");
}

#[test]
fn test_apply_changes_media_type_only() {
    let mut spend = make_spend();
    let changes = SpendChanges {
        media_type: Some(MediaType::Radio),
        ..Default::default()
    };
    spend.apply_changes(&changes, "alice", "now");

    assert_eq!(spend.media_type, MediaType::Radio);
    assert_eq!(spend.total_spend, dec!(800));
    assert_eq!(spend.total_budget, dec!(1000));
    assert_eq!(spend.budget_utilization, dec!(80));
}

#[test]
fn test_apply_changes_empty_recomputes_utilization() {
    let mut spend = make_spend();
    spend.budget_utilization = dec!(1);
    let changes = SpendChanges::default();
    assert!(changes.is_empty());
    spend.apply_changes(&changes, "alice", "now");
    assert_eq!(spend.budget_utilization, dec!(80));
}

// ── ProjectMonth ──────────────────────────────────────────────

#[test]
fn test_month_label_zero_padded() {
    assert_eq!(ProjectMonth::label_for(2024, 3), "2024-03");
    assert_eq!(ProjectMonth::label_for(2024, 12), "2024-12");
}

#[test]
fn test_project_month_new_defaults() {
    let pm = ProjectMonth::new("pm-1".into(), "p1".into(), 2025, 7, "alice");
    assert_eq!(pm.month_label, "2025-07");
    assert_eq!(pm.status, "planned");
    assert_eq!(pm.currency, "JPY");
    assert_eq!(pm.created_by_id, "alice");
    assert_eq!(pm.updated_by_id.as_deref(), Some("alice"));
    assert!(!pm.created_at.is_empty());
}

// ── Project ───────────────────────────────────────────────────

#[test]
fn test_project_new_defaults() {
    let project = Project::new("p1".into(), "Spring Launch".into(), "alice".into());
    assert_eq!(project.status, ProjectStatus::Planning);
    assert!(project.organization_id.is_none());
    assert_eq!(project.owner_id, "alice");
    assert_eq!(project.created_at, project.updated_at);
}

#[test]
fn test_project_status_roundtrip() {
    for s in ProjectStatus::all() {
        assert_eq!(ProjectStatus::parse(s.as_str()), *s);
    }
    assert_eq!(ProjectStatus::parse("on hold"), ProjectStatus::OnHold);
    assert_eq!(ProjectStatus::parse("unknown"), ProjectStatus::Planning);
}

// ── Identifiers ───────────────────────────────────────────────

#[test]
fn test_new_id_unique() {
    let a = new_id();
    let b = new_id();
    assert_ne!(a, b);
    assert_eq!(a.len(), 32);
}
