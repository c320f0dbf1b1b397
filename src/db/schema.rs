pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id              TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'planning',
    organization_id TEXT,
    owner_id        TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_projects_owner ON projects(owner_id);

CREATE TABLE IF NOT EXISTS project_months (
    id            TEXT PRIMARY KEY,
    project_id    TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    year          INTEGER NOT NULL,
    month         INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    month_label   TEXT NOT NULL,
    status        TEXT NOT NULL DEFAULT 'planned',
    currency      TEXT NOT NULL DEFAULT 'JPY',
    created_by_id TEXT NOT NULL,
    updated_by_id TEXT,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    UNIQUE(project_id, year, month)
);

CREATE TABLE IF NOT EXISTS monthly_advertising_spend (
    id                 TEXT PRIMARY KEY,
    project_id         TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    project_month_id   TEXT REFERENCES project_months(id) ON DELETE CASCADE,
    organization_id    TEXT,
    year               INTEGER NOT NULL,
    month              INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    online_spend       TEXT NOT NULL DEFAULT '0',
    print_spend        TEXT NOT NULL DEFAULT '0',
    broadcast_spend    TEXT NOT NULL DEFAULT '0',
    social_media_spend TEXT NOT NULL DEFAULT '0',
    other_spend        TEXT NOT NULL DEFAULT '0',
    total_spend        TEXT NOT NULL,
    total_budget       TEXT NOT NULL DEFAULT '0',
    budget_utilization TEXT NOT NULL DEFAULT '0',
    media_type         TEXT NOT NULL DEFAULT 'digital',
    notes              TEXT NOT NULL DEFAULT '',
    currency           TEXT NOT NULL DEFAULT 'JPY',
    generated_at       TEXT NOT NULL,
    generated_by_id    TEXT NOT NULL,
    created_at         TEXT NOT NULL,
    UNIQUE(project_id, year, month)
);

CREATE INDEX IF NOT EXISTS idx_spend_project_year ON monthly_advertising_spend(project_id, year);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // Future migrations go here:
    // (1, "ALTER TABLE monthly_advertising_spend ADD COLUMN total_impressions INTEGER NOT NULL DEFAULT 0;"),
];
