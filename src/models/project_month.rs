/// Grouping record for one calendar month of a project. Created lazily on
/// the first budget write for the period.
#[derive(Debug, Clone)]
pub struct ProjectMonth {
    pub id: String,
    pub project_id: String,
    pub year: i32,
    pub month: u32,
    /// Format: "YYYY-MM"
    pub month_label: String,
    pub status: String,
    pub currency: String,
    pub created_by_id: String,
    pub updated_by_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ProjectMonth {
    pub fn new(id: String, project_id: String, year: i32, month: u32, user_id: &str) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            project_id,
            year,
            month,
            month_label: Self::label_for(year, month),
            status: "planned".to_string(),
            currency: super::DEFAULT_CURRENCY.to_string(),
            created_by_id: user_id.to_string(),
            updated_by_id: Some(user_id.to_string()),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn label_for(year: i32, month: u32) -> String {
        format!("{year}-{month:02}")
    }
}
