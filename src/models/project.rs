#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "active" => Self::Active,
            "on_hold" | "onhold" | "hold" => Self::OnHold,
            "completed" | "done" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Planning,
        }
    }

    pub fn all() -> &'static [ProjectStatus] {
        &[
            Self::Planning,
            Self::Active,
            Self::OnHold,
            Self::Completed,
            Self::Cancelled,
        ]
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub organization_id: Option<String>,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Project {
    pub fn new(id: String, name: String, owner_id: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            name,
            status: ProjectStatus::Planning,
            organization_id: None,
            owner_id,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
