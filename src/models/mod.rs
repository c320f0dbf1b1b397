mod media_type;
mod monthly_spend;
mod project;
mod project_month;

pub use media_type::{MediaType, SpendBucket};
#[cfg(test)]
pub use monthly_spend::SpendBreakdown;
pub use monthly_spend::{budget_utilization, MonthlySpend, SpendChanges};
pub use project::{Project, ProjectStatus};
pub use project_month::ProjectMonth;

pub const DEFAULT_CURRENCY: &str = "JPY";

/// Fresh opaque identifier for a persisted record.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests;
