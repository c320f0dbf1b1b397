use rust_decimal::Decimal;

use super::MediaType;

/// Spend split across channel buckets, as read back from the store. No
/// media type feeds `social_media`; it stays at its column default.
#[cfg(test)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpendBreakdown {
    pub online: Decimal,
    pub print: Decimal,
    pub broadcast: Decimal,
    pub social_media: Decimal,
    pub other: Decimal,
}

#[cfg(test)]
impl SpendBreakdown {
    pub fn get(&self, bucket: super::SpendBucket) -> Decimal {
        match bucket {
            super::SpendBucket::Online => self.online,
            super::SpendBucket::Print => self.print,
            super::SpendBucket::Broadcast => self.broadcast,
            super::SpendBucket::Other => self.other,
        }
    }
}

/// Persisted advertising figures for one project month. The per-channel
/// buckets are written on save and are not part of the merge surface.
#[derive(Debug, Clone)]
pub struct MonthlySpend {
    pub id: String,
    pub project_id: String,
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub total_spend: Decimal,
    pub total_budget: Decimal,
    /// Percentage, 2 decimal places.
    pub budget_utilization: Decimal,
    pub media_type: MediaType,
    pub notes: String,
    pub generated_at: String,
    pub generated_by_id: String,
}

/// Fields a partial update may touch. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SpendChanges {
    pub planned_budget: Option<Decimal>,
    pub actual_spend: Option<Decimal>,
    pub media_type: Option<MediaType>,
    pub notes: Option<String>,
}

impl SpendChanges {
    pub fn is_empty(&self) -> bool {
        self.planned_budget.is_none()
            && self.actual_spend.is_none()
            && self.media_type.is_none()
            && self.notes.is_none()
    }
}

impl MonthlySpend {
    /// Merge `changes` onto the stored figures and recompute derived fields.
    pub fn apply_changes(&mut self, changes: &SpendChanges, user_id: &str, now: &str) {
        if let Some(planned) = changes.planned_budget {
            self.total_budget = planned;
        }
        if let Some(actual) = changes.actual_spend {
            self.total_spend = actual;
        }
        if let Some(media_type) = changes.media_type {
            self.media_type = media_type;
        }
        if let Some(notes) = &changes.notes {
            self.notes = notes.clone();
        }
        self.budget_utilization = budget_utilization(self.total_budget, self.total_spend);
        self.generated_at = now.to_string();
        self.generated_by_id = user_id.to_string();
    }
}

/// actual / planned * 100, rounded to 2 places; zero when nothing is planned.
pub fn budget_utilization(planned: Decimal, actual: Decimal) -> Decimal {
    if planned > Decimal::ZERO {
        (actual / planned * Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    }
}
