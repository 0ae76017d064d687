//! Rating Models

use std::collections::BTreeMap;

use super::organization::OrganizationId;
use super::serde_helpers;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Rating record ID type
pub type RatingId = RecordId;

/// The seven fixed rating categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RatingCategory {
    Time,
    Creativity,
    ShelfCleanliness,
    StockManagement,
    CustomerService,
    DisciplineCases,
    PersonalGrooming,
}

impl RatingCategory {
    pub const ALL: [RatingCategory; 7] = [
        RatingCategory::Time,
        RatingCategory::Creativity,
        RatingCategory::ShelfCleanliness,
        RatingCategory::StockManagement,
        RatingCategory::CustomerService,
        RatingCategory::DisciplineCases,
        RatingCategory::PersonalGrooming,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingCategory::Time => "time",
            RatingCategory::Creativity => "creativity",
            RatingCategory::ShelfCleanliness => "shelf_cleanliness",
            RatingCategory::StockManagement => "stock_management",
            RatingCategory::CustomerService => "customer_service",
            RatingCategory::DisciplineCases => "discipline_cases",
            RatingCategory::PersonalGrooming => "personal_grooming",
        }
    }
}

/// One rating of one category for one staff member in one week.
///
/// Immutable once written; the (staff, category, week) slot is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RatingId>,
    #[serde(with = "serde_helpers::record_id")]
    pub staff: OrganizationId,
    pub category: RatingCategory,
    /// 1-5
    pub score: u8,
    /// score × 20, so 20 | 40 | 60 | 80 | 100
    pub percentage: u8,
    /// 1-based week number counted from the staff member's first rated week
    pub week: u32,
    pub rating_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Draft submitted by the rating-entry flow.
///
/// The draft is staged by the client, validated as a whole and committed into
/// one [`RatingRecord`] per scored category; it is discarded after the commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingDraft {
    pub staff_id: String,
    pub week: u32,
    pub rating_date: NaiveDate,
    /// category → score (1-5); unscored categories are simply absent
    pub scores: BTreeMap<RatingCategory, u8>,
}

impl RatingDraft {
    /// Expand the draft into the records it commits to.
    pub fn to_records(
        &self,
        staff: OrganizationId,
        created_at: DateTime<Utc>,
    ) -> Vec<RatingRecord> {
        self.scores
            .iter()
            .map(|(&category, &score)| RatingRecord {
                id: None,
                staff: staff.clone(),
                category,
                score,
                percentage: score * 20,
                week: self.week,
                rating_date: self.rating_date,
                created_at,
            })
            .collect()
    }
}

/// Score of one category inside a weekly aggregate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryScore {
    pub points: u8,
    pub percentage: u8,
}

/// Derived per-week view; recomputed from [`RatingRecord`]s, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyAggregate {
    #[serde(with = "serde_helpers::record_id")]
    pub staff: OrganizationId,
    pub week: u32,
    pub categories: BTreeMap<RatingCategory, CategoryScore>,
    /// Mean percentage over the categories rated this week
    pub average_percentage: f64,
}

/// Cached rollup document, one per staff member (`rating_snapshot` table).
///
/// Regenerated on demand: recompute-and-overwrite, no invalidation protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSnapshot {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub staff: OrganizationId,
    /// Rollup period key, currently always `first_quarter` (weeks 1-12)
    pub period: String,
    pub category_averages: BTreeMap<RatingCategory, f64>,
    pub overall_average: f64,
    pub generated_at: DateTime<Utc>,
}

/// Period key of the snapshot covering weeks 1-12
pub const SNAPSHOT_PERIOD_FIRST_QUARTER: &str = "first_quarter";
