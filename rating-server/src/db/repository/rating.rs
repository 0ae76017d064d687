//! Rating Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    OrganizationId, RatingCategory, RatingRecord, RatingSnapshot,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "rating";
const SNAPSHOT_TABLE: &str = "rating_snapshot";

#[derive(Clone)]
pub struct RatingRepository {
    base: BaseRepository,
}

impl RatingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All rating records of one staff member, ordered by week
    pub async fn find_by_staff(&self, staff: &OrganizationId) -> RepoResult<Vec<RatingRecord>> {
        let ratings: Vec<RatingRecord> = self
            .base
            .db()
            .query("SELECT * FROM rating WHERE staff = $staff ORDER BY week")
            .bind(("staff", staff.clone()))
            .await?
            .take(0)?;
        Ok(ratings)
    }

    /// Every rating record, ordered by week (rollup monitor)
    pub async fn find_all(&self) -> RepoResult<Vec<RatingRecord>> {
        let ratings: Vec<RatingRecord> = self
            .base
            .db()
            .query("SELECT * FROM rating ORDER BY week")
            .await?
            .take(0)?;
        Ok(ratings)
    }

    /// Look up the record filling one (staff, category, week) slot
    pub async fn find_slot(
        &self,
        staff: &OrganizationId,
        category: RatingCategory,
        week: u32,
    ) -> RepoResult<Option<RatingRecord>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM rating WHERE staff = $staff AND category = $category AND week = $week LIMIT 1",
            )
            .bind(("staff", staff.clone()))
            .bind(("category", category))
            .bind(("week", week))
            .await?;
        let ratings: Vec<RatingRecord> = result.take(0)?;
        Ok(ratings.into_iter().next())
    }

    /// Insert a rating record.
    ///
    /// Records are immutable: a slot that is already rated is a conflict,
    /// never an overwrite.
    pub async fn create(&self, record: RatingRecord) -> RepoResult<RatingRecord> {
        if self
            .find_slot(&record.staff, record.category, record.week)
            .await?
            .is_some()
        {
            return Err(RepoError::Conflict(format!(
                "Week {} already has a {} rating for {}",
                record.week,
                record.category.as_str(),
                record.staff
            )));
        }

        #[derive(Serialize)]
        struct RatingContent {
            staff: RecordId,
            category: RatingCategory,
            score: u8,
            percentage: u8,
            week: u32,
            rating_date: NaiveDate,
            created_at: DateTime<Utc>,
        }

        let content = RatingContent {
            staff: record.staff,
            category: record.category,
            score: record.score,
            percentage: record.percentage,
            week: record.week,
            rating_date: record.rating_date,
            created_at: record.created_at,
        };

        let mut result = self
            .base
            .db()
            .query("CREATE rating CONTENT $data RETURN AFTER")
            .bind(("data", content))
            .await?;

        let created: Option<RatingRecord> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create rating".to_string()))
    }

    /// Cached rollup snapshot of one staff member, if ever generated
    pub async fn snapshot_for(&self, staff: &OrganizationId) -> RepoResult<Option<RatingSnapshot>> {
        let key = staff.key().to_string();
        let snapshot: Option<RatingSnapshot> =
            self.base.db().select((SNAPSHOT_TABLE, key)).await?;
        Ok(snapshot)
    }

    /// Recompute-and-overwrite the snapshot of one staff member.
    pub async fn save_snapshot(&self, snapshot: RatingSnapshot) -> RepoResult<RatingSnapshot> {
        #[derive(Serialize)]
        struct SnapshotContent {
            staff: RecordId,
            period: String,
            category_averages: BTreeMap<RatingCategory, f64>,
            overall_average: f64,
            generated_at: DateTime<Utc>,
        }

        let key = snapshot.staff.key().to_string();
        let content = SnapshotContent {
            staff: snapshot.staff,
            period: snapshot.period,
            category_averages: snapshot.category_averages,
            overall_average: snapshot.overall_average,
            generated_at: snapshot.generated_at,
        };

        let mut result = self
            .base
            .db()
            .query("UPSERT type::thing($tb, $key) CONTENT $data RETURN AFTER")
            .bind(("tb", SNAPSHOT_TABLE))
            .bind(("key", key))
            .bind(("data", content))
            .await?;

        let saved: Option<RatingSnapshot> = result.take(0)?;
        saved.ok_or_else(|| RepoError::Database("Failed to save rating snapshot".to_string()))
    }
}
