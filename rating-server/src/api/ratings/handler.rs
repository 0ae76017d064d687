//! Rating API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{
    OrganizationId, RatingDraft, RatingRecord, RatingSnapshot, SNAPSHOT_PERIOD_FIRST_QUARTER,
    WeeklyAggregate,
};
use crate::db::repository::{OrganizationRepository, RatingRepository, parse_record_id};
use crate::rollup::{self, BucketSpan, MULTI_YEAR_HORIZONS, RollupReport};
use crate::utils::{AppError, AppResult, validation};

const STAFF_TABLE: &str = "organization";

#[derive(Debug, Deserialize)]
pub struct RatingQuery {
    pub staff_id: String,
}

#[derive(Debug, Deserialize)]
pub struct YearlyQuery {
    pub staff_id: String,
    /// Horizon in years; one of 4, 6 or 20
    pub years: Option<u32>,
}

/// Resolve the staff member and fetch all of their ratings.
async fn load_staff_ratings(
    state: &ServerState,
    staff_id: &str,
) -> AppResult<(OrganizationId, Vec<RatingRecord>)> {
    let staff = parse_record_id(STAFF_TABLE, staff_id)?;

    let org_repo = OrganizationRepository::new(state.db.clone());
    if org_repo.find_by_id(staff_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Staff member {} not found",
            staff_id
        )));
    }

    let ratings = RatingRepository::new(state.db.clone())
        .find_by_staff(&staff)
        .await?;
    Ok((staff, ratings))
}

/// POST /api/ratings - commit a rating draft
///
/// The draft covers one staff member and one week; it becomes one immutable
/// record per scored category. The slot checks and the inserts are separate
/// statements, so concurrent submissions of the same draft can race
/// (accepted; the unique index backstops the worst case).
pub async fn submit(
    State(state): State<ServerState>,
    Json(draft): Json<RatingDraft>,
) -> AppResult<Json<Vec<RatingRecord>>> {
    validation::validate_week(draft.week)?;
    if draft.scores.is_empty() {
        return Err(AppError::validation("scores must not be empty".to_string()));
    }
    for (category, &score) in &draft.scores {
        validation::validate_score(score, category.as_str())?;
    }

    let staff = parse_record_id(STAFF_TABLE, &draft.staff_id)?;
    let org_repo = OrganizationRepository::new(state.db.clone());
    if org_repo.find_by_id(&draft.staff_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Staff member {} not found",
            draft.staff_id
        )));
    }

    let repo = RatingRepository::new(state.db.clone());

    // Reject the whole draft if any slot is already rated
    for category in draft.scores.keys() {
        if repo.find_slot(&staff, *category, draft.week).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Week {} already has a {} rating for {}",
                draft.week,
                category.as_str(),
                draft.staff_id
            )));
        }
    }

    let created_at = Utc::now();
    let mut created = Vec::with_capacity(draft.scores.len());
    for record in draft.to_records(staff, created_at) {
        created.push(repo.create(record).await?);
    }

    tracing::info!(
        target: "ratings",
        staff = %draft.staff_id,
        week = draft.week,
        categories = created.len(),
        "Rating draft committed"
    );

    Ok(Json(created))
}

/// GET /api/ratings/weekly?staff_id= - per-week aggregates
pub async fn weekly(
    State(state): State<ServerState>,
    Query(query): Query<RatingQuery>,
) -> AppResult<Json<Vec<WeeklyAggregate>>> {
    let (_, ratings) = load_staff_ratings(&state, &query.staff_id).await?;
    Ok(Json(rollup::weekly_aggregates(&ratings)))
}

/// GET /api/ratings/monthly?staff_id= - 4-week rollup
pub async fn monthly(
    State(state): State<ServerState>,
    Query(query): Query<RatingQuery>,
) -> AppResult<Json<RollupReport>> {
    let (_, ratings) = load_staff_ratings(&state, &query.staff_id).await?;
    Ok(Json(rollup::aggregate(&ratings, BucketSpan::Monthly, None)))
}

/// GET /api/ratings/trimester?staff_id= - 12-week rollup
pub async fn trimester(
    State(state): State<ServerState>,
    Query(query): Query<RatingQuery>,
) -> AppResult<Json<RollupReport>> {
    let (_, ratings) = load_staff_ratings(&state, &query.staff_id).await?;
    Ok(Json(rollup::aggregate(
        &ratings,
        BucketSpan::Trimester,
        None,
    )))
}

/// GET /api/ratings/six-month?staff_id= - 24-week rollup
pub async fn six_month(
    State(state): State<ServerState>,
    Query(query): Query<RatingQuery>,
) -> AppResult<Json<RollupReport>> {
    let (_, ratings) = load_staff_ratings(&state, &query.staff_id).await?;
    Ok(Json(rollup::aggregate(&ratings, BucketSpan::SixMonth, None)))
}

/// GET /api/ratings/yearly?staff_id=&years= - 52-week blocks over a horizon
pub async fn yearly(
    State(state): State<ServerState>,
    Query(query): Query<YearlyQuery>,
) -> AppResult<Json<RollupReport>> {
    let years = query.years.unwrap_or(state.config.multi_year_horizon);
    if !MULTI_YEAR_HORIZONS.contains(&years) {
        return Err(AppError::validation(format!(
            "years must be one of {:?}, got {}",
            MULTI_YEAR_HORIZONS, years
        )));
    }

    let (_, ratings) = load_staff_ratings(&state, &query.staff_id).await?;
    Ok(Json(rollup::aggregate(
        &ratings,
        BucketSpan::Yearly,
        Some(years),
    )))
}

/// GET /api/ratings/:staff_id/snapshot - read the cached rollup snapshot
pub async fn get_snapshot(
    State(state): State<ServerState>,
    Path(staff_id): Path<String>,
) -> AppResult<Json<RatingSnapshot>> {
    let staff = parse_record_id(STAFF_TABLE, &staff_id)?;
    let repo = RatingRepository::new(state.db.clone());
    let snapshot = repo.snapshot_for(&staff).await?.ok_or_else(|| {
        AppError::not_found(format!("No rating snapshot for staff {}", staff_id))
    })?;
    Ok(Json(snapshot))
}

/// POST /api/ratings/:staff_id/snapshot - recompute and overwrite the snapshot
///
/// The snapshot covers the first quarter (weeks 1-12). There is no
/// invalidation protocol; callers regenerate when they need fresh numbers.
pub async fn regenerate_snapshot(
    State(state): State<ServerState>,
    Path(staff_id): Path<String>,
) -> AppResult<Json<RatingSnapshot>> {
    let (staff, ratings) = load_staff_ratings(&state, &staff_id).await?;

    let report = rollup::aggregate(&ratings, BucketSpan::Trimester, Some(1));
    let bucket = report
        .buckets
        .into_iter()
        .next()
        .ok_or_else(|| AppError::internal("Trimester rollup produced no bucket".to_string()))?;

    let snapshot = RatingSnapshot {
        id: None,
        staff,
        period: SNAPSHOT_PERIOD_FIRST_QUARTER.to_string(),
        category_averages: bucket.category_averages,
        overall_average: bucket.overall_average.unwrap_or(0.0),
        generated_at: Utc::now(),
    };

    let repo = RatingRepository::new(state.db.clone());
    let saved = repo.save_snapshot(snapshot).await?;

    tracing::info!(
        target: "ratings",
        staff = %staff_id,
        overall_average = saved.overall_average,
        "Rating snapshot regenerated"
    );

    Ok(Json(saved))
}
