//! Rating rollup aggregator
//!
//! Groups a flat list of per-category per-week rating records into week-range
//! buckets and computes per-category and overall averages. Pure functions
//! over data fetched by the caller; nothing here touches the store.
//!
//! Averaging policy, preserved exactly:
//! - a percentage of 0 (or an absent slot) means "no rating" and is excluded
//!   from every average, never counted as zero;
//! - the overall average of a bucket is the mean of its per-category
//!   averages, i.e. average within a category across the bucket's weeks
//!   first, then across categories.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::models::{CategoryScore, RatingCategory, RatingRecord, WeeklyAggregate};

/// Valid horizons (years) for the multi-year report
pub const MULTI_YEAR_HORIZONS: &[u32] = &[4, 6, 20];

/// Width of a rollup bucket in weeks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketSpan {
    Weekly,
    Monthly,
    Trimester,
    SixMonth,
    Yearly,
}

impl BucketSpan {
    pub fn weeks(&self) -> u32 {
        match self {
            BucketSpan::Weekly => 1,
            BucketSpan::Monthly => 4,
            BucketSpan::Trimester => 12,
            BucketSpan::SixMonth => 24,
            BucketSpan::Yearly => 52,
        }
    }

    fn label(&self, index: u32) -> String {
        match self {
            BucketSpan::Weekly => format!("Week {index}"),
            BucketSpan::Monthly => format!("Month {index}"),
            BucketSpan::Trimester => format!("Trimester {index}"),
            BucketSpan::SixMonth => format!("Semester {index}"),
            BucketSpan::Yearly => format!("Year {index}"),
        }
    }
}

/// Averages of one week-range bucket
#[derive(Debug, Clone, Serialize)]
pub struct RollupBucket {
    pub label: String,
    pub start_week: u32,
    pub end_week: u32,
    /// Only categories that have at least one rating in the bucket
    pub category_averages: BTreeMap<RatingCategory, f64>,
    /// `None` when the bucket holds no ratings at all
    pub overall_average: Option<f64>,
}

/// Result of one rollup pass
#[derive(Debug, Clone, Serialize)]
pub struct RollupReport {
    pub labels: Vec<String>,
    pub buckets: Vec<RollupBucket>,
    /// Per-category averages over the whole range
    pub category_averages: BTreeMap<RatingCategory, f64>,
    /// Mean of the range-level category averages
    pub overall_average: f64,
    /// Summed overall-average change between consecutive non-empty buckets
    pub net_growth: f64,
    /// Number of transitions the growth is summed over
    pub growth_transitions: u32,
}

/// Roll the given ratings up into `span`-wide buckets.
///
/// With `horizon_buckets` the bucket count is fixed (multi-year reports);
/// otherwise it is derived from the highest rated week. Ratings beyond a
/// fixed horizon are ignored. Empty input yields an empty report.
pub fn aggregate(
    ratings: &[RatingRecord],
    span: BucketSpan,
    horizon_buckets: Option<u32>,
) -> RollupReport {
    let width = span.weeks();
    let max_week = ratings.iter().map(|r| r.week).max().unwrap_or(0);
    let bucket_count = match horizon_buckets {
        Some(h) => h,
        None => max_week.div_ceil(width),
    };

    // (sum, count) accumulators; zero percentages are "no rating" slots
    let mut bucket_sums: Vec<BTreeMap<RatingCategory, (f64, u32)>> =
        vec![BTreeMap::new(); bucket_count as usize];
    let mut range_sums: BTreeMap<RatingCategory, (f64, u32)> = BTreeMap::new();

    for rating in ratings {
        if rating.week == 0 || rating.percentage == 0 {
            continue;
        }
        let index = ((rating.week - 1) / width) as usize;
        let Some(sums) = bucket_sums.get_mut(index) else {
            continue;
        };
        let entry = sums.entry(rating.category).or_insert((0.0, 0));
        entry.0 += rating.percentage as f64;
        entry.1 += 1;
        let entry = range_sums.entry(rating.category).or_insert((0.0, 0));
        entry.0 += rating.percentage as f64;
        entry.1 += 1;
    }

    let buckets: Vec<RollupBucket> = bucket_sums
        .into_iter()
        .enumerate()
        .map(|(i, sums)| {
            let start_week = i as u32 * width + 1;
            let category_averages = averages(sums);
            let overall_average = mean(&category_averages);
            RollupBucket {
                label: span.label(i as u32 + 1),
                start_week,
                end_week: start_week + width - 1,
                category_averages,
                overall_average,
            }
        })
        .collect();

    let (net_growth, growth_transitions) = net_growth(&buckets);
    let category_averages = averages(range_sums);
    let overall_average = mean(&category_averages).unwrap_or(0.0);

    RollupReport {
        labels: buckets.iter().map(|b| b.label.clone()).collect(),
        buckets,
        category_averages,
        overall_average,
        net_growth,
        growth_transitions,
    }
}

/// Per-week aggregates of one staff member's ratings.
pub fn weekly_aggregates(ratings: &[RatingRecord]) -> Vec<WeeklyAggregate> {
    let Some(first) = ratings.first() else {
        return Vec::new();
    };
    let staff = first.staff.clone();

    let mut weeks: BTreeMap<u32, BTreeMap<RatingCategory, CategoryScore>> = BTreeMap::new();
    for rating in ratings {
        if rating.week == 0 || rating.percentage == 0 {
            continue;
        }
        weeks.entry(rating.week).or_default().insert(
            rating.category,
            CategoryScore {
                points: rating.score,
                percentage: rating.percentage,
            },
        );
    }

    weeks
        .into_iter()
        .map(|(week, categories)| {
            let sum: f64 = categories.values().map(|c| c.percentage as f64).sum();
            let average_percentage = sum / categories.len() as f64;
            WeeklyAggregate {
                staff: staff.clone(),
                week,
                categories,
                average_percentage,
            }
        })
        .collect()
}

fn averages(sums: BTreeMap<RatingCategory, (f64, u32)>) -> BTreeMap<RatingCategory, f64> {
    sums.into_iter()
        .map(|(category, (sum, count))| (category, sum / count as f64))
        .collect()
}

fn mean(values: &BTreeMap<RatingCategory, f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.values().sum::<f64>() / values.len() as f64)
}

/// Growth over consecutive non-empty buckets.
///
/// Empty buckets are skipped without resetting the baseline: [70, –, 90] is
/// one transition of +20, not two.
fn net_growth(buckets: &[RollupBucket]) -> (f64, u32) {
    let mut previous: Option<f64> = None;
    let mut total = 0.0;
    let mut transitions = 0u32;
    for bucket in buckets {
        let Some(average) = bucket.overall_average else {
            continue;
        };
        if let Some(prev) = previous {
            total += average - prev;
            transitions += 1;
        }
        previous = Some(average);
    }
    (total, transitions)
}
