//! Database models

pub mod organization;
pub mod rating;
pub mod serde_helpers;

pub use organization::{
    OrgType, OrganizationCreate, OrganizationId, OrganizationNode, OrganizationUpdate,
};
pub use rating::{
    CategoryScore, RatingCategory, RatingDraft, RatingId, RatingRecord, RatingSnapshot,
    SNAPSHOT_PERIOD_FIRST_QUARTER, WeeklyAggregate,
};
