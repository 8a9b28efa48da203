//! Review entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Feedback left by a user on one of their completed bookings.
///
/// `service_id` is copied from the booking at creation time so service
/// listings do not need a join.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
}

/// `comment: Some(None)` clears the comment.
#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub rating: Option<i16>,
    pub comment: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub user_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub min_rating: Option<i16>,
    pub max_rating: Option<i16>,
}

/// Aggregated ratings for one service. All aggregates are `None` when
/// the service has no reviews yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingStats {
    pub service_id: Uuid,
    pub review_count: i64,
    pub average_rating: Option<f64>,
    pub min_rating: Option<i16>,
    pub max_rating: Option<i16>,
}

impl RatingStats {
    pub fn empty(service_id: Uuid) -> Self {
        Self {
            service_id,
            review_count: 0,
            average_rating: None,
            min_rating: None,
            max_rating: None,
        }
    }
}
