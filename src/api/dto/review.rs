//! DTOs for reviews and rating aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::domain::entities::{RatingStats, Review, ReviewFilter, ReviewPatch};

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            booking_id: r.booking_id,
            user_id: r.user_id,
            service_id: r.service_id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Rating aggregate for one service. Rating fields are `null` without reviews.
#[derive(Debug, Serialize, ToSchema)]
pub struct RatingStatsResponse {
    pub service_id: Uuid,
    pub review_count: i64,
    pub average_rating: Option<f64>,
    pub min_rating: Option<i16>,
    pub max_rating: Option<i16>,
}

impl From<RatingStats> for RatingStatsResponse {
    fn from(s: RatingStats) -> Self {
        Self {
            service_id: s.service_id,
            review_count: s.review_count,
            average_rating: s.average_rating,
            min_rating: s.min_rating,
            max_rating: s.max_rating,
        }
    }
}

/// Request body for `POST /api/reviews`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    pub booking_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,

    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

/// Request body for `PATCH /api/reviews/{id}`. `comment: null` clears the comment.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    #[schema(value_type = Option<String>)]
    pub comment: Option<Option<String>>,
}

impl From<UpdateReviewRequest> for ReviewPatch {
    fn from(r: UpdateReviewRequest) -> Self {
        Self {
            rating: r.rating,
            comment: r.comment,
        }
    }
}

/// Query parameters for `GET /api/services/{id}/reviews`.
#[serde_as]
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceReviewsQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub min_rating: Option<i16>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub max_rating: Option<i16>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl ServiceReviewsQuery {
    pub fn filter(&self) -> ReviewFilter {
        ReviewFilter {
            user_id: None,
            service_id: None,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        }
    }
}

/// Query parameters for `GET /api/admin/reviews`.
#[serde_as]
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminReviewListQuery {
    pub user_id: Option<Uuid>,
    pub service_id: Option<Uuid>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub min_rating: Option<i16>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub max_rating: Option<i16>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl AdminReviewListQuery {
    pub fn filter(&self) -> ReviewFilter {
        ReviewFilter {
            user_id: self.user_id,
            service_id: self.service_id,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        }
    }
}
