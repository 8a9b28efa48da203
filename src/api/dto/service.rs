//! DTOs for the service catalog.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use std::sync::LazyLock;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::domain::entities::{Service, ServiceFilter, ServicePatch};

/// Lowercase words separated by single spaces, dashes or underscores.
static CATEGORY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+([ _-][a-z0-9]+)*$").unwrap());

const MAX_PRICE: f64 = 99_999_999.99;

/// Public view of a service.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[schema(example = 49.99)]
    pub price: f64,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Service> for ServiceResponse {
    fn from(s: Service) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            category: s.category,
            price: s.price,
            duration_minutes: s.duration_minutes,
            is_active: s.is_active,
            owner_id: s.owner_id,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Request body for `POST /api/services`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[schema(example = "Deep tissue massage")]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 50))]
    #[validate(regex(path = *CATEGORY_REGEX, message = "Category must be lowercase words"))]
    #[schema(example = "wellness")]
    pub category: Option<String>,

    #[validate(range(min = 0.0, max = MAX_PRICE, message = "Price must be between 0 and 99999999.99"))]
    pub price: f64,

    #[validate(range(min = 1, max = 1440, message = "Duration must be 1-1440 minutes"))]
    pub duration_minutes: i32,
}

/// Request body for `PATCH /api/services/{id}`.
///
/// `description` and `category`: absent = no change, `null` = clear, value = set.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(max = 2000))]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(min = 1, max = 50))]
    #[validate(regex(path = *CATEGORY_REGEX, message = "Category must be lowercase words"))]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,

    #[validate(range(min = 0.0, max = MAX_PRICE, message = "Price must be between 0 and 99999999.99"))]
    pub price: Option<f64>,

    #[validate(range(min = 1, max = 1440, message = "Duration must be 1-1440 minutes"))]
    pub duration_minutes: Option<i32>,

    /// `true` reactivates a deleted service.
    pub is_active: Option<bool>,
}

impl From<UpdateServiceRequest> for ServicePatch {
    fn from(r: UpdateServiceRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            category: r.category,
            price: r.price,
            duration_minutes: r.duration_minutes,
            is_active: r.is_active,
        }
    }
}

/// Query parameters for the public catalog.
#[serde_as]
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceListQuery {
    /// Case-insensitive match on name or description.
    pub q: Option<String>,

    pub category: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub price_min: Option<f64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub price_max: Option<f64>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl ServiceListQuery {
    pub fn filter(&self) -> ServiceFilter {
        ServiceFilter {
            q: self.q.clone().filter(|q| !q.trim().is_empty()),
            category: self.category.clone(),
            price_min: self.price_min,
            price_max: self.price_max,
            is_active: None,
            owner_id: None,
        }
    }
}

/// Query parameters for the admin catalog, which includes inactive services.
#[serde_as]
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminServiceListQuery {
    pub q: Option<String>,

    pub category: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub price_min: Option<f64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub price_max: Option<f64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub is_active: Option<bool>,

    pub owner_id: Option<Uuid>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl AdminServiceListQuery {
    pub fn filter(&self) -> ServiceFilter {
        ServiceFilter {
            q: self.q.clone().filter(|q| !q.trim().is_empty()),
            category: self.category.clone(),
            price_min: self.price_min,
            price_max: self.price_max,
            is_active: self.is_active,
            owner_id: self.owner_id,
        }
    }
}
