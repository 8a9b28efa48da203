//! Service listing entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A bookable offering managed by an administrator.
///
/// Deleting a service only clears `is_active`, so bookings and reviews
/// keep a valid reference.
#[derive(Debug, Clone)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a new service.
#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub duration_minutes: i32,
    pub owner_id: Uuid,
}

/// Partial update for a service.
///
/// `description` and `category` use a double option: `Some(None)` clears
/// the value, `None` leaves it unchanged.
#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub price: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

impl ServicePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.duration_minutes.is_none()
            && self.is_active.is_none()
    }
}

/// Search filters for service listings.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Case-insensitive substring of name or description.
    pub q: Option<String>,
    pub category: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub is_active: Option<bool>,
    pub owner_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch() {
        assert!(ServicePatch::default().is_empty());
    }

    #[test]
    fn test_clearing_description_is_not_empty() {
        let patch = ServicePatch {
            description: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_filter_default_has_no_constraints() {
        let filter = ServiceFilter::default();
        assert!(filter.q.is_none());
        assert!(filter.is_active.is_none());
        assert!(filter.owner_id.is_none());
    }
}
