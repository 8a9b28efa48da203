//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    AuthService, BookingService, CatalogService, ReviewService, UserService,
};
use crate::infrastructure::persistence::{
    PgBookingRepository, PgReviewRepository, PgServiceRepository, PgTokenBlacklistRepository,
    PgUserRepository,
};
use crate::infrastructure::security::JwtCodec;

pub type AppAuthService = AuthService<PgUserRepository, PgTokenBlacklistRepository>;
pub type AppUserService = UserService<PgUserRepository>;
pub type AppCatalogService = CatalogService<PgServiceRepository>;
pub type AppBookingService = BookingService<PgBookingRepository, PgServiceRepository>;
pub type AppReviewService =
    ReviewService<PgReviewRepository, PgBookingRepository, PgServiceRepository>;

/// Services wired to the PostgreSQL repositories, plus the pool for health checks.
///
/// Cloning is cheap: every field is an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<PgPool>,
    pub auth_service: Arc<AppAuthService>,
    pub user_service: Arc<AppUserService>,
    pub catalog_service: Arc<AppCatalogService>,
    pub booking_service: Arc<AppBookingService>,
    pub review_service: Arc<AppReviewService>,
}

impl AppState {
    /// Builds every repository over one pool and wires the services.
    pub fn new(pool: Arc<PgPool>, codec: JwtCodec) -> Self {
        let users = Arc::new(PgUserRepository::new(pool.clone()));
        let services = Arc::new(PgServiceRepository::new(pool.clone()));
        let bookings = Arc::new(PgBookingRepository::new(pool.clone()));
        let reviews = Arc::new(PgReviewRepository::new(pool.clone()));
        let blacklist = Arc::new(PgTokenBlacklistRepository::new(pool.clone()));

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), blacklist, codec)),
            user_service: Arc::new(UserService::new(users)),
            catalog_service: Arc::new(CatalogService::new(services.clone())),
            booking_service: Arc::new(BookingService::new(bookings.clone(), services.clone())),
            review_service: Arc::new(ReviewService::new(reviews, bookings, services)),
            pool,
        }
    }
}
