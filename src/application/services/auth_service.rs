//! Authentication service: registration, login and the token lifecycle.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{NewBlacklistedToken, NewUser, Role, TokenKind, User, UserPatch};
use crate::domain::repositories::{TokenBlacklistRepository, UserRepository};
use crate::error::AppError;
use crate::infrastructure::security::{
    Claims, IssuedToken, JwtCodec, TokenError, hash_password, verify_password,
};

/// Access and refresh tokens issued together, plus the account they belong to.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
    pub user: User,
}

/// Result of authenticating a bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub claims: Claims,
}

/// Lowercases and trims an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized(
        "Invalid credentials",
        json!({"reason": "Incorrect email or password"}),
    )
}

fn to_blacklist_entry(claims: &Claims) -> NewBlacklistedToken {
    NewBlacklistedToken {
        jti: claims.jti,
        token_kind: claims.typ,
        user_id: claims.sub,
        expires_at: claims.expires_at(),
    }
}

/// Service for account credentials and JWT handling.
///
/// Tokens are stateless except for revocation: logout and refresh record the
/// token's `jti` in the blacklist, and every authenticated request checks it.
pub struct AuthService<U: UserRepository, T: TokenBlacklistRepository> {
    users: Arc<U>,
    blacklist: Arc<T>,
    codec: JwtCodec,
}

impl<U: UserRepository, T: TokenBlacklistRepository> AuthService<U, T> {
    /// Creates a new authentication service.
    pub fn new(users: Arc<U>, blacklist: Arc<T>, codec: JwtCodec) -> Self {
        Self {
            users,
            blacklist,
            codec,
        }
    }

    /// Lifetime of access tokens in seconds, reported to clients as `expires_in`.
    pub fn access_ttl_seconds(&self) -> i64 {
        self.codec.access_ttl().num_seconds()
    }

    /// Registers a new account with role `user`.
    ///
    /// An email that belongs to a deactivated account reactivates it with the
    /// new name and password, and drops it back to role `user`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if an active account already uses the email.
    /// Returns [`AppError::Internal`] on database or hashing errors.
    #[tracing::instrument(skip(self, name, email, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: &str,
    ) -> Result<User, AppError> {
        let email = normalize_email(&email);

        let existing = self.users.find_by_email(&email).await?;
        if let Some(ref user) = existing
            && user.is_active
        {
            return Err(AppError::conflict(
                "Email already registered",
                json!({"email": email}),
            ));
        }

        let password_hash = hash_password(password)?;

        let user = match existing {
            Some(inactive) => {
                let patch = UserPatch {
                    name: Some(name),
                    password_hash: Some(password_hash),
                    role: Some(Role::User),
                    is_active: Some(true),
                    ..Default::default()
                };
                let user = self.users.update(inactive.id, patch).await?;
                tracing::info!(user_id = %user.id, "Reactivated account");
                user
            }
            None => {
                let user = self
                    .users
                    .create(NewUser {
                        email,
                        name,
                        password_hash,
                        role: Role::User,
                    })
                    .await?;
                tracing::info!(user_id = %user.id, "Registered account");
                user
            }
        };

        Ok(user)
    }

    /// Verifies credentials and issues a token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for unknown emails, wrong passwords
    /// and deactivated accounts.
    #[tracing::instrument(skip(self, email, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::warn!("Login attempt for unknown email");
            metrics::counter!("bookit_logins_total", "outcome" => "failure").increment(1);
            return Err(invalid_credentials());
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
            metrics::counter!("bookit_logins_total", "outcome" => "failure").increment(1);
            return Err(invalid_credentials());
        }

        if !user.is_active {
            return Err(AppError::unauthorized(
                "Account is deactivated",
                json!({"reason": "Account is deactivated"}),
            ));
        }

        metrics::counter!("bookit_logins_total", "outcome" => "success").increment(1);
        self.issue_pair(user)
    }

    fn issue_pair(&self, user: User) -> Result<TokenPair, AppError> {
        let access = self.codec.issue(user.id, user.role, TokenKind::Access)?;
        let refresh = self.codec.issue(user.id, user.role, TokenKind::Refresh)?;
        Ok(TokenPair {
            access,
            refresh,
            user,
        })
    }

    /// Validates a bearer access token and loads its account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token:
    /// - has a bad signature, is malformed or expired
    /// - is a refresh token
    /// - has been blacklisted
    /// - belongs to a missing or deactivated account
    pub async fn authenticate(&self, token: &str) -> Result<AuthSession, AppError> {
        let claims = self.codec.decode(token)?;

        if claims.typ != TokenKind::Access {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid token type"}),
            ));
        }

        if self.blacklist.is_blacklisted(claims.jti).await? {
            tracing::warn!(jti = %claims.jti, user_id = %claims.sub, "Blacklisted token presented");
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Token has been revoked"}),
            ));
        }

        let user = self.active_user(claims.sub).await?;

        Ok(AuthSession { user, claims })
    }

    async fn active_user(&self, id: uuid::Uuid) -> Result<User, AppError> {
        match self.users.find_by_id(id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Account not found or deactivated"}),
            )),
        }
    }

    /// Exchanges a refresh token for a new pair. The old refresh token is
    /// blacklisted so it can only be used once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for invalid, expired, revoked or
    /// wrong-type tokens and for deactivated accounts.
    #[tracing::instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.codec.decode(refresh_token)?;

        if claims.typ != TokenKind::Refresh {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid token type"}),
            ));
        }

        if self.blacklist.is_blacklisted(claims.jti).await? {
            tracing::warn!(jti = %claims.jti, user_id = %claims.sub, "Revoked refresh token reused");
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Token has been revoked"}),
            ));
        }

        let user = self.active_user(claims.sub).await?;

        // The insert decides which of two concurrent refreshes wins.
        if !self.blacklist.add(to_blacklist_entry(&claims)).await? {
            tracing::warn!(jti = %claims.jti, user_id = %claims.sub, "Refresh token raced");
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Token has been revoked"}),
            ));
        }

        self.issue_pair(user)
    }

    /// Revokes the current access token and, if given, the caller's refresh token.
    ///
    /// An already expired refresh token is ignored since it can no longer be used.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the refresh token is malformed or not a refresh token.
    /// Returns [`AppError::Forbidden`] if the refresh token belongs to another account.
    #[tracing::instrument(skip(self, session, refresh_token), fields(user_id = %session.user.id))]
    pub async fn logout(
        &self,
        session: &AuthSession,
        refresh_token: Option<&str>,
    ) -> Result<(), AppError> {
        let refresh_claims = match refresh_token {
            None => None,
            Some(token) => match self.codec.decode(token) {
                Ok(claims) => Some(claims),
                Err(TokenError::Expired) => None,
                Err(_) => {
                    return Err(AppError::bad_request(
                        "Invalid refresh token",
                        json!({"field": "refresh_token"}),
                    ));
                }
            },
        };

        if let Some(ref claims) = refresh_claims {
            if claims.typ != TokenKind::Refresh {
                return Err(AppError::bad_request(
                    "Invalid refresh token",
                    json!({"reason": "Not a refresh token"}),
                ));
            }
            if claims.sub != session.user.id {
                return Err(AppError::forbidden(
                    "Refresh token belongs to another account",
                    json!({}),
                ));
            }
        }

        self.blacklist
            .add(to_blacklist_entry(&session.claims))
            .await?;

        if let Some(ref claims) = refresh_claims {
            self.blacklist.add(to_blacklist_entry(claims)).await?;
        }

        tracing::info!("Logged out");
        Ok(())
    }

    /// Deletes blacklist entries whose tokens have expired anyway.
    pub async fn cleanup_expired_tokens(&self) -> Result<u64, AppError> {
        let removed = self.blacklist.delete_expired().await?;
        metrics::counter!("bookit_blacklist_purged_total").increment(removed);
        Ok(removed)
    }
}
