//! Revoked token record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Purpose of a signed token. Each kind is only accepted where it belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(TokenKind::Access),
            "refresh" => Ok(TokenKind::Refresh),
            other => Err(format!("unknown token type '{other}'")),
        }
    }
}

/// A token identifier that must no longer be accepted.
///
/// Only the `jti` claim is kept. Rows become irrelevant once `expires_at`
/// passes because the signature check rejects the token anyway.
#[derive(Debug, Clone)]
pub struct BlacklistedToken {
    pub id: i64,
    pub jti: Uuid,
    pub token_kind: TokenKind,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub blacklisted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBlacklistedToken {
    pub jti: Uuid,
    pub token_kind: TokenKind,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
