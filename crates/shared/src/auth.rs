//! Authentication types for bearer tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AccountId, UserId};

/// JWT claims identifying the acting user and the tenant account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Account ID (tenant context).
    pub account: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user acting on an account.
    #[must_use]
    pub fn new(user_id: UserId, account_id: AccountId, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.into_inner(),
            account: account_id.into_inner(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }

    /// Returns the account ID from claims.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        AccountId::from_uuid(self.account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let user_id = UserId::new();
        let account_id = AccountId::new();
        let expires_at = Utc::now() + Duration::hours(1);

        let claims = Claims::new(user_id, account_id, expires_at);

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.account_id(), account_id);
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }
}
