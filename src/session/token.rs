use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Role, Session};

/// The persisted session token: the public session fields plus an absolute
/// expiry, base64-of-JSON encoded. Not signed — this mirrors the mock auth
/// scheme and must be swapped out for anything real.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionToken {
    pub user_id: u32,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub avatar_url: String,
    /// Expiry as epoch seconds.
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq)]
#[error("malformed session token")]
pub struct MalformedToken;

impl SessionToken {
    pub fn issue(session: &Session, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            user_id: session.user_id,
            email: session.email.clone(),
            display_name: session.display_name.clone(),
            role: session.role,
            avatar_url: session.avatar_url.clone(),
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn encode(&self) -> String {
        // Serializing a plain struct of strings and ints cannot fail.
        STANDARD.encode(serde_json::to_vec(self).unwrap_or_default())
    }

    pub fn decode(raw: &str) -> Result<Self, MalformedToken> {
        let bytes = STANDARD.decode(raw.trim()).map_err(|_| MalformedToken)?;
        serde_json::from_slice(&bytes).map_err(|_| MalformedToken)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp < now.timestamp()
    }

    pub fn session(&self) -> Session {
        Session {
            user_id: self.user_id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            avatar_url: self.avatar_url.clone(),
        }
    }
}
