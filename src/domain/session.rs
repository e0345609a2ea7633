use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// User roles, ordered from most to least privileged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Analyst,
    Viewer,
}

/// Public view of an authenticated user. Never carries the password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user_id: u32,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub avatar_url: String,
}
