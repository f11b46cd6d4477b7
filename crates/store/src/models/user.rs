//! User entity model and DTOs.

use manaforge_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Subscription tier of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Pro,
    Enterprise,
}

impl Tier {
    /// Lowercase name matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }
}

/// Starting energy balance for new and guest accounts.
pub const STARTING_ENERGY: u32 = 50;

/// Full user record as persisted.
///
/// Contains the password hash -- never expose this outside the auth layer.
/// Use [`UserProfile`] for anything caller-facing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Time-derived id, `u_<unix-millis>`.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub tier: Tier,
    pub magic_energy: u32,
    pub is_guest: bool,
    /// Argon2id PHC hash. Guests have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// SHA-256 hex digest of the active refresh token, if a session exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_hash: Option<String>,
    pub created_at: Timestamp,
}

/// Safe user representation for callers (no credential material).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub tier: Tier,
    pub magic_energy: u32,
    pub is_guest: bool,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            tier: user.tier,
            magic_energy: user.magic_energy,
            is_guest: user.is_guest,
        }
    }
}

/// Input for creating a new account record.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub tier: Tier,
    pub is_guest: bool,
    pub magic_energy: u32,
}
