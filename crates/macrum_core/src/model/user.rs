//! Registered user record.

use super::entity::EntityId;
use serde::{Deserialize, Serialize};

/// Stable user identifier. Also parameterizes the workspace storage key.
pub type UserId = EntityId;

/// One entry of the local user directory.
///
/// No password material is stored; login is a local simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl User {
    /// Returns whether `email` addresses this user.
    ///
    /// Comparison trims surrounding whitespace and ignores case.
    pub fn has_email(&self, email: &str) -> bool {
        normalize_email(&self.email) == normalize_email(email)
    }
}

/// Canonical form used for email uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
