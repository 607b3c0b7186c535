//! Session-related types.

use serde::{Deserialize, Serialize};

use az_clothes_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data needed to gate the checkout pages. Issuing and checking
/// credentials belongs to the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's id in the document database, when known.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// User's email address.
    pub email: Email,
    /// Display name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl CurrentUser {
    /// A signed-in shopper known only by email.
    #[must_use]
    pub fn with_email(email: Email) -> Self {
        Self {
            id: None,
            name: email.as_str().split('@').next().unwrap_or_default().to_owned(),
            email,
            is_admin: false,
        }
    }
}

/// Where the login page sends the shopper back to after checkout is gated.
pub const LOGIN_REDIRECT: &str = "/shipping";
