use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::model::ids::UserId;

const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";

/// Account role as reported by the portal API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }

    /// Capitalized label used in the user menu.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cached copy of the signed-in account.
///
/// The server owns the record; the client replaces it wholesale on login or
/// refresh and drops it on logout. Role-specific fields the client does not
/// interpret are kept in `extra` so they survive a storage round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Avatar image, falling back to a generated initials avatar.
    #[must_use]
    pub fn avatar_url(&self) -> String {
        match self.avatar.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_owned(),
            _ => generated_avatar_url(&self.full_name),
        }
    }
}

/// Initials avatar for a display name.
#[must_use]
pub fn generated_avatar_url(name: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("name", name)
        .append_pair("background", "4361ee")
        .append_pair("color", "fff")
        .finish();
    format!("{AVATAR_SERVICE}?{query}")
}
