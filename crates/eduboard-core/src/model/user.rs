use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::merge;
use crate::store::Entity;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "Id")]
    pub id: u32,
    pub email: String,
    pub role: Role,
    pub profile: Profile,
    pub institution_id: Option<String>,
    #[serde(with = "super::timestamp")]
    pub last_active: Option<DateTime<Utc>>,
    pub preferences: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// "First Last", as shown in the user table and matched by search.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.profile.first_name, self.profile.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
}

/// Client-side role flag. Drives which views and stats are composed; it is
/// not an authorization mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    User,
}

impl Role {
    pub fn is_staff(self) -> bool {
        !matches!(self, Self::User)
    }

    /// Dashboard greeting label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::User => "Student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "user" | "student" => Ok(Self::User),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub role: Role,
    pub profile: Profile,
    pub institution_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPatch {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub profile: Option<Profile>,
    #[serde(with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<Option<String>>,
    #[serde(with = "super::timestamp::nullable", skip_serializing_if = "Option::is_none")]
    pub last_active: Option<Option<DateTime<Utc>>>,
    pub preferences: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Entity for User {
    const NAME: &'static str = "User";
    type Draft = NewUser;
    type Patch = UserPatch;

    fn id(&self) -> u32 {
        self.id
    }

    fn from_draft(id: u32, draft: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: draft.email,
            role: draft.role,
            profile: draft.profile,
            institution_id: draft.institution_id,
            last_active: Some(now),
            preferences: serde_json::Map::new(),
        }
    }

    fn apply_patch(&mut self, patch: UserPatch, _now: DateTime<Utc>) {
        merge(&mut self.email, patch.email);
        merge(&mut self.role, patch.role);
        merge(&mut self.profile, patch.profile);
        merge(&mut self.institution_id, patch.institution_id);
        merge(&mut self.last_active, patch.last_active);
        merge(&mut self.preferences, patch.preferences);
    }
}
