// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::schema::users;

pub type UserId = i32;

pub const MAX_TRAVEL_STYLES: usize = 10;
pub const MAX_LANGUAGES: usize = 20;
pub const MAX_DISPLAY_NAME_LEN: usize = 100;
pub const MAX_BIO_LEN: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Free,
    Pro,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Free => "free",
            Role::Pro => "pro",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Role::Free),
            "pro" => Ok(Role::Pro),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Who may see a user's profile, lists and activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Friends,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Friends => "friends",
            Visibility::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "friends" => Ok(Visibility::Friends),
            "private" => Ok(Visibility::Private),
            other => Err(format!("unknown visibility '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    #[serde(skip_serializing)]
    pub auth_subject: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub home_location: Option<String>,
    pub travel_styles: Vec<String>,
    pub languages: Vec<String>,
    pub visibility: Visibility,
    /// Stored role; `None` means the user was never assigned one
    pub role: Option<Role>,
    pub role_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Role used by every permission check
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or_default()
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub auth_subject: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub home_location: Option<String>,
    pub travel_styles: Vec<String>,
    pub languages: Vec<String>,
    pub visibility: String,
    pub role: Option<String>,
    pub role_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let visibility = row.visibility.parse().map_err(StoreError::Corrupt)?;
        let role = row
            .role
            .as_deref()
            .map(Role::from_str)
            .transpose()
            .map_err(StoreError::Corrupt)?;

        Ok(User {
            id: row.id,
            auth_subject: row.auth_subject,
            display_name: row.display_name,
            avatar_url: row.avatar_url,
            bio: row.bio,
            home_location: row.home_location,
            travel_styles: row.travel_styles,
            languages: row.languages,
            visibility,
            role,
            role_updated_at: row.role_updated_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// DTO for creating a user on first identity sync
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub auth_subject: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub visibility: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(
        auth_subject: impl Into<String>,
        display_name: impl Into<String>,
        avatar_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            auth_subject: auth_subject.into(),
            display_name: display_name.into(),
            avatar_url,
            visibility: Visibility::default().as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller-supplied profile changes; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub home_location: Option<String>,
    pub travel_styles: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub visibility: Option<Visibility>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.display_name {
            if name.trim().is_empty() {
                return Err("display name cannot be empty".to_string());
            }
            if name.chars().count() > MAX_DISPLAY_NAME_LEN {
                return Err(format!(
                    "display name cannot exceed {} characters",
                    MAX_DISPLAY_NAME_LEN
                ));
            }
        }
        if let Some(bio) = &self.bio {
            if bio.chars().count() > MAX_BIO_LEN {
                return Err(format!("bio cannot exceed {} characters", MAX_BIO_LEN));
            }
        }
        if let Some(styles) = &self.travel_styles {
            if styles.len() > MAX_TRAVEL_STYLES {
                return Err(format!(
                    "at most {} travel styles are allowed",
                    MAX_TRAVEL_STYLES
                ));
            }
        }
        if let Some(languages) = &self.languages {
            if languages.len() > MAX_LANGUAGES {
                return Err(format!("at most {} languages are allowed", MAX_LANGUAGES));
            }
        }
        Ok(())
    }

    /// Apply onto an in-memory user
    pub fn apply_to(&self, user: &mut User, now: DateTime<Utc>) {
        if let Some(name) = &self.display_name {
            user.display_name = name.clone();
        }
        if let Some(avatar) = &self.avatar_url {
            user.avatar_url = Some(avatar.clone());
        }
        if let Some(bio) = &self.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(location) = &self.home_location {
            user.home_location = Some(location.clone());
        }
        if let Some(styles) = &self.travel_styles {
            user.travel_styles = dedup_preserving_order(styles);
        }
        if let Some(languages) = &self.languages {
            user.languages = dedup_preserving_order(languages);
        }
        if let Some(visibility) = self.visibility {
            user.visibility = visibility;
        }
        user.updated_at = now;
    }
}

/// Changeset written by the Postgres store
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct ProfileChangeset {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub home_location: Option<String>,
    pub travel_styles: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub visibility: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileChangeset {
    pub fn new(update: &ProfileUpdate, now: DateTime<Utc>) -> Self {
        Self {
            display_name: update.display_name.clone(),
            avatar_url: update.avatar_url.clone(),
            bio: update.bio.clone(),
            home_location: update.home_location.clone(),
            travel_styles: update.travel_styles.as_deref().map(dedup_preserving_order),
            languages: update.languages.as_deref().map(dedup_preserving_order),
            visibility: update.visibility.map(|v| v.as_str().to_string()),
            updated_at: now,
        }
    }
}

// travel styles and languages are sets
fn dedup_preserving_order(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(value) {
            out.push(value.clone());
        }
    }
    out
}

/// Profile as seen by a particular viewer
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub visibility: Visibility,
    pub role: Role,
    /// True when the viewer only gets the public card
    pub restricted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ProfileDetails>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileDetails {
    pub bio: Option<String>,
    pub home_location: Option<String>,
    pub travel_styles: Vec<String>,
    pub languages: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ProfileView {
    pub fn new(user: &User, visible: bool) -> Self {
        let details = visible.then(|| ProfileDetails {
            bio: user.bio.clone(),
            home_location: user.home_location.clone(),
            travel_styles: user.travel_styles.clone(),
            languages: user.languages.clone(),
            created_at: user.created_at,
        });

        Self {
            id: user.id,
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
            visibility: user.visibility,
            role: user.effective_role(),
            restricted: !visible,
            details,
        }
    }
}
