// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::user::{Role, User, UserId};
use crate::schema::activities;

pub type ActivityId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    TripCreated,
    PlaceVisited,
    JournalPosted,
    PlaceAdded,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::TripCreated => "trip_created",
            ActivityType::PlaceVisited => "place_visited",
            ActivityType::JournalPosted => "journal_posted",
            ActivityType::PlaceAdded => "place_added",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trip_created" => Ok(ActivityType::TripCreated),
            "place_visited" => Ok(ActivityType::PlaceVisited),
            "journal_posted" => Ok(ActivityType::JournalPosted),
            "place_added" => Ok(ActivityType::PlaceAdded),
            other => Err(format!("unknown activity type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripCreated {
    pub trip_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceVisited {
    pub place_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalPosted {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceAdded {
    pub place_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// What happened, with metadata shaped per activity type.
///
/// Serialized as `{"type": "...", "metadata": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "metadata", rename_all = "snake_case")]
pub enum ActivityDetails {
    TripCreated(TripCreated),
    PlaceVisited(PlaceVisited),
    JournalPosted(JournalPosted),
    PlaceAdded(PlaceAdded),
}

impl ActivityDetails {
    pub fn kind(&self) -> ActivityType {
        match self {
            ActivityDetails::TripCreated(_) => ActivityType::TripCreated,
            ActivityDetails::PlaceVisited(_) => ActivityType::PlaceVisited,
            ActivityDetails::JournalPosted(_) => ActivityType::JournalPosted,
            ActivityDetails::PlaceAdded(_) => ActivityType::PlaceAdded,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            ActivityDetails::PlaceVisited(PlaceVisited {
                rating: Some(rating),
                ..
            }) if !(1..=5).contains(rating) => {
                Err(format!("rating must be between 1 and 5, got {}", rating))
            }
            _ => Ok(()),
        }
    }

    /// Metadata column value
    pub fn metadata(&self) -> serde_json::Value {
        let value = match self {
            ActivityDetails::TripCreated(m) => serde_json::to_value(m),
            ActivityDetails::PlaceVisited(m) => serde_json::to_value(m),
            ActivityDetails::JournalPosted(m) => serde_json::to_value(m),
            ActivityDetails::PlaceAdded(m) => serde_json::to_value(m),
        };
        // plain structs of strings and integers always serialize
        value.unwrap_or_else(|_| serde_json::Value::Object(Default::default()))
    }

    /// Rebuild from the stored type tag and metadata column
    pub fn from_parts(kind: ActivityType, metadata: serde_json::Value) -> Result<Self, StoreError> {
        let details = match kind {
            ActivityType::TripCreated => serde_json::from_value(metadata).map(Self::TripCreated),
            ActivityType::PlaceVisited => serde_json::from_value(metadata).map(Self::PlaceVisited),
            ActivityType::JournalPosted => serde_json::from_value(metadata).map(Self::JournalPosted),
            ActivityType::PlaceAdded => serde_json::from_value(metadata).map(Self::PlaceAdded),
        };
        details.map_err(|e| StoreError::Corrupt(format!("{} metadata: {}", kind, e)))
    }
}

/// One trackable action by a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub user_id: UserId,
    pub reference_id: String,
    #[serde(flatten)]
    pub details: ActivityDetails,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityRow {
    pub id: i32,
    pub user_id: i32,
    pub activity_type: String,
    pub reference_id: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for ActivityRecord {
    type Error = StoreError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let kind: ActivityType = row.activity_type.parse().map_err(StoreError::Corrupt)?;
        Ok(ActivityRecord {
            id: row.id,
            user_id: row.user_id,
            reference_id: row.reference_id,
            details: ActivityDetails::from_parts(kind, row.metadata)?,
            created_at: row.created_at,
        })
    }
}

/// DTO for inserting an activity
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activities)]
pub struct NewActivity {
    pub user_id: UserId,
    pub activity_type: String,
    pub reference_id: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl NewActivity {
    pub fn new(
        user_id: UserId,
        reference_id: impl Into<String>,
        details: &ActivityDetails,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            activity_type: details.kind().as_str().to_string(),
            reference_id: reference_id.into(),
            metadata: details.metadata(),
            created_at,
        }
    }
}

/// Bounds applied when reading one user's activity, newest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityRange {
    /// Exclusive upper bound: only records strictly older than this
    pub before: Option<DateTime<Utc>>,
    /// Inclusive lower bound: records older than this are dropped
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl ActivityRange {
    pub fn latest(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn contains(&self, created_at: DateTime<Utc>) -> bool {
        self.before.map_or(true, |before| created_at < before)
            && self.since.map_or(true, |since| created_at >= since)
    }
}

/// Activity enriched with its author, as returned by feed reads
#[derive(Debug, Clone, Serialize)]
pub struct FeedActivity {
    pub id: ActivityId,
    pub author_id: UserId,
    pub reference_id: String,
    #[serde(flatten)]
    pub details: ActivityDetails,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub author_role: Role,
}

impl FeedActivity {
    pub fn new(record: ActivityRecord, author: &User) -> Self {
        Self {
            id: record.id,
            author_id: record.user_id,
            reference_id: record.reference_id,
            details: record.details,
            created_at: record.created_at,
            author_name: author.display_name.clone(),
            author_avatar: author.avatar_url.clone(),
            author_role: author.effective_role(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub activities: Vec<FeedActivity>,
    /// Epoch milliseconds of the last returned activity, when more remain
    pub next_cursor: Option<i64>,
}

impl FeedPage {
    pub fn empty() -> Self {
        Self {
            activities: Vec::new(),
            next_cursor: None,
        }
    }
}

/// Query parameters for the feed
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<usize>,
    /// Epoch milliseconds; only activity strictly older is returned
    pub cursor: Option<i64>,
}
