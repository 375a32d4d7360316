// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use thiserror::Error;

/// Failures raised by a `SocialStore` backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to get database connection: {0}")]
    Pool(String),

    #[error("Database error: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operations on the follow graph that are rejected as logically invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidOperation {
    SelfFollow,
    AlreadyFollowing,
    NotFollowing,
}

impl fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            InvalidOperation::SelfFollow => "You cannot follow yourself",
            InvalidOperation::AlreadyFollowing => "You are already following this traveler",
            InvalidOperation::NotFollowing => "You are not following this traveler",
        };
        f.write_str(message)
    }
}

/// Which free-tier cap was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Follows,
    SharedTrips,
}

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    InvalidOperation(InvalidOperation),

    #[error("{}", limit_message(.kind, .max))]
    LimitExceeded { kind: LimitKind, max: u32 },

    #[error("Permission denied: {0}")]
    AuthorizationDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type SocialResult<T> = Result<T, SocialError>;

fn limit_message(kind: &LimitKind, max: &u32) -> String {
    match kind {
        LimitKind::Follows => format!(
            "Free accounts can follow up to {} travelers. Upgrade to Pro for unlimited follows.",
            max
        ),
        LimitKind::SharedTrips => format!(
            "Free accounts can share up to {} trips. Upgrade to Pro for unlimited sharing.",
            max
        ),
    }
}

impl SocialError {
    /// Whether this is an expected, user-actionable condition rather than a system fault
    pub fn is_expected(&self) -> bool {
        !matches!(self, SocialError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_message_names_the_limit() {
        let err = SocialError::LimitExceeded {
            kind: LimitKind::Follows,
            max: 50,
        };
        let message = err.to_string();
        assert!(message.contains("50"));
        assert!(message.contains("Upgrade to Pro"));
    }

    #[test]
    fn storage_errors_are_not_expected() {
        let err = SocialError::from(StoreError::Corrupt("bad role".into()));
        assert!(!err.is_expected());
        assert!(SocialError::Unauthenticated.is_expected());
        assert_eq!(SocialError::NotFound("User").to_string(), "User not found");
    }
}
