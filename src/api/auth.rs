// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

//! Caller identity from the identity provider's subject header.
//!
//! Token verification happens upstream; this layer trusts the header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::handlers::ApiError;
use super::AppState;
use crate::models::user::User;

/// Raw subject header, for routes that run before a user row exists
pub struct Subject(pub Option<String>);

/// The resolved calling user, `None` when anonymous
pub struct Caller(pub Option<User>);

fn subject_of(parts: &Parts, state: &AppState) -> Option<String> {
    parts
        .headers
        .get(&*state.subject_header)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for Subject {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Subject(subject_of(parts, state)))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let subject = subject_of(parts, state);
        let user = state.service.resolve_caller(subject.as_deref()).await?;
        Ok(Caller(user))
    }
}
