// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

pub mod feed;
pub mod health;
pub mod metrics;
pub mod profiles;
pub mod roles;
pub mod social_graph;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::SocialError;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response with message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Query for unpaginated list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<SocialError> for ApiError {
    fn from(err: SocialError) -> Self {
        let status = match &err {
            SocialError::Unauthenticated => StatusCode::UNAUTHORIZED,
            SocialError::AuthorizationDenied(_) | SocialError::LimitExceeded { .. } => StatusCode::FORBIDDEN,
            SocialError::NotFound(_) => StatusCode::NOT_FOUND,
            SocialError::InvalidOperation(_) => StatusCode::CONFLICT,
            SocialError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SocialError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if err.is_expected() {
            debug!("Request rejected: {}", err);
            Self::new(status, err.to_string())
        } else {
            error!("Request failed: {}", err);
            Self::new(status, "Internal server error")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}
