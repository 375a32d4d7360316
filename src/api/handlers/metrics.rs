// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};

use super::ApiError;
use crate::metrics;

/// Prometheus text exposition
pub async fn get_metrics() -> Result<impl IntoResponse, ApiError> {
    let body = metrics::render().map_err(|e| {
        tracing::error!("Failed to encode metrics: {}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics")
    })?;

    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
