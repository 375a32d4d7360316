// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod models;
pub mod permissions;
pub mod schema;
pub mod social;
pub mod store;
