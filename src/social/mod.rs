// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

//! Social graph, activity feed and role gating.
//!
//! Every operation takes the already-resolved caller as `Option<&User>`.
//! Reads treat `None` as an anonymous viewer; writes reject it.

mod activity;
mod feed;
mod graph;
mod identity;
pub mod pagination;
mod profiles;
mod roles;
pub mod visibility;

pub use pagination::Page;
pub use roles::RoleSummary;

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::{SocialError, SocialResult};
use crate::models::user::User;
use crate::permissions::PermissionTable;
use crate::store::SocialStore;

pub struct SocialService {
    store: Arc<dyn SocialStore>,
    permissions: Arc<PermissionTable>,
}

impl SocialService {
    pub fn new(store: Arc<dyn SocialStore>, permissions: Arc<PermissionTable>) -> Self {
        Self { store, permissions }
    }

    pub fn store(&self) -> &Arc<dyn SocialStore> {
        &self.store
    }

    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }
}

/// Current time at the millisecond precision used by feed cursors
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub(crate) fn require_caller(caller: Option<&User>) -> SocialResult<&User> {
    caller.ok_or(SocialError::Unauthenticated)
}
