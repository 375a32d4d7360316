// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

//! Role to capability mapping and the numeric limits of the free tier.
//!
//! The table is built once at start-up and shared behind an `Arc`; nothing
//! mutates it afterwards.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::user::Role;

/// A named capability a role may grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Basic,
    UnlimitedFollows,
    UnlimitedShares,
    FullFeed,
    CustomUrls,
    Analytics,
    ProBadge,
    HideBranding,
    Moderate,
    ManageRoles,
    AdminPanel,
}

impl Capability {
    pub const ALL: [Capability; 11] = [
        Capability::Basic,
        Capability::UnlimitedFollows,
        Capability::UnlimitedShares,
        Capability::FullFeed,
        Capability::CustomUrls,
        Capability::Analytics,
        Capability::ProBadge,
        Capability::HideBranding,
        Capability::Moderate,
        Capability::ManageRoles,
        Capability::AdminPanel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Basic => "basic",
            Capability::UnlimitedFollows => "unlimited_follows",
            Capability::UnlimitedShares => "unlimited_shares",
            Capability::FullFeed => "full_feed",
            Capability::CustomUrls => "custom_urls",
            Capability::Analytics => "analytics",
            Capability::ProBadge => "pro_badge",
            Capability::HideBranding => "hide_branding",
            Capability::Moderate => "moderate",
            Capability::ManageRoles => "manage_roles",
            Capability::AdminPanel => "admin_panel",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown capability '{}'", s))
    }
}

/// Limits applied to callers lacking the matching unlimited capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeLimits {
    pub max_follows: u32,
    pub max_shared_trips: u32,
    pub feed_history_days: u32,
}

impl Default for FreeLimits {
    fn default() -> Self {
        Self {
            max_follows: 50,
            max_shared_trips: 3,
            feed_history_days: 7,
        }
    }
}

/// Immutable role -> capability table
#[derive(Debug, Clone)]
pub struct PermissionTable {
    roles: HashMap<Role, BTreeSet<Capability>>,
    limits: FreeLimits,
}

impl PermissionTable {
    /// Build the standard cumulative table: free < pro < moderator < admin
    pub fn new(limits: FreeLimits) -> Self {
        use Capability::*;

        let free: BTreeSet<Capability> = [Basic].into_iter().collect();

        let mut pro = free.clone();
        pro.extend([
            UnlimitedFollows,
            UnlimitedShares,
            FullFeed,
            CustomUrls,
            Analytics,
            ProBadge,
            HideBranding,
        ]);

        let mut moderator = pro.clone();
        moderator.insert(Moderate);

        let mut admin = moderator.clone();
        admin.extend([ManageRoles, AdminPanel]);

        let roles = HashMap::from([
            (Role::Free, free),
            (Role::Pro, pro),
            (Role::Moderator, moderator),
            (Role::Admin, admin),
        ]);

        Self { roles, limits }
    }

    pub fn limits(&self) -> &FreeLimits {
        &self.limits
    }

    /// Check a capability by name. An absent role is `free`; unknown names are never granted.
    pub fn has_capability(&self, role: Option<Role>, capability: &str) -> bool {
        match capability.parse::<Capability>() {
            Ok(cap) => self.grants(role, cap),
            Err(_) => false,
        }
    }

    pub fn grants(&self, role: Option<Role>, capability: Capability) -> bool {
        self.roles
            .get(&role.unwrap_or_default())
            .map(|caps| caps.contains(&capability))
            .unwrap_or(false)
    }

    pub fn capabilities_of(&self, role: Option<Role>) -> BTreeSet<Capability> {
        self.roles
            .get(&role.unwrap_or_default())
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::new(FreeLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: [Role; 4] = [Role::Free, Role::Pro, Role::Moderator, Role::Admin];

    #[test]
    fn absent_role_behaves_as_free() {
        let table = PermissionTable::default();
        assert!(table.has_capability(None, "basic"));
        assert!(table.has_capability(Some(Role::Free), "basic"));
        assert!(!table.has_capability(None, "full_feed"));
        assert!(!table.has_capability(Some(Role::Free), "full_feed"));
        assert_eq!(table.capabilities_of(None), table.capabilities_of(Some(Role::Free)));
    }

    #[test]
    fn higher_roles_are_supersets() {
        let table = PermissionTable::default();
        for (i, lower) in ROLES.iter().enumerate() {
            for higher in &ROLES[i..] {
                for cap in table.capabilities_of(Some(*lower)) {
                    assert!(
                        table.grants(Some(*higher), cap),
                        "{:?} should inherit {} from {:?}",
                        higher,
                        cap,
                        lower
                    );
                }
            }
        }
        assert!(table.has_capability(Some(Role::Admin), "basic"));
    }

    #[test]
    fn staff_capabilities_are_reserved() {
        let table = PermissionTable::default();
        assert!(!table.has_capability(Some(Role::Pro), "moderate"));
        assert!(table.has_capability(Some(Role::Moderator), "moderate"));
        assert!(!table.has_capability(Some(Role::Moderator), "manage_roles"));
        assert!(table.has_capability(Some(Role::Admin), "manage_roles"));
        assert!(table.has_capability(Some(Role::Admin), "admin_panel"));
    }

    #[test]
    fn unknown_capabilities_are_denied() {
        let table = PermissionTable::default();
        assert!(!table.has_capability(Some(Role::Admin), "full-feed"));
        assert!(!table.has_capability(Some(Role::Admin), ""));
    }

    #[test]
    fn capability_names_round_trip() {
        for cap in Capability::ALL {
            assert_eq!(cap.as_str().parse::<Capability>().unwrap(), cap);
        }
    }
}
