// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use tracing::info;

use super::{now, require_caller, SocialService};
use crate::error::{LimitKind, SocialError, SocialResult};
use crate::models::user::{Role, User, UserId};
use crate::permissions::Capability;

/// The caller's role and everything it grants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleSummary {
    pub role: Role,
    pub permissions: Vec<Capability>,
}

impl SocialService {
    /// Anonymous callers get the free defaults
    pub fn current_role(&self, caller: Option<&User>) -> RoleSummary {
        let role = caller.and_then(|c| c.role);
        RoleSummary {
            role: role.unwrap_or_default(),
            permissions: self.permissions.capabilities_of(role).into_iter().collect(),
        }
    }

    pub fn has_capability(&self, caller: Option<&User>, capability: &str) -> bool {
        self.permissions
            .has_capability(caller.and_then(|c| c.role), capability)
    }

    /// Assign a role; requires `manage_roles`
    pub async fn set_user_role(
        &self,
        caller: Option<&User>,
        target_id: UserId,
        role: Role,
    ) -> SocialResult<User> {
        let caller = require_caller(caller)?;

        if !self.permissions.grants(caller.role, Capability::ManageRoles) {
            return Err(SocialError::AuthorizationDenied(
                "managing roles requires an administrator".to_string(),
            ));
        }

        let updated = self
            .store
            .set_role(target_id, role, now())
            .await?
            .ok_or(SocialError::NotFound("User"))?;

        info!("User {} set role of {} to {}", caller.id, target_id, role);
        Ok(updated)
    }

    /// Gate for the trip-sharing handler
    pub fn check_share_allowed(&self, user: &User, currently_shared: u32) -> SocialResult<()> {
        if self.permissions.grants(user.role, Capability::UnlimitedShares) {
            return Ok(());
        }
        let max = self.permissions.limits().max_shared_trips;
        if currently_shared >= max {
            return Err(SocialError::LimitExceeded {
                kind: LimitKind::SharedTrips,
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::permissions::PermissionTable;
    use crate::store::MemoryStore;

    async fn setup() -> (SocialService, User, User) {
        let svc = SocialService::new(Arc::new(MemoryStore::new()), Arc::new(PermissionTable::default()));
        let admin = svc.sync_user(Some("auth|admin"), "Admin", None).await.unwrap();
        let admin = svc.store().set_role(admin.id, Role::Admin, now()).await.unwrap().unwrap();
        let member = svc.sync_user(Some("auth|member"), "Member", None).await.unwrap();
        (svc, admin, member)
    }

    #[tokio::test]
    async fn anonymous_role_summary_is_free() {
        let (svc, _, _) = setup().await;
        let summary = svc.current_role(None);
        assert_eq!(summary.role, Role::Free);
        assert_eq!(summary.permissions, vec![Capability::Basic]);
        assert!(svc.has_capability(None, "basic"));
        assert!(!svc.has_capability(None, "full_feed"));
    }

    #[tokio::test]
    async fn admin_assigns_roles_and_stamps_time() {
        let (svc, admin, member) = setup().await;
        let updated = svc.set_user_role(Some(&admin), member.id, Role::Pro).await.unwrap();
        assert_eq!(updated.role, Some(Role::Pro));
        assert!(updated.role_updated_at.is_some());
        assert!(svc.current_role(Some(&updated)).permissions.contains(&Capability::FullFeed));
    }

    #[tokio::test]
    async fn non_admins_are_denied() {
        let (svc, admin, member) = setup().await;
        assert!(matches!(
            svc.set_user_role(Some(&member), admin.id, Role::Free).await,
            Err(SocialError::AuthorizationDenied(_))
        ));
        assert!(matches!(
            svc.set_user_role(None, member.id, Role::Admin).await,
            Err(SocialError::Unauthenticated)
        ));
        assert!(matches!(
            svc.set_user_role(Some(&admin), 9999, Role::Pro).await,
            Err(SocialError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn share_limit_applies_to_free_only() {
        let (svc, admin, member) = setup().await;
        assert!(svc.check_share_allowed(&member, 2).is_ok());
        assert!(matches!(
            svc.check_share_allowed(&member, 3),
            Err(SocialError::LimitExceeded {
                kind: LimitKind::SharedTrips,
                max: 3
            })
        ));
        assert!(svc.check_share_allowed(&admin, 300).is_ok());
    }
}
