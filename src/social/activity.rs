// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{now, SocialService};
use crate::error::{SocialError, SocialResult};
use crate::metrics;
use crate::models::activity::{ActivityDetails, ActivityRecord, NewActivity};
use crate::models::user::{UserId, Visibility};

impl SocialService {
    /// Best-effort activity write for action handlers.
    ///
    /// Unknown and private actors are skipped; failures are logged, never returned.
    pub async fn record_activity(
        &self,
        actor_id: UserId,
        reference_id: impl Into<String>,
        details: ActivityDetails,
    ) {
        match self.try_record_activity(actor_id, reference_id.into(), details).await {
            Ok(Some(record)) => {
                metrics::activity_recorded();
                debug!("Recorded {} activity {} for user {}", record.details.kind(), record.id, actor_id);
            }
            Ok(None) => {}
            Err(e) => {
                metrics::activity_dropped("error");
                warn!("Failed to record activity for user {}: {}", actor_id, e);
            }
        }
    }

    /// Run `record_activity` on its own task so the caller never waits on it
    pub fn spawn_record_activity(
        self: &Arc<Self>,
        actor_id: UserId,
        reference_id: String,
        details: ActivityDetails,
    ) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            service.record_activity(actor_id, reference_id, details).await;
        })
    }

    async fn try_record_activity(
        &self,
        actor_id: UserId,
        reference_id: String,
        details: ActivityDetails,
    ) -> SocialResult<Option<ActivityRecord>> {
        let Some(actor) = self.store.user_by_id(actor_id).await? else {
            metrics::activity_dropped("unknown_actor");
            debug!("Skipping activity for unknown user {}", actor_id);
            return Ok(None);
        };

        // Visibility is snapshotted here; later changes do not touch written rows
        if actor.visibility == Visibility::Private {
            metrics::activity_dropped("private");
            debug!("Skipping activity for private user {}", actor_id);
            return Ok(None);
        }

        details.validate().map_err(SocialError::InvalidInput)?;

        let record = self
            .store
            .insert_activity(NewActivity::new(actor.id, reference_id, &details, now()))
            .await?;
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::{ActivityRange, PlaceVisited, TripCreated};
    use crate::models::user::ProfileUpdate;
    use crate::permissions::PermissionTable;
    use crate::store::MemoryStore;
    use tracing_test::traced_test;

    fn trip() -> ActivityDetails {
        ActivityDetails::TripCreated(TripCreated {
            trip_name: "Andes".into(),
            destination: Some("Peru".into()),
        })
    }

    fn service() -> Arc<SocialService> {
        Arc::new(SocialService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(PermissionTable::default()),
        ))
    }

    #[tokio::test]
    async fn records_for_public_actor() {
        let svc = service();
        let actor = svc.sync_user(Some("auth|a"), "A", None).await.unwrap();

        svc.record_activity(actor.id, "trip-1", trip()).await;

        let records = svc.store().activities_of(actor.id, ActivityRange::default()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reference_id, "trip-1");
        assert_eq!(records[0].details, trip());
    }

    #[tokio::test]
    #[traced_test]
    async fn private_actor_is_skipped_silently() {
        let svc = service();
        let actor = svc.sync_user(Some("auth|p"), "P", None).await.unwrap();
        let update = ProfileUpdate {
            visibility: Some(Visibility::Private),
            ..Default::default()
        };
        svc.update_profile(Some(&actor), update).await.unwrap();

        svc.record_activity(actor.id, "trip-1", trip()).await;

        let records = svc.store().activities_of(actor.id, ActivityRange::default()).await.unwrap();
        assert!(records.is_empty());
        assert!(logs_contain("Skipping activity for private user"));
    }

    #[tokio::test]
    async fn unknown_actor_and_bad_metadata_do_not_fail() {
        let svc = service();
        svc.record_activity(404, "trip-1", trip()).await;

        let actor = svc.sync_user(Some("auth|a"), "A", None).await.unwrap();
        let bad = ActivityDetails::PlaceVisited(PlaceVisited {
            place_name: "Cusco".into(),
            rating: Some(0),
        });
        svc.record_activity(actor.id, "place-1", bad).await;

        let records = svc.store().activities_of(actor.id, ActivityRange::default()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn spawned_recording_completes_in_background() {
        let svc = service();
        let actor = svc.sync_user(Some("auth|a"), "A", None).await.unwrap();

        svc.spawn_record_activity(actor.id, "trip-9".into(), trip())
            .await
            .unwrap();

        let records = svc.store().activities_of(actor.id, ActivityRange::default()).await.unwrap();
        assert_eq!(records.len(), 1);
    }
}
