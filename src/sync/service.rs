//! Sync service.
//!
//! Writes made while offline live only in the local cache. This
//! service pushes them to the backend, triggered by an offline-to-
//! online connectivity transition or an explicit call. Only the
//! client-authored kinds are replayed: weather is a read-only cache
//! and news likes are device-local, so neither ever goes upstream.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::DataError;
use crate::models::{FarmerProfile, UserAccount};
use crate::net::{Connectivity, RemoteClient};
use crate::repos::{
    LocalRepository, ReadRepository, RemoteFarmerRepository, RemoteUserRepository, WriteRepository,
};
use crate::store::EntityKind;

/// What one sync pass did, per entity kind.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Kinds whose cached entity was pushed to the backend.
    pub synced: Vec<EntityKind>,
    /// Kinds whose replay failed, with the failure. One kind failing
    /// never stops the others.
    pub failed: Vec<(EntityKind, DataError)>,
    /// Kinds with nothing cached for the owner.
    pub skipped: Vec<EntityKind>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn merge(&mut self, other: SyncReport) {
        self.synced.extend(other.synced);
        self.failed.extend(other.failed);
        self.skipped.extend(other.skipped);
    }
}

/// Replays cached writes through the remote repositories.
pub struct SyncService {
    connectivity: Connectivity,
    api: Arc<RemoteClient>,
    farmer_local: Arc<LocalRepository<FarmerProfile>>,
    farmer_remote: Arc<RemoteFarmerRepository>,
    account_local: Arc<LocalRepository<UserAccount>>,
    account_remote: Arc<RemoteUserRepository>,
    in_flight: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for SyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncService").finish_non_exhaustive()
    }
}

impl SyncService {
    pub fn new(
        connectivity: Connectivity,
        api: Arc<RemoteClient>,
        farmer_local: Arc<LocalRepository<FarmerProfile>>,
        farmer_remote: Arc<RemoteFarmerRepository>,
        account_local: Arc<LocalRepository<UserAccount>>,
        account_remote: Arc<RemoteUserRepository>,
    ) -> Self {
        Self {
            connectivity,
            api,
            farmer_local,
            farmer_remote,
            account_local,
            account_remote,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Replays every locally-held entity for one owner.
    ///
    /// Returns `None` when a pass is already running; overlapping
    /// triggers (connectivity flaps) coalesce into the running pass.
    pub async fn sync_owner(&self, owner_id: &str) -> Option<SyncReport> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!(owner_id, "sync pass already running, skipping");
            return None;
        };

        let report = self.run_pass(owner_id).await;
        tracing::info!(
            owner_id,
            synced = report.synced.len(),
            failed = report.failed.len(),
            "sync pass complete"
        );
        Some(report)
    }

    /// Replays cached writes for every owner found in the local store.
    pub async fn sync_all(&self) -> Option<SyncReport> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("sync pass already running, skipping");
            return None;
        };

        let mut owners = BTreeSet::new();
        for result in [self.farmer_local.owners(), self.account_local.owners()] {
            match result {
                Ok(found) => owners.extend(found),
                Err(e) => tracing::warn!(error = %e, "failed to enumerate cached owners"),
            }
        }

        let mut report = SyncReport::default();
        for owner_id in owners {
            report.merge(self.run_pass(&owner_id).await);
        }
        Some(report)
    }

    /// Watches connectivity and replays the owner's cached writes on
    /// each offline-to-online transition. Runs until the connectivity
    /// handle is dropped.
    pub async fn watch(&self, owner_id: &str) {
        let mut rx = self.connectivity.watch();
        let mut was_online = *rx.borrow();

        while rx.changed().await.is_ok() {
            let online = *rx.borrow();
            if online && !was_online {
                tracing::info!(owner_id, "connectivity restored, starting sync pass");
                // Fast fail: a flapping link often reports online
                // before the backend is actually reachable.
                if self.api.is_reachable().await {
                    self.sync_owner(owner_id).await;
                } else {
                    tracing::warn!(owner_id, "backend unreachable, skipping sync pass");
                }
            }
            was_online = online;
        }
    }

    async fn run_pass(&self, owner_id: &str) -> SyncReport {
        let mut report = SyncReport::default();
        replay(
            self.farmer_local.kind(),
            self.farmer_local.as_ref(),
            self.farmer_remote.as_ref(),
            owner_id,
            &mut report,
        )
        .await;
        replay(
            self.account_local.kind(),
            self.account_local.as_ref(),
            self.account_remote.as_ref(),
            owner_id,
            &mut report,
        )
        .await;
        report
    }
}

async fn replay<L, R>(
    kind: EntityKind,
    local: &L,
    remote: &R,
    owner_id: &str,
    report: &mut SyncReport,
) where
    L: ReadRepository,
    R: WriteRepository<Entity = L::Entity>,
{
    match local.get(owner_id).await {
        Ok(Some(entity)) => match remote.save(&entity, owner_id).await {
            Ok(_) => {
                tracing::info!(owner_id, %kind, "replayed cached write");
                report.synced.push(kind);
            }
            Err(e) => {
                tracing::warn!(owner_id, %kind, error = %e, "replay failed");
                report.failed.push((kind, e));
            }
        },
        Ok(None) => report.skipped.push(kind),
        Err(e) => {
            tracing::warn!(owner_id, %kind, error = %e, "failed to read cached entity");
            report.failed.push((kind, e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FarmSize, FarmerType};
    use crate::store::MemoryStore;
    use axum::extract::Path;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use std::time::Duration;

    async fn serve(app: Router) -> Arc<RemoteClient> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Arc::new(RemoteClient::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap())
    }

    fn sample_profile() -> FarmerProfile {
        FarmerProfile::new(FarmerType::New)
            .with_location("Nakuru")
            .with_crops(["maize"])
            .with_farm_size(FarmSize::Small)
    }

    struct Fixture {
        service: SyncService,
        farmer_local: Arc<LocalRepository<FarmerProfile>>,
        account_local: Arc<LocalRepository<UserAccount>>,
        hits: Arc<Mutex<Vec<String>>>,
    }

    /// Builds a service against a backend that records farm-info posts
    /// and accepts account posts.
    async fn fixture(farm_route_fails: bool) -> Fixture {
        let hits = Arc::new(Mutex::new(Vec::<String>::new()));

        let recorded = hits.clone();
        let farm_handler = move |Path(owner): Path<String>, Json(body): Json<Value>| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().unwrap().push(owner);
                if farm_route_fails {
                    Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
                } else {
                    Ok(Json(json!({"data": body})))
                }
            }
        };

        let app = Router::new()
            .route("/farmer/farm/info/{owner}", post(farm_handler))
            .route(
                "/farmer/account/{owner}",
                post(|Json(body): Json<Value>| async move { Json(json!({"data": body})) }),
            );
        let api = serve(app).await;

        let store = Arc::new(MemoryStore::new());
        let farmer_local: Arc<LocalRepository<FarmerProfile>> = Arc::new(LocalRepository::new(
            store.clone(),
            "zao",
            EntityKind::FarmerProfile,
        ));
        let account_local: Arc<LocalRepository<UserAccount>> = Arc::new(LocalRepository::new(
            store.clone(),
            "zao",
            EntityKind::UserAccount,
        ));

        let service = SyncService::new(
            Connectivity::new(true),
            api.clone(),
            farmer_local.clone(),
            Arc::new(RemoteFarmerRepository::new(api.clone())),
            account_local.clone(),
            Arc::new(RemoteUserRepository::new(api)),
        );

        Fixture {
            service,
            farmer_local,
            account_local,
            hits,
        }
    }

    #[tokio::test]
    async fn test_sync_owner_replays_cached_profile() {
        let fx = fixture(false).await;
        fx.farmer_local.save(&sample_profile(), "u1").await.unwrap();

        let report = fx.service.sync_owner("u1").await.unwrap();

        assert_eq!(report.synced, vec![EntityKind::FarmerProfile]);
        assert_eq!(report.skipped, vec![EntityKind::UserAccount]);
        assert!(report.is_clean());
        assert_eq!(fx.hits.lock().unwrap().as_slice(), ["u1"]);
    }

    #[tokio::test]
    async fn test_one_kind_failing_does_not_stop_the_other() {
        let fx = fixture(true).await;
        fx.farmer_local.save(&sample_profile(), "u1").await.unwrap();
        let account = UserAccount::new("u1", "Amina", "Odhiambo", "a@b.c", "+254700");
        fx.account_local.save(&account, "u1").await.unwrap();

        let report = fx.service.sync_owner("u1").await.unwrap();

        assert_eq!(report.synced, vec![EntityKind::UserAccount]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, EntityKind::FarmerProfile);
    }

    #[tokio::test]
    async fn test_nothing_cached_skips_everything() {
        let fx = fixture(false).await;

        let report = fx.service.sync_owner("u1").await.unwrap();

        assert!(report.synced.is_empty());
        assert_eq!(
            report.skipped,
            vec![EntityKind::FarmerProfile, EntityKind::UserAccount]
        );
        assert!(fx.hits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sync_all_covers_every_cached_owner() {
        let fx = fixture(false).await;
        fx.farmer_local.save(&sample_profile(), "u1").await.unwrap();
        fx.farmer_local.save(&sample_profile(), "u2").await.unwrap();

        let report = fx.service.sync_all().await.unwrap();

        assert_eq!(report.synced.len(), 2);
        let mut owners = fx.hits.lock().unwrap().clone();
        owners.sort();
        assert_eq!(owners, ["u1", "u2"]);
    }

    #[tokio::test]
    async fn test_connectivity_restore_triggers_replay() {
        let fx = fixture(false).await;
        fx.farmer_local.save(&sample_profile(), "u1").await.unwrap();

        let connectivity = fx.service.connectivity.clone();
        connectivity.set_online(false);

        let service = Arc::new(fx.service);
        let watcher = service.clone();
        tokio::spawn(async move { watcher.watch("u1").await });

        // Give the watcher a beat to subscribe, then restore
        tokio::time::sleep(Duration::from_millis(50)).await;
        connectivity.set_online(true);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(fx.hits.lock().unwrap().as_slice(), ["u1"]);
    }

    #[tokio::test]
    async fn test_overlapping_passes_coalesce() {
        let fx = fixture(false).await;
        fx.farmer_local.save(&sample_profile(), "u1").await.unwrap();

        let (first, second) = tokio::join!(fx.service.sync_owner("u1"), fx.service.sync_owner("u1"));

        // Exactly one of the two concurrent triggers ran a pass
        assert!(first.is_some() != second.is_some());
        assert_eq!(fx.hits.lock().unwrap().len(), 1);
    }
}
