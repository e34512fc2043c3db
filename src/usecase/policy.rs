//! Connectivity policy shared by every read and write use case.
//!
//! Reads prefer the remote source while online and fall back to the
//! local cache; writes land locally first so nothing is ever lost,
//! then push to the backend when it is reachable. Connectivity-class
//! remote failures (timeout, network, gateway) degrade gracefully;
//! everything else propagates.

use std::future::Future;

use crate::error::DataError;
use crate::repos::WriteRepository;

/// Where a read result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Fresh from the backend.
    Remote,
    /// Served from the local cache, possibly stale.
    Cache,
}

/// Result of a cached read.
#[derive(Debug)]
pub struct ReadOutcome<T> {
    pub value: T,
    pub source: DataSource,
    /// Write-through failure that was swallowed to keep the read
    /// alive, surfaced here so callers and tests can observe it.
    pub cache_write_error: Option<DataError>,
}

impl<T> ReadOutcome<T> {
    fn remote(value: T, cache_write_error: Option<DataError>) -> Self {
        Self {
            value,
            source: DataSource::Remote,
            cache_write_error,
        }
    }

    fn cached(value: T) -> Self {
        Self {
            value,
            source: DataSource::Cache,
            cache_write_error: None,
        }
    }

    /// True when the value came from the cache instead of the backend.
    pub fn is_cached(&self) -> bool {
        self.source == DataSource::Cache
    }
}

/// Result of a durable write.
#[derive(Debug)]
pub struct WriteOutcome<T> {
    pub value: T,
    /// True when the backend confirmed the write; false means it is
    /// held locally until the next sync pass.
    pub synced: bool,
    /// Connectivity-class failure that deferred the remote write.
    pub deferred: Option<DataError>,
}

/// Read with offline fallback and cache write-through.
///
/// `Ok(None)` means neither the backend nor the cache has an entity
/// for this owner, which callers treat as a valid empty result.
pub async fn read_through<L, F, Fut>(
    online: bool,
    fetch_remote: F,
    cache: &L,
    owner_id: &str,
) -> Result<Option<ReadOutcome<L::Entity>>, DataError>
where
    L: WriteRepository,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<L::Entity>, DataError>>,
{
    if !online {
        return match cache.get(owner_id).await? {
            Some(value) => Ok(Some(ReadOutcome::cached(value))),
            None => Err(DataError::OfflineUnavailable),
        };
    }

    match fetch_remote().await {
        Ok(Some(value)) => {
            // Write-through is best-effort: a failing cache must not
            // take down a successful read.
            let cache_write_error = match cache.save(&value, owner_id).await {
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(owner_id, error = %e, "cache write-through failed");
                    Some(e)
                }
            };
            Ok(Some(ReadOutcome::remote(value, cache_write_error)))
        }
        Ok(None) => match cache.get(owner_id).await? {
            Some(value) => Ok(Some(ReadOutcome::cached(value))),
            None => Ok(None),
        },
        Err(remote_err) => match cache.get(owner_id).await {
            Ok(Some(value)) => {
                tracing::debug!(owner_id, error = %remote_err, "serving cached value after remote failure");
                Ok(Some(ReadOutcome::cached(value)))
            }
            Ok(None) | Err(_) => {
                if remote_err.is_connectivity() {
                    Err(DataError::OfflineUnavailable)
                } else {
                    Err(remote_err)
                }
            }
        },
    }
}

/// Durable write: local first, then remote when reachable.
pub async fn write_through<R, L>(
    online: bool,
    entity: &R::Entity,
    owner_id: &str,
    remote: &R,
    cache: &L,
) -> Result<WriteOutcome<R::Entity>, DataError>
where
    R: WriteRepository,
    L: WriteRepository<Entity = R::Entity>,
{
    // Local first: the write must survive whatever happens next.
    let local = cache.save(entity, owner_id).await?;

    if !online {
        return Ok(WriteOutcome {
            value: local,
            synced: false,
            deferred: None,
        });
    }

    match remote.save(entity, owner_id).await {
        Ok(value) => Ok(WriteOutcome {
            value,
            synced: true,
            deferred: None,
        }),
        Err(e) if e.is_connectivity() => {
            tracing::warn!(owner_id, error = %e, "remote save deferred, local copy retained");
            Ok(WriteOutcome {
                value: local,
                synced: false,
                deferred: Some(e),
            })
        }
        Err(e) => Err(e),
    }
}
