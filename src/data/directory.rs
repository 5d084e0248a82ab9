//! University directory client
//!
//! Read-through cache over the remote `university` table. The full
//! collection is cached on disk for five minutes; single-item lookups scan
//! the cached collection before falling back to a remote point read.
//! Concurrent identical requests share one in-flight fetch instead of each
//! hitting the network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use super::store::{DataFetchError, StoreClient};
use super::University;
use crate::cache::CacheStore;

/// Cache key for the serialized university collection
const UNIVERSITIES_KEY: &str = "universities";

/// Cache key for the collection's capture timestamp
const TIMESTAMP_KEY: &str = "universitiesTimestamp";

/// How long a cached directory snapshot stays fresh, in minutes
const FRESHNESS_MINUTES: i64 = 5;

/// Columns fetched for the full collection; point reads select everything
const DIRECTORY_COLUMNS: &str = "id,acronym,name,picture";

/// The directory snapshot cache: the full collection plus its capture time,
/// persisted as two keys in the local store.
///
/// The snapshot is replaced wholesale on every fresh fetch and never
/// patched. A failed refresh leaves it untouched, so stale-but-present data
/// survives a degraded network.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    store: CacheStore,
    freshness: Duration,
}

impl DirectoryCache {
    /// Creates a cache with the standard five-minute freshness threshold.
    pub fn new(store: CacheStore) -> Self {
        Self {
            store,
            freshness: Duration::minutes(FRESHNESS_MINUTES),
        }
    }

    /// Overrides the freshness threshold. Useful for testing.
    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    /// Returns the cached collection only while it is fresh.
    pub fn fresh_snapshot(&self) -> Option<Vec<University>> {
        let cached_at: DateTime<Utc> = self.store.read_json(TIMESTAMP_KEY)?;
        if Utc::now() - cached_at >= self.freshness {
            return None;
        }
        self.store.read_json(UNIVERSITIES_KEY)
    }

    /// Returns the cached collection regardless of age.
    pub fn snapshot(&self) -> Option<Vec<University>> {
        self.store.read_json(UNIVERSITIES_KEY)
    }

    /// Replaces the snapshot and stamps it with the current time.
    ///
    /// Cache writes are best-effort: a write failure downgrades to a warning
    /// so a successful fetch still reaches the caller.
    pub fn replace(&self, universities: &[University]) {
        if let Err(e) = self.store.write_json(UNIVERSITIES_KEY, universities) {
            warn!(error = %e, "failed to persist directory snapshot");
            return;
        }
        if let Err(e) = self.store.write_json(TIMESTAMP_KEY, &Utc::now()) {
            warn!(error = %e, "failed to persist directory timestamp");
        }
    }
}

type FlightFuture<T> = Shared<BoxFuture<'static, Result<T, DataFetchError>>>;

/// Coalesces concurrent identical requests.
///
/// The first caller for a key starts the fetch; callers that arrive while
/// it is pending await the same shared future. The entry is dropped once
/// the fetch settles, so results are never served after completion.
struct FlightGroup<T: Clone> {
    inner: Mutex<HashMap<String, FlightFuture<T>>>,
}

impl<T: Clone> Default for FlightGroup<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> FlightGroup<T> {
    async fn run(
        &self,
        key: &str,
        fetch: BoxFuture<'static, Result<T, DataFetchError>>,
    ) -> Result<T, DataFetchError> {
        let flight = {
            let mut flights = self.inner.lock().expect("flight map lock poisoned");
            match flights.get(key) {
                Some(existing) => {
                    debug!(key, "joining in-flight request");
                    existing.clone()
                }
                None => {
                    let flight = fetch.shared();
                    flights.insert(key.to_string(), flight.clone());
                    flight
                }
            }
        };

        let result = flight.clone().await;

        // Whoever observes completion first clears the entry; ptr_eq keeps a
        // newer flight under the same key from being evicted early.
        let mut flights = self.inner.lock().expect("flight map lock poisoned");
        if let Some(current) = flights.get(key) {
            if current.ptr_eq(&flight) {
                flights.remove(key);
            }
        }

        result
    }
}

/// Client for the university directory backed by the remote store.
///
/// Owns the directory cache explicitly; construct one instance at startup
/// and clone it into whatever needs directory reads.
#[derive(Clone)]
pub struct DirectoryClient {
    store: StoreClient,
    cache: Option<DirectoryCache>,
    collection_flights: Arc<FlightGroup<Vec<University>>>,
    lookup_flights: Arc<FlightGroup<Option<University>>>,
}

impl DirectoryClient {
    /// Creates a client caching under the XDG cache directory.
    ///
    /// Runs uncached if the cache directory cannot be determined.
    pub fn new(store: StoreClient) -> Self {
        let cache = CacheStore::new().map(DirectoryCache::new);
        Self {
            store,
            cache,
            collection_flights: Arc::default(),
            lookup_flights: Arc::default(),
        }
    }

    /// Creates a client with a custom directory cache.
    pub fn with_cache(store: StoreClient, cache: DirectoryCache) -> Self {
        Self {
            store,
            cache: Some(cache),
            collection_flights: Arc::default(),
            lookup_flights: Arc::default(),
        }
    }

    fn fresh_snapshot(&self) -> Option<Vec<University>> {
        self.cache.as_ref()?.fresh_snapshot()
    }

    /// All universities, ascending by display name.
    ///
    /// Served from the local snapshot while it is fresh; otherwise fetched
    /// remotely and the snapshot replaced. A failed refresh surfaces the
    /// error and leaves any prior snapshot untouched.
    pub async fn all_universities(&self) -> Result<Vec<University>, DataFetchError> {
        if let Some(universities) = self.fresh_snapshot() {
            debug!(count = universities.len(), "directory cache hit");
            return Ok(universities);
        }

        let store = self.store.clone();
        let cache = self.cache.clone();
        self.collection_flights
            .run(
                UNIVERSITIES_KEY,
                async move {
                    let universities: Vec<University> = store
                        .select(
                            "university",
                            &[
                                ("select", DIRECTORY_COLUMNS.to_string()),
                                ("order", "name.asc".to_string()),
                            ],
                        )
                        .await?;
                    debug!(count = universities.len(), "directory refreshed from store");
                    if let Some(cache) = &cache {
                        cache.replace(&universities);
                    }
                    Ok(universities)
                }
                .boxed(),
            )
            .await
    }

    /// Looks up a single university by acronym, case-insensitively.
    ///
    /// A fresh snapshot is scanned first; a snapshot miss still falls
    /// through to a remote point read, since the snapshot may carry a
    /// narrower column projection than the store holds. Zero matching rows
    /// is `Ok(None)`, not an error.
    pub async fn university_by_acronym(
        &self,
        acronym: &str,
    ) -> Result<Option<University>, DataFetchError> {
        let needle = acronym.to_lowercase();

        if let Some(snapshot) = self.fresh_snapshot() {
            if let Some(found) = snapshot.iter().find(|u| u.acronym.to_lowercase() == needle) {
                debug!(acronym, "acronym lookup served from cache");
                return Ok(Some(found.clone()));
            }
        }

        let store = self.store.clone();
        let acronym = acronym.to_string();
        self.lookup_flights
            .run(
                &needle,
                async move {
                    let rows: Vec<University> = store
                        .select(
                            "university",
                            &[
                                ("select", "*".to_string()),
                                ("acronym", format!("ilike.{}", acronym)),
                                ("limit", "1".to_string()),
                            ],
                        )
                        .await?;
                    Ok(rows.into_iter().next())
                }
                .boxed(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache() -> (DirectoryCache, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::with_dir(temp_dir.path().to_path_buf());
        (DirectoryCache::new(store), temp_dir)
    }

    fn sample_universities() -> Vec<University> {
        vec![
            University {
                id: 1,
                acronym: "DLSU".to_string(),
                name: "De La Salle University".to_string(),
                location: None,
                website: None,
                picture: Some("dlsu.png".to_string()),
            },
            University {
                id: 2,
                acronym: "UP".to_string(),
                name: "University of the Philippines".to_string(),
                location: None,
                website: None,
                picture: None,
            },
        ]
    }

    #[test]
    fn test_fresh_snapshot_returns_replaced_collection() {
        let (cache, _temp_dir) = create_test_cache();
        let universities = sample_universities();

        cache.replace(&universities);

        let snapshot = cache.fresh_snapshot().expect("snapshot should be fresh");
        assert_eq!(snapshot, universities);
    }

    #[test]
    fn test_fresh_snapshot_is_none_without_prior_fetch() {
        let (cache, _temp_dir) = create_test_cache();
        assert!(cache.fresh_snapshot().is_none());
    }

    #[test]
    fn test_fresh_snapshot_expires_at_threshold() {
        let (cache, _temp_dir) = create_test_cache();
        let cache = cache.with_freshness(Duration::zero());

        cache.replace(&sample_universities());

        assert!(
            cache.fresh_snapshot().is_none(),
            "Zero freshness should make every snapshot stale"
        );
    }

    #[test]
    fn test_stale_snapshot_still_readable_as_snapshot() {
        let (cache, _temp_dir) = create_test_cache();
        let cache = cache.with_freshness(Duration::zero());
        let universities = sample_universities();

        cache.replace(&universities);

        assert_eq!(cache.snapshot(), Some(universities));
    }

    #[test]
    fn test_replace_overwrites_previous_snapshot() {
        let (cache, _temp_dir) = create_test_cache();
        let first = sample_universities();
        let second = vec![first[0].clone()];

        cache.replace(&first);
        cache.replace(&second);

        assert_eq!(cache.fresh_snapshot(), Some(second));
    }

    #[test]
    fn test_snapshot_with_old_timestamp_is_not_fresh() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::with_dir(temp_dir.path().to_path_buf());
        let cache = DirectoryCache::new(store.clone());

        cache.replace(&sample_universities());
        // Rewind the capture time past the five-minute threshold
        let old = Utc::now() - Duration::minutes(FRESHNESS_MINUTES + 1);
        store.write_json(TIMESTAMP_KEY, &old).unwrap();

        assert!(cache.fresh_snapshot().is_none());
        assert!(cache.snapshot().is_some());
    }
}
