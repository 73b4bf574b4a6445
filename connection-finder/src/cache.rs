//! Caching layer for query inputs.
//!
//! Stop clusters and active-service sets depend only on the snapshot, not on
//! the time window, so they are shared by every query for the same station
//! or date. The snapshot is immutable while the server runs, so the TTL
//! only bounds memory for rarely used keys.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::calendar::ActiveServices;
use crate::cluster::StopCluster;
use crate::domain::{ServiceDate, StopId};
use crate::query::{ConnectionFinder, ConnectionMatch, ConnectionRequest, QueryConfig, QueryError};
use crate::source::{ScheduleSource, SourceError};

/// Configuration for the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per table.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 1000,
        }
    }
}

/// Cache for resolved clusters and services.
pub struct QueryCache {
    /// Closed clusters keyed by the seed stop.
    clusters: MokaCache<StopId, Arc<StopCluster>>,

    /// Services running on each date.
    services: MokaCache<ServiceDate, Arc<ActiveServices>>,
}

impl QueryCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let clusters = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let services = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { clusters, services }
    }

    pub async fn get_cluster(&self, seed: &StopId) -> Option<Arc<StopCluster>> {
        self.clusters.get(seed).await
    }

    pub async fn insert_cluster(&self, seed: StopId, cluster: Arc<StopCluster>) {
        self.clusters.insert(seed, cluster).await;
    }

    pub async fn get_services(&self, date: ServiceDate) -> Option<Arc<ActiveServices>> {
        self.services.get(&date).await
    }

    pub async fn insert_services(&self, date: ServiceDate, services: Arc<ActiveServices>) {
        self.services.insert(date, services).await;
    }

    /// Number of cached entries over both tables (for monitoring).
    ///
    /// Moka updates counts lazily, so this may lag recent inserts.
    pub fn entry_count(&self) -> u64 {
        self.clusters.entry_count() + self.services.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.clusters.invalidate_all();
        self.services.invalidate_all();
    }
}

/// Connection finder with caching.
///
/// Wraps a schedule source and caches the inputs of each query. The
/// connection join itself always runs against the source, since it depends
/// on the time window.
pub struct CachedConnectionFinder<S: ScheduleSource + ?Sized> {
    source: Arc<S>,
    config: QueryConfig,
    cache: QueryCache,
}

impl<S: ScheduleSource + ?Sized> CachedConnectionFinder<S> {
    /// Create a new cached finder.
    pub fn new(source: Arc<S>, config: QueryConfig, cache_config: &CacheConfig) -> Self {
        Self {
            source,
            config,
            cache: QueryCache::new(cache_config),
        }
    }

    fn finder(&self) -> ConnectionFinder<'_, S> {
        ConnectionFinder::new(self.source.as_ref(), &self.config)
    }

    /// Close a stop into its cluster, using the cache if available.
    pub async fn cluster(&self, seed: &StopId) -> Result<Arc<StopCluster>, SourceError> {
        if let Some(cached) = self.cache.get_cluster(seed).await {
            return Ok(cached);
        }

        let cluster = Arc::new(self.finder().cluster(seed)?);
        debug!(%seed, stops = cluster.len(), "caching stop cluster");
        self.cache.insert_cluster(seed.clone(), cluster.clone()).await;

        Ok(cluster)
    }

    /// Services running on `date`, using the cache if available.
    pub async fn active_services(
        &self,
        date: ServiceDate,
    ) -> Result<Arc<ActiveServices>, SourceError> {
        if let Some(cached) = self.cache.get_services(date).await {
            return Ok(cached);
        }

        let services = Arc::new(self.finder().active_services(date)?);
        debug!(%date, services = services.len(), "caching active services");
        self.cache.insert_services(date, services.clone()).await;

        Ok(services)
    }

    /// Find direct connections, resolving clusters and services through the
    /// cache.
    pub async fn find_direct_connections(
        &self,
        request: &ConnectionRequest,
    ) -> Result<Vec<ConnectionMatch>, QueryError> {
        let (start, end, active) = futures::try_join!(
            self.cluster(&request.start),
            self.cluster(&request.end),
            self.active_services(request.date),
        )?;

        self.finder().search_clusters(
            &start,
            &end,
            &active,
            &request.min_time,
            &request.max_time,
        )
        .map_err(QueryError::from)
    }

    /// Access the underlying source for lookups that bypass the cache.
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}
