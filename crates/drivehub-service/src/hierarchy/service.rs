//! Cache orchestrator for hierarchy requests.
//!
//! Per key, a request is either a fresh hit (entry younger than the TTL and
//! no forced refresh: serve it and count the hit) or a stale/miss (build,
//! upsert, serve the fresh tree). Builds for the same key are coalesced
//! behind a per-key lock: the leader leaves its tree in the key's slot and
//! requests that queued behind it are served that tree, whether or not the
//! cache write succeeded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use drivehub_cache::{CacheKey, HierarchyStore};
use drivehub_core::config::cache::CacheConfig;
use drivehub_core::config::hierarchy::HierarchyConfig;
use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_entity::cache::{CacheEntry, CacheWrite};
use drivehub_entity::hierarchy::{HierarchyItem, HierarchyStats};

use super::builder::{BuildOptions, HierarchyBuilder};
use super::clock::{Clock, SystemClock};
use crate::route::RouteService;
use crate::search::{SearchExecutor, SearchOptions, SearchResponse};

/// A served hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyResponse {
    /// Root node.
    pub root: HierarchyItem,
    /// Statistics, including whether the tree came from the cache.
    pub stats: HierarchyStats,
}

/// Where a request's root and cache metadata come from.
#[derive(Debug, Clone)]
struct Target {
    key: CacheKey,
    root_folder_id: String,
    ttl: chrono::Duration,
}

/// A tree built by the current leader for one key.
#[derive(Debug, Clone)]
struct Built {
    response: HierarchyResponse,
    built_at: DateTime<Utc>,
    cached: bool,
}

/// Build slot for one cache key. `generation` counts completed builds
/// while the slot exists; `latest` holds the most recent one.
#[derive(Debug, Default)]
struct Flight {
    latest: Mutex<Option<Built>>,
    generation: AtomicU64,
}

/// Request-facing hierarchy service.
#[derive(Debug, Clone)]
pub struct HierarchyService {
    builder: HierarchyBuilder,
    cache: Arc<dyn HierarchyStore>,
    routes: RouteService,
    search: SearchExecutor,
    config: HierarchyConfig,
    hierarchy_ttl: chrono::Duration,
    route_ttl: chrono::Duration,
    build_timeout: Duration,
    in_flight: Arc<DashMap<CacheKey, Arc<Flight>>>,
    clock: Arc<dyn Clock>,
}

impl HierarchyService {
    /// Create the service.
    pub fn new(
        builder: HierarchyBuilder,
        cache: Arc<dyn HierarchyStore>,
        routes: RouteService,
        hierarchy: &HierarchyConfig,
        cache_config: &CacheConfig,
    ) -> Self {
        let search = SearchExecutor::new(builder.drive().clone());
        Self {
            builder,
            cache,
            routes,
            search,
            config: hierarchy.clone(),
            hierarchy_ttl: seconds(cache_config.hierarchy_ttl_seconds),
            route_ttl: seconds(cache_config.route_ttl_seconds),
            build_timeout: Duration::from_secs(hierarchy.build_timeout_seconds),
            in_flight: Arc::new(DashMap::new()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source used for freshness checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the build timeout.
    pub fn with_build_timeout(mut self, timeout: Duration) -> Self {
        self.build_timeout = timeout;
        self
    }

    /// Route service used for route resolution.
    pub fn routes(&self) -> &RouteService {
        &self.routes
    }

    /// Hierarchy for a route mapping, cached under the route TTL.
    ///
    /// `max_depth` falls back to the route's own depth, then to the
    /// configured default.
    pub async fn get_route_hierarchy(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
        max_depth: Option<u32>,
        force_refresh: bool,
    ) -> AppResult<HierarchyResponse> {
        let route = self.routes.resolve(route_type, route_subtype).await?;
        let depth = max_depth
            .or(route.max_depth.and_then(|d| u32::try_from(d).ok()))
            .unwrap_or(self.config.default_max_depth);

        let target = Target {
            key: CacheKey::route(route_type, route_subtype, depth),
            root_folder_id: route.root_folder_id,
            ttl: self.route_ttl,
        };
        self.serve(target, force_refresh).await
    }

    /// Hierarchy for an arbitrary root folder, cached under the generic TTL.
    pub async fn get_folder_hierarchy(
        &self,
        root_folder_id: &str,
        max_depth: Option<u32>,
        force_refresh: bool,
    ) -> AppResult<HierarchyResponse> {
        let depth = max_depth.unwrap_or(self.config.default_max_depth);
        let target = Target {
            key: CacheKey::folder(root_folder_id, depth),
            root_folder_id: root_folder_id.to_string(),
            ttl: self.hierarchy_ttl,
        };
        self.serve(target, force_refresh).await
    }

    /// Search an already-fetched hierarchy.
    pub async fn search(
        &self,
        root: &HierarchyItem,
        query: &str,
        options: &SearchOptions,
    ) -> AppResult<SearchResponse> {
        self.search.search(root, query, options).await
    }

    async fn serve(&self, target: Target, force_refresh: bool) -> AppResult<HierarchyResponse> {
        let requested_at = self.clock.now();

        if !force_refresh {
            if let Some(hit) = self.fresh_hit(&target, requested_at).await {
                return Ok(hit);
            }
        }

        let flight = self
            .in_flight
            .entry(target.key.clone())
            .or_default()
            .clone();
        let seen = flight.generation.load(Ordering::SeqCst);
        let result = {
            let mut latest = flight.latest.lock().await;
            let rebuilt_meanwhile = flight.generation.load(Ordering::SeqCst) != seen;
            match latest.as_ref().filter(|_| rebuilt_meanwhile) {
                Some(built) => Ok(self.shared(&target.key, built, requested_at).await),
                None => {
                    // A build may have finished before this request reached the slot.
                    let hit = if force_refresh {
                        None
                    } else {
                        self.fresh_hit(&target, requested_at).await
                    };
                    match hit {
                        Some(hit) => Ok(hit),
                        None => self.rebuild(&target, force_refresh).await.map(|built| {
                            let response = built.response.clone();
                            *latest = Some(built);
                            flight.generation.fetch_add(1, Ordering::SeqCst);
                            response
                        }),
                    }
                }
            }
        };
        drop(flight);
        self.in_flight
            .remove_if(&target.key, |_, f| Arc::strong_count(f) == 1);
        result
    }

    /// Build the tree under the timeout and try to cache it.
    async fn rebuild(&self, target: &Target, force_refresh: bool) -> AppResult<Built> {
        let options = BuildOptions {
            root_id: target.root_folder_id.clone(),
            max_depth: target.key.max_depth(),
            include_hidden: self.config.include_hidden,
            process_metadata: self.config.process_metadata,
        };
        let output = tokio::time::timeout(self.build_timeout, self.builder.build(&options))
            .await
            .map_err(|_| {
                warn!(cache_key = %target.key, timeout_s = self.build_timeout.as_secs(), "Hierarchy build timed out");
                AppError::timeout(format!(
                    "Building hierarchy for {} exceeded {}s",
                    target.root_folder_id,
                    self.build_timeout.as_secs()
                ))
            })??;

        let cached = self.store(target, &output.root, &output.stats).await;

        info!(
            cache_key = %target.key,
            total_items = output.stats.total_items,
            force_refresh,
            cached,
            "Served freshly built hierarchy"
        );
        Ok(Built {
            response: HierarchyResponse {
                root: output.root,
                stats: output.stats,
            },
            built_at: self.clock.now(),
            cached,
        })
    }

    /// Serve the tree a concurrent leader just built. The hit is counted
    /// only when that tree reached the cache.
    async fn shared(
        &self,
        key: &CacheKey,
        built: &Built,
        now: DateTime<Utc>,
    ) -> HierarchyResponse {
        if built.cached {
            if let Err(e) = self.cache.increment_access(key).await {
                warn!(cache_key = %key, error = %e, "Failed to record cache hit");
            }
        }
        let mut response = built.response.clone();
        response.stats.from_cache = true;
        response.stats.cache_age_seconds = Some((now - built.built_at).num_seconds().max(0));
        debug!(cache_key = %key, "Reused hierarchy built by a concurrent request");
        response
    }

    /// Serve a fresh entry, if there is one.
    async fn fresh_hit(
        &self,
        target: &Target,
        now: DateTime<Utc>,
    ) -> Option<HierarchyResponse> {
        let entry = self.read(&target.key).await?;
        if !self.is_fresh(&entry, target.ttl, now) {
            debug!(cache_key = %target.key, "Cached hierarchy is stale");
            return None;
        }
        self.hit(&target.key, entry, now).await
    }

    fn is_fresh(&self, entry: &CacheEntry, ttl: chrono::Duration, now: DateTime<Utc>) -> bool {
        entry.age(now) < ttl
    }

    /// Turn an entry into a response and count the hit. `None` when the
    /// payload does not deserialize, which callers treat as a miss.
    async fn hit(
        &self,
        key: &CacheKey,
        entry: CacheEntry,
        now: DateTime<Utc>,
    ) -> Option<HierarchyResponse> {
        let root = match entry.hierarchy() {
            Ok(root) => root,
            Err(e) => {
                warn!(cache_key = %key, error = %e, "Cached hierarchy is unreadable, rebuilding");
                return None;
            }
        };

        if let Err(e) = self.cache.increment_access(key).await {
            warn!(cache_key = %key, error = %e, "Failed to record cache hit");
        }

        let stats = HierarchyStats {
            total_items: u64::try_from(entry.item_count).unwrap_or_default(),
            max_depth_reached: root.max_depth(),
            from_cache: true,
            cache_age_seconds: Some(entry.age(now).num_seconds().max(0)),
            build_time_ms: u64::try_from(entry.build_time_ms).ok(),
            failed_folders: failed_folders(&root),
        };
        info!(cache_key = %key, age_s = stats.cache_age_seconds, "Serving cached hierarchy");
        Some(HierarchyResponse { root, stats })
    }

    /// Cache read; a failure counts as a miss.
    async fn read(&self, key: &CacheKey) -> Option<CacheEntry> {
        match self.cache.get(key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(cache_key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Cache write; a failure is logged and the fresh tree is still served.
    /// Returns whether the entry was written.
    async fn store(&self, target: &Target, root: &HierarchyItem, stats: &HierarchyStats) -> bool {
        let hierarchy_data = match serde_json::to_value(root) {
            Ok(value) => value,
            Err(e) => {
                warn!(cache_key = %target.key, error = %e, "Failed to serialize hierarchy for caching");
                return false;
            }
        };
        let (route_type, route_subtype) = match target.key.route_parts() {
            Some((t, s)) => (Some(t.to_string()), s.map(str::to_string)),
            None => (None, None),
        };
        let write = CacheWrite {
            route_type,
            route_subtype,
            root_folder_id: target.root_folder_id.clone(),
            max_depth: i32::try_from(target.key.max_depth()).unwrap_or(i32::MAX),
            hierarchy_data,
            item_count: i64::try_from(stats.total_items).unwrap_or(i64::MAX),
            build_time_ms: stats
                .build_time_ms
                .and_then(|ms| i64::try_from(ms).ok())
                .unwrap_or_default(),
        };

        match self.cache.upsert(&target.key, write).await {
            Ok(_) => true,
            Err(e) => {
                warn!(cache_key = %target.key, error = %e, "Cache write failed, serving uncached hierarchy");
                false
            }
        }
    }
}

/// IDs of folders in `root` whose listing failed, pre-order.
fn failed_folders(root: &HierarchyItem) -> Vec<String> {
    let mut failed = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let HierarchyItem::Folder(folder) = node {
            if folder.listing_failed {
                failed.push(folder.id.clone());
            }
            stack.extend(folder.children.iter().rev());
        }
    }
    failed
}

fn seconds(s: u64) -> chrono::Duration {
    i64::try_from(s)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}
