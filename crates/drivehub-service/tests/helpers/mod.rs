//! Shared fixtures for service integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use drivehub_cache::memory::MemoryHierarchyStore;
use drivehub_cache::{CacheKey, HierarchyStore};
use drivehub_core::config::cache::CacheConfig;
use drivehub_core::config::hierarchy::HierarchyConfig;
use drivehub_core::config::route::RouteDefinition;
use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::traits::drive::RawNode;
use drivehub_entity::cache::{CacheEntry, CacheWrite};
use drivehub_service::hierarchy::ManualClock;
use drivehub_service::{ConfiguredRoutes, HierarchyBuilder, HierarchyService, RouteService};
use drivehub_storage::providers::memory::MemoryDriveClient;

/// Nodes in [`fixture_drive`], root included.
pub const FIXTURE_NODES: u64 = 12;

/// Folders in [`fixture_drive`] above depth 3, i.e. listings per full build.
pub const FIXTURE_LISTINGS: usize = 5;

/// A depth-3 content tree:
///
/// ```text
/// Root Folder
/// ├── brochure_inactive.pdf
/// ├── 01_client_Acme
/// │   ├── 01_tab_Overview
/// │   │   ├── 01_section_Tab Section/
/// │   │   └── 02_button_Download.pdf      {"formUrl": ...}
/// │   └── 02_tab_Details
/// │       ├── 01_section_Accordion Section/
/// │       └── notes.txt
/// └── 02_sidebar_Resources
///     ├── A-A-2503-0080-01-00-01.pdf
///     └── 01_vimeo_Intro Video            "copy": ...
/// ```
pub fn fixture_drive() -> MemoryDriveClient {
    let drive = MemoryDriveClient::new(RawNode::folder("root", "Root Folder"));
    drive
        .add("root", RawNode::folder("acme", "01_client_Acme"))
        .add("root", RawNode::folder("resources", "02_sidebar_Resources"))
        .add(
            "root",
            RawNode::file("brochure", "brochure_inactive.pdf", "application/pdf"),
        )
        .add("root", RawNode::file("hidden", ".DS_Store", "application/octet-stream"))
        .add("acme", RawNode::folder("overview", "01_tab_Overview"))
        .add("acme", RawNode::folder("details", "02_tab_Details"))
        .add("overview", RawNode::folder("tab-section", "01_section_Tab Section"))
        .add(
            "overview",
            RawNode::file("download", "02_button_Download.pdf", "application/pdf")
                .with_description(r#"{"formUrl":"https://forms.example/signup"}"#),
        )
        .add(
            "details",
            RawNode::folder("accordion", "01_section_Accordion Section"),
        )
        .add("details", RawNode::file("notes", "notes.txt", "text/plain"))
        .add(
            "resources",
            RawNode::file("code", "A-A-2503-0080-01-00-01.pdf", "application/pdf"),
        )
        .add(
            "resources",
            RawNode::file("video", "01_vimeo_Intro Video", "video/mp4")
                .with_description(r#""copy":"https://vimeo.com/1""#),
        )
        .set_content("notes", "Spring catalogue pricing");
    drive
}

/// Routes used by the service fixture.
pub fn route_definitions() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition {
            route_type: "products".to_string(),
            route_subtype: Some("brochures".to_string()),
            root_folder_id: "root".to_string(),
            display_name: Some("Brochures".to_string()),
            max_depth: None,
            is_active: true,
        },
        RouteDefinition {
            route_type: "products".to_string(),
            route_subtype: Some("shallow".to_string()),
            root_folder_id: "root".to_string(),
            display_name: None,
            max_depth: Some(1),
            is_active: true,
        },
        RouteDefinition {
            route_type: "training".to_string(),
            route_subtype: None,
            root_folder_id: "root".to_string(),
            display_name: None,
            max_depth: None,
            is_active: false,
        },
    ]
}

/// Default hierarchy settings, depth 3.
pub fn hierarchy_config() -> HierarchyConfig {
    HierarchyConfig {
        default_max_depth: 3,
        ..HierarchyConfig::default()
    }
}

/// A hierarchy service over an in-memory drive and store with a manual clock.
pub struct TestHub {
    pub drive: Arc<MemoryDriveClient>,
    pub cache: Arc<MemoryHierarchyStore>,
    pub clock: Arc<ManualClock>,
    pub cache_config: CacheConfig,
    pub service: HierarchyService,
}

impl TestHub {
    pub fn new() -> Self {
        Self::with_drive(fixture_drive())
    }

    pub fn with_drive(drive: MemoryDriveClient) -> Self {
        let drive = Arc::new(drive);
        let cache = Arc::new(MemoryHierarchyStore::default());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache_config = CacheConfig::default();
        let service = service_over(drive.clone(), cache.clone(), &cache_config)
            .with_clock(clock.clone());
        Self {
            drive,
            cache,
            clock,
            cache_config,
            service,
        }
    }

    /// The stored entry for a key.
    pub async fn entry(&self, key: &CacheKey) -> CacheEntry {
        self.cache
            .get(key)
            .await
            .unwrap()
            .expect("entry should be cached")
    }
}

/// Build a service over any store.
pub fn service_over(
    drive: Arc<MemoryDriveClient>,
    cache: Arc<dyn HierarchyStore>,
    cache_config: &CacheConfig,
) -> HierarchyService {
    let config = hierarchy_config();
    let builder = HierarchyBuilder::new(drive, config.max_concurrent_listings);
    let routes = RouteService::new(
        Arc::new(ConfiguredRoutes::new(&route_definitions())),
        cache.clone(),
    );
    HierarchyService::new(builder, cache, routes, &config, cache_config)
}

/// A store whose every operation fails.
#[derive(Debug, Default)]
pub struct BrokenStore;

#[async_trait]
impl HierarchyStore for BrokenStore {
    fn backend(&self) -> &str {
        "broken"
    }

    async fn get(&self, _key: &CacheKey) -> AppResult<Option<CacheEntry>> {
        Err(AppError::cache("store unreachable"))
    }

    async fn upsert(&self, _key: &CacheKey, _data: CacheWrite) -> AppResult<CacheEntry> {
        Err(AppError::cache("store unreachable"))
    }

    async fn increment_access(&self, _key: &CacheKey) -> AppResult<()> {
        Err(AppError::cache("store unreachable"))
    }

    async fn delete_for_route(
        &self,
        _route_type: &str,
        _route_subtype: Option<&str>,
    ) -> AppResult<u64> {
        Err(AppError::cache("store unreachable"))
    }

    async fn list(&self) -> AppResult<Vec<CacheEntry>> {
        Err(AppError::cache("store unreachable"))
    }
}

/// An in-memory store whose writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryHierarchyStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl HierarchyStore for FlakyStore {
    fn backend(&self) -> &str {
        "flaky"
    }

    async fn get(&self, key: &CacheKey) -> AppResult<Option<CacheEntry>> {
        self.inner.get(key).await
    }

    async fn upsert(&self, key: &CacheKey, data: CacheWrite) -> AppResult<CacheEntry> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::cache("write rejected"));
        }
        self.inner.upsert(key, data).await
    }

    async fn increment_access(&self, key: &CacheKey) -> AppResult<()> {
        self.inner.increment_access(key).await
    }

    async fn delete_for_route(
        &self,
        route_type: &str,
        route_subtype: Option<&str>,
    ) -> AppResult<u64> {
        self.inner.delete_for_route(route_type, route_subtype).await
    }

    async fn list(&self) -> AppResult<Vec<CacheEntry>> {
        self.inner.list().await
    }
}
