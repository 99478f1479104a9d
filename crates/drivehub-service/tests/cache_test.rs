//! Integration tests for the cache orchestrator.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use futures::future::join_all;

use drivehub_cache::{CacheKey, HierarchyStore};
use drivehub_core::config::cache::CacheConfig;
use drivehub_core::error::ErrorKind;
use drivehub_core::traits::drive::RawNode;
use drivehub_entity::cache::CacheWrite;
use drivehub_service::hierarchy::{Clock, ManualClock};
use drivehub_storage::providers::memory::MemoryDriveClient;

use helpers::{
    BrokenStore, FIXTURE_LISTINGS, FIXTURE_NODES, FlakyStore, TestHub, fixture_drive, service_over,
};

#[tokio::test]
async fn test_miss_builds_then_hits() {
    let hub = TestHub::new();
    let key = CacheKey::folder("root", 3);

    let first = hub
        .service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap();
    assert!(!first.stats.from_cache);
    assert_eq!(first.stats.total_items, FIXTURE_NODES);
    assert!(first.stats.build_time_ms.is_some());
    assert_eq!(hub.entry(&key).await.access_count, 1);

    let second = hub
        .service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap();
    assert!(second.stats.from_cache);
    assert_eq!(second.root, first.root);
    assert_eq!(second.stats.total_items, FIXTURE_NODES);
    assert!(second.stats.cache_age_seconds.is_some());
    assert_eq!(hub.entry(&key).await.access_count, 2);
    assert_eq!(hub.drive.list_calls(), FIXTURE_LISTINGS);
}

#[tokio::test]
async fn test_generic_ttl_boundary() {
    let hub = TestHub::new();
    let key = CacheKey::folder("root", 3);
    let ttl = ChronoDuration::seconds(hub.cache_config.hierarchy_ttl_seconds as i64);

    hub.service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap();
    let built = hub.entry(&key).await;

    hub.clock
        .set(built.updated_at + ttl - ChronoDuration::seconds(1));
    let hit = hub
        .service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap();
    assert!(hit.stats.from_cache);
    assert_eq!(hub.entry(&key).await.access_count, built.access_count + 1);
    assert_eq!(hub.drive.list_calls(), FIXTURE_LISTINGS);

    hub.clock
        .set(built.updated_at + ttl + ChronoDuration::seconds(1));
    let rebuilt = hub
        .service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap();
    assert!(!rebuilt.stats.from_cache);
    assert_eq!(hub.drive.list_calls(), 2 * FIXTURE_LISTINGS);
    assert_eq!(hub.entry(&key).await.access_count, 1);
}

#[tokio::test]
async fn test_route_ttl_is_longer() {
    let hub = TestHub::new();
    let key = CacheKey::route("products", Some("brochures"), 3);

    hub.service
        .get_route_hierarchy("products", Some("brochures"), None, false)
        .await
        .unwrap();
    let built = hub.entry(&key).await;
    assert_eq!(built.route_type.as_deref(), Some("products"));
    assert_eq!(built.route_subtype.as_deref(), Some("brochures"));

    // Past the generic TTL, inside the route TTL.
    hub.clock.set(built.updated_at + ChronoDuration::hours(3));
    let response = hub
        .service
        .get_route_hierarchy("products", Some("brochures"), None, false)
        .await
        .unwrap();
    assert!(response.stats.from_cache);

    hub.clock
        .set(built.updated_at + ChronoDuration::hours(4) + ChronoDuration::seconds(1));
    let response = hub
        .service
        .get_route_hierarchy("products", Some("brochures"), None, false)
        .await
        .unwrap();
    assert!(!response.stats.from_cache);
}

#[tokio::test]
async fn test_force_refresh_always_rebuilds() {
    let hub = TestHub::new();
    let key = CacheKey::folder("root", 3);

    hub.service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap();
    for _ in 0..3 {
        hub.service
            .get_folder_hierarchy("root", None, false)
            .await
            .unwrap();
    }
    assert_eq!(hub.entry(&key).await.access_count, 4);

    let forced = hub
        .service
        .get_folder_hierarchy("root", None, true)
        .await
        .unwrap();
    assert!(!forced.stats.from_cache);
    assert_eq!(hub.entry(&key).await.access_count, 1);
    assert_eq!(hub.drive.list_calls(), 2 * FIXTURE_LISTINGS);
}

#[tokio::test]
async fn test_depth_is_part_of_the_key() {
    let hub = TestHub::new();
    let shallow = hub
        .service
        .get_folder_hierarchy("root", Some(1), false)
        .await
        .unwrap();
    let deep = hub
        .service
        .get_folder_hierarchy("root", Some(3), false)
        .await
        .unwrap();

    assert!(!shallow.stats.from_cache);
    assert!(!deep.stats.from_cache);
    assert_eq!(shallow.stats.max_depth_reached, 1);
    assert_eq!(deep.stats.max_depth_reached, 3);
    assert_eq!(hub.cache.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_route_depth_falls_back_to_route_setting() {
    let hub = TestHub::new();
    let response = hub
        .service
        .get_route_hierarchy("products", Some("shallow"), None, false)
        .await
        .unwrap();
    assert_eq!(response.stats.max_depth_reached, 1);
    hub.entry(&CacheKey::route("products", Some("shallow"), 1))
        .await;
}

#[tokio::test]
async fn test_unknown_and_inactive_routes() {
    let hub = TestHub::new();

    let err = hub
        .service
        .get_route_hierarchy("products", Some("missing"), None, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotConfigured);

    let err = hub
        .service
        .get_route_hierarchy("training", None, None, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotConfigured);
    assert_eq!(hub.drive.list_calls(), 0);
}

#[tokio::test]
async fn test_broken_store_still_serves() {
    let drive = Arc::new(fixture_drive());
    let service = service_over(
        drive.clone(),
        Arc::new(BrokenStore),
        &Default::default(),
    );

    for _ in 0..2 {
        let response = service
            .get_folder_hierarchy("root", None, false)
            .await
            .unwrap();
        assert!(!response.stats.from_cache);
        assert_eq!(response.stats.total_items, FIXTURE_NODES);
    }
    assert_eq!(drive.list_calls(), 2 * FIXTURE_LISTINGS);
}

#[tokio::test]
async fn test_unreadable_entry_is_a_miss() {
    let hub = TestHub::new();
    let key = CacheKey::folder("root", 3);
    hub.cache
        .upsert(
            &key,
            CacheWrite {
                route_type: None,
                route_subtype: None,
                root_folder_id: "root".to_string(),
                max_depth: 3,
                hierarchy_data: serde_json::json!({"not": "a tree"}),
                item_count: 1,
                build_time_ms: 0,
            },
        )
        .await
        .unwrap();

    let response = hub
        .service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap();
    assert!(!response.stats.from_cache);
    assert_eq!(hub.entry(&key).await.item_count as u64, FIXTURE_NODES);
}

#[tokio::test]
async fn test_partial_tree_is_served_with_failures() {
    let drive = fixture_drive();
    drive.fail_listing("details");
    let hub = TestHub::with_drive(drive);

    let fresh = hub
        .service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap();
    assert_eq!(fresh.stats.failed_folders, vec!["details".to_string()]);

    let cached = hub
        .service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap();
    assert!(cached.stats.from_cache);
    assert_eq!(cached.stats.failed_folders, vec!["details".to_string()]);
}

#[tokio::test]
async fn test_total_outage_caches_nothing() {
    let drive = fixture_drive();
    drive.fail_listing("root");
    let hub = TestHub::with_drive(drive);

    let err = hub
        .service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    assert!(hub.cache.list().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_caches_nothing() {
    let drive = fixture_drive().with_latency(Duration::from_secs(5));
    let hub = TestHub::with_drive(drive);
    let service = hub.service.clone().with_build_timeout(Duration::from_secs(2));

    let err = service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Timeout);
    assert!(hub.cache.list().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_share_one_build() {
    let drive = fixture_drive().with_latency(Duration::from_millis(50));
    let hub = TestHub::with_drive(drive);

    let requests = (0..5).map(|_| hub.service.get_folder_hierarchy("root", None, false));
    let responses: Vec<_> = join_all(requests)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(hub.drive.list_calls(), FIXTURE_LISTINGS);
    assert_eq!(responses.iter().filter(|r| !r.stats.from_cache).count(), 1);
    assert!(responses.iter().all(|r| r.root == responses[0].root));
    assert_eq!(
        hub.entry(&CacheKey::folder("root", 3)).await.access_count,
        5
    );
}

#[tokio::test(start_paused = true)]
async fn test_followers_never_get_a_stale_entry_when_the_write_fails() {
    let drive = Arc::new(fixture_drive().with_latency(Duration::from_millis(50)));
    let store = Arc::new(FlakyStore::default());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let cache_config = CacheConfig::default();
    let service = service_over(drive.clone(), store.clone(), &cache_config).with_clock(clock.clone());
    let key = CacheKey::folder("root", 3);
    let ttl = ChronoDuration::seconds(cache_config.hierarchy_ttl_seconds as i64);

    service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap();
    let stale = store.get(&key).await.unwrap().unwrap();
    clock.set(stale.updated_at + ttl + ChronoDuration::seconds(60));
    store.fail_writes(true);

    for (round, force_refresh) in [true, false].into_iter().enumerate() {
        let requests = (0..2).map(|_| service.get_folder_hierarchy("root", None, force_refresh));
        let responses: Vec<_> = join_all(requests)
            .await
            .into_iter()
            .map(Result::unwrap)
            .collect();

        assert_eq!(drive.list_calls(), (round + 2) * FIXTURE_LISTINGS);
        assert_eq!(responses.iter().filter(|r| !r.stats.from_cache).count(), 1);
        for response in &responses {
            assert_eq!(response.stats.cache_age_seconds.unwrap_or_default(), 0);
            assert_eq!(response.root, responses[0].root);
        }
    }

    // The stale entry is untouched and its hits were not counted.
    let entry = store.get(&key).await.unwrap().unwrap();
    assert_eq!(entry.updated_at, stale.updated_at);
    assert_eq!(entry.access_count, stale.access_count);
}

#[tokio::test]
async fn test_delete_route_survives_a_failed_purge() {
    let service = service_over(
        Arc::new(fixture_drive()),
        Arc::new(BrokenStore),
        &Default::default(),
    );

    let deletion = service
        .routes()
        .delete_route("products", Some("brochures"))
        .await
        .unwrap();
    assert_eq!(deletion.route, "products/brochures");
    assert_eq!(deletion.cache_entries_removed, 0);

    let err = service
        .routes()
        .resolve("products", Some("brochures"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotConfigured);
}

#[tokio::test]
async fn test_clock_is_injected() {
    let hub = TestHub::new();
    let before = hub.clock.now();
    hub.clock.advance(ChronoDuration::minutes(5));
    assert_eq!((hub.clock.now() - before).num_minutes(), 5);
}

#[tokio::test]
async fn test_delete_route_purges_its_entries() {
    let hub = TestHub::new();
    hub.service
        .get_route_hierarchy("products", Some("brochures"), None, false)
        .await
        .unwrap();
    hub.service
        .get_route_hierarchy("products", Some("brochures"), Some(1), false)
        .await
        .unwrap();
    hub.service
        .get_folder_hierarchy("root", None, false)
        .await
        .unwrap();
    assert_eq!(hub.cache.list().await.unwrap().len(), 3);

    let deletion = hub
        .service
        .routes()
        .delete_route("products", Some("brochures"))
        .await
        .unwrap();
    assert_eq!(deletion.cache_entries_removed, 2);
    assert_eq!(hub.cache.list().await.unwrap().len(), 1);

    let err = hub
        .service
        .get_route_hierarchy("products", Some("brochures"), None, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotConfigured);
}

#[tokio::test]
async fn test_single_file_root() {
    let drive = MemoryDriveClient::new(RawNode::file("doc", "01_button_Only.pdf", "application/pdf"));
    let hub = TestHub::with_drive(drive);
    let response = hub
        .service
        .get_folder_hierarchy("doc", None, false)
        .await
        .unwrap();
    assert_eq!(response.stats.total_items, 1);
    assert!(!response.root.is_folder());
}
