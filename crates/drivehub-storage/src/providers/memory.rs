//! In-memory drive client.
//!
//! Used by tests and demos. Supports failure injection, artificial latency,
//! and counters for listing and content calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::traits::drive::{DriveClient, RawNode};

#[derive(Debug, Default)]
struct Counters {
    list_calls: AtomicUsize,
    content_fetches: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Drive client backed by in-process maps.
#[derive(Debug, Clone)]
pub struct MemoryDriveClient {
    nodes: Arc<DashMap<String, RawNode>>,
    children: Arc<DashMap<String, Vec<String>>>,
    contents: Arc<DashMap<String, String>>,
    failing: Arc<DashSet<String>>,
    latency: Option<Duration>,
    counters: Arc<Counters>,
}

impl MemoryDriveClient {
    /// Create a drive holding a single root folder.
    pub fn new(root: RawNode) -> Self {
        let client = Self {
            nodes: Arc::new(DashMap::new()),
            children: Arc::new(DashMap::new()),
            contents: Arc::new(DashMap::new()),
            failing: Arc::new(DashSet::new()),
            latency: None,
            counters: Arc::new(Counters::default()),
        };
        client.children.insert(root.id.clone(), Vec::new());
        client.nodes.insert(root.id.clone(), root);
        client
    }

    /// Delay every listing by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Append a node under `parent_id`. Listing order is insertion order.
    pub fn add(&self, parent_id: &str, node: RawNode) -> &Self {
        if node.is_folder {
            self.children.entry(node.id.clone()).or_default();
        }
        self.children
            .entry(parent_id.to_string())
            .or_default()
            .push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        self
    }

    /// Set the text content returned for a file.
    pub fn set_content(&self, id: &str, content: impl Into<String>) -> &Self {
        self.contents.insert(id.to_string(), content.into());
        self
    }

    /// Make every listing of `folder_id` fail.
    pub fn fail_listing(&self, folder_id: &str) -> &Self {
        self.failing.insert(folder_id.to_string());
        self
    }

    /// Number of `list_children` calls so far.
    pub fn list_calls(&self) -> usize {
        self.counters.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_file_content` calls so far.
    pub fn content_fetches(&self) -> usize {
        self.counters.content_fetches.load(Ordering::SeqCst)
    }

    /// Highest number of listings observed in flight at once.
    pub fn peak_concurrent_listings(&self) -> usize {
        self.counters.peak_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a Counters);

impl<'a> InFlight<'a> {
    fn enter(counters: &'a Counters) -> Self {
        let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(counters)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DriveClient for MemoryDriveClient {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn list_children(&self, folder_id: &str) -> AppResult<Vec<RawNode>> {
        self.counters.list_calls.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlight::enter(&self.counters);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.contains(folder_id) {
            return Err(AppError::external_service(format!(
                "Listing failed for folder {folder_id}"
            )));
        }

        let ids = self
            .children
            .get(folder_id)
            .map(|ids| ids.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Folder not found: {folder_id}")))?;
        Ok(ids
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|n| n.value().clone()))
            .collect())
    }

    async fn get_node(&self, id: &str) -> AppResult<RawNode> {
        self.nodes
            .get(id)
            .map(|n| n.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Node not found: {id}")))
    }

    async fn get_file_content(&self, id: &str) -> AppResult<Option<String>> {
        self.counters.content_fetches.fetch_add(1, Ordering::SeqCst);
        if !self.nodes.contains_key(id) {
            return Err(AppError::not_found(format!("Node not found: {id}")));
        }
        Ok(self.contents.get(id).map(|c| c.value().clone()))
    }
}
