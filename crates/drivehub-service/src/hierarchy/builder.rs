//! Hierarchy builder: drive listing to typed tree.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::traits::drive::{DriveClient, RawNode};
use drivehub_entity::hierarchy::{FileItem, FolderItem, HierarchyItem, HierarchyStats};

use crate::metadata::extract_properties;
use crate::naming::{NodeKind, ParsedName, parse_as};

/// Leading character of names hidden unless `include_hidden` is set.
const HIDDEN_MARKER: char = '.';

/// Options for a single build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Drive ID of the root node.
    pub root_id: String,
    /// Folders at this depth are leaves and are not listed.
    pub max_depth: u32,
    /// Keep nodes whose names start with a dot.
    pub include_hidden: bool,
    /// Parse file descriptions into property bags.
    pub process_metadata: bool,
}

impl BuildOptions {
    /// Options with metadata processing on and hidden nodes filtered.
    pub fn new(root_id: impl Into<String>, max_depth: u32) -> Self {
        Self {
            root_id: root_id.into(),
            max_depth,
            include_hidden: false,
            process_metadata: true,
        }
    }
}

/// A built tree and its statistics.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Root node.
    pub root: HierarchyItem,
    /// Node count, depth, timing and failed folders.
    pub stats: HierarchyStats,
}

/// Listing bookkeeping shared by every folder of one build.
#[derive(Debug, Default)]
struct Tally {
    attempted: AtomicUsize,
    failed: Mutex<Vec<String>>,
}

/// Builds hierarchies from a drive.
///
/// The listing semaphore is shared by every build made through this
/// builder, so it bounds in-flight `list_children` calls across concurrent
/// requests as well as within one tree.
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    drive: Arc<dyn DriveClient>,
    listing_permits: Arc<Semaphore>,
}

impl HierarchyBuilder {
    /// Create a builder allowing at most `max_concurrent_listings` listings
    /// in flight (at least one).
    pub fn new(drive: Arc<dyn DriveClient>, max_concurrent_listings: usize) -> Self {
        Self {
            drive,
            listing_permits: Arc::new(Semaphore::new(max_concurrent_listings.max(1))),
        }
    }

    /// The drive this builder reads from.
    pub fn drive(&self) -> &Arc<dyn DriveClient> {
        &self.drive
    }

    /// Build the tree rooted at `options.root_id`.
    ///
    /// A failed folder listing leaves that folder empty with
    /// `listing_failed` set. If every attempted listing fails the build
    /// fails with [`ErrorKind::ServiceUnavailable`].
    pub async fn build(&self, options: &BuildOptions) -> AppResult<BuildOutput> {
        let started = Instant::now();
        let root_node = self.drive.get_node(&options.root_id).await?;
        let tally = Tally::default();

        let root = if root_node.is_folder {
            self.expand(root_node, 0, options, &tally).await
        } else {
            file_item(root_node, 0, options.process_metadata)
        };

        let attempted = tally.attempted.load(Ordering::SeqCst);
        let failed_folders = tally.failed.into_inner();
        if attempted > 0 && failed_folders.len() == attempted {
            return Err(AppError::service_unavailable(format!(
                "Drive listing failed for all {attempted} folder(s) under {}",
                options.root_id
            )));
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let stats = HierarchyStats {
            total_items: root.node_count(),
            max_depth_reached: root.max_depth(),
            from_cache: false,
            cache_age_seconds: None,
            build_time_ms: Some(elapsed_ms),
            failed_folders,
        };

        info!(
            root_id = %options.root_id,
            total_items = stats.total_items,
            max_depth_reached = stats.max_depth_reached,
            failed = stats.failed_folders.len(),
            elapsed_ms,
            "Built hierarchy"
        );
        Ok(BuildOutput { root, stats })
    }

    /// Turn a folder node into a folder item, listing and expanding its
    /// children while `depth < max_depth`. Siblings expand concurrently.
    fn expand<'a>(
        &'a self,
        node: RawNode,
        depth: u32,
        options: &'a BuildOptions,
        tally: &'a Tally,
    ) -> BoxFuture<'a, HierarchyItem> {
        async move {
            let mut folder = folder_item(node, depth);
            if depth >= options.max_depth {
                return HierarchyItem::Folder(folder);
            }

            tally.attempted.fetch_add(1, Ordering::SeqCst);
            let listing = match self.list(&folder.id).await {
                Ok(listing) => listing,
                Err(e) => {
                    warn!(folder_id = %folder.id, error = %e, "Folder listing failed, continuing without its children");
                    tally.failed.lock().await.push(folder.id.clone());
                    folder.listing_failed = true;
                    return HierarchyItem::Folder(folder);
                }
            };
            debug!(folder_id = %folder.id, depth, count = listing.len(), "Listed folder");

            let pending: Vec<BoxFuture<'a, HierarchyItem>> = listing
                .into_iter()
                .filter(|child| options.include_hidden || !child.name.starts_with(HIDDEN_MARKER))
                .map(|child| {
                    if child.is_folder {
                        self.expand(child, depth + 1, options, tally)
                    } else {
                        let item = file_item(child, depth + 1, options.process_metadata);
                        futures::future::ready(item).boxed()
                    }
                })
                .collect();

            let mut children = join_all(pending).await;
            // Stable: equal orders keep listing order.
            children.sort_by_key(HierarchyItem::order);
            folder.children = children;
            HierarchyItem::Folder(folder)
        }
        .boxed()
    }

    async fn list(&self, folder_id: &str) -> AppResult<Vec<RawNode>> {
        let _permit = self.listing_permits.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Listing limiter closed", e)
        })?;
        self.drive.list_children(folder_id).await
    }
}

fn folder_item(node: RawNode, depth: u32) -> FolderItem {
    let parsed = parse_as(&node.name, NodeKind::Folder);
    let ParsedName {
        order,
        role,
        display_name,
        prefixes,
        suffixes,
        is_active,
        ..
    } = parsed;
    FolderItem {
        id: node.id,
        original_name: node.name,
        display_name,
        role,
        order,
        prefixes,
        suffixes,
        depth,
        is_active,
        listing_failed: false,
        children: Vec::new(),
    }
}

fn file_item(node: RawNode, depth: u32, process_metadata: bool) -> HierarchyItem {
    let parsed = parse_as(&node.name, NodeKind::File);
    let properties = if process_metadata {
        extract_properties(node.description.as_deref())
    } else {
        None
    };
    HierarchyItem::File(FileItem {
        id: node.id,
        original_name: node.name,
        display_name: parsed.display_name,
        role: parsed.role,
        order: parsed.order,
        prefixes: parsed.prefixes,
        suffixes: parsed.suffixes,
        depth,
        is_active: parsed.is_active,
        mime_type: node.mime_type,
        description: node.description,
        properties,
        content_code: parsed.content_code,
        preview_url: node.preview_link,
        download_url: node.download_link,
        view_url: node.web_view_link,
        thumbnail_url: node.thumbnail_link,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivehub_entity::hierarchy::Role;
    use drivehub_storage::providers::memory::MemoryDriveClient;

    fn drive() -> MemoryDriveClient {
        let drive = MemoryDriveClient::new(RawNode::folder("root", "Root Folder"));
        drive
            .add("root", RawNode::folder("t2", "02_tab_Specs"))
            .add("root", RawNode::folder("t1", "01_tab_Overview"))
            .add("root", RawNode::file("h", ".hidden", "text/plain"))
            .add(
                "t1",
                RawNode::file("btn", "01_button_Sign up.pdf", "application/pdf")
                    .with_description(r#"{"formUrl":"https://x"}"#),
            )
            .add("t1", RawNode::folder("s1", "02_section_Intro"))
            .add("s1", RawNode::file("deep", "notes.txt", "text/plain"));
        drive
    }

    #[tokio::test]
    async fn test_builds_ordered_tree() {
        let builder = HierarchyBuilder::new(Arc::new(drive()), 4);
        let out = builder.build(&BuildOptions::new("root", 5)).await.unwrap();

        let names: Vec<&str> = out.root.children().iter().map(|c| c.display_name()).collect();
        assert_eq!(names, vec!["Overview", "Specs"]);
        assert_eq!(out.stats.total_items, 6);
        assert_eq!(out.stats.max_depth_reached, 3);
        assert!(out.stats.failed_folders.is_empty());

        let overview = &out.root.children()[0];
        assert_eq!(overview.role(), Role::Tab);
        let HierarchyItem::File(button) = &overview.children()[0] else {
            panic!("expected file");
        };
        assert_eq!(button.role, Role::Button);
        assert_eq!(
            button.properties.as_ref().and_then(|p| p.form_url.as_deref()),
            Some("https://x")
        );
    }

    #[tokio::test]
    async fn test_hidden_nodes() {
        let builder = HierarchyBuilder::new(Arc::new(drive()), 4);
        let mut options = BuildOptions::new("root", 1);
        options.include_hidden = true;
        let out = builder.build(&options).await.unwrap();
        assert!(out.root.children().iter().any(|c| c.original_name() == ".hidden"));
    }

    #[tokio::test]
    async fn test_max_depth_leaves_are_not_listed() {
        let drive = Arc::new(drive());
        let builder = HierarchyBuilder::new(drive.clone(), 4);
        let out = builder.build(&BuildOptions::new("root", 1)).await.unwrap();

        assert_eq!(drive.list_calls(), 1);
        assert_eq!(out.stats.max_depth_reached, 1);
        assert!(out.root.children().iter().all(|c| c.children().is_empty()));
        assert_eq!(out.stats.total_items, 3);
    }

    #[tokio::test]
    async fn test_zero_depth_is_root_only() {
        let drive = Arc::new(drive());
        let builder = HierarchyBuilder::new(drive.clone(), 4);
        let out = builder.build(&BuildOptions::new("root", 0)).await.unwrap();
        assert_eq!(drive.list_calls(), 0);
        assert_eq!(out.stats.total_items, 1);
    }

    #[tokio::test]
    async fn test_metadata_can_be_skipped() {
        let builder = HierarchyBuilder::new(Arc::new(drive()), 4);
        let mut options = BuildOptions::new("root", 2);
        options.process_metadata = false;
        let out = builder.build(&options).await.unwrap();
        let HierarchyItem::File(button) = &out.root.children()[0].children()[0] else {
            panic!("expected file");
        };
        assert_eq!(button.properties, None);
        assert!(button.description.is_some());
    }

    #[tokio::test]
    async fn test_equal_orders_keep_listing_order() {
        let drive = MemoryDriveClient::new(RawNode::folder("root", "Root"));
        drive
            .add("root", RawNode::file("b", "Beta.pdf", "application/pdf"))
            .add("root", RawNode::folder("a", "Alpha"))
            .add("root", RawNode::file("c", "01_Gamma.pdf", "application/pdf"));
        let builder = HierarchyBuilder::new(Arc::new(drive), 2);
        let out = builder.build(&BuildOptions::new("root", 1)).await.unwrap();
        let ids: Vec<&str> = out.root.children().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let builder = HierarchyBuilder::new(Arc::new(drive()), 1);
        let err = builder.build(&BuildOptions::new("nope", 3)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
