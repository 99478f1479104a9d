//! Depth-first search over a built hierarchy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::traits::drive::DriveClient;
use drivehub_entity::hierarchy::{HierarchyItem, PathSegment};

/// Search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    /// Compare names and content case-sensitively.
    pub match_case: bool,
    /// Also match file contents, fetched from the drive on demand.
    pub search_in_content: bool,
    /// MIME types eligible for content search; empty means all.
    pub file_types: Vec<String>,
    /// Stop after this many matches.
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            match_case: false,
            search_in_content: false,
            file_types: Vec::new(),
            max_results: 100,
        }
    }
}

/// One match and its ancestors, root first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched node with its children removed.
    pub item: HierarchyItem,
    /// Ancestors from the root down to the parent; empty for the root.
    pub path: Vec<PathSegment>,
}

/// Matches in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Matches, pre-order.
    pub results: Vec<SearchResult>,
    /// Number of matches.
    pub count: usize,
}

/// Runs searches, fetching file content from the drive when asked to.
#[derive(Debug, Clone)]
pub struct SearchExecutor {
    drive: Arc<dyn DriveClient>,
}

impl SearchExecutor {
    /// Create an executor reading content from `drive`.
    pub fn new(drive: Arc<dyn DriveClient>) -> Self {
        Self { drive }
    }

    /// Search `root` for `query`.
    ///
    /// Traversal is depth-first pre-order and stops once
    /// `options.max_results` matches are collected. Content is only fetched
    /// for eligible files whose name did not already match; a failed fetch
    /// counts as no match.
    pub async fn search(
        &self,
        root: &HierarchyItem,
        query: &str,
        options: &SearchOptions,
    ) -> AppResult<SearchResponse> {
        if query.trim().is_empty() {
            return Err(AppError::validation("Search query must not be empty"));
        }

        let needle = normalize(query, options.match_case);
        let mut results = Vec::new();
        let mut path: Vec<PathSegment> = Vec::new();
        // (node, number of ancestors on `path`)
        let mut stack: Vec<(&HierarchyItem, usize)> = vec![(root, 0)];

        while let Some((node, ancestors)) = stack.pop() {
            if results.len() >= options.max_results {
                break;
            }
            path.truncate(ancestors);

            if self.matches(node, &needle, options).await {
                results.push(SearchResult {
                    item: node.detached(),
                    path: path.clone(),
                });
            }

            if let HierarchyItem::Folder(folder) = node {
                path.push(node.path_segment());
                stack.extend(folder.children.iter().rev().map(|c| (c, ancestors + 1)));
            }
        }

        debug!(query, count = results.len(), "Search complete");
        Ok(SearchResponse {
            count: results.len(),
            results,
        })
    }

    async fn matches(&self, node: &HierarchyItem, needle: &str, options: &SearchOptions) -> bool {
        if normalize(node.display_name(), options.match_case).contains(needle) {
            return true;
        }

        let HierarchyItem::File(file) = node else {
            return false;
        };
        if !options.search_in_content
            || !(options.file_types.is_empty() || options.file_types.contains(&file.mime_type))
        {
            return false;
        }

        match self.drive.get_file_content(&file.id).await {
            Ok(Some(content)) => normalize(&content, options.match_case).contains(needle),
            Ok(None) => false,
            Err(e) => {
                warn!(file_id = %file.id, error = %e, "Content fetch failed during search");
                false
            }
        }
    }
}

fn normalize(text: &str, match_case: bool) -> String {
    if match_case {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}
