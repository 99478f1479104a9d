//! Local filesystem drive client.
//!
//! Serves a directory tree as a drive. Node IDs are `/`-separated paths
//! relative to the root; the root itself is `/`. Descriptions come from a
//! `.descriptions.json` file in each directory mapping entry names to text.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::traits::drive::{DriveClient, RawNode};

/// Per-directory description file. Never listed as a node.
pub const DESCRIPTIONS_FILE: &str = ".descriptions.json";

/// ID of the drive root.
pub const ROOT_ID: &str = "/";

/// Local filesystem drive client.
#[derive(Debug, Clone)]
pub struct LocalDriveClient {
    root: PathBuf,
}

impl LocalDriveClient {
    /// Create a client rooted at an existing directory.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        let meta = fs::metadata(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Drive root is not accessible: {}", root.display()),
                e,
            )
        })?;
        if !meta.is_dir() {
            return Err(AppError::configuration(format!(
                "Drive root is not a directory: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Resolve a node ID to a path inside the root, rejecting escapes.
    fn resolve(&self, id: &str) -> AppResult<PathBuf> {
        let relative = Path::new(id.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(AppError::validation(format!("Invalid node id: '{id}'")));
        }
        Ok(self.root.join(relative))
    }

    /// Node ID for a child of `parent_id`.
    fn child_id(parent_id: &str, name: &str) -> String {
        let parent = parent_id.trim_end_matches('/');
        if parent.is_empty() {
            format!("/{name}")
        } else {
            format!("{parent}/{name}")
        }
    }

    async fn read_descriptions(dir: &Path) -> HashMap<String, String> {
        let path = dir.join(DESCRIPTIONS_FILE);
        match fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                debug!(path = %path.display(), error = %e, "Ignoring malformed descriptions file");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        }
    }

    async fn describe(
        &self,
        id: String,
        name: String,
        path: &Path,
        description: Option<String>,
    ) -> AppResult<RawNode> {
        let meta = fs::metadata(path).await.map_err(|e| map_io(e, &id))?;
        let modified_at = meta.modified().ok().map(DateTime::<Utc>::from);

        let mut node = if meta.is_dir() {
            RawNode::folder(id, name)
        } else {
            let mime = mime_from_path(&name).unwrap_or_else(|| "application/octet-stream".into());
            let mut file = RawNode::file(id, name, mime);
            file.size_bytes = Some(meta.len());
            file
        };
        node.description = description;
        node.modified_at = modified_at;
        Ok(node)
    }
}

#[async_trait]
impl DriveClient for LocalDriveClient {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn list_children(&self, folder_id: &str) -> AppResult<Vec<RawNode>> {
        let dir = self.resolve(folder_id)?;
        let mut reader = fs::read_dir(&dir).await.map_err(|e| map_io(e, folder_id))?;
        let mut descriptions = Self::read_descriptions(&dir).await;

        let mut names = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| map_io(e, folder_id))? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name != DESCRIPTIONS_FILE {
                names.push(name);
            }
        }
        // read_dir order is platform-dependent; name order keeps listings stable.
        names.sort();

        let mut nodes = Vec::with_capacity(names.len());
        for name in names {
            let path = dir.join(&name);
            let description = descriptions.remove(&name);
            let id = Self::child_id(folder_id, &name);
            nodes.push(self.describe(id, name, &path, description).await?);
        }

        debug!(folder_id, count = nodes.len(), "Listed local folder");
        Ok(nodes)
    }

    async fn get_node(&self, id: &str) -> AppResult<RawNode> {
        let path = self.resolve(id)?;
        let trimmed = id.trim_matches('/');
        let (parent, name) = match trimmed.rsplit_once('/') {
            Some((parent, name)) => (self.root.join(parent), name.to_string()),
            None if trimmed.is_empty() => {
                let name = self
                    .root
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| ROOT_ID.to_string());
                return self.describe(ROOT_ID.to_string(), name, &path, None).await;
            }
            None => (self.root.clone(), trimmed.to_string()),
        };
        let description = Self::read_descriptions(&parent).await.remove(&name);
        self.describe(format!("/{trimmed}"), name, &path, description)
            .await
    }

    async fn get_file_content(&self, id: &str) -> AppResult<Option<String>> {
        let path = self.resolve(id)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !mime_from_path(&name).is_some_and(|m| is_text_mime(&m)) {
            return Ok(None);
        }
        let bytes = fs::read(&path).await.map_err(|e| map_io(e, id))?;
        Ok(String::from_utf8(bytes).ok())
    }
}

fn map_io(e: std::io::Error, id: &str) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("Node not found: {id}"))
    } else {
        AppError::with_source(ErrorKind::Storage, format!("Failed to read node: {id}"), e)
    }
}

/// Whether content of this MIME type can be searched as text.
pub fn is_text_mime(mime: &str) -> bool {
    mime.starts_with("text/")
        || matches!(
            mime,
            "application/json" | "application/xml" | "application/javascript"
        )
}

/// Guess a MIME type from a file name's extension.
pub fn mime_from_path(path: &str) -> Option<String> {
    let ext = path.rsplit_once('.')?.1.to_lowercase();
    let mime = match ext.as_str() {
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => return None,
    };
    Some(mime.to_string())
}
