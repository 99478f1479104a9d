//! Drive client trait for pluggable file/folder sources.

use async_trait::async_trait;

use crate::result::AppResult;

/// A file or folder as reported by the external drive.
///
/// This is read-only input to the hierarchy builder; nothing in DriveHub
/// writes back to the source.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawNode {
    /// Opaque identifier assigned by the source system.
    pub id: String,
    /// Name exactly as stored in the source system.
    pub name: String,
    /// Whether this node is a folder.
    pub is_folder: bool,
    /// MIME type reported by the source.
    pub mime_type: String,
    /// Free-text description attached to the node.
    #[serde(default)]
    pub description: Option<String>,
    /// Link to view the node in the source's own UI.
    #[serde(default)]
    pub web_view_link: Option<String>,
    /// Embeddable preview link.
    #[serde(default)]
    pub preview_link: Option<String>,
    /// Direct download link.
    #[serde(default)]
    pub download_link: Option<String>,
    /// Thumbnail image link.
    #[serde(default)]
    pub thumbnail_link: Option<String>,
    /// Size in bytes (files only).
    #[serde(default)]
    pub size_bytes: Option<u64>,
    /// Last modification time.
    #[serde(default)]
    pub modified_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl RawNode {
    /// Create a folder node with no optional metadata.
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::bare(id, name, true, FOLDER_MIME_TYPE)
    }

    /// Create a file node with no optional metadata.
    pub fn file(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self::bare(id, name, false, mime_type)
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn bare(
        id: impl Into<String>,
        name: impl Into<String>,
        is_folder: bool,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_folder,
            mime_type: mime_type.into(),
            description: None,
            web_view_link: None,
            preview_link: None,
            download_link: None,
            thumbnail_link: None,
            size_bytes: None,
            modified_at: None,
        }
    }
}

/// MIME type Google Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Trait for external drive backends.
///
/// Implementations exist for the Google Drive REST API, the local
/// filesystem, and an in-memory fixture. The trait is defined here in
/// `drivehub-core` and implemented in `drivehub-storage`.
#[async_trait]
pub trait DriveClient: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "google", "local").
    fn provider_type(&self) -> &str;

    /// List the direct children of a folder, in the source's listing order.
    async fn list_children(&self, folder_id: &str) -> AppResult<Vec<RawNode>>;

    /// Fetch a single node by ID.
    async fn get_node(&self, id: &str) -> AppResult<RawNode>;

    /// Fetch a file's textual content.
    ///
    /// Returns `None` when the file has no text representation.
    async fn get_file_content(&self, id: &str) -> AppResult<Option<String>>;
}
