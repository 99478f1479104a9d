//! The hierarchy tree node types.

use serde::{Deserialize, Serialize};

use super::properties::{ContentCode, FileProperties};
use super::role::Role;

/// A node in a reconstructed content hierarchy.
///
/// The variant is fixed when the node is built from its drive entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "driveType", rename_all = "lowercase")]
pub enum HierarchyItem {
    /// A drive folder with ordered children.
    Folder(FolderItem),
    /// A drive file.
    File(FileItem),
}

/// A folder node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderItem {
    /// Drive ID.
    pub id: String,
    /// Name as stored in the drive.
    pub original_name: String,
    /// Name after stripping convention tokens.
    pub display_name: String,
    /// Role from the naming convention.
    pub role: Role,
    /// Explicit sibling order (0 when absent).
    pub order: u32,
    /// Tokens consumed from the front of the name.
    pub prefixes: Vec<String>,
    /// Tokens consumed from the end of the name.
    pub suffixes: Vec<String>,
    /// Distance from the root (root = 0).
    pub depth: u32,
    /// False when the name carried an `_inactive` suffix.
    pub is_active: bool,
    /// Set when listing this folder failed; `children` is then empty.
    #[serde(default)]
    pub listing_failed: bool,
    /// Ordered children.
    pub children: Vec<HierarchyItem>,
}

/// A file node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    /// Drive ID.
    pub id: String,
    /// Name as stored in the drive.
    pub original_name: String,
    /// Name after stripping convention tokens.
    pub display_name: String,
    /// Role from the naming convention.
    pub role: Role,
    /// Explicit sibling order (0 when absent).
    pub order: u32,
    /// Tokens consumed from the front of the name.
    pub prefixes: Vec<String>,
    /// Tokens consumed from the end of the name.
    pub suffixes: Vec<String>,
    /// Distance from the root.
    pub depth: u32,
    /// False when the name carried an `_inactive` suffix.
    pub is_active: bool,
    /// MIME type reported by the drive.
    pub mime_type: String,
    /// Raw description text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Properties extracted from the description; absent when none were found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<FileProperties>,
    /// Decomposed content-file code, when the name follows that grammar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_code: Option<ContentCode>,
    /// Embeddable preview URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    /// Direct download URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// URL of the file in the drive UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,
    /// Thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// One ancestor in a search result's path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Ancestor ID.
    pub id: String,
    /// Ancestor display name.
    pub name: String,
}

impl HierarchyItem {
    /// Drive ID.
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(f) => &f.id,
            Self::File(f) => &f.id,
        }
    }

    /// Original drive name.
    pub fn original_name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.original_name,
            Self::File(f) => &f.original_name,
        }
    }

    /// Parsed display name.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.display_name,
            Self::File(f) => &f.display_name,
        }
    }

    /// Role tag.
    pub fn role(&self) -> Role {
        match self {
            Self::Folder(f) => f.role,
            Self::File(f) => f.role,
        }
    }

    /// Sibling order.
    pub fn order(&self) -> u32 {
        match self {
            Self::Folder(f) => f.order,
            Self::File(f) => f.order,
        }
    }

    /// Depth in the tree.
    pub fn depth(&self) -> u32 {
        match self {
            Self::Folder(f) => f.depth,
            Self::File(f) => f.depth,
        }
    }

    /// Whether the node is active.
    pub fn is_active(&self) -> bool {
        match self {
            Self::Folder(f) => f.is_active,
            Self::File(f) => f.is_active,
        }
    }

    /// Whether this is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    /// Children of a folder; empty for files.
    pub fn children(&self) -> &[HierarchyItem] {
        match self {
            Self::Folder(f) => &f.children,
            Self::File(_) => &[],
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> u64 {
        1 + self.children().iter().map(Self::node_count).sum::<u64>()
    }

    /// Deepest node depth in this subtree.
    pub fn max_depth(&self) -> u32 {
        self.children()
            .iter()
            .map(Self::max_depth)
            .max()
            .unwrap_or(0)
            .max(self.depth())
    }

    /// A copy of this node without children, used when returning
    /// search matches.
    pub fn detached(&self) -> Self {
        match self {
            Self::Folder(f) => Self::Folder(FolderItem {
                children: Vec::new(),
                ..f.clone()
            }),
            Self::File(f) => Self::File(f.clone()),
        }
    }

    /// Path segment describing this node.
    pub fn path_segment(&self) -> PathSegment {
        PathSegment {
            id: self.id().to_string(),
            name: self.display_name().to_string(),
        }
    }
}
