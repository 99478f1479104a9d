//! External drive configuration.

use serde::{Deserialize, Serialize};

/// Top-level drive configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Drive backend: `"google"` or `"local"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Local filesystem drive configuration.
    #[serde(default)]
    pub local: LocalDriveConfig,
    /// Google Drive configuration.
    #[serde(default)]
    pub google: GoogleDriveConfig,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            local: LocalDriveConfig::default(),
            google: GoogleDriveConfig::default(),
        }
    }
}

/// Local filesystem drive configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalDriveConfig {
    /// Directory treated as the drive root. Node IDs are paths relative to it.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalDriveConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

/// Google Drive v3 REST configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleDriveConfig {
    /// API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// OAuth2 bearer token.
    #[serde(default)]
    pub access_token: String,
    /// Page size for `files.list` calls.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for GoogleDriveConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            access_token: String::new(),
            page_size: default_page_size(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_local_root() -> String {
    "./data/drive".to_string()
}

fn default_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_page_size() -> u32 {
    1000
}

fn default_request_timeout() -> u64 {
    30
}
