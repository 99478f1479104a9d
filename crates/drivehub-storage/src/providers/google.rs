//! Google Drive v3 REST client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use drivehub_core::config::drive::GoogleDriveConfig;
use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::traits::drive::{DriveClient, FOLDER_MIME_TYPE, RawNode};

/// Fields requested for every file resource.
const FILE_FIELDS: &str = "id,name,mimeType,description,webViewLink,webContentLink,thumbnailLink,size,modifiedTime";

/// Google-native document types that can be exported as text.
const GOOGLE_DOC_PREFIX: &str = "application/vnd.google-apps.";

/// Google Drive client using a bearer token.
#[derive(Debug, Clone)]
pub struct GoogleDriveClient {
    http: Client,
    api_base: String,
    access_token: String,
    page_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    mime_type: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    web_view_link: Option<String>,
    #[serde(default)]
    web_content_link: Option<String>,
    #[serde(default)]
    thumbnail_link: Option<String>,
    /// The API reports sizes as decimal strings.
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    modified_time: Option<DateTime<Utc>>,
}

impl From<DriveFile> for RawNode {
    fn from(file: DriveFile) -> Self {
        let is_folder = file.mime_type == FOLDER_MIME_TYPE;
        let preview_link = (!is_folder).then(|| preview_url(&file.id));
        RawNode {
            is_folder,
            preview_link,
            size_bytes: file.size.and_then(|s| s.parse().ok()),
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            description: file.description,
            web_view_link: file.web_view_link,
            download_link: file.web_content_link,
            thumbnail_link: file.thumbnail_link,
            modified_at: file.modified_time,
        }
    }
}

impl GoogleDriveClient {
    /// Build a client from configuration.
    pub fn new(config: &GoogleDriveConfig) -> AppResult<Self> {
        if config.access_token.is_empty() {
            return Err(AppError::configuration(
                "Google Drive provider requires drive.google.access_token",
            ));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            page_size: config.page_size,
        })
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = Url::parse(&format!("{}/{path}", self.api_base)).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Google Drive API base", e)
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn send(&self, url: Url, id: &str) -> AppResult<reqwest::Response> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::with_source(ErrorKind::Timeout, "Google Drive request timed out", e)
                } else {
                    AppError::with_source(
                        ErrorKind::ExternalService,
                        "Google Drive request failed",
                        e,
                    )
                }
            })?;

        match response.status() {
            s if s.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(AppError::not_found(format!(
                "Drive node not found: {id}"
            ))),
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!(%status, id, "Google Drive returned an error");
                Err(AppError::external_service(format!(
                    "Google Drive returned {status} for {id}: {body}"
                )))
            }
        }
    }
}

#[async_trait]
impl DriveClient for GoogleDriveClient {
    fn provider_type(&self) -> &str {
        "google"
    }

    async fn list_children(&self, folder_id: &str) -> AppResult<Vec<RawNode>> {
        let query = format!("'{}' in parents and trashed=false", escape_query(folder_id));
        let fields = format!("nextPageToken,files({FILE_FIELDS})");
        let page_size = self.page_size.to_string();
        let mut nodes = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("q", query.as_str()),
                ("fields", fields.as_str()),
                ("orderBy", "name"),
                ("pageSize", page_size.as_str()),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }
            let url = self.url("files", &params)?;
            let page: FileList = self
                .send(url, folder_id)
                .await?
                .json()
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::ExternalService,
                        "Malformed Google Drive listing",
                        e,
                    )
                })?;

            nodes.extend(page.files.into_iter().map(RawNode::from));
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(folder_id, count = nodes.len(), "Listed Google Drive folder");
        Ok(nodes)
    }

    async fn get_node(&self, id: &str) -> AppResult<RawNode> {
        let url = self.url(
            &format!("files/{id}"),
            &[("fields", FILE_FIELDS), ("supportsAllDrives", "true")],
        )?;
        let file: DriveFile = self.send(url, id).await?.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Malformed Google Drive file", e)
        })?;
        Ok(file.into())
    }

    async fn get_file_content(&self, id: &str) -> AppResult<Option<String>> {
        let node = self.get_node(id).await?;
        let url = match export_mime(&node.mime_type) {
            Some(export) => self.url(&format!("files/{id}/export"), &[("mimeType", export)])?,
            None if is_text_mime(&node.mime_type) => self.url(
                &format!("files/{id}"),
                &[("alt", "media"), ("supportsAllDrives", "true")],
            )?,
            None => return Ok(None),
        };
        let text = self.send(url, id).await?.text().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to read file content", e)
        })?;
        Ok(Some(text))
    }
}

/// Embeddable preview URL for a file.
pub fn preview_url(id: &str) -> String {
    format!("https://drive.google.com/file/d/{id}/preview")
}

/// Escape a value for use inside a single-quoted Drive query string.
fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Text export format for a Google-native document, if it has one.
fn export_mime(mime: &str) -> Option<&'static str> {
    let kind = mime.strip_prefix(GOOGLE_DOC_PREFIX)?;
    match kind {
        "document" | "presentation" => Some("text/plain"),
        "spreadsheet" => Some("text/csv"),
        _ => None,
    }
}

fn is_text_mime(mime: &str) -> bool {
    mime.starts_with("text/") || mime == "application/json"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_query() {
        assert_eq!(escape_query("abc"), "abc");
        assert_eq!(escape_query("a'b"), "a\\'b");
        assert_eq!(escape_query("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_export_mime() {
        assert_eq!(
            export_mime("application/vnd.google-apps.document"),
            Some("text/plain")
        );
        assert_eq!(
            export_mime("application/vnd.google-apps.spreadsheet"),
            Some("text/csv")
        );
        assert_eq!(export_mime("application/vnd.google-apps.folder"), None);
        assert_eq!(export_mime("application/pdf"), None);
    }

    #[test]
    fn test_requires_token() {
        let err = GoogleDriveClient::new(&GoogleDriveConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_file_conversion() {
        let file: DriveFile = serde_json::from_value(serde_json::json!({
            "id": "f1",
            "name": "01_button_Download.pdf",
            "mimeType": "application/pdf",
            "size": "2048",
            "webViewLink": "https://drive.google.com/file/d/f1/view",
            "modifiedTime": "2025-03-01T10:00:00Z"
        }))
        .unwrap();
        let node = RawNode::from(file);
        assert!(!node.is_folder);
        assert_eq!(node.size_bytes, Some(2048));
        assert_eq!(
            node.preview_link.as_deref(),
            Some("https://drive.google.com/file/d/f1/preview")
        );

        let folder: DriveFile = serde_json::from_value(serde_json::json!({
            "id": "d1",
            "name": "01_tab_Overview",
            "mimeType": FOLDER_MIME_TYPE
        }))
        .unwrap();
        let node = RawNode::from(folder);
        assert!(node.is_folder);
        assert_eq!(node.preview_link, None);
    }
}
