//! Drive client construction from configuration.

use std::sync::Arc;

use tracing::info;

use drivehub_core::config::drive::DriveConfig;
use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::traits::drive::DriveClient;

/// Build the drive client selected by `config.provider`.
pub async fn connect(config: &DriveConfig) -> AppResult<Arc<dyn DriveClient>> {
    let client: Arc<dyn DriveClient> = match config.provider.as_str() {
        #[cfg(feature = "local")]
        "local" => {
            info!(root = %config.local.root_path, "Using local filesystem drive");
            Arc::new(crate::providers::local::LocalDriveClient::new(&config.local.root_path).await?)
        }
        #[cfg(feature = "google")]
        "google" => {
            info!(api_base = %config.google.api_base, "Using Google Drive");
            Arc::new(crate::providers::google::GoogleDriveClient::new(
                &config.google,
            )?)
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown drive provider: '{other}'. Supported: local, google"
            )));
        }
    };
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivehub_core::error::ErrorKind;

    #[tokio::test]
    async fn test_unknown_provider() {
        let config = DriveConfig {
            provider: "dropbox".to_string(),
            ..DriveConfig::default()
        };
        let err = connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[cfg(feature = "local")]
    #[tokio::test]
    async fn test_local_provider() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DriveConfig::default();
        config.local.root_path = dir.path().to_string_lossy().into_owned();
        let client = connect(&config).await.unwrap();
        assert_eq!(client.provider_type(), "local");
    }
}
