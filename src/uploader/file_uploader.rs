use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::config::UploaderConfig;
use crate::errors::{AppError, AppResult};

use super::discord_client::{DiscordClient, UploadPayload};
use super::response::{format_attachments, UploadResult};
use super::MediaUploader;

const FILE_FIELD: &str = "file";

/// Uploads local files as-is, every file under the `file` field.
pub struct FileUploader {
    client: DiscordClient,
}

impl FileUploader {
    pub fn new(config: UploaderConfig) -> AppResult<Self> {
        Ok(Self {
            client: DiscordClient::new(config)?,
        })
    }

    /// Results come back in the same order as `paths`.
    pub async fn send_files<P: AsRef<Path>>(&self, paths: &[P]) -> AppResult<Vec<UploadResult>> {
        let mut payload = UploadPayload::new();
        for path in paths {
            payload.add_file(path.as_ref(), FILE_FIELD).await?;
        }

        let response = self.client.send_message(payload).await?;
        Ok(format_attachments(&response))
    }

    pub async fn send_file(&self, path: impl AsRef<Path>) -> AppResult<UploadResult> {
        self.send_files(&[path.as_ref()])
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::MissingAttachment)
    }
}

#[async_trait]
impl MediaUploader for FileUploader {
    type Input = Vec<PathBuf>;

    async fn upload(&self, input: Self::Input) -> AppResult<Vec<UploadResult>> {
        self.send_files(input.as_slice()).await
    }
}
