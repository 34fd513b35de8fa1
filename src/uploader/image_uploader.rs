use async_trait::async_trait;

use crate::config::UploaderConfig;
use crate::errors::{AppError, AppResult};
use crate::image_processor;

use super::discord_client::{DiscordClient, UploadPayload};
use super::response::{format_attachments, UploadResult};
use super::MediaUploader;

const IMAGE_FIELD: &str = "media-image";
const THUMBNAIL_FIELD: &str = "media-thumbnail";

/// Uploads one base64-encoded image together with a generated thumbnail.
pub struct ImageUploader {
    client: DiscordClient,
}

impl ImageUploader {
    pub fn new(config: UploaderConfig) -> AppResult<Self> {
        Ok(Self {
            client: DiscordClient::new(config)?,
        })
    }

    pub async fn upload_image(&self, base64_image: &str) -> AppResult<UploadResult> {
        let image = image_processor::decode_base64_image(base64_image)?;
        let thumbnail = image_processor::generate_thumbnail(&image)?;

        let image_type = image_processor::detect_file_type(&image, "image")?;
        let thumbnail_type = image_processor::detect_file_type(&thumbnail, "thumbnail")?;

        log::info!(
            "Uploading {} image ({} bytes) with {} thumbnail ({} bytes)",
            image_type.mime_type,
            image.len(),
            thumbnail_type.mime_type,
            thumbnail.len()
        );

        let mut payload = UploadPayload::new();
        payload.add_bytes(
            image,
            format!("file.{}", image_type.extension),
            image_type.mime_type,
            IMAGE_FIELD,
        )?;
        payload.add_bytes(
            thumbnail,
            format!("file.thumbnail.{}", thumbnail_type.extension),
            thumbnail_type.mime_type,
            THUMBNAIL_FIELD,
        )?;

        let response = self.client.send_message(payload).await?;

        format_attachments(&response)
            .into_iter()
            .next()
            .ok_or(AppError::MissingAttachment)
    }
}

#[async_trait]
impl MediaUploader for ImageUploader {
    type Input = String;

    async fn upload(&self, input: Self::Input) -> AppResult<Vec<UploadResult>> {
        Ok(vec![self.upload_image(&input).await?])
    }
}
