// Uploader module - posts media to a Discord channel and normalizes the answer
//
// Both uploaders share the HTTP client and response normalization

use async_trait::async_trait;

use crate::errors::AppResult;

pub mod discord_client;
pub mod file_uploader;
pub mod image_uploader;
pub mod response;

pub use file_uploader::FileUploader;
pub use image_uploader::ImageUploader;
pub use response::UploadResult;

/// Something that can push media to Discord and report what was stored.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    type Input: Send + 'static;

    async fn upload(&self, input: Self::Input) -> AppResult<Vec<UploadResult>>;
}
