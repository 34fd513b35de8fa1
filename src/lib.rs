pub mod config;
pub mod errors;
pub mod image_processor;
pub mod uploader;

pub use config::UploaderConfig;
pub use errors::{AppError, AppResult};
pub use uploader::{FileUploader, ImageUploader, MediaUploader, UploadResult};
