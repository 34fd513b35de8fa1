use crate::config::UploaderConfig;
use crate::errors::{AppError, AppResult};
use reqwest::header::AUTHORIZATION;
use reqwest::{multipart, Client};
use std::path::Path;

use super::response::MessageResponse;

const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/fynn9563/discord-media-uploader, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Discord REST client bound to one channel and bot token
pub struct DiscordClient {
    client: Client,
    config: UploaderConfig,
}

impl DiscordClient {
    pub fn new(config: UploaderConfig) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// POST the payload as a new channel message. One attempt, no retries.
    pub async fn send_message(&self, payload: UploadPayload) -> AppResult<MessageResponse> {
        let url = self.config.messages_url();
        log::info!(
            "Uploading {} part(s) to channel {}",
            payload.len(),
            self.config.channel_id()
        );

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.config.authorization_header())
            .multipart(payload.into_form())
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let data = response.json::<MessageResponse>().await?;
            log::debug!("Discord returned {} attachment(s)", data.attachments.len());
            return Ok(data);
        }

        let fallback = match response.error_for_status_ref() {
            Err(e) => e.without_url().to_string(),
            Ok(_) => format!("Unexpected response status {}", status),
        };
        let body = body_or_empty(response.text().await);
        let error = classify_failure(Some(status.as_u16()), extract_error_message(&body), &fallback);

        log::warn!("Discord API answered {} for {}: {}", status, url, error);

        Err(error)
    }
}

/// Named multipart parts for one request
#[derive(Debug, Default)]
pub struct UploadPayload {
    parts: Vec<(String, multipart::Part)>,
}

impl UploadPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file as a streamed part. Fails if the file cannot be opened.
    pub async fn add_file(&mut self, file_path: &Path, field_name: &str) -> AppResult<()> {
        let file = tokio::fs::File::open(file_path).await?;
        let length = file.metadata().await?.len();
        let filename = file_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let part = multipart::Part::stream_with_length(file, length)
            .file_name(filename)
            .mime_str(mime_type_for_path(file_path))?;

        self.parts.push((field_name.to_string(), part));
        Ok(())
    }

    pub fn add_bytes(
        &mut self,
        data: Vec<u8>,
        filename: String,
        mime_type: &str,
        field_name: &str,
    ) -> AppResult<()> {
        let part = multipart::Part::bytes(data)
            .file_name(filename)
            .mime_str(mime_type)?;

        self.parts.push((field_name.to_string(), part));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn into_form(self) -> multipart::Form {
        self.parts
            .into_iter()
            .fold(multipart::Form::new(), |form, (field_name, part)| {
                form.part(field_name, part)
            })
    }
}

fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn body_or_empty<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| {
        log::debug!("Failed to read error body (detail discarded): {}", e);
        String::new()
    })
}

/// Pull the `message` field out of a Discord error body.
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Map a failed request to an error. Only statuses in [400, 500) are
/// actionable; everything else, 5xx included, is a transport problem.
pub fn classify_failure(status: Option<u16>, message: Option<String>, fallback: &str) -> AppError {
    match status {
        Some(code) if (400..500).contains(&code) => {
            AppError::client(message.as_deref().unwrap_or(fallback))
        }
        _ => AppError::Transport,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_classify_failure_without_response() {
        let error = classify_failure(None, None, "connection refused");
        assert!(error.is_transport());
        assert_eq!(error.to_string(), "Something's wrong with the request!");
    }

    #[test]
    fn test_classify_failure_client_message() {
        let error = classify_failure(Some(404), Some("Unknown Channel".to_string()), "fallback");
        assert_eq!(error.to_string(), "Unknown Channel");
        assert!(error.is_client_error());
    }

    #[test]
    fn test_classify_failure_client_without_message() {
        let error = classify_failure(Some(403), None, "HTTP status client error (403 Forbidden)");
        assert_eq!(error.to_string(), "HTTP status client error (403 Forbidden)");
    }

    #[test]
    fn test_classify_failure_range_edges() {
        assert!(classify_failure(Some(399), None, "x").is_transport());
        assert!(classify_failure(Some(400), None, "x").is_client_error());
        assert!(classify_failure(Some(499), None, "x").is_client_error());
        assert!(classify_failure(Some(500), Some("Internal".to_string()), "x").is_transport());
        assert!(classify_failure(Some(503), None, "x").is_transport());
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"message": "Missing Access", "code": 50001}"#),
            Some("Missing Access".to_string())
        );
        assert_eq!(extract_error_message(r#"{"code": 50001}"#), None);
        assert_eq!(extract_error_message("<html>bad gateway</html>"), None);
    }

    #[test]
    fn test_body_or_empty_falls_back_on_read_error() {
        let failed: Result<String, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ));
        assert_eq!(body_or_empty(failed), "");

        let read: Result<String, std::io::Error> = Ok(r#"{"message": "x"}"#.to_string());
        assert_eq!(body_or_empty(read), r#"{"message": "x"}"#);
    }

    #[test]
    fn test_mime_type_for_path() {
        assert_eq!(mime_type_for_path(&PathBuf::from("photo.JPG")), "image/jpeg");
        assert_eq!(mime_type_for_path(&PathBuf::from("notes.txt")), "text/plain");
        assert_eq!(
            mime_type_for_path(&PathBuf::from("index.ts")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_add_file_missing_path() {
        let mut payload = UploadPayload::new();
        let result = payload
            .add_file(Path::new("definitely_does_not_exist.png"), "file")
            .await;

        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(payload.is_empty());
    }

    #[test]
    fn test_add_bytes_counts_parts() {
        let mut payload = UploadPayload::new();
        payload
            .add_bytes(vec![1, 2, 3], "file.png".to_string(), "image/png", "media-image")
            .unwrap();
        payload
            .add_bytes(vec![4], "file.thumbnail.jpg".to_string(), "image/jpeg", "media-thumbnail")
            .unwrap();

        assert_eq!(payload.len(), 2);
    }
}
