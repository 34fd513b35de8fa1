use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Attachment as returned by the create-message endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub filename: String,
    pub size: u64,
    pub url: String,
    #[serde(default)]
    pub proxy_url: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub content_scan_version: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Normalized metadata for one uploaded attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub size: u64,
    pub content_type: String,
    pub url: String,
}

impl From<&Attachment> for UploadResult {
    fn from(attachment: &Attachment) -> Self {
        Self {
            size: attachment.size,
            content_type: attachment.content_type.clone(),
            url: canonicalize_url(&attachment.url),
        }
    }
}

fn signed_query_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\?\w+=).*").expect("static regex is valid"))
}

/// Strip the signed-URL query, from the first `?key=` to the end.
pub fn canonicalize_url(url: &str) -> String {
    signed_query_pattern().replace(url, "").into_owned()
}

pub fn format_attachments(response: &MessageResponse) -> Vec<UploadResult> {
    response.attachments.iter().map(UploadResult::from).collect()
}
