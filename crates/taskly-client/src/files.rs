//! Download a URL into an uploadable file.
//!
//! Used to re-submit a task's existing photo when the task is edited: the
//! server only hands back a path, but an update must carry the file itself.

use reqwest::Url;
use taskly_core::FileUpload;
use tracing::error;

use crate::errors::ClientError;
use crate::http::{RequestOptions, ServerClient};

/// File name used when neither the URL nor the caller supplies one.
pub const DEFAULT_FILE_NAME: &str = "image.jpg";

/// Fetch `url` and wrap the body as a [`FileUpload`].
///
/// The file name is the URL's last path segment when it contains a `.`,
/// else `fallback_name`, else [`DEFAULT_FILE_NAME`]. The content type is the
/// response's `Content-Type` (empty when absent). Server-relative URLs
/// (leading `/`) are resolved against the client's base URL.
///
/// Never fails: any error is logged and yields `None`.
pub async fn url_to_file(
    client: &ServerClient,
    url: &str,
    fallback_name: Option<&str>,
) -> Option<FileUpload> {
    let absolute = if url.starts_with('/') {
        client.endpoint(url)
    } else {
        url.to_owned()
    };

    match download(client, &absolute).await {
        Ok((content_type, bytes)) => {
            let file_name = file_name_for(&absolute, fallback_name);
            Some(FileUpload::new(file_name, content_type, bytes))
        }
        Err(e) => {
            error!(url = %absolute, error = %e, "error converting URL to file");
            None
        }
    }
}

async fn download(
    client: &ServerClient,
    url: &str,
) -> Result<(String, bytes::Bytes), ClientError> {
    let response = client
        .fetch(url, RequestOptions::default())
        .await?
        .error_for_status()?;
    let content_type = response.content_type().unwrap_or_default().to_owned();
    Ok((content_type, response.body))
}

/// Pick the file name for a downloaded URL.
#[must_use]
pub fn file_name_for(url: &str, fallback_name: Option<&str>) -> String {
    last_segment(url)
        .filter(|segment| segment.contains('.'))
        .unwrap_or_else(|| fallback_name.unwrap_or(DEFAULT_FILE_NAME).to_owned())
}

fn last_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    (!segment.is_empty()).then(|| segment.to_owned())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
