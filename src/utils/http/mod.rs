use crate::config::ApiConfig;
use anyhow::{Result, bail};
use reqwest::{Client, Response};
use std::time::Duration;

/// Upper bound on a backend response body (4 MB). Watchlists and
/// recommendation lists are far below this.
pub const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Build the transport for the dispatcher from the configured timeouts.
///
/// Falls back to the default client if the builder fails.
pub fn http_client(api: &ApiConfig) -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
        .timeout(Duration::from_secs(api.request_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Build a `reqwest::Client` with standard timeouts (10 s connect, 30 s overall).
pub fn default_http_client() -> Client {
    http_client(&ApiConfig::default())
}

/// Read a response body with a size limit.
///
/// Rejects up front when `Content-Length` is over the limit, and fails as soon
/// as the streamed body crosses it.
pub async fn limited_body(resp: Response, max_bytes: usize) -> Result<Vec<u8>> {
    if let Some(cl) = resp.content_length()
        && !usize::try_from(cl).is_ok_and(|len| len <= max_bytes)
    {
        bail!(
            "response body too large: Content-Length {} exceeds limit {}",
            cl,
            max_bytes
        );
    }

    let mut buf = Vec::new();
    let mut stream = resp;
    while let Some(chunk) = stream.chunk().await? {
        if buf.len() + chunk.len() > max_bytes {
            bail!("response body exceeds limit of {} bytes", max_bytes);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}
