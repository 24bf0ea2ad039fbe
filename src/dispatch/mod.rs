pub mod paths;

use crate::errors::{MoodflixError, MoodflixResult};
use crate::session::SessionStore;
use crate::utils::http::{MAX_RESPONSE_BYTES, default_http_client, limited_body};
use crate::utils::truncate_chars;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

const MAX_ERROR_MESSAGE_CHARS: usize = 200;

/// Method, body and extra headers for one logical request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            headers: Vec::new(),
        }
    }

    /// Add a header applied after the defaults, replacing any default of the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Issues JSON requests against the first candidate path that answers 2xx.
pub struct Dispatcher {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl Dispatcher {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self::with_client(default_http_client(), base_url, session)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        session: Arc<SessionStore>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Try `paths` in order and return the parsed body of the first 2xx answer.
    ///
    /// Non-2xx statuses and transport failures are recorded and the next path
    /// is tried. When every path fails, the last recorded error is returned,
    /// or [`MoodflixError::Exhausted`] if there was nothing to try.
    pub async fn try_paths(
        &self,
        paths: &[&str],
        options: &RequestOptions,
    ) -> MoodflixResult<Value> {
        let headers = self.build_headers(options)?;
        let body = options
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| MoodflixError::Input(format!("request body is not valid JSON: {}", e)))?;

        let mut last_error = None;
        for path in paths {
            debug!("{} {}{}", options.method, self.base_url, path);
            match self
                .send_once(path, &options.method, &headers, body.as_deref())
                .await
            {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("{} {} failed: {}", options.method, path, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(MoodflixError::Exhausted))
    }

    /// Default JSON headers, the session bearer token, then caller headers.
    fn build_headers(&self, options: &RequestOptions) -> MoodflixResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.current_token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => {
                    warn!("stored session token is not a valid header value, sending without it");
                }
            }
        }

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| MoodflixError::Input(format!("invalid header name '{}'", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| MoodflixError::Input(format!("invalid value for header '{}'", name)))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    async fn send_once(
        &self,
        path: &str,
        method: &Method,
        headers: &HeaderMap,
        body: Option<&[u8]>,
    ) -> MoodflixResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(headers.clone());
        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        let resp = request.send().await.map_err(|e| MoodflixError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let status = resp.status();
        let declares_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));

        if !status.is_success() {
            let bytes = limited_body(resp, MAX_RESPONSE_BYTES)
                .await
                .unwrap_or_default();
            return Err(MoodflixError::Http {
                status: status.as_u16(),
                path: path.to_string(),
                message: error_message(status, &bytes),
            });
        }

        if !declares_json {
            return Ok(json!({}));
        }

        let bytes = limited_body(resp, MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| MoodflixError::Transport {
                path: path.to_string(),
                message: format!("{:#}", e),
            })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(json!({}));
        }

        serde_json::from_slice(&bytes).map_err(|e| MoodflixError::Transport {
            path: path.to_string(),
            message: format!("invalid JSON body: {}", e),
        })
    }
}

/// Pull a readable message out of an error body: FastAPI's `detail`, a
/// `message` field, or the raw text.
fn error_message(status: StatusCode, bytes: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<Value>(bytes) {
        let field = json.get("detail").or_else(|| json.get("message"));
        match field {
            Some(Value::String(s)) if !s.is_empty() => {
                return truncate_chars(s, MAX_ERROR_MESSAGE_CHARS);
            }
            Some(other) if !other.is_null() => {
                return truncate_chars(&other.to_string(), MAX_ERROR_MESSAGE_CHARS);
            }
            _ => {}
        }
    }

    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        truncate_chars(text, MAX_ERROR_MESSAGE_CHARS)
    }
}
