//! HTTP wrapper with a fixed credential policy.
//!
//! Every request goes through [`ServerClient::fetch`]. Caller options are
//! merged field by field over [`RequestOptions::defaults`] (credentials
//! included); a field the caller sets always wins.
//!
//! Responses are returned as-is, including non-success statuses. Only a
//! transport failure (no response at all) is an error here.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::endpoint::resolve_endpoint;
use crate::errors::ClientError;

/// Whether the session cookie jar takes part in a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Credentials {
    /// Send and store cookies.
    #[default]
    Include,
    /// Send no cookies and ignore any set by the response.
    Omit,
}

/// Request payload.
#[derive(Debug)]
pub enum RequestBody {
    /// JSON-encoded value.
    Json(serde_json::Value),
    /// `multipart/form-data` payload.
    Multipart(Form),
}

/// Per-request options. Unset fields fall back to the defaults.
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// HTTP method, `GET` when unset.
    pub method: Option<Method>,
    /// Extra headers.
    pub headers: Option<HeaderMap>,
    /// Request payload.
    pub body: Option<RequestBody>,
    /// Cookie policy.
    pub credentials: Option<Credentials>,
}

impl RequestOptions {
    /// Defaults applied to every request.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            credentials: Some(Credentials::Include),
            ..Self::default()
        }
    }

    /// Options with only the method set.
    #[must_use]
    pub fn method(method: Method) -> Self {
        Self {
            method: Some(method),
            ..Self::default()
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    /// Attach a multipart body.
    #[must_use]
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        let _ = self.headers.get_or_insert_with(HeaderMap::new).insert(name, value);
        self
    }

    /// Set the cookie policy.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Shallow merge: each field set on `self` replaces the one in `defaults`.
    #[must_use]
    pub fn merged_over(self, defaults: Self) -> Self {
        Self {
            method: self.method.or(defaults.method),
            headers: self.headers.or(defaults.headers),
            body: self.body.or(defaults.body),
            credentials: self.credentials.or(defaults.credentials),
        }
    }
}

/// A fully read response.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// Status code.
    pub status: reqwest::StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Whether the status is `2xx`.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// `Content-Type` header value, if present and readable.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-success status into [`ClientError::Status`].
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(ClientError::Status {
                status: self.status.as_u16(),
                body: self.text(),
            })
        }
    }
}

/// Client bound to one server origin.
#[derive(Clone, Debug)]
pub struct ServerClient {
    base_url: String,
    with_cookies: reqwest::Client,
    anonymous: reqwest::Client,
}

impl ServerClient {
    /// Create a client for `base_url` with an empty cookie jar.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let user_agent = concat!("taskly/", env!("CARGO_PKG_VERSION"));
        Ok(Self {
            base_url: base_url.into(),
            with_cookies: reqwest::Client::builder()
                .cookie_store(true)
                .user_agent(user_agent)
                .build()?,
            anonymous: reqwest::Client::builder().user_agent(user_agent).build()?,
        })
    }

    /// The configured server origin.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a server path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        resolve_endpoint(&self.base_url, path)
    }

    /// Send a request to a path on the configured server.
    pub async fn fetch_server(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, ClientError> {
        self.fetch(&self.endpoint(path), options).await
    }

    /// Send a request to an absolute URL.
    pub async fn fetch(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, ClientError> {
        let options = options.merged_over(RequestOptions::defaults());
        let method = options.method.unwrap_or(Method::GET);
        let client = match options.credentials.unwrap_or_default() {
            Credentials::Include => &self.with_cookies,
            Credentials::Omit => &self.anonymous,
        };

        let mut request = client.request(method.clone(), url);
        if let Some(headers) = options.headers {
            request = request.headers(headers);
        }
        request = match options.body {
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Multipart(form)) => request.multipart(form),
            None => request,
        };

        debug!(%method, url, "sending request");
        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        debug!(%method, url, status = status.as_u16(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
