//! Registry HTTP client.
//!
//! # Responsibilities
//! - Build request URLs from `UpstreamCall` path segments
//! - Send the browser-like headers the registry expects
//! - Decode answers into `UpstreamPayload`
//!
//! # Design Decisions
//! - 404 and empty bodies mean "nothing there", not failure
//! - Any other non-success status is an error for the handler to surface
//! - Deadlines are enforced by the session, not here

use futures_util::future::{BoxFuture, FutureExt};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::UpstreamConfig;
use crate::upstream::calls::UpstreamCall;
use crate::upstream::types::{UpstreamError, UpstreamPayload, UpstreamResult};

/// Capability to fetch one registry answer.
pub trait RegistryClient: Send + Sync {
    fn fetch<'a>(&'a self, call: &'a UpstreamCall) -> BoxFuture<'a, UpstreamResult<UpstreamPayload>>;
}

/// Error building the HTTP client from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("invalid upstream base URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("invalid header value for {0}")]
    Header(&'static str),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// `RegistryClient` backed by the registry's public JSON API.
#[derive(Debug, Clone)]
pub struct HttpRegistryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpRegistryClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientBuildError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientBuildError::BaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::BaseUrl {
                url: config.base_url.clone(),
                reason: "cannot be a base".to_string(),
            });
        }

        let origin =
            HeaderValue::from_str(&config.origin).map_err(|_| ClientBuildError::Header("origin"))?;
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, origin.clone());
        headers.insert(REFERER, origin);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Full URL for a call. Segments are percent-encoded individually, so a
    /// keyword containing `/` or spaces stays a single segment.
    pub fn url_for(&self, call: &UpstreamCall) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(call.path_segments());
        }
        url
    }

    async fn fetch_inner(&self, call: &UpstreamCall) -> UpstreamResult<UpstreamPayload> {
        let name = call.name();
        let url = self.url_for(call);
        tracing::debug!(call = name, url = %url, "Calling registry");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { call: name, source })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(UpstreamPayload::Null);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status {
                call: name,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport { call: name, source })?;
        decode_body(call, &body)
    }
}

impl RegistryClient for HttpRegistryClient {
    fn fetch<'a>(&'a self, call: &'a UpstreamCall) -> BoxFuture<'a, UpstreamResult<UpstreamPayload>> {
        self.fetch_inner(call).boxed()
    }
}

fn decode_body(call: &UpstreamCall, body: &[u8]) -> UpstreamResult<UpstreamPayload> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UpstreamPayload::Null);
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => Ok(UpstreamPayload::from(value)),
        Err(_) if call.accepts_plain_text() => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            Ok(UpstreamPayload::from(Value::String(text)))
        }
        Err(source) => Err(UpstreamError::Decode {
            call: call.name(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> HttpRegistryClient {
        let config = UpstreamConfig {
            base_url: base.to_string(),
            ..UpstreamConfig::default()
        };
        HttpRegistryClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_encodes_keyword_as_one_segment() {
        let c = client("https://registry.example/api");
        let url = c.url_for(&UpstreamCall::SearchUniversities("gadjah mada/ugm".into()));
        assert_eq!(
            url.as_str(),
            "https://registry.example/api/pencarian/pt/gadjah%20mada%2Fugm"
        );
    }

    #[test]
    fn test_url_with_trailing_slash_base() {
        let c = client("https://registry.example/");
        let url = c.url_for(&UpstreamCall::UniversityCount);
        assert_eq!(url.as_str(), "https://registry.example/pt/count");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let config = UpstreamConfig {
            base_url: "mailto:someone@example.org".into(),
            ..UpstreamConfig::default()
        };
        assert!(matches!(
            HttpRegistryClient::new(&config),
            Err(ClientBuildError::BaseUrl { .. })
        ));
    }

    #[test]
    fn test_decode_body() {
        let detail = UpstreamCall::UniversityDetail("x".into());
        assert_eq!(decode_body(&detail, b"  \n").unwrap(), UpstreamPayload::Null);
        assert_eq!(
            decode_body(&detail, br#"{"nama_pt":"UI"}"#).unwrap(),
            UpstreamPayload::from(json!({"nama_pt": "UI"}))
        );
        assert!(matches!(
            decode_body(&detail, b"<html>"),
            Err(UpstreamError::Decode { call: "university_detail", .. })
        ));

        let logo = UpstreamCall::UniversityLogo("x".into());
        assert_eq!(
            decode_body(&logo, b"iVBORw0KGgo=\n").unwrap(),
            UpstreamPayload::Scalar(json!("iVBORw0KGgo="))
        );
    }
}
