//! Server-to-server token verification.
//!
//! [`SiteVerifyClient`] posts the site secret and the submitted token to the
//! provider's `siteverify` endpoint and parses the answer. It makes exactly
//! one request per call; nothing here retries.

use async_trait::async_trait;
use loginguard_sdk::objects::{FailureReason, ProviderResult};
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Fixed provider endpoint.
pub const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Why the provider gave no usable answer.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// DNS, TLS, connection or timeout failure.
    #[error("provider unreachable: {0}")]
    Unreachable(String),

    /// The provider answered with a non-2xx status.
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body is not a verification result.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl VerifyError {
    pub fn reason(&self) -> FailureReason {
        match self {
            VerifyError::Unreachable(_) | VerifyError::Status { .. } => {
                FailureReason::ProviderUnreachable
            }
            VerifyError::Malformed(_) => FailureReason::MalformedResponse,
        }
    }
}

/// Confirms a submitted token with the provider.
#[async_trait]
pub trait VerificationClient: Send + Sync {
    async fn verify(&self, secret: &str, token: &str) -> Result<ProviderResult, VerifyError>;
}

#[async_trait]
impl<T: VerificationClient + ?Sized> VerificationClient for Arc<T> {
    async fn verify(&self, secret: &str, token: &str) -> Result<ProviderResult, VerifyError> {
        (**self).verify(secret, token).await
    }
}

/// HTTP client for the provider's `siteverify` API.
#[derive(Debug, Clone)]
pub struct SiteVerifyClient {
    http: Client,
    endpoint: String,
}

impl SiteVerifyClient {
    /// Client for the fixed provider endpoint. No request timeout is set;
    /// use [`with_http_client`](Self::with_http_client) to configure one.
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            endpoint: SITEVERIFY_URL.to_owned(),
        }
    }

    /// Replace the default `reqwest::Client` (timeouts, proxy, ...).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Point at a different verification endpoint.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for SiteVerifyClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationClient for SiteVerifyClient {
    async fn verify(&self, secret: &str, token: &str) -> Result<ProviderResult, VerifyError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await
            .map_err(|e| VerifyError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VerifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| VerifyError::Unreachable(e.to_string()))?;
        let result = parse_response(&bytes)?;

        let challenge_age_secs = result
            .challenge_ts
            .map(|solved_at| (time::OffsetDateTime::now_utc() - solved_at).whole_seconds());
        debug!(
            success = result.success,
            hostname = result.hostname.as_deref().unwrap_or(""),
            challenge_age_secs,
            "Provider answered"
        );
        Ok(result)
    }
}

/// Parse a `siteverify` body.
pub fn parse_response(body: &[u8]) -> Result<ProviderResult, VerifyError> {
    serde_json::from_slice(body).map_err(|e| VerifyError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Form, Router,
        extract::State,
        http::{StatusCode, header},
        routing::post,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::net::TcpListener;

    type Submissions = Arc<Mutex<Vec<HashMap<String, String>>>>;

    /// A local `siteverify` stand-in answering every request with one
    /// canned status and body.
    #[derive(Clone)]
    struct FakeProvider {
        status: StatusCode,
        body: &'static str,
        seen: Submissions,
    }

    async fn siteverify(
        State(provider): State<FakeProvider>,
        Form(form): Form<HashMap<String, String>>,
    ) -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
        provider.seen.lock().unwrap().push(form);
        (
            provider.status,
            [(header::CONTENT_TYPE, "application/json")],
            provider.body,
        )
    }

    async fn fake_provider(status: StatusCode, body: &'static str) -> (SiteVerifyClient, Submissions) {
        let seen = Submissions::default();
        let app = Router::new()
            .route("/siteverify", post(siteverify))
            .with_state(FakeProvider {
                status,
                body,
                seen: seen.clone(),
            });
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let endpoint = Url::parse(&format!("http://{addr}/siteverify")).unwrap();
        (SiteVerifyClient::new().with_endpoint(endpoint), seen)
    }

    #[tokio::test]
    async fn test_verify_posts_secret_and_token() {
        let (client, seen) = fake_provider(
            StatusCode::OK,
            r#"{"success": true, "challenge_ts": "2024-05-01T10:00:00Z", "hostname": "example.com"}"#,
        )
        .await;

        let result = client.verify("NS", "tok-123").await.unwrap();
        assert!(result.success);
        assert_eq!(result.hostname.as_deref(), Some("example.com"));
        assert!(result.challenge_ts.is_some());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["secret"], "NS");
        assert_eq!(seen[0]["response"], "tok-123");
    }

    #[tokio::test]
    async fn test_verify_rejection_keeps_error_codes() {
        let (client, _) = fake_provider(
            StatusCode::OK,
            r#"{"success": false, "error-codes": ["invalid-input-response", "timeout-or-duplicate"]}"#,
        )
        .await;

        let result = client.verify("NS", "stale").await.unwrap();
        assert!(!result.success);
        assert_eq!(
            result.error_codes,
            vec!["invalid-input-response", "timeout-or-duplicate"]
        );
        assert_eq!(result.hostname, None);
    }

    #[tokio::test]
    async fn test_gate_over_http_rejects_with_codes() {
        use crate::gate::{GateDecision, LoginAttempt, Principal, VerificationGate};
        use loginguard_sdk::config::{EffectiveConfig, Enabled, RenderMode, Size, Theme};
        use loginguard_sdk::objects::VerificationOutcome;

        let (client, seen) = fake_provider(
            StatusCode::OK,
            r#"{"success": false, "error-codes": ["invalid-input-response"]}"#,
        )
        .await;
        let cfg = EffectiveConfig {
            site_key: "NK".to_string(),
            site_secret: "NS".to_string(),
            theme: Theme::Light,
            size: Size::Normal,
            render_mode: RenderMode::Onload,
            enabled: Enabled::Yes,
        };
        let attempt = LoginAttempt {
            username: "bob".to_string(),
            password: "x".to_string(),
            submitted_token: Some("bad".to_string()),
        };

        let decision = VerificationGate::new(client)
            .gate(&attempt, &Principal::Anonymous, &cfg)
            .await;
        assert_eq!(
            decision,
            GateDecision::Outcome(VerificationOutcome::failed(
                FailureReason::ProviderRejected,
                "invalid-input-response",
            ))
        );
        assert_eq!(seen.lock().unwrap()[0]["secret"], "NS");
    }

    #[tokio::test]
    async fn test_verify_error_status_is_unreachable() {
        // The body would parse, but a 503 is never trusted.
        let (client, seen) =
            fake_provider(StatusCode::SERVICE_UNAVAILABLE, r#"{"success": true}"#).await;

        let err = client.verify("NS", "tok").await.unwrap_err();
        assert!(matches!(err, VerifyError::Status { status: 503, .. }));
        assert_eq!(err.reason(), FailureReason::ProviderUnreachable);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_verify_garbage_body_is_malformed() {
        let (client, _) = fake_provider(StatusCode::OK, "<html>oops</html>").await;

        let err = client.verify("NS", "tok").await.unwrap_err();
        assert_eq!(err.reason(), FailureReason::MalformedResponse);
    }

    #[tokio::test]
    async fn test_verify_connection_refused_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = Url::parse(&format!("http://{addr}/siteverify")).unwrap();
        let client = SiteVerifyClient::new().with_endpoint(endpoint);
        let err = client.verify("NS", "tok").await.unwrap_err();
        assert!(matches!(err, VerifyError::Unreachable(_)));
        assert_eq!(err.reason(), FailureReason::ProviderUnreachable);
    }

    #[test]
    fn test_parse_valid_bodies() {
        let ok = parse_response(br#"{"success": true, "hostname": "example.com"}"#).unwrap();
        assert!(ok.success);

        let rejected =
            parse_response(br#"{"success": false, "error-codes": ["timeout-or-duplicate"]}"#)
                .unwrap();
        assert!(!rejected.success);
        assert_eq!(rejected.error_codes, vec!["timeout-or-duplicate"]);
    }

    #[test]
    fn test_parse_garbage() {
        let bodies: [&[u8]; 4] = [
            b"<html>502 Bad Gateway</html>",
            b"",
            b"[]",
            br#"{"success":"maybe"}"#,
        ];
        for body in bodies {
            let err = parse_response(body).unwrap_err();
            assert_eq!(err.reason(), FailureReason::MalformedResponse);
        }
    }

    #[test]
    fn test_transport_errors_map_to_unreachable() {
        let timeout = VerifyError::Unreachable("operation timed out".to_string());
        assert_eq!(timeout.reason(), FailureReason::ProviderUnreachable);

        let status = VerifyError::Status {
            status: 503,
            body: String::new(),
        };
        assert_eq!(status.reason(), FailureReason::ProviderUnreachable);
    }

    #[test]
    fn test_endpoint_override() {
        let client = SiteVerifyClient::new();
        assert_eq!(client.endpoint(), SITEVERIFY_URL);

        let local = Url::parse("http://127.0.0.1:9000/siteverify").unwrap();
        let client = client.with_endpoint(local);
        assert_eq!(client.endpoint(), "http://127.0.0.1:9000/siteverify");
    }
}
