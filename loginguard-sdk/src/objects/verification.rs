use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Body returned by the provider's `siteverify` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub success: bool,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
    /// When the challenge was solved.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub challenge_ts: Option<OffsetDateTime>,
    /// Hostname of the page the challenge was solved on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Why a verification attempt did not pass.
pub enum FailureReason {
    /// No token was submitted with the form.
    EmptyToken,
    /// The provider answered and said no.
    ProviderRejected,
    /// The provider could not be reached or answered with a non-success status.
    ProviderUnreachable,
    /// The provider answered with something that is not a verification result.
    MalformedResponse,
}

impl FailureReason {
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::EmptyToken => "empty_token",
            FailureReason::ProviderRejected => "provider_rejected",
            FailureReason::ProviderUnreachable => "provider_unreachable",
            FailureReason::MalformedResponse => "malformed_response",
        }
    }
}

/// Result of one verification attempt. Built per request and dropped after
/// the accept/reject decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Passed,
    Failed {
        reason: FailureReason,
        detail: String,
    },
}

impl VerificationOutcome {
    pub fn failed(reason: FailureReason, detail: impl Into<String>) -> Self {
        Self::Failed {
            reason,
            detail: detail.into(),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Message shown to the person submitting the form.
    ///
    /// Provider rejections surface the provider's error codes; transport and
    /// parse failures get a generic message and keep the detail for logs.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Passed => None,
            Self::Failed {
                reason: FailureReason::EmptyToken,
                ..
            } => Some("Empty captcha.".to_string()),
            Self::Failed {
                reason: FailureReason::ProviderRejected,
                detail,
            } => Some(detail.clone()),
            Self::Failed { .. } => Some("Could not verify recaptcha.".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejection() {
        let json = r#"{"success": false, "error-codes": ["invalid-input-response"]}"#;
        let result: ProviderResult = serde_json::from_str(json).unwrap();
        assert!(!result.success);
        assert_eq!(result.error_codes, vec!["invalid-input-response"]);
        assert!(result.challenge_ts.is_none());
    }

    #[test]
    fn test_parse_success_with_metadata() {
        let json = r#"{
            "success": true,
            "challenge_ts": "2024-05-01T10:15:30Z",
            "hostname": "blog.example.com"
        }"#;
        let result: ProviderResult = serde_json::from_str(json).unwrap();
        assert!(result.success);
        assert!(result.error_codes.is_empty());
        assert_eq!(result.hostname.as_deref(), Some("blog.example.com"));
        assert_eq!(result.challenge_ts.unwrap().year(), 2024);
    }

    #[test]
    fn test_missing_success_is_an_error() {
        assert!(serde_json::from_str::<ProviderResult>(r#"{"hostname":"x"}"#).is_err());
    }

    #[test]
    fn test_messages() {
        let empty = VerificationOutcome::failed(FailureReason::EmptyToken, "no token");
        assert_eq!(empty.message().as_deref(), Some("Empty captcha."));

        let rejected = VerificationOutcome::failed(
            FailureReason::ProviderRejected,
            "invalid-input-response, timeout-or-duplicate",
        );
        assert_eq!(
            rejected.message().as_deref(),
            Some("invalid-input-response, timeout-or-duplicate")
        );

        let unreachable =
            VerificationOutcome::failed(FailureReason::ProviderUnreachable, "connection refused");
        assert_eq!(
            unreachable.message().as_deref(),
            Some("Could not verify recaptcha.")
        );
        assert_eq!(VerificationOutcome::Passed.message(), None);
    }
}
