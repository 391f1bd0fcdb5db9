//! The verification gate.
//!
//! Given a credential submission and the effective configuration, the gate
//! either stays out of the way ([`GateDecision::PassThrough`]) or produces a
//! [`VerificationOutcome`]. Anything short of a confirmed token fails closed.

use crate::verifier::VerificationClient;
use loginguard_sdk::config::EffectiveConfig;
use loginguard_sdk::objects::{FailureReason, FormError, VerificationOutcome};
use std::fmt;
use tracing::{debug, warn};

/// Credentials submitted to a login form.
#[derive(Clone, Default)]
pub struct LoginAttempt {
    pub username: String,
    pub password: String,
    pub submitted_token: Option<String>,
}

impl fmt::Debug for LoginAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginAttempt")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field(
                "submitted_token",
                &self.submitted_token.as_ref().map(|_| "<present>"),
            )
            .finish()
    }
}

/// Why authentication was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub code: String,
    pub message: String,
}

impl AuthError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The rejection for a failed outcome; `None` when it passed.
    pub fn from_outcome(outcome: &VerificationOutcome) -> Option<Self> {
        match outcome {
            VerificationOutcome::Passed => None,
            VerificationOutcome::Failed { reason, .. } => Some(Self::new(
                reason.code(),
                outcome.message().unwrap_or_default(),
            )),
        }
    }
}

/// State of the authentication pipeline as it reaches a filter stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// No stage has decided anything yet.
    Anonymous,
    /// An earlier stage authenticated this user.
    User(String),
    /// An earlier stage refused the attempt.
    Rejected(AuthError),
}

/// Errors attached to a form that does not reject a login, such as the
/// lost-password form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FormError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FormError {
            code: code.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<FormError> {
        self.errors
    }
}

/// What the gate decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The gate has no opinion; the pipeline continues unchanged.
    PassThrough,
    Outcome(VerificationOutcome),
}

/// Gates credential submissions on a provider-confirmed token.
///
/// Holds no per-request state. One call per attempt; provider tokens are
/// single-use, so calling twice with the same token will not pass twice.
pub struct VerificationGate<C> {
    client: C,
}

impl<C: VerificationClient> VerificationGate<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Attempts the gate never looks at: empty submissions (a plain page
    /// load) and attempts an earlier stage already refused.
    pub fn is_exempt(attempt: &LoginAttempt, prior: &Principal) -> bool {
        (attempt.username.is_empty() && attempt.password.is_empty())
            || matches!(prior, Principal::Rejected(_))
    }

    /// Gate a login attempt.
    pub async fn gate(
        &self,
        attempt: &LoginAttempt,
        prior: &Principal,
        cfg: &EffectiveConfig,
    ) -> GateDecision {
        if Self::is_exempt(attempt, prior) {
            debug!(username = %attempt.username, "Login attempt exempt from verification");
            return GateDecision::PassThrough;
        }
        let decision = self.check(cfg, attempt.submitted_token.as_deref()).await;
        if let GateDecision::Outcome(VerificationOutcome::Failed { reason, detail }) = &decision {
            warn!(
                username = %attempt.username,
                reason = reason.code(),
                detail = %detail,
                "Login attempt failed verification"
            );
        }
        decision
    }

    /// Gate a lost-password submission.
    ///
    /// Failures are appended to `errors` rather than turned into a login
    /// rejection.
    pub async fn gate_lost_password(
        &self,
        cfg: &EffectiveConfig,
        token: Option<&str>,
        errors: &mut FormErrors,
    ) -> GateDecision {
        let decision = self.check(cfg, token).await;
        if let GateDecision::Outcome(VerificationOutcome::Failed { reason, detail }) = &decision {
            warn!(
                reason = reason.code(),
                detail = %detail,
                "Lost-password request failed verification"
            );
        }
        if let GateDecision::Outcome(outcome) = &decision
            && let Some(error) = AuthError::from_outcome(outcome)
        {
            errors.add(error.code, error.message);
        }
        decision
    }

    /// Enablement, token presence, then the provider.
    async fn check(&self, cfg: &EffectiveConfig, token: Option<&str>) -> GateDecision {
        if !cfg.is_enabled() {
            debug!("Verification disabled for this site");
            return GateDecision::PassThrough;
        }

        let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
            return GateDecision::Outcome(VerificationOutcome::failed(
                FailureReason::EmptyToken,
                "no verification token submitted",
            ));
        };

        let outcome = match self.client.verify(&cfg.site_secret, token).await {
            Ok(result) if result.success => VerificationOutcome::Passed,
            Ok(result) => VerificationOutcome::failed(
                FailureReason::ProviderRejected,
                result.error_codes.join(", "),
            ),
            Err(e) => VerificationOutcome::failed(e.reason(), e.to_string()),
        };
        GateDecision::Outcome(outcome)
    }
}

impl GateDecision {
    /// Apply the decision to the pipeline state.
    pub fn apply(self, principal: Principal) -> Principal {
        match self {
            GateDecision::PassThrough => principal,
            GateDecision::Outcome(outcome) => match AuthError::from_outcome(&outcome) {
                Some(error) => Principal::Rejected(error),
                None => principal,
            },
        }
    }
}
