//! Filter stages for the host's authentication pipeline.
//!
//! The host owns a [`HookRegistry`] and calls [`install`] once during setup.
//! After that, every login submission goes through
//! [`HookRegistry::authenticate`] and every lost-password submission through
//! [`HookRegistry::lost_password`].

use crate::gate::{AuthError, FormErrors, LoginAttempt, Principal, VerificationGate};
use crate::resolver::ConfigResolver;
use crate::verifier::VerificationClient;
use async_trait::async_trait;
use loginguard_sdk::config::SiteId;
use loginguard_sdk::objects::FailureReason;
use std::sync::Arc;
use tracing::error;

/// Shown when the settings could not be read, so nothing could be verified.
const UNVERIFIABLE: &str = "Could not verify recaptcha.";

/// A stage of the login pipeline.
#[async_trait]
pub trait LoginFilter: Send + Sync {
    async fn authenticate(
        &self,
        site: SiteId,
        principal: Principal,
        attempt: &LoginAttempt,
    ) -> Principal;
}

/// A stage of the lost-password pipeline.
#[async_trait]
pub trait LostPasswordFilter: Send + Sync {
    async fn lost_password(&self, site: SiteId, token: Option<&str>, errors: &mut FormErrors);
}

/// Ordered filter stages.
#[derive(Clone, Default)]
pub struct HookRegistry {
    login: Vec<Arc<dyn LoginFilter>>,
    lost_password: Vec<Arc<dyn LostPasswordFilter>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_login_filter(&mut self, filter: Arc<dyn LoginFilter>) {
        self.login.push(filter);
    }

    pub fn add_lost_password_filter(&mut self, filter: Arc<dyn LostPasswordFilter>) {
        self.lost_password.push(filter);
    }

    /// Run every login filter in registration order.
    pub async fn authenticate(
        &self,
        site: SiteId,
        mut principal: Principal,
        attempt: &LoginAttempt,
    ) -> Principal {
        for filter in &self.login {
            principal = filter.authenticate(site, principal, attempt).await;
        }
        principal
    }

    /// Run every lost-password filter and return what they collected.
    pub async fn lost_password(&self, site: SiteId, token: Option<&str>) -> FormErrors {
        let mut errors = FormErrors::new();
        for filter in &self.lost_password {
            filter.lost_password(site, token, &mut errors).await;
        }
        errors
    }
}

/// Resolves the site's settings and runs the gate.
pub struct LoginGuard<C> {
    resolver: ConfigResolver,
    gate: VerificationGate<C>,
}

impl<C: VerificationClient> LoginGuard<C> {
    pub fn new(resolver: ConfigResolver, gate: VerificationGate<C>) -> Self {
        Self { resolver, gate }
    }
}

#[async_trait]
impl<C: VerificationClient> LoginFilter for LoginGuard<C> {
    async fn authenticate(
        &self,
        site: SiteId,
        principal: Principal,
        attempt: &LoginAttempt,
    ) -> Principal {
        if VerificationGate::<C>::is_exempt(attempt, &principal) {
            return principal;
        }
        let cfg = match self.resolver.effective(site).await {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(site, error = %e, "Failed to read settings, rejecting login");
                return Principal::Rejected(AuthError::new(
                    FailureReason::ProviderUnreachable.code(),
                    UNVERIFIABLE,
                ));
            }
        };
        self.gate
            .gate(attempt, &principal, &cfg)
            .await
            .apply(principal)
    }
}

#[async_trait]
impl<C: VerificationClient> LostPasswordFilter for LoginGuard<C> {
    async fn lost_password(&self, site: SiteId, token: Option<&str>, errors: &mut FormErrors) {
        match self.resolver.effective(site).await {
            Ok(cfg) => {
                self.gate.gate_lost_password(&cfg, token, errors).await;
            }
            Err(e) => {
                error!(site, error = %e, "Failed to read settings, rejecting lost-password request");
                errors.add(FailureReason::ProviderUnreachable.code(), UNVERIFIABLE);
            }
        }
    }
}

/// Register the guard on both pipelines. Call once during setup.
pub fn install<C: VerificationClient + 'static>(
    registry: &mut HookRegistry,
    guard: Arc<LoginGuard<C>>,
) {
    registry.add_login_filter(guard.clone());
    registry.add_lost_password_filter(guard);
}
