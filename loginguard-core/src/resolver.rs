//! Merging network and site settings into an [`EffectiveConfig`].

use crate::store::{OptionStore, SETTINGS_OPTION, StoreError};
use loginguard_sdk::config::{EffectiveConfig, Enabled, ScopedSettings, Scope, SiteId};
use std::sync::Arc;
use tracing::warn;

/// Merge the two scopes.
///
/// - Key and secret come from the site when it has them, else the network.
/// - Theme, size and render mode are network-wide in a multi-tenant
///   deployment; in a single-site deployment only the site's values count.
/// - `enabled`: site `yes`/`no` win, site `auto` defers to the network flag
///   (default `yes`).
/// - Verification is always off when the merged key or secret is empty.
pub fn resolve(
    network: &ScopedSettings,
    site: &ScopedSettings,
    multi_tenant: bool,
) -> EffectiveConfig {
    let site_key = prefer_site(site.site_key(), network.site_key());
    let site_secret = prefer_site(site.site_secret(), network.site_secret());

    let display = if multi_tenant { network } else { site };

    let requested = match site.enabled.unwrap_or(Enabled::Auto) {
        Enabled::Yes => true,
        Enabled::No => false,
        Enabled::Auto => network.enabled != Some(Enabled::No),
    };
    let enabled = if requested && !site_key.is_empty() && !site_secret.is_empty() {
        Enabled::Yes
    } else {
        Enabled::No
    };

    EffectiveConfig {
        site_key,
        site_secret,
        theme: display.theme.unwrap_or_default(),
        size: display.size.unwrap_or_default(),
        render_mode: display.render_mode.unwrap_or_default(),
        enabled,
    }
}

fn prefer_site(site: &str, network: &str) -> String {
    let site = site.trim();
    if site.is_empty() {
        network.trim().to_owned()
    } else {
        site.to_owned()
    }
}

/// Reads both scopes from an [`OptionStore`] and resolves them.
#[derive(Clone)]
pub struct ConfigResolver {
    store: Arc<dyn OptionStore>,
    multi_tenant: bool,
}

impl ConfigResolver {
    pub fn new(store: Arc<dyn OptionStore>, multi_tenant: bool) -> Self {
        Self {
            store,
            multi_tenant,
        }
    }

    pub fn multi_tenant(&self) -> bool {
        self.multi_tenant
    }

    /// Settings stored at one scope.
    ///
    /// Legacy field spellings are folded into the canonical ones. A stored
    /// value that is not a settings object is logged and read as empty
    /// settings.
    pub async fn scoped(&self, scope: Scope) -> Result<ScopedSettings, StoreError> {
        let Some(value) = self.store.get(scope, SETTINGS_OPTION).await? else {
            return Ok(ScopedSettings::default());
        };
        match ScopedSettings::from_stored(value) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(scope = %scope, error = %e, "Ignoring unreadable stored settings");
                Ok(ScopedSettings::default())
            }
        }
    }

    /// Effective configuration for one site.
    pub async fn effective(&self, site: SiteId) -> Result<EffectiveConfig, StoreError> {
        let network = self.scoped(Scope::Network).await?;
        let site = self.scoped(Scope::Site(site)).await?;
        Ok(resolve(&network, &site, self.multi_tenant))
    }
}
