//! Application state shared across all request handlers.

use loginguard_core::{ConfigResolver, HookRegistry, OptionStore, WidgetContextBuilder};
use loginguard_sdk::config::AdminCredential;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Login and lost-password filter stages.
    pub registry: Arc<HookRegistry>,
    pub resolver: ConfigResolver,
    pub widget: WidgetContextBuilder,
    /// Backing store of both settings scopes.
    pub store: Arc<dyn OptionStore>,
    /// Admin credential (can be reloaded via SIGHUP).
    pub admin: Arc<RwLock<AdminCredential>>,
}

impl AppState {
    pub fn new(
        registry: HookRegistry,
        resolver: ConfigResolver,
        store: Arc<dyn OptionStore>,
        admin: AdminCredential,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            resolver,
            widget: WidgetContextBuilder::new(),
            store,
            admin: Arc::new(RwLock::new(admin)),
        }
    }

    pub fn multi_tenant(&self) -> bool {
        self.resolver.multi_tenant()
    }

    /// Replace the admin credential (used during SIGHUP reload).
    pub async fn update_admin(&self, admin: AdminCredential) {
        *self.admin.write().await = admin;
    }
}
