#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod gate;
pub mod hooks;
pub mod resolver;
pub mod settings_page;
pub mod store;
pub mod verifier;
pub mod widget;

pub use gate::{AuthError, FormErrors, GateDecision, LoginAttempt, Principal, VerificationGate};
pub use hooks::{HookRegistry, LoginFilter, LoginGuard, LostPasswordFilter, install};
pub use resolver::{ConfigResolver, resolve};
pub use settings_page::{FieldKind, FieldSpec, SettingsError, SettingsPage};
pub use store::{MemoryStore, OptionStore, SETTINGS_OPTION, StoreError, StoreSnapshot, StoreWatcher};
pub use verifier::{SiteVerifyClient, VerificationClient, VerifyError};
pub use widget::WidgetContextBuilder;
