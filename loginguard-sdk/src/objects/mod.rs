pub mod login;
pub mod settings;
pub mod verification;
pub mod widget;

pub use login::{FormError, LoginDecision, LoginForm, LostPasswordForm, LostPasswordResponse};
pub use settings::{FieldKindView, FieldView, SettingsPageView};
pub use verification::{FailureReason, ProviderResult, VerificationOutcome};
pub use widget::{FormKind, WidgetContext};
