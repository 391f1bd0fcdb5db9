//! Client-facing widget parameters.
//!
//! [`WidgetContext`] is everything the presentation layer needs to render the
//! widget and wire up the bootstrap script. It never carries the site secret.
//!
//! The bootstrap script contract: once the provider script has loaded it
//! renders the widget into [`WidgetContext::element`] and disables every
//! control matching [`WidgetContext::submit_selectors`]. When the challenge is
//! solved the provider writes the token into the form field named
//! [`WidgetContext::token_field`] and the script re-enables the controls.

use crate::config::{RenderMode, Size, Theme};
use serde::{Deserialize, Serialize};

/// Id of the element the widget is rendered into.
pub const WIDGET_ELEMENT_ID: &str = "google-recaptcha-container";

/// Form field the provider writes the solved token into.
pub const TOKEN_FIELD: &str = "g-recaptcha-response";

/// Provider script, loaded with an explicit-render callback.
pub const PROVIDER_SCRIPT_URL: &str =
    "https://www.google.com/recaptcha/api.js?onload=recaptchaCallback&render=explicit";

/// Forms the widget is injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Login,
    WooCommerceLogin,
    LostPassword,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [
        FormKind::Login,
        FormKind::WooCommerceLogin,
        FormKind::LostPassword,
    ];

    /// Selector of the form's submit control.
    pub fn submit_selector(&self) -> &'static str {
        match self {
            FormKind::Login => "#wp-submit",
            FormKind::WooCommerceLogin => ".woocommerce-form-login__submit",
            FormKind::LostPassword => ".woocommerce-ResetPassword .woocommerce-Button",
        }
    }
}

/// Parameters for rendering the verification widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetContext {
    #[serde(rename = "sitekey")]
    pub site_key: String,
    pub theme: Theme,
    pub size: Size,
    #[serde(rename = "render")]
    pub render_mode: RenderMode,
    pub element: String,
    pub script_url: String,
    pub token_field: String,
    pub submit_selectors: Vec<String>,
}
