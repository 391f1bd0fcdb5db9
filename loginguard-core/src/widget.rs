//! Client-facing widget parameters.

use loginguard_sdk::config::EffectiveConfig;
use loginguard_sdk::objects::FormKind;
use loginguard_sdk::objects::WidgetContext;
use loginguard_sdk::objects::widget::{PROVIDER_SCRIPT_URL, TOKEN_FIELD, WIDGET_ELEMENT_ID};

/// Builds the [`WidgetContext`] handed to the presentation layer.
///
/// Callers check [`EffectiveConfig::is_enabled`] first; the builder does not.
/// The site secret is never copied into the context.
#[derive(Debug, Clone)]
pub struct WidgetContextBuilder {
    script_url: String,
}

impl WidgetContextBuilder {
    pub fn new() -> Self {
        Self {
            script_url: PROVIDER_SCRIPT_URL.to_owned(),
        }
    }

    /// Load the provider script from somewhere else (e.g. `recaptcha.net`).
    pub fn with_script_url(mut self, script_url: impl Into<String>) -> Self {
        self.script_url = script_url.into();
        self
    }

    pub fn build(&self, cfg: &EffectiveConfig) -> WidgetContext {
        WidgetContext {
            site_key: cfg.site_key.clone(),
            theme: cfg.theme,
            size: cfg.size,
            render_mode: cfg.render_mode,
            element: WIDGET_ELEMENT_ID.to_owned(),
            script_url: self.script_url.clone(),
            token_field: TOKEN_FIELD.to_owned(),
            submit_selectors: FormKind::ALL
                .iter()
                .map(|form| form.submit_selector().to_owned())
                .collect(),
        }
    }
}

impl Default for WidgetContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
