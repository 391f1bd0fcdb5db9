//! Resolved configuration.

use super::{Enabled, RenderMode, Size, Theme};
use std::fmt;

/// Settings actually in force for one site after merging both scopes.
///
/// `enabled` is always [`Enabled::Yes`] or [`Enabled::No`] once resolved.
#[derive(Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub site_key: String,
    pub site_secret: String,
    pub theme: Theme,
    pub size: Size,
    pub render_mode: RenderMode,
    pub enabled: Enabled,
}

impl EffectiveConfig {
    /// Whether login attempts must carry a verified token.
    pub fn is_enabled(&self) -> bool {
        self.enabled == Enabled::Yes
    }
}

impl fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveConfig")
            .field("site_key", &self.site_key)
            .field("site_secret", &"<redacted>")
            .field("theme", &self.theme)
            .field("size", &self.size)
            .field("render_mode", &self.render_mode)
            .field("enabled", &self.enabled)
            .finish()
    }
}
