//! Settings types for loginguard.
//!
//! [`ScopedSettings`] is what gets persisted at one scope (network or site).
//! [`EffectiveConfig`] is the merged result the gate and the widget builder
//! work from. The merge itself lives in `loginguard-core`.

mod admin;
mod effective;
mod scoped;

pub use admin::{ADMIN_AUTH_HEADER, AdminCredential};
pub use effective::EffectiveConfig;
pub use scoped::ScopedSettings;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of a site inside a network.
pub type SiteId = u64;

/// The two configuration layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Network-wide settings shared by every site.
    Network,
    /// Settings of a single site.
    Site(SiteId),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Network => f.write_str("network"),
            Scope::Site(id) => write!(f, "site:{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Widget color scheme.
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Widget footprint.
pub enum Size {
    #[default]
    Normal,
    Compact,
}

/// When the widget is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Rendered as soon as the provider script loads.
    // Older site pages stored "normal" for this option.
    #[default]
    #[serde(alias = "normal")]
    Onload,
    /// Rendered when the submit control is used.
    Explicit,
}

/// Enablement flag.
///
/// Sites default to [`Enabled::Auto`], which defers to the network flag.
/// The network itself only uses `yes`/`no` and defaults to `yes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enabled {
    Yes,
    No,
    #[default]
    Auto,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl Size {
    pub const ALL: [Size; 2] = [Size::Normal, Size::Compact];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Normal => "normal",
            Size::Compact => "compact",
        }
    }
}

impl RenderMode {
    pub const ALL: [RenderMode; 2] = [RenderMode::Onload, RenderMode::Explicit];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Onload => "onload",
            RenderMode::Explicit => "explicit",
        }
    }
}

impl Enabled {
    pub const ALL: [Enabled; 3] = [Enabled::Yes, Enabled::No, Enabled::Auto];

    pub fn as_str(&self) -> &'static str {
        match self {
            Enabled::Yes => "yes",
            Enabled::No => "no",
            Enabled::Auto => "auto",
        }
    }
}
