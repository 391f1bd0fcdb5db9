//! Raw settings persisted at one scope.

use super::{Enabled, RenderMode, Size, Theme};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field spellings written by earlier releases, paired with their
/// canonical names.
const LEGACY_FIELDS: [(&str, &str); 3] = [
    ("sitekey", "site_key"),
    ("sitesecret", "site_secret"),
    ("render", "render_mode"),
];

/// Settings as stored for one scope.
///
/// Every field is optional. A missing key or secret reads as the empty
/// string, a missing display option reads as its default. Field spellings
/// used by earlier releases (`sitekey`, `sitesecret`, `render`) are accepted
/// on read through [`ScopedSettings::from_stored`]; writes always use the
/// canonical names.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedSettings {
    #[serde(default, alias = "sitekey", skip_serializing_if = "Option::is_none")]
    pub site_key: Option<String>,
    #[serde(default, alias = "sitesecret", skip_serializing_if = "Option::is_none")]
    pub site_secret: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub theme: Option<Theme>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<Size>,
    #[serde(
        default,
        alias = "render",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub render_mode: Option<RenderMode>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled: Option<Enabled>,
}

impl ScopedSettings {
    /// The stored site key, or `""`.
    pub fn site_key(&self) -> &str {
        self.site_key.as_deref().unwrap_or_default()
    }

    /// The stored site secret, or `""`.
    pub fn site_secret(&self) -> &str {
        self.site_secret.as_deref().unwrap_or_default()
    }

    /// Rename legacy keys of a stored option in place. When both spellings
    /// are present the canonical value is kept and the legacy one dropped.
    pub fn normalize_legacy(option: &mut Map<String, Value>) {
        for (legacy, canonical) in LEGACY_FIELDS {
            if let Some(value) = option.remove(legacy) {
                option.entry(canonical).or_insert(value);
            }
        }
    }

    /// Read an option value as stored, legacy spellings included.
    pub fn from_stored(mut value: Value) -> Result<Self, serde_json::Error> {
        if let Value::Object(option) = &mut value {
            Self::normalize_legacy(option);
        }
        serde_json::from_value(value)
    }
}

impl fmt::Debug for ScopedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedSettings")
            .field("site_key", &self.site_key)
            .field(
                "site_secret",
                &self.site_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("theme", &self.theme)
            .field("size", &self.size)
            .field("render_mode", &self.render_mode)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Reads an enum field, treating unknown values as absent so that one bad
/// select value does not discard the whole option.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
