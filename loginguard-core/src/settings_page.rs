//! Settings pages for both scopes.
//!
//! The network page and the site page differ only in their scope and in
//! which fields they expose, so both are a [`SettingsPage`] built from a list
//! of [`FieldSpec`]s. The field list doubles as the allow-list for updates:
//! nothing outside it is ever written to the store.

use crate::store::{OptionStore, SETTINGS_OPTION, StoreError};
use loginguard_sdk::config::{ScopedSettings, Scope, SiteId};
use loginguard_sdk::objects::{FieldKindView, FieldView, SettingsPageView};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

/// Shown instead of a stored secret. Submitting it back keeps the secret.
pub const SECRET_MASK: &str = "********";

const THEMES: &[&str] = &["light", "dark"];
const SIZES: &[&str] = &["normal", "compact"];
const RENDER_MODES: &[&str] = &["onload", "explicit"];
const NETWORK_ENABLED: &[&str] = &["yes", "no"];
const SITE_ENABLED: &[&str] = &["auto", "yes", "no"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Select(&'static [&'static str]),
}

/// One settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub default: &'static str,
}

const SITE_KEY: FieldSpec = FieldSpec {
    name: "site_key",
    label: "Site Key",
    kind: FieldKind::Text,
    default: "",
};

const SITE_SECRET: FieldSpec = FieldSpec {
    name: "site_secret",
    label: "Site Secret",
    kind: FieldKind::Secret,
    default: "",
};

const THEME: FieldSpec = FieldSpec {
    name: "theme",
    label: "Theme",
    kind: FieldKind::Select(THEMES),
    default: "light",
};

const SIZE: FieldSpec = FieldSpec {
    name: "size",
    label: "Size",
    kind: FieldKind::Select(SIZES),
    default: "normal",
};

const RENDER_MODE: FieldSpec = FieldSpec {
    name: "render_mode",
    label: "Render",
    kind: FieldKind::Select(RENDER_MODES),
    default: "onload",
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid value {value:?} for field {field}")]
    InvalidValue { field: String, value: String },
}

/// A settings page: a scope plus the fields editable at that scope.
#[derive(Debug, Clone)]
pub struct SettingsPage {
    scope: Scope,
    fields: Vec<FieldSpec>,
}

impl SettingsPage {
    pub fn new(scope: Scope, fields: Vec<FieldSpec>) -> Self {
        Self { scope, fields }
    }

    /// Network-wide page: keys, display options and the network switch.
    pub fn network() -> Self {
        Self::new(
            Scope::Network,
            vec![
                SITE_KEY,
                SITE_SECRET,
                THEME,
                SIZE,
                FieldSpec {
                    name: "enabled",
                    label: "Enabled",
                    kind: FieldKind::Select(NETWORK_ENABLED),
                    default: "yes",
                },
            ],
        )
    }

    /// Per-site page. Display options are only offered outside a
    /// multi-tenant deployment, where they are network-wide knobs.
    pub fn site(site: SiteId, multi_tenant: bool) -> Self {
        let mut fields = vec![
            SITE_KEY,
            SITE_SECRET,
            FieldSpec {
                name: "enabled",
                label: "Enabled",
                kind: FieldKind::Select(SITE_ENABLED),
                default: "auto",
            },
        ];
        if !multi_tenant {
            fields.extend([THEME, SIZE, RENDER_MODE]);
        }
        Self::new(Scope::Site(site), fields)
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Field names an update may write.
    pub fn allow_list(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    /// The page with current values. Stored secrets come back masked.
    pub async fn view(&self, store: &dyn OptionStore) -> Result<SettingsPageView, SettingsError> {
        let stored = self.stored(store).await?;
        let fields = self
            .fields
            .iter()
            .map(|field| {
                let current = stored.get(field.name).and_then(Value::as_str).unwrap_or("");
                let value = match field.kind {
                    FieldKind::Secret if !current.is_empty() => SECRET_MASK.to_owned(),
                    _ if current.is_empty() => field.default.to_owned(),
                    _ => current.to_owned(),
                };
                FieldView {
                    name: field.name.to_owned(),
                    label: field.label.to_owned(),
                    kind: match field.kind {
                        FieldKind::Text => FieldKindView::Text,
                        FieldKind::Secret => FieldKindView::Secret,
                        FieldKind::Select(options) => FieldKindView::Select {
                            options: options.iter().map(|o| (*o).to_owned()).collect(),
                        },
                    },
                    value,
                }
            })
            .collect();

        Ok(SettingsPageView {
            scope: match self.scope {
                Scope::Network => "network".to_owned(),
                Scope::Site(_) => "site".to_owned(),
            },
            fields,
        })
    }

    /// Replace the stored settings with the submitted ones.
    ///
    /// Only allow-listed fields are kept. A field that is absent or blank is
    /// dropped from the stored option; if nothing is left the option is
    /// deleted. Select values must be one of the field's options.
    pub async fn update(
        &self,
        store: &dyn OptionStore,
        submitted: &BTreeMap<String, String>,
    ) -> Result<ScopedSettings, SettingsError> {
        let ignored: Vec<&str> = submitted
            .keys()
            .map(String::as_str)
            .filter(|key| !self.allow_list().any(|name| name == *key))
            .collect();
        if !ignored.is_empty() {
            warn!(scope = %self.scope, ?ignored, "Ignoring fields not on the settings page");
        }

        let previous = self.stored(store).await?;
        let mut option = Map::new();
        for field in &self.fields {
            let Some(raw) = submitted.get(field.name) else {
                continue;
            };
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let value = match field.kind {
                FieldKind::Secret if raw == SECRET_MASK => match previous.get(field.name) {
                    Some(kept) => kept.clone(),
                    None => continue,
                },
                FieldKind::Select(options) if !options.iter().any(|o| *o == raw) => {
                    return Err(SettingsError::InvalidValue {
                        field: field.name.to_owned(),
                        value: raw.to_owned(),
                    });
                }
                _ => Value::String(raw.to_owned()),
            };
            option.insert(field.name.to_owned(), value);
        }

        if option.is_empty() {
            store.delete(self.scope, SETTINGS_OPTION).await?;
        } else {
            store
                .set(self.scope, SETTINGS_OPTION, Value::Object(option.clone()))
                .await?;
        }
        info!(scope = %self.scope, fields = option.len(), "Settings updated");

        // Every value was checked against the field options above.
        Ok(ScopedSettings::from_stored(Value::Object(option)).unwrap_or_default())
    }

    async fn stored(&self, store: &dyn OptionStore) -> Result<Map<String, Value>, StoreError> {
        let value = store.get(self.scope, SETTINGS_OPTION).await?;
        let Some(Value::Object(mut stored)) = value else {
            return Ok(Map::new());
        };
        ScopedSettings::normalize_legacy(&mut stored);
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use loginguard_sdk::config::{Enabled, Theme};
    use serde_json::json;

    fn form(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_field_sets() {
        let network: Vec<_> = SettingsPage::network().allow_list().collect();
        assert_eq!(network, ["site_key", "site_secret", "theme", "size", "enabled"]);

        let multi: Vec<_> = SettingsPage::site(2, true).allow_list().collect();
        assert_eq!(multi, ["site_key", "site_secret", "enabled"]);

        let single: Vec<_> = SettingsPage::site(1, false).allow_list().collect();
        assert_eq!(
            single,
            ["site_key", "site_secret", "enabled", "theme", "size", "render_mode"]
        );
    }

    #[tokio::test]
    async fn test_update_keeps_only_allowed_fields() {
        let store = MemoryStore::new();
        let page = SettingsPage::site(2, true);

        let saved = page
            .update(
                &store,
                &form(&[
                    ("site_key", " SK "),
                    ("enabled", "yes"),
                    ("theme", "dark"),
                    ("admin_email", "x@example.com"),
                ]),
            )
            .await
            .unwrap();

        assert_eq!(saved.site_key(), "SK");
        assert_eq!(saved.enabled, Some(Enabled::Yes));
        assert_eq!(saved.theme, None);

        let stored = store.get(Scope::Site(2), SETTINGS_OPTION).await.unwrap();
        assert_eq!(stored, Some(json!({"site_key": "SK", "enabled": "yes"})));
    }

    #[tokio::test]
    async fn test_update_drops_absent_fields() {
        let store = MemoryStore::new();
        let page = SettingsPage::network();
        page.update(&store, &form(&[("site_key", "NK"), ("theme", "dark")]))
            .await
            .unwrap();
        page.update(&store, &form(&[("site_key", "NK2")]))
            .await
            .unwrap();

        let stored = store.get(Scope::Network, SETTINGS_OPTION).await.unwrap();
        assert_eq!(stored, Some(json!({"site_key": "NK2"})));

        page.update(&store, &form(&[("site_key", "  ")])).await.unwrap();
        assert_eq!(store.get(Scope::Network, SETTINGS_OPTION).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_select_value() {
        let store = MemoryStore::new();
        let err = SettingsPage::network()
            .update(&store, &form(&[("enabled", "auto")]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidValue { ref field, ref value } if field == "enabled" && value == "auto"
        ));
        assert_eq!(store.version(), 0);
    }

    #[tokio::test]
    async fn test_masked_secret_round_trip() {
        let store = MemoryStore::new();
        store
            .set(
                Scope::Network,
                SETTINGS_OPTION,
                json!({"sitekey": "NK", "sitesecret": "NS", "theme": "dark"}),
            )
            .await
            .unwrap();
        let page = SettingsPage::network();

        let view = page.view(&store).await.unwrap();
        let value_of = |name: &str| {
            view.fields
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.value.clone())
                .unwrap()
        };
        assert_eq!(value_of("site_key"), "NK");
        assert_eq!(value_of("site_secret"), SECRET_MASK);
        assert_eq!(value_of("size"), "normal");
        assert_eq!(value_of("enabled"), "yes");

        let saved = page
            .update(
                &store,
                &form(&[("site_key", "NK"), ("site_secret", SECRET_MASK), ("theme", "dark")]),
            )
            .await
            .unwrap();
        assert_eq!(saved.site_secret(), "NS");
        assert_eq!(saved.theme, Some(Theme::Dark));
    }
}
