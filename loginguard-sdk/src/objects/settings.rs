use serde::{Deserialize, Serialize};

/// A settings page as shown to an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPageView {
    pub scope: String,
    pub fields: Vec<FieldView>,
}

/// One field with its current value. Secrets come back masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: FieldKindView,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKindView {
    Text,
    Secret,
    Select { options: Vec<String> },
}
