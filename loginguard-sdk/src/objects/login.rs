//! Form bodies forwarded by the host application and the decisions returned
//! for them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A submitted login form.
///
/// Field names follow the WordPress login form (`log`, `pwd`) so the host
/// can forward the form as-is.
#[derive(Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default, rename = "log")]
    pub username: String,
    #[serde(default, rename = "pwd")]
    pub password: String,
    #[serde(default, rename = "g-recaptcha-response")]
    pub token: Option<String>,
    /// Set by the host when an earlier authentication stage already failed.
    #[serde(default)]
    pub prior_error: bool,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("token", &self.token.as_ref().map(|_| "<present>"))
            .field("prior_error", &self.prior_error)
            .finish()
    }
}

/// A submitted lost-password form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LostPasswordForm {
    #[serde(default)]
    pub user_login: String,
    #[serde(default, rename = "g-recaptcha-response")]
    pub token: Option<String>,
}

/// Decision returned for a login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum LoginDecision {
    /// Continue the host's login pipeline.
    Allowed,
    /// Reject the login and show `message`.
    Rejected { code: String, message: String },
}

/// One error attached to a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormError {
    pub code: String,
    pub message: String,
}

/// Errors collected for a lost-password form. Empty means proceed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostPasswordResponse {
    pub errors: Vec<FormError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_decision_wire_format() {
        let allowed = serde_json::to_value(LoginDecision::Allowed).unwrap();
        assert_eq!(allowed, serde_json::json!({"decision": "allowed"}));

        let rejected = serde_json::to_value(LoginDecision::Rejected {
            code: "empty_token".to_string(),
            message: "Empty captcha.".to_string(),
        })
        .unwrap();
        assert_eq!(rejected["decision"], "rejected");
        assert_eq!(rejected["code"], "empty_token");
    }

    #[test]
    fn test_login_form_debug_hides_password() {
        let form = LoginForm {
            username: "bob".to_string(),
            password: "hunter2".to_string(),
            token: Some("tok123".to_string()),
            prior_error: false,
        };
        let printed = format!("{form:?}");
        assert!(printed.contains("bob"));
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("tok123"));
    }
}
