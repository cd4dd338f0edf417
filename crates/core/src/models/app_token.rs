use serde::{Deserialize, Serialize};

/// Opaque credential of a registered game, mapped to its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppToken {
    pub token: String,
    pub app_name: String,
}

impl AppToken {
    pub fn new(token: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            app_name: app_name.into(),
        }
    }
}
