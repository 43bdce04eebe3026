use serde::{Deserialize, Serialize};

/// Static account panel figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub balance: f64,
    pub free_margin: f64,
    /// Percent
    pub margin_level: f64,
    pub currency: String,
}

impl Default for AccountInfo {
    fn default() -> Self {
        Self {
            balance: 9999.24,
            free_margin: 9996.52,
            margin_level: 367615.12,
            currency: "USD".to_string(),
        }
    }
}

/// Login dialog submission.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Mock session handed back after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub username: String,
    pub balance: f64,
    pub message: String,
}
