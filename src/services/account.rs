//! Account panel and the mock login.

use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::types::{AccountInfo, LoginRequest, LoginResponse};

/// Balance handed to every mock session.
pub const MOCK_SESSION_BALANCE: f64 = 50000.00;

#[derive(Debug, Error, PartialEq)]
pub enum LoginError {
    #[error("Please fill in all fields")]
    MissingFields,
}

/// Static account figures plus a login that always succeeds.
#[derive(Debug, Clone)]
pub struct AccountService {
    account: AccountInfo,
    login_delay: Duration,
}

impl AccountService {
    pub fn new(login_delay: Duration) -> Self {
        Self {
            account: AccountInfo::default(),
            login_delay,
        }
    }

    pub fn account(&self) -> &AccountInfo {
        &self.account
    }

    /// Accept any non-empty credentials after the configured delay.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, LoginError> {
        let username = request.username.trim();
        if username.is_empty() || request.password.is_empty() {
            return Err(LoginError::MissingFields);
        }

        tokio::time::sleep(self.login_delay).await;
        info!(username, "mock login");

        Ok(LoginResponse {
            username: username.to_string(),
            balance: MOCK_SESSION_BALANCE,
            message: format!("Welcome back, {}!", username),
        })
    }
}
