use secrecy::SecretString;
use std::{env, path::PathBuf};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<SecretString>,
    pub session_store_path: PathBuf,
    pub http_timeout_secs: u64,
    pub top_n: usize,
    pub page_size: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
            api_token: env::var("API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            session_store_path: env::var("SESSION_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("session.json")),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),
            top_n: env::var("TOP_N")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(30),
            page_size: env::var("PAGE_SIZE")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Rejects settings the client cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        let base = self.api_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(AppError::ConfigError(format!(
                "API_BASE_URL must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }

        if self.page_size == 0 {
            return Err(AppError::ConfigError("PAGE_SIZE must be at least 1".to_string()));
        }

        if self.top_n == 0 {
            return Err(AppError::ConfigError("TOP_N must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            api_token: Some(SecretString::from("test_token".to_string())),
            session_store_path: PathBuf::from("session-test.json"),
            http_timeout_secs: 5,
            top_n: 30,
            page_size: 10,
        }
    }
}
