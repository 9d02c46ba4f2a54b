use lazy_static::lazy_static;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;

use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    pub base_url: String,
    pub sheet_name: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("SHEET_BASE_URL").unwrap_or_default(),
            sheet_name: env::var("SHEET_NAME").unwrap_or_else(|_| "Sheet1".to_string()),
            connect_timeout_secs: env::var("SHEET_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            timeout_secs: env::var("SHEET_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        }
    }
}

impl SheetConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::default()
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::ConfigError("未设置 SHEET_BASE_URL".to_string()));
        }
        Url::parse(&self.base_url)
            .map_err(|e| AppError::ConfigError(format!("SHEET_BASE_URL 无效: {e}")))?;
        if self.sheet_name.is_empty() {
            return Err(AppError::ConfigError("未设置 SHEET_NAME".to_string()));
        }
        Ok(())
    }
}

lazy_static! {
    pub static ref CONFIG: Arc<SheetConfig> = Arc::new(SheetConfig::from_env());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> SheetConfig {
        SheetConfig {
            base_url: base_url.to_string(),
            sheet_name: "Enemy".to_string(),
            connect_timeout_secs: 5,
            timeout_secs: 30,
        }
    }

    #[test]
    fn validate_requires_parsable_base_url() {
        assert!(config("https://script.google.com/macros/s/abc/exec")
            .validate()
            .is_ok());
        assert!(matches!(
            config("").validate(),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            config("not a url").validate(),
            Err(AppError::ConfigError(_))
        ));
    }
}
