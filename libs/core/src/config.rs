//! Credentials and endpoint configuration for the WhatsApp Business API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v20.0";

pub const ENV_API_KEY: &str = "WHATSAPP_API_KEY";
pub const ENV_BUSINESS_ACCOUNT_ID: &str = "WHATSAPP_BUSINESS_ACCOUNT_ID";
pub const ENV_API_BASE: &str = "WHATSAPP_API_BASE";

/// Credential record as stored by the hosting workflow engine.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    #[serde(rename = "businessAccountID")]
    pub business_account_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, business_account_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            business_account_id: business_account_id.into(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves credentials through an arbitrary key lookup. Blank values count
    /// as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        Ok(Self {
            api_key: read(ENV_API_KEY)?,
            business_account_id: read(ENV_BUSINESS_ACCOUNT_ID)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("business_account_id", &self.business_account_id)
            .finish()
    }
}

/// Versioned base URL of the Graph API plus the endpoint builders hanging off it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        Self {
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        std::env::var(ENV_API_BASE)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn messages_url(&self, phone_id: &str) -> String {
        format!("{}/{}/messages", self.base_url, phone_id)
    }

    pub fn phone_numbers_url(&self, business_account_id: &str) -> String {
        format!("{}/{}/phone_numbers", self.base_url, business_account_id)
    }

    pub fn templates_url(&self, business_account_id: &str) -> String {
        format!("{}/{}/message_templates", self.base_url, business_account_id)
    }
}
