//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::fmt;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DWOLLA_ENV` (required): `sandbox` or `production`
/// - `DWOLLA_KEY` / `DWOLLA_SECRET` (required): payments API credentials
/// - `DWOLLA_API_URL` (optional): overrides the base URL derived from `DWOLLA_ENV`
/// - `APPWRITE_ENDPOINT` (required): identity API endpoint, e.g. `https://cloud.appwrite.io/v1`
/// - `APPWRITE_PROJECT` / `APPWRITE_KEY` (required): identity project id and admin key
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
#[derive(Clone, Deserialize)]
pub struct Config {
    pub dwolla_env: PaymentsEnvironment,
    pub dwolla_key: String,
    pub dwolla_secret: String,
    #[serde(default)]
    pub dwolla_api_url: Option<String>,

    pub appwrite_endpoint: String,
    pub appwrite_project: String,
    pub appwrite_key: String,

    #[serde(default = "default_port")]
    pub server_port: u16,
}

// Credentials stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("dwolla_env", &self.dwolla_env)
            .field("dwolla_api_url", &self.dwolla_api_url)
            .field("appwrite_endpoint", &self.appwrite_endpoint)
            .field("appwrite_project", &self.appwrite_project)
            .field("server_port", &self.server_port)
            .finish_non_exhaustive()
    }
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DWOLLA_KEY)
    /// - `DWOLLA_ENV` is anything other than `sandbox` or `production`
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        // Field names are automatically converted: dwolla_env -> DWOLLA_ENV
        envy::from_env::<Config>()
    }

    /// Base URL of the payments API, honoring `DWOLLA_API_URL` when set.
    pub fn payments_base_url(&self) -> &str {
        self.dwolla_api_url
            .as_deref()
            .unwrap_or_else(|| self.dwolla_env.base_url())
    }
}

/// Which payments network environment the gateway talks to.
///
/// Only the two exact literals are accepted. Anything else fails
/// deserialization, which aborts startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum PaymentsEnvironment {
    Sandbox,
    Production,
}

impl PaymentsEnvironment {
    pub fn base_url(self) -> &'static str {
        match self {
            PaymentsEnvironment::Sandbox => "https://api-sandbox.dwolla.com",
            PaymentsEnvironment::Production => "https://api.dwolla.com",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentsEnvironment::Sandbox => "sandbox",
            PaymentsEnvironment::Production => "production",
        }
    }
}

/// Rejected `DWOLLA_ENV` value.
#[derive(Debug, thiserror::Error)]
#[error("Dwolla environment should either be set to `sandbox` or `production`, got `{0}`")]
pub struct InvalidEnvironment(String);

impl TryFrom<String> for PaymentsEnvironment {
    type Error = InvalidEnvironment;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "sandbox" => Ok(PaymentsEnvironment::Sandbox),
            "production" => Ok(PaymentsEnvironment::Production),
            _ => Err(InvalidEnvironment(value)),
        }
    }
}

impl fmt::Display for PaymentsEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
