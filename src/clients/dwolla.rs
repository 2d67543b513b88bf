//! Payments network client.
//!
//! Every call performs the client-credentials handshake first and then the
//! actual request with the resulting bearer token. Tokens are not cached.

use std::fmt;

use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::clients::{ClientBuildError, check_status, parse_base_url, resolve};
use crate::config::{Config, PaymentsEnvironment};
use crate::error::RemoteError;

const HAL_JSON: &str = "application/vnd.dwolla.v1.hal+json";

/// Configured payments API handle.
#[derive(Clone)]
pub struct DwollaClient {
    http: reqwest::Client,
    base_url: Url,
    environment: PaymentsEnvironment,
    key: String,
    secret: String,
}

impl fmt::Debug for DwollaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DwollaClient")
            .field("base_url", &self.base_url.as_str())
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

/// Outcome of a successful POST.
#[derive(Debug)]
pub struct DwollaResponse {
    /// `Location` header, when the remote sent one.
    pub location: Option<String>,
    /// JSON body; `Value::Null` for empty bodies.
    pub body: Value,
}

impl DwollaResponse {
    /// URL of the resource the POST created.
    pub fn into_location(self) -> Result<String, RemoteError> {
        self.location
            .ok_or_else(|| RemoteError::Malformed("response has no Location header".into()))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl DwollaClient {
    /// Build the client from application configuration.
    pub fn from_config(config: &Config) -> Result<Self, ClientBuildError> {
        Self::new(
            config.dwolla_env,
            config.payments_base_url(),
            &config.dwolla_key,
            &config.dwolla_secret,
        )
    }

    pub fn new(
        environment: PaymentsEnvironment,
        base_url: &str,
        key: &str,
        secret: &str,
    ) -> Result<Self, ClientBuildError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: parse_base_url("payments", base_url)?,
            environment,
            key: key.to_string(),
            secret: secret.to_string(),
        })
    }

    pub fn environment(&self) -> PaymentsEnvironment {
        self.environment
    }

    /// Exchange the key/secret pair for a bearer token.
    async fn access_token(&self) -> Result<String, RemoteError> {
        let response = self
            .http
            .post(resolve(&self.base_url, "token")?)
            .basic_auth(&self.key, Some(&self.secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let token: TokenResponse = check_status(response).await?.json().await?;
        Ok(token.access_token)
    }

    /// URL under the base built from `segments`, each kept as exactly one path segment.
    ///
    /// Slashes, `?` and `#` inside a segment are percent-encoded; empty, `.` and
    /// `..` segments are rejected.
    pub fn resource_url(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(RemoteError::Malformed(format!(
                "`{bad}` is not a valid resource id"
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Malformed("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// POST `body` to `path`, resolved relative to the base URL.
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<DwollaResponse, RemoteError>
    where
        B: Serialize + ?Sized,
    {
        self.post_url(resolve(&self.base_url, path)?, body).await
    }

    /// POST `body` to an already-built URL.
    pub async fn post_url<B>(&self, url: Url, body: &B) -> Result<DwollaResponse, RemoteError>
    where
        B: Serialize + ?Sized,
    {
        let token = self.access_token().await?;

        let payload = serde_json::to_vec(body)
            .map_err(|e| RemoteError::Malformed(format!("cannot encode request body: {e}")))?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .header(ACCEPT, HAL_JSON)
            .header(CONTENT_TYPE, HAL_JSON)
            .body(payload)
            .send()
            .await?;
        let response = check_status(response).await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)
                .map_err(|e| RemoteError::Malformed(format!("response body is not JSON: {e}")))?
        };

        Ok(DwollaResponse { location, body })
    }
}
