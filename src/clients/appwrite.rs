//! Identity provider client.
//!
//! One configured [`AppwriteClient`] hands out two differently-privileged
//! handles: [`AdminAccount`] authenticates with the project API key, and
//! [`SessionAccount`] acts as whoever owns the session secret it was built from.

use std::fmt;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::clients::{ClientBuildError, check_status, parse_base_url, resolve};
use crate::config::Config;
use crate::error::RemoteError;
use crate::models::identity::{Session, User};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const SESSION_HEADER: &str = "X-Appwrite-Session";

/// Configured identity API handle.
#[derive(Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: Url,
    project: String,
    api_key: String,
}

impl fmt::Debug for AppwriteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppwriteClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

impl AppwriteClient {
    pub fn from_config(config: &Config) -> Result<Self, ClientBuildError> {
        Self::new(
            &config.appwrite_endpoint,
            &config.appwrite_project,
            &config.appwrite_key,
        )
    }

    pub fn new(endpoint: &str, project: &str, api_key: &str) -> Result<Self, ClientBuildError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            endpoint: parse_base_url("identity", endpoint)?,
            project: project.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Privileged handle used for account creation and password sign-in.
    pub fn admin(&self) -> AdminAccount<'_> {
        AdminAccount { client: self }
    }

    /// Handle scoped to the session identified by `secret`.
    pub fn session<'a>(&'a self, secret: &'a str) -> SessionAccount<'a> {
        SessionAccount {
            client: self,
            secret,
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, RemoteError> {
        let url = resolve(&self.endpoint, path)?;
        Ok(self
            .http
            .request(method, url)
            .header(PROJECT_HEADER, &self.project))
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
    let response = check_status(request.send().await?).await?;
    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| RemoteError::Malformed(format!("unexpected response body: {e}")))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewAccountBody<'a> {
    user_id: &'a str,
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct PasswordSessionBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// Account operations performed with the project API key.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccount<'a> {
    client: &'a AppwriteClient,
}

impl AdminAccount<'_> {
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, RemoteError> {
        Ok(self
            .client
            .request(method, path)?
            .header(KEY_HEADER, &self.client.api_key))
    }

    /// Register a new account.
    pub async fn create(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, RemoteError> {
        let body = NewAccountBody {
            user_id,
            email,
            password,
            name,
        };
        send_json(self.request(Method::POST, "account")?.json(&body)).await
    }

    /// Create a session from an email/password pair.
    ///
    /// Because the call carries the API key, the returned session includes its secret.
    pub async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, RemoteError> {
        let body = PasswordSessionBody { email, password };
        send_json(
            self.request(Method::POST, "account/sessions/email")?
                .json(&body),
        )
        .await
    }
}

/// Account operations performed as the owner of a session.
#[derive(Clone, Copy)]
pub struct SessionAccount<'a> {
    client: &'a AppwriteClient,
    secret: &'a str,
}

impl fmt::Debug for SessionAccount<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionAccount").finish_non_exhaustive()
    }
}

impl SessionAccount<'_> {
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, RemoteError> {
        Ok(self
            .client
            .request(method, path)?
            .header(SESSION_HEADER, self.secret))
    }

    /// The user owning this session.
    pub async fn get(&self) -> Result<User, RemoteError> {
        send_json(self.request(Method::GET, "account")?).await
    }

    /// Invalidate a session; `"current"` names the one this handle carries.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), RemoteError> {
        let path = format!("account/sessions/{session_id}");
        check_status(self.request(Method::DELETE, &path)?.send().await?).await?;
        Ok(())
    }
}
