//! Configured handles to the two hosted APIs.
//!
//! Both clients are built once at startup and shared by reference with every
//! request; they hold no mutable state.

pub mod appwrite;
pub mod dwolla;

use reqwest::{Response, StatusCode};
use url::Url;

use crate::error::RemoteError;

/// Failure while building a client at startup.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("invalid {name} URL: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Parse a base URL so that relative paths join beneath it.
///
/// `https://host/v1` would otherwise lose `v1` on `join("account")`.
pub(crate) fn parse_base_url(name: &'static str, raw: &str) -> Result<Url, ClientBuildError> {
    let mut url = Url::parse(raw).map_err(|source| ClientBuildError::InvalidUrl { name, source })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Resolve `path` against `base`; absolute URLs pass through unchanged.
pub(crate) fn resolve(base: &Url, path: &str) -> Result<Url, RemoteError> {
    base.join(path)
        .map_err(|e| RemoteError::Malformed(format!("cannot build URL from `{path}`: {e}")))
}

/// Turn a non-2xx response into a [`RemoteError::Status`], keeping a JSON body if there is one.
pub(crate) async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status: StatusCode = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).ok();
    Err(RemoteError::Status { status, body })
}
