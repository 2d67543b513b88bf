//! Shared application state.

use axum::extract::FromRef;

use crate::clients::{ClientBuildError, appwrite::AppwriteClient, dwolla::DwollaClient};
use crate::config::Config;

/// Both provider handles, built once at startup and cloned into every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dwolla: DwollaClient,
    pub appwrite: AppwriteClient,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, ClientBuildError> {
        Ok(Self {
            dwolla: DwollaClient::from_config(config)?,
            appwrite: AppwriteClient::from_config(config)?,
        })
    }
}

impl FromRef<AppState> for DwollaClient {
    fn from_ref(state: &AppState) -> Self {
        state.dwolla.clone()
    }
}

impl FromRef<AppState> for AppwriteClient {
    fn from_ref(state: &AppState) -> Self {
        state.appwrite.clone()
    }
}
