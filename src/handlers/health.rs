//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clients::dwolla::DwollaClient;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Payments environment the gateway was configured for
    pub payments_environment: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// Does not contact either provider.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "payments_environment": "sandbox",
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
pub async fn health_check(State(client): State<DwollaClient>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        payments_environment: client.environment().to_string(),
        timestamp: Utc::now(),
    })
}
