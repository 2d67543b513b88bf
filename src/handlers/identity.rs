//! Identity HTTP handlers.
//!
//! - POST /api/v1/auth/sign-in - Start a session
//! - POST /api/v1/auth/sign-up - Register and start a session
//! - GET /api/v1/auth/me - Current user
//! - POST /api/v1/auth/logout - End the session
//!
//! The session travels in the `appwrite-session` cookie. Cookie changes are
//! attached to the response whether or not the operation succeeded.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    clients::appwrite::AppwriteClient,
    error::ActionFailure,
    models::identity::{SignInParams, SignUpParams, User},
    services::identity_service,
    session::SessionCookies,
};

/// Sign in with email and password.
///
/// # Response
///
/// - **Success (200 OK)**: the session object, plus `Set-Cookie: appwrite-session=...`
/// - **Failure (401)**: `{"error": "Invalid credentials or server issue."}`
pub async fn sign_in(
    State(client): State<AppwriteClient>,
    mut cookies: SessionCookies,
    Json(params): Json<SignInParams>,
) -> impl IntoResponse {
    let result = identity_service::sign_in(&client, &mut cookies, &params)
        .await
        .map(Json);
    (cookies, result)
}

/// Register a new account and sign it in.
///
/// # Response
///
/// - **Success (200 OK)**: the new user, plus the session cookie
/// - **Failure (204 No Content)**: nothing
pub async fn sign_up(
    State(client): State<AppwriteClient>,
    mut cookies: SessionCookies,
    Json(params): Json<SignUpParams>,
) -> impl IntoResponse {
    let result = identity_service::sign_up(&client, &mut cookies, &params)
        .await
        .map(Json);
    (cookies, result)
}

/// Current user, or `null` (502) when there is none.
pub async fn get_logged_in_user(
    State(client): State<AppwriteClient>,
    cookies: SessionCookies,
) -> Result<Json<User>, ActionFailure> {
    identity_service::get_logged_in_user(&client, &cookies)
        .await
        .map(Json)
}

/// Log out. Always expires the cookie; 204 on success, `null` (502) otherwise.
pub async fn logout_account(
    State(client): State<AppwriteClient>,
    mut cookies: SessionCookies,
) -> impl IntoResponse {
    let result = identity_service::logout_account(&client, &mut cookies)
        .await
        .map(|()| StatusCode::NO_CONTENT);
    (cookies, result)
}
