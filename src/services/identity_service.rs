//! Identity gateway operations.
//!
//! Sign-in and sign-up go through the administrative handle; the current-user
//! and logout operations go through a handle bound to the session secret held
//! by the [`SessionStore`]. Failure signalling differs per operation:
//!
//! | Operation | On failure |
//! |---|---|
//! | `sign_in` | [`ActionFailure::Reported`] with a generic message |
//! | `sign_up` | [`ActionFailure::Silent`] |
//! | `get_logged_in_user` | [`ActionFailure::Null`], not logged |
//! | `logout_account` | [`ActionFailure::Null`] |

use uuid::Uuid;

use crate::{
    clients::appwrite::AppwriteClient,
    error::{ActionFailure, ActionResult},
    models::identity::{Session, SignInParams, SignUpParams, User},
    session::SessionStore,
};

/// Message returned to callers whose sign-in failed, whatever the cause.
pub const SIGN_IN_FAILED: &str = "Invalid credentials or server issue.";

/// Unique id for a new account: 32 lowercase hex characters.
fn unique_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Authenticate with email and password and store the session secret.
///
/// # Returns
///
/// The session exactly as the provider described it.
pub async fn sign_in(
    client: &AppwriteClient,
    store: &mut impl SessionStore,
    params: &SignInParams,
) -> ActionResult<Session> {
    let session = match client
        .admin()
        .create_email_password_session(&params.email, &params.password)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            e.log("Sign-in");
            return Err(ActionFailure::Reported(SIGN_IN_FAILED.to_string()));
        }
    };

    if let Err(e) = store.set(&session.secret) {
        tracing::error!(operation = "Sign-in", error = %e, "Sign-in failed");
        return Err(ActionFailure::Reported(SIGN_IN_FAILED.to_string()));
    }

    tracing::info!(email = %params.email, "Sign-in successful");
    Ok(session)
}

/// Register an account, then sign it in immediately.
///
/// # Returns
///
/// The newly created account. Failures are only logged.
pub async fn sign_up(
    client: &AppwriteClient,
    store: &mut impl SessionStore,
    params: &SignUpParams,
) -> ActionResult<User> {
    let admin = client.admin();

    let user = admin
        .create(&unique_id(), &params.email, &params.password, &params.full_name())
        .await
        .map_err(|e| {
            e.log("Sign-up");
            ActionFailure::Silent
        })?;

    let session = admin
        .create_email_password_session(&params.email, &params.password)
        .await
        .map_err(|e| {
            e.log("Sign-up");
            ActionFailure::Silent
        })?;

    store.set(&session.secret).map_err(|e| {
        tracing::error!(operation = "Sign-up", error = %e, "Sign-up failed");
        ActionFailure::Silent
    })?;

    tracing::info!(user_id = %user.id, "Sign-up successful");
    Ok(user)
}

/// Look up the user owning the current session.
pub async fn get_logged_in_user(
    client: &AppwriteClient,
    store: &impl SessionStore,
) -> ActionResult<User> {
    let secret = store.get().ok_or(ActionFailure::Null)?;

    client
        .session(secret)
        .get()
        .await
        .map_err(|_| ActionFailure::Null)
}

/// Log out: forget the local session, then invalidate it remotely.
///
/// The local cookie is cleared first so that a failed remote call still
/// leaves the caller logged out.
pub async fn logout_account(
    client: &AppwriteClient,
    store: &mut impl SessionStore,
) -> ActionResult<()> {
    let secret = store.get().map(str::to_string);
    store.clear();

    let Some(secret) = secret else {
        tracing::debug!("Logout without a session");
        return Err(ActionFailure::Null);
    };

    client
        .session(&secret)
        .delete_session("current")
        .await
        .map_err(|e| {
            e.log("Logout");
            ActionFailure::Null
        })?;

    tracing::info!("Logged out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionCookies;
    use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &Server) -> AppwriteClient {
        AppwriteClient::new(&format!("{}/v1", server.url()), "proj", "admin-key").unwrap()
    }

    fn signed_in(secret: &str) -> SessionCookies {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("appwrite-session={secret}")).unwrap(),
        );
        SessionCookies::from_headers(&headers)
    }

    fn sign_in_params() -> SignInParams {
        SignInParams {
            email: "ada@example.com".into(),
            password: "hunter22".into(),
        }
    }

    fn sign_up_params() -> SignUpParams {
        SignUpParams {
            email: "ada@example.com".into(),
            password: "hunter22".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        }
    }

    const SESSION_BODY: &str =
        r#"{"$id":"S1","userId":"U1","secret":"s3cr3t","provider":"email","current":true}"#;

    #[tokio::test]
    async fn sign_in_sets_cookie_and_returns_session() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/account/sessions/email")
            .with_status(201)
            .with_body(SESSION_BODY)
            .create_async()
            .await;

        let client = client_for(&server);
        let mut store = SessionCookies::default();
        let session = sign_in(&client, &mut store, &sign_in_params()).await.unwrap();

        assert_eq!(store.get(), Some("s3cr3t"));
        assert_eq!(
            store.updates()[0],
            "appwrite-session=s3cr3t; Path=/; HttpOnly; SameSite=Strict; Secure"
        );
        assert_eq!(
            serde_json::to_value(&session).unwrap(),
            serde_json::from_str::<serde_json::Value>(SESSION_BODY).unwrap()
        );
    }

    #[tokio::test]
    async fn sign_in_rejection_reports_error_without_cookie() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/account/sessions/email")
            .with_status(401)
            .with_body(r#"{"message":"Invalid credentials.","code":401,"type":"user_invalid_credentials"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let mut store = SessionCookies::default();
        let result = sign_in(&client, &mut store, &sign_in_params()).await;

        assert_eq!(
            result,
            Err(ActionFailure::Reported(
                "Invalid credentials or server issue.".to_string()
            ))
        );
        assert!(store.get().is_none());
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn sign_up_creates_account_then_session() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/v1/account")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({
                    "email": "ada@example.com",
                    "password": "hunter22",
                    "name": "Ada Lovelace"
                })),
                Matcher::Regex(r#""userId":"[0-9a-f]{32}""#.into()),
            ]))
            .with_status(201)
            .with_body(r#"{"$id":"U1","email":"ada@example.com","name":"Ada Lovelace","status":true}"#)
            .create_async()
            .await;
        let session = server
            .mock("POST", "/v1/account/sessions/email")
            .with_status(201)
            .with_body(SESSION_BODY)
            .create_async()
            .await;

        let client = client_for(&server);
        let mut store = SessionCookies::default();
        let user = sign_up(&client, &mut store, &sign_up_params()).await.unwrap();

        assert_eq!(user.id, "U1");
        assert_eq!(user.extra["status"], true);
        assert_eq!(store.get(), Some("s3cr3t"));
        create.assert_async().await;
        session.assert_async().await;
    }

    #[tokio::test]
    async fn sign_up_failure_is_silent() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/account")
            .with_status(409)
            .with_body(r#"{"message":"A user with the same id, email, or phone already exists","code":409}"#)
            .create_async()
            .await;
        let session = server
            .mock("POST", "/v1/account/sessions/email")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        let mut store = SessionCookies::default();

        assert_eq!(
            sign_up(&client, &mut store, &sign_up_params()).await,
            Err(ActionFailure::Silent)
        );
        assert!(store.updates().is_empty());
        session.assert_async().await;
    }

    #[tokio::test]
    async fn get_logged_in_user_uses_session_secret() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/account")
            .match_header("x-appwrite-session", "s3cr3t")
            .with_status(200)
            .with_body(r#"{"$id":"U1","email":"ada@example.com","name":"Ada Lovelace"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let user = get_logged_in_user(&client, &signed_in("s3cr3t")).await.unwrap();

        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn get_logged_in_user_is_null_without_session_or_on_error() {
        let mut server = Server::new_async().await;
        let lookup = server
            .mock("GET", "/v1/account")
            .with_status(401)
            .with_body(r#"{"message":"User (role: guests) missing scope (account)","code":401}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);

        assert_eq!(
            get_logged_in_user(&client, &SessionCookies::default()).await,
            Err(ActionFailure::Null)
        );
        assert_eq!(
            get_logged_in_user(&client, &signed_in("expired")).await,
            Err(ActionFailure::Null)
        );
        lookup.assert_async().await;
    }

    #[tokio::test]
    async fn logout_clears_cookie_then_deletes_current_session() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", "/v1/account/sessions/current")
            .match_header("x-appwrite-session", "s3cr3t")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        let mut store = signed_in("s3cr3t");

        assert_eq!(logout_account(&client, &mut store).await, Ok(()));
        assert!(store.get().is_none());
        assert_eq!(store.updates().len(), 1);
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn logout_clears_cookie_even_when_remote_fails() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/v1/account/sessions/current")
            .with_status(500)
            .with_body(r#"{"message":"Server Error","code":500}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let mut store = signed_in("s3cr3t");

        assert_eq!(logout_account(&client, &mut store).await, Err(ActionFailure::Null));
        assert!(store.get().is_none());
        assert!(
            store.updates()[0]
                .to_str()
                .unwrap()
                .contains("Max-Age=0")
        );
    }

    #[tokio::test]
    async fn logout_without_session_expires_cookie_and_skips_remote() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        let mut store = SessionCookies::default();

        assert_eq!(logout_account(&client, &mut store).await, Err(ActionFailure::Null));
        assert!(store.get().is_none());
        assert_eq!(store.updates().len(), 1);
        assert!(
            store.updates()[0]
                .to_str()
                .unwrap()
                .contains("Max-Age=0")
        );
        delete.assert_async().await;
    }

    #[test]
    fn unique_ids_are_hex_and_distinct() {
        let a = unique_id();
        let b = unique_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
