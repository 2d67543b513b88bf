//! Payments HTTP handlers.
//!
//! - POST /api/v1/customers - Create a customer
//! - POST /api/v1/customers/{customer_id}/funding-sources - Register a funding source
//! - POST /api/v1/on-demand-authorizations - Obtain authorization links
//! - POST /api/v1/transfers - Move money between funding sources
//! - POST /api/v1/funding-sources - Authorize and register a funding source in one step

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    clients::dwolla::DwollaClient,
    error::ActionFailure,
    models::payments::{
        AddFundingSourceParams, AuthorizationLinks, CreateFundingSourceOptions, CreatedResource,
        NewCustomer, NewFundingSource, TransferParams,
    },
    services::payments_service,
};

type Created<T> = Result<(StatusCode, Json<T>), ActionFailure>;

fn created(location: String) -> (StatusCode, Json<CreatedResource>) {
    (StatusCode::CREATED, Json(CreatedResource { location }))
}

/// Create a customer.
///
/// # Response
///
/// - **Success (201 Created)**: `{"location": "https://api-sandbox.dwolla.com/customers/..."}`
/// - **Failure (502)**: `null`
pub async fn create_customer(
    State(client): State<DwollaClient>,
    Json(customer): Json<NewCustomer>,
) -> Created<CreatedResource> {
    let location = payments_service::create_customer(&client, &customer).await?;
    Ok(created(location))
}

/// Register a funding source for the customer in the path.
///
/// # Request Body
///
/// ```json
/// { "fundingSourceName": "Checking", "plaidToken": "processor-sandbox-..." }
/// ```
pub async fn create_funding_source(
    State(client): State<DwollaClient>,
    Path(customer_id): Path<String>,
    Json(request): Json<NewFundingSource>,
) -> Created<CreatedResource> {
    let options = CreateFundingSourceOptions {
        customer_id,
        funding_source_name: request.funding_source_name,
        plaid_token: request.plaid_token,
        authorization_links: None,
    };
    let location = payments_service::create_funding_source(&client, &options).await?;
    Ok(created(location))
}

/// Obtain an on-demand authorization; responds with its `_links` object.
pub async fn create_on_demand_authorization(
    State(client): State<DwollaClient>,
) -> Created<AuthorizationLinks> {
    let links = payments_service::create_on_demand_authorization(&client).await?;
    Ok((StatusCode::CREATED, Json(links)))
}

/// Create a transfer.
///
/// # Request Body
///
/// ```json
/// {
///   "sourceFundingSourceUrl": "https://api-sandbox.dwolla.com/funding-sources/...",
///   "destinationFundingSourceUrl": "https://api-sandbox.dwolla.com/funding-sources/...",
///   "amount": "25.00"
/// }
/// ```
pub async fn create_transfer(
    State(client): State<DwollaClient>,
    Json(params): Json<TransferParams>,
) -> Created<CreatedResource> {
    let location = payments_service::create_transfer(&client, &params).await?;
    Ok(created(location))
}

/// Authorize and register a funding source from a processor token.
///
/// # Request Body
///
/// ```json
/// { "dwollaCustomerId": "...", "processorToken": "processor-sandbox-...", "bankName": "Chase" }
/// ```
pub async fn add_funding_source(
    State(client): State<DwollaClient>,
    Json(params): Json<AddFundingSourceParams>,
) -> Created<CreatedResource> {
    let location = payments_service::add_funding_source(&client, params).await?;
    Ok(created(location))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use mockito::{Matcher, Server};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{
        clients::{appwrite::AppwriteClient, dwolla::DwollaClient},
        config::PaymentsEnvironment,
        state::AppState,
    };

    fn state_for(server: &Server) -> AppState {
        AppState {
            dwolla: DwollaClient::new(PaymentsEnvironment::Sandbox, &server.url(), "key", "secret")
                .unwrap(),
            appwrite: AppwriteClient::new(&format!("{}/v1", server.url()), "proj", "admin-key")
                .unwrap(),
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn funding_source_route_uses_path_customer() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"access_token":"tok"}"#)
            .create_async()
            .await;
        let _mock = server
            .mock("POST", "/customers/C1/funding-sources")
            .match_body(Matcher::Json(json!({ "name": "Checking", "plaidToken": "T1" })))
            .with_status(201)
            .with_header(
                "location",
                "https://api-sandbox.dwolla.com/funding-sources/F1",
            )
            .create_async()
            .await;

        let response = crate::app(state_for(&server))
            .oneshot(post_json(
                "/api/v1/customers/C1/funding-sources",
                json!({ "fundingSourceName": "Checking", "plaidToken": "T1" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await,
            json!({ "location": "https://api-sandbox.dwolla.com/funding-sources/F1" })
        );
    }

    #[tokio::test]
    async fn transfer_route_failure_is_null() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"access_token":"tok"}"#)
            .create_async()
            .await;
        let _mock = server
            .mock("POST", "/transfers")
            .with_status(400)
            .with_body(r#"{"code":"ValidationError"}"#)
            .create_async()
            .await;

        let response = crate::app(state_for(&server))
            .oneshot(post_json(
                "/api/v1/transfers",
                json!({
                    "sourceFundingSourceUrl": "https://api-sandbox.dwolla.com/funding-sources/A",
                    "destinationFundingSourceUrl": "https://api-sandbox.dwolla.com/funding-sources/B",
                    "amount": 10
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await, Value::Null);
    }

    #[tokio::test]
    async fn health_reports_environment() {
        let server = Server::new_async().await;

        let response = crate::app(state_for(&server))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["payments_environment"], "sandbox");
    }
}
