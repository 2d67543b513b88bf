//! Payments gateway operations.
//!
//! Each operation issues one remote call (two for `add_funding_source`),
//! extracts a single field, and converts any failure into
//! [`ActionFailure::Null`] after logging it. Nothing is retried.

use serde_json::json;

use crate::{
    clients::dwolla::DwollaClient,
    error::{ActionFailure, ActionResult, RemoteError},
    models::payments::{
        AddFundingSourceParams, AuthorizationLinks, CreateFundingSourceOptions, FundingSourceBody,
        NewCustomer, TransferBody, TransferParams,
    },
};

/// Log `err` under `operation` and hand back the null sentinel.
fn fail(operation: &str, err: RemoteError) -> ActionFailure {
    err.log(operation);
    ActionFailure::Null
}

/// Create a customer.
///
/// # Returns
///
/// The URL of the created customer (the `Location` header).
pub async fn create_customer(client: &DwollaClient, customer: &NewCustomer) -> ActionResult<String> {
    const OPERATION: &str = "Creating a Dwolla Customer";
    tracing::info!(email = %customer.email, "Creating payments customer");

    let url = client
        .post("customers", customer)
        .await
        .and_then(|response| response.into_location())
        .map_err(|e| fail(OPERATION, e))?;

    tracing::info!(customer = %url, "Payments customer created");
    Ok(url)
}

/// Register a bank account as a funding source for one customer.
///
/// Authorization links, when present, are forwarded under `_links`.
pub async fn create_funding_source(
    client: &DwollaClient,
    options: &CreateFundingSourceOptions,
) -> ActionResult<String> {
    const OPERATION: &str = "Creating a Funding Source";
    tracing::info!(customer_id = %options.customer_id, "Creating funding source");

    let target = client
        .resource_url(&["customers", options.customer_id.as_str(), "funding-sources"])
        .map_err(|e| fail(OPERATION, e))?;
    let url = client
        .post_url(target, &FundingSourceBody::from(options))
        .await
        .and_then(|response| response.into_location())
        .map_err(|e| fail(OPERATION, e))?;

    tracing::info!(funding_source = %url, "Funding source created");
    Ok(url)
}

/// Obtain an on-demand authorization and return its `_links`.
pub async fn create_on_demand_authorization(client: &DwollaClient) -> ActionResult<AuthorizationLinks> {
    const OPERATION: &str = "Creating an On-Demand Authorization";
    tracing::info!("Creating on-demand authorization");

    let response = client
        .post("on-demand-authorizations", &json!({}))
        .await
        .map_err(|e| fail(OPERATION, e))?;

    let links = response
        .body
        .get("_links")
        .cloned()
        .ok_or_else(|| RemoteError::Malformed("response body has no `_links`".into()))
        .and_then(|links| {
            serde_json::from_value::<AuthorizationLinks>(links)
                .map_err(|e| RemoteError::Malformed(format!("`_links` is not an object: {e}")))
        })
        .map_err(|e| fail(OPERATION, e))?;

    tracing::info!(links = ?links.0.keys().collect::<Vec<_>>(), "On-demand authorization created");
    Ok(links)
}

/// Move money between two funding sources.
///
/// The amount is always submitted as `{currency: "USD", value: amount}`.
pub async fn create_transfer(client: &DwollaClient, params: &TransferParams) -> ActionResult<String> {
    const OPERATION: &str = "Transfer Fund";
    tracing::info!(
        amount = %params.amount,
        source = %params.source_funding_source_url,
        destination = %params.destination_funding_source_url,
        "Creating transfer"
    );

    let url = client
        .post("transfers", &TransferBody::from(params))
        .await
        .and_then(|response| response.into_location())
        .map_err(|e| fail(OPERATION, e))?;

    tracing::info!(transfer = %url, "Transfer created");
    Ok(url)
}

/// Authorize, then register a funding source with the resulting links.
///
/// The two remote calls run strictly in order; if authorization fails the
/// funding source is never requested.
pub async fn add_funding_source(
    client: &DwollaClient,
    params: AddFundingSourceParams,
) -> ActionResult<String> {
    tracing::info!(customer_id = %params.dwolla_customer_id, "Adding funding source");

    let links = create_on_demand_authorization(client).await.inspect_err(|_| {
        tracing::error!(
            operation = "Adding Funding Source",
            "authorization failed, funding source not requested"
        );
    })?;

    let options = CreateFundingSourceOptions {
        customer_id: params.dwolla_customer_id,
        funding_source_name: params.bank_name,
        plaid_token: params.processor_token,
        authorization_links: Some(links),
    };
    create_funding_source(client, &options).await
}
