//! Payments network DTOs.
//!
//! Request types accepted from callers, plus the exact bodies sent to the
//! payments API. Nothing here validates amounts or personal data; the remote
//! API is the only judge.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Every transfer is denominated in this currency.
pub const TRANSFER_CURRENCY: &str = "USD";

/// Customer-creation request, forwarded to the payments API as-is.
///
/// # JSON Example
///
/// ```json
/// {
///   "firstName": "Ada",
///   "lastName": "Lovelace",
///   "email": "ada@example.com",
///   "type": "personal",
///   "address1": "12 Analytical Row",
///   "city": "Brooklyn",
///   "state": "NY",
///   "postalCode": "11201",
///   "dateOfBirth": "1990-12-10",
///   "ssn": "1234"
/// }
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
}

/// Opaque `_links` object handed out by an on-demand authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationLinks(pub Map<String, Value>);

/// Request body for `POST /api/v1/customers/{customer_id}/funding-sources`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFundingSource {
    pub funding_source_name: String,
    pub plaid_token: String,
}

/// Everything needed to register a funding source for one customer.
#[derive(Debug, Clone)]
pub struct CreateFundingSourceOptions {
    pub customer_id: String,
    pub funding_source_name: String,
    pub plaid_token: String,
    pub authorization_links: Option<AuthorizationLinks>,
}

/// Wire body of `POST customers/{id}/funding-sources`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingSourceBody<'a> {
    pub name: &'a str,
    pub plaid_token: &'a str,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<&'a AuthorizationLinks>,
}

impl<'a> From<&'a CreateFundingSourceOptions> for FundingSourceBody<'a> {
    fn from(options: &'a CreateFundingSourceOptions) -> Self {
        Self {
            name: &options.funding_source_name,
            plaid_token: &options.plaid_token,
            links: options.authorization_links.as_ref(),
        }
    }
}

/// Request body for `POST /api/v1/transfers`.
///
/// `amount` may arrive as a JSON string or number; either way it is kept as
/// the exact text the caller sent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferParams {
    pub source_funding_source_url: String,
    pub destination_funding_source_url: String,
    #[serde(deserialize_with = "amount_text")]
    pub amount: String,
}

fn amount_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "amount must be a string or number, got {other}"
        ))),
    }
}

#[derive(Debug, Serialize)]
pub struct Href<'a> {
    pub href: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TransferLinks<'a> {
    pub source: Href<'a>,
    pub destination: Href<'a>,
}

#[derive(Debug, Serialize)]
pub struct Amount<'a> {
    pub currency: &'static str,
    pub value: &'a str,
}

/// Wire body of `POST transfers`.
#[derive(Debug, Serialize)]
pub struct TransferBody<'a> {
    #[serde(rename = "_links")]
    pub links: TransferLinks<'a>,
    pub amount: Amount<'a>,
}

impl<'a> From<&'a TransferParams> for TransferBody<'a> {
    fn from(params: &'a TransferParams) -> Self {
        Self {
            links: TransferLinks {
                source: Href {
                    href: &params.source_funding_source_url,
                },
                destination: Href {
                    href: &params.destination_funding_source_url,
                },
            },
            amount: Amount {
                currency: TRANSFER_CURRENCY,
                value: &params.amount,
            },
        }
    }
}

/// Request body for `POST /api/v1/funding-sources`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFundingSourceParams {
    pub dwolla_customer_id: String,
    pub processor_token: String,
    pub bank_name: String,
}

/// Response body for endpoints that create a remote resource.
#[derive(Debug, Serialize)]
pub struct CreatedResource {
    pub location: String,
}
