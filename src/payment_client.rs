use std::time::Duration;
use std::{error::Error, fmt::Debug};

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::pricing::{CartLine, DepositQuote, DepositPercent, VND_PER_USD};
use crate::utils::error_fmt_chain;

// Client to create charge intents against the external payment gateway
#[derive(Clone)]
pub struct PaymentClient {
    http_client: Client,
    base_url: String,
    secret_key: SecretString,
}

// Everything the gateway stores alongside the intent so the confirmation
// endpoint can be audited against the original checkout
pub struct IntentMetadata<'a> {
    pub user_id: Uuid,
    pub line_items: &'a [CartLine],
    pub percent: DepositPercent,
    pub quote: &'a DepositQuote,
    pub pickup_request: Option<&'a PickupRequest>,
}

#[derive(Serialize, serde::Deserialize, Debug, Clone)]
pub struct PickupRequest {
    pub scheduled_at: chrono::DateTime<chrono::Utc>,
    pub location: String,
}

#[derive(Error)]
pub enum PaymentIntentError {
    #[error("Failed to reach the payment gateway")]
    RequestError(#[from] reqwest::Error),
    #[error("Failed to serialize intent metadata")]
    MetadataError(#[from] serde_json::Error),
    #[error("The gateway response carried no client secret")]
    MissingClientSecret,
}

impl Debug for PaymentIntentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl PaymentClient {
    pub fn new(base_url: String, secret_key: SecretString, timeout: u64) -> PaymentClient {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .unwrap();

        Self {
            http_client,
            base_url,
            secret_key,
        }
    }

    // Create a charge intent for the capped amount; returns the client secret
    // the storefront hands to the gateway's browser SDK. Nothing is persisted
    // locally at this point.
    #[tracing::instrument(
        "Creating payment intent at the gateway",
        skip(self, metadata)
    )]
    pub async fn create_payment_intent(
        &self,
        amount_minor_units: i64,
        metadata: IntentMetadata<'_>,
    ) -> Result<String, PaymentIntentError> {
        let url = format!("{}/v1/payment_intents", self.base_url);

        let amount = amount_minor_units.to_string();
        let user_id = metadata.user_id.to_string();
        let line_items = serde_json::to_string(metadata.line_items)?;
        let conversion_rate = VND_PER_USD.to_string();
        let percent = metadata.percent.as_f64().to_string();
        let total_vnd = metadata.quote.total_vnd.to_string();
        let deposit_vnd = metadata.quote.deposit_vnd.to_string();
        let capped = metadata.quote.capped.to_string();

        let mut form: Vec<(&str, &str)> = vec![
            ("amount", amount.as_str()),
            ("currency", "usd"),
            ("metadata[user_id]", user_id.as_str()),
            ("metadata[line_items]", line_items.as_str()),
            ("metadata[conversion_rate]", conversion_rate.as_str()),
            ("metadata[deposit_percent]", percent.as_str()),
            ("metadata[total_vnd]", total_vnd.as_str()),
            ("metadata[deposit_vnd]", deposit_vnd.as_str()),
            ("metadata[capped]", capped.as_str()),
        ];

        let pickup;
        if let Some(request) = metadata.pickup_request {
            pickup = serde_json::to_string(request)?;
            form.push(("metadata[pickup_request]", pickup.as_str()));
        }

        let response: serde_json::Value = self
            .http_client
            .post(url)
            .basic_auth(self.secret_key.expose_secret(), None::<&str>)
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response["client_secret"]
            .as_str()
            .map(String::from)
            .ok_or(PaymentIntentError::MissingClientSecret)
    }
}
