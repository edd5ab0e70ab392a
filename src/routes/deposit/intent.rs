use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::db_interaction::{get_vehicle_prices, VehicleLookupError};
use crate::domain::pricing::{quote_deposit, CartLine, DepositPercent, PricingError};
use crate::payment_client::{IntentMetadata, PaymentClient, PaymentIntentError, PickupRequest};
use crate::utils::{error_fmt_chain, get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct CartItem{
    vehicle_id: Uuid,
    quantity: i32
}

#[derive(Deserialize, Debug)]
pub struct IntentForm{
    items: Vec<CartItem>,
    percentage: f64,
    pickup: Option<PickupRequest>
}

// What the storefront needs to drive the gateway's browser-side confirmation
#[derive(Serialize)]
pub struct IntentResponse{
    pub client_secret: String,
    pub total_vnd: i64,
    pub deposit_vnd: i64,
    pub gateway_amount: i64,
    pub capped: bool
}

#[derive(Error)]
pub enum PostIntentError{
    #[error("{0}")]
    ValidationError(#[from] PricingError),
    #[error("{0}")]
    VehicleError(#[from] VehicleLookupError),
    #[error("Failed to create intent at the payment gateway")]
    GatewayError(#[from] PaymentIntentError),
    #[error("Failed due to internal server error")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PostIntentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostIntentError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            PostIntentError::ValidationError(_) => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            PostIntentError::VehicleError(VehicleLookupError::NotFound(_)) => {
                HttpResponse::NotFound().body(format!("{}", self))
            },
            _ => HttpResponse::InternalServerError().body(format!("{}", self))
        }
    }
}

// The first leg of the checkout: price the cart, validate the percentage,
// ask the gateway for a client secret. No local state is written here;
// the confirmation endpoint persists the deposit after payment completes.
#[tracing::instrument(
    "Creating deposit payment intent",
    skip(pool, payment_client, form, uid)
)]
pub async fn post_deposit_intent(
    pool: web::Data<DealershipPool>,
    payment_client: web::Data<PaymentClient>,
    form: web::Json<IntentForm>,
    uid: IsUser
) -> Result<HttpResponse, PostIntentError>{
    let form = form.into_inner();
    let percent = DepositPercent::parse(form.percentage)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let vehicle_ids: Vec<Uuid> = form.items.iter()
        .map(|item| item.vehicle_id)
        .collect();

    let prices = get_vehicle_prices(conn, vehicle_ids).await?;

    let lines: Vec<CartLine> = form.items.iter()
        .zip(prices.iter())
        .map(|(item, (_, unit_price))| CartLine{
            vehicle_id: item.vehicle_id,
            quantity: item.quantity,
            unit_price: *unit_price
        })
        .collect();

    let quote = quote_deposit(&lines, percent)?;

    let client_secret = payment_client.create_payment_intent(
        quote.gateway_minor_units,
        IntentMetadata{
            user_id: uid.0,
            line_items: &lines,
            percent,
            quote: &quote,
            pickup_request: form.pickup.as_ref()
        }
    )
    .await?;

    Ok(HttpResponse::Ok().json(IntentResponse{
        client_secret,
        total_vnd: quote.total_vnd,
        deposit_vnd: quote.deposit_vnd,
        gateway_amount: quote.gateway_minor_units,
        capped: quote.capped
    }))
}
