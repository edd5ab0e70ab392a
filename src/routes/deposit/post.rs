use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::db_interaction::{
    create_deposit_and_reserve_vehicle, dispatch_deposit_notifications, get_staff_user_ids,
    CreateDepositError, NewDepositRequest
};
use crate::domain::pricing::{DepositPercent, PricingError};
use crate::payment_client::PickupRequest;
use crate::push::NotificationChannels;
use crate::utils::{error_fmt_chain, get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct DepositForm{
    vehicle_id: Uuid,
    quantity: i32,
    percentage: f64,
    pickup: Option<PickupRequest>
}

#[derive(Serialize)]
pub struct DepositResponse{
    pub deposit_id: Uuid,
    pub vehicle_id: Uuid,
    pub amount: i64,
    pub status: String
}

#[derive(Error)]
pub enum PostDepositError{
    #[error("{0}")]
    ValidationError(#[from] PricingError),
    #[error("{0}")]
    CreateError(#[from] CreateDepositError),
    #[error("Failed due to internal server error")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PostDepositError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostDepositError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            PostDepositError::ValidationError(_)
            | PostDepositError::CreateError(CreateDepositError::PricingError(_)) => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            PostDepositError::CreateError(CreateDepositError::VehicleNotFound(_)) => {
                HttpResponse::NotFound().body(format!("{}", self))
            },
            PostDepositError::CreateError(CreateDepositError::VehicleUnavailable(_)) => {
                HttpResponse::Conflict().body(format!("{}", self))
            },
            _ => HttpResponse::InternalServerError().body(format!("{}", self))
        }
    }
}

// The confirmation leg: called after the gateway reports the payment done.
// Persists the deposit and reserves the vehicle; notifications go out after
// the commit and never fail the request.
#[tracing::instrument(
    "Posting confirmed deposit",
    skip(pool, channels, form, uid)
)]
pub async fn post_deposit(
    pool: web::Data<DealershipPool>,
    channels: web::Data<NotificationChannels>,
    form: web::Json<DepositForm>,
    uid: IsUser
) -> Result<HttpResponse, PostDepositError>{
    let form = form.into_inner();
    let percent = DepositPercent::parse(form.percentage)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let deposit = create_deposit_and_reserve_vehicle(
        conn,
        uid.0,
        NewDepositRequest{
            vehicle_id: form.vehicle_id,
            quantity: form.quantity,
            percent,
            pickup: form.pickup
        }
    ).await?;

    notify_deposit_event(
        &pool,
        &channels,
        deposit.user_id,
        "deposit-created",
        &format!("A deposit of {} VND was placed on vehicle {}", deposit.amount, deposit.vehicle_id)
    ).await;

    Ok(HttpResponse::Ok().json(DepositResponse{
        deposit_id: deposit.deposit_id,
        vehicle_id: deposit.vehicle_id,
        amount: deposit.amount,
        status: deposit.status
    }))
}

// Best-effort side channel shared by the create and cancel endpoints
pub async fn notify_deposit_event(
    pool: &web::Data<DealershipPool>,
    channels: &NotificationChannels,
    customer_id: Uuid,
    kind: &str,
    message: &str
){
    let staff_ids = match get_pooled_connection(pool).await {
        Ok(conn) => match get_staff_user_ids(conn).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Failed to load staff recipients: {:?}", e);
                return
            }
        },
        Err(e) => {
            tracing::warn!("Failed to get connection for notifications: {:?}", e);
            return
        }
    };

    match get_pooled_connection(pool).await {
        Ok(conn) => {
            dispatch_deposit_notifications(conn, channels, customer_id, staff_ids, kind, message).await;
        },
        Err(e) => {
            tracing::warn!("Failed to get connection for notifications: {:?}", e);
        }
    }
}
