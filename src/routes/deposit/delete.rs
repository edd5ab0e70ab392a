use actix_web::{error::{ErrorInternalServerError, ErrorNotFound, ErrorUnauthorized}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::auth::jwt::UserRole;
use crate::db_interaction::{cancel_deposit_and_release_vehicle, CancelDepositError};
use crate::push::NotificationChannels;
use crate::utils::{get_pooled_connection, DealershipPool};

use super::post::notify_deposit_event;

#[derive(Deserialize, Debug)]
pub struct DeleteDepositJson{
    pub deposit_id: Uuid
}

#[tracing::instrument(
    "Cancelling deposit by id",
    skip(pool, channels, uid)
)]
pub async fn delete_deposit(
    pool: web::Data<DealershipPool>,
    channels: web::Data<NotificationChannels>,
    json: web::Json<DeleteDepositJson>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let is_staff = matches!(uid.1, UserRole::Staff | UserRole::Admin);

    let conn = get_pooled_connection(&pool)
                    .await
                    .map_err(|_|{
                        ErrorInternalServerError(
                            anyhow::anyhow!("Failed due to internal error")
                        )
                    })?;

    let deposit = cancel_deposit_and_release_vehicle(conn, json.deposit_id, uid.0, is_staff)
        .await
        .map_err(|e| match e {
            CancelDepositError::NotFound(_) => ErrorNotFound(e),
            CancelDepositError::NotOwner(_) => ErrorUnauthorized(e),
            _ => ErrorInternalServerError(e)
        })?;

    notify_deposit_event(
        &pool,
        &channels,
        deposit.user_id,
        "deposit-cancelled",
        &format!("The deposit on vehicle {} was cancelled", deposit.vehicle_id)
    ).await;

    Ok(HttpResponse::Ok().finish())
}
