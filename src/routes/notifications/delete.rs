use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::db_interaction::delete_notification;
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct DeleteNotificationJson{
    pub notification_id: Uuid
}

#[tracing::instrument(
    "Deleting notification",
    skip(pool, uid)
)]
pub async fn delete_notification_route(
    pool: web::Data<DealershipPool>,
    json: web::Json<DeleteNotificationJson>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    let owned = delete_notification(conn, uid.0, json.notification_id)
        .await
        .map_err(ErrorInternalServerError)?;

    if !owned {
        return Err(ErrorNotFound(
            anyhow::anyhow!("notification_id: {} doesn't exist", json.notification_id)
        ))
    }

    Ok(HttpResponse::Ok().finish())
}
