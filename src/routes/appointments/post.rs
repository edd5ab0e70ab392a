use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::db_interaction::{insert_pickup_appointment, AppointmentError};
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct AppointmentForm{
    pub deposit_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub location: String
}

#[tracing::instrument(
    "Scheduling pickup appointment",
    skip(pool, uid)
)]
pub async fn post_appointment(
    pool: web::Data<DealershipPool>,
    form: web::Json<AppointmentForm>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let form = form.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    let appointment = insert_pickup_appointment(
        conn,
        uid.0,
        form.deposit_id,
        form.scheduled_at,
        form.location
    )
    .await
    .map_err(|e| match e {
        AppointmentError::DepositNotFound(_) => ErrorNotFound(e),
        _ => ErrorInternalServerError(e)
    })?;

    Ok(HttpResponse::Ok().json(appointment))
}
