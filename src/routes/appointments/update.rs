use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::db_interaction::{reschedule_pickup_appointment, AppointmentError};
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct RescheduleForm{
    pub appointment_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub location: String
}

#[tracing::instrument(
    "Rescheduling pickup appointment",
    skip(pool, uid)
)]
pub async fn update_appointment(
    pool: web::Data<DealershipPool>,
    form: web::Json<RescheduleForm>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let form = form.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    reschedule_pickup_appointment(
        conn,
        uid.0,
        form.appointment_id,
        form.scheduled_at,
        form.location
    )
    .await
    .map_err(|e| match e {
        AppointmentError::AppointmentNotFound(_) => ErrorNotFound(e),
        _ => ErrorInternalServerError(e)
    })?;

    Ok(HttpResponse::Ok().finish())
}
