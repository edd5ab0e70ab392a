use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::db_interaction::get_appointments_for_deposit;
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct GetAppointmentsQuery{
    pub deposit_id: Uuid
}

#[tracing::instrument(
    "Getting appointments for deposit",
    skip(pool, uid)
)]
pub async fn get_appointments(
    pool: web::Data<DealershipPool>,
    query: web::Query<GetAppointmentsQuery>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    let appointments = get_appointments_for_deposit(conn, uid.0, query.0.deposit_id)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(appointments))
}
