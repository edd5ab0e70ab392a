use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;

use crate::auth::extractors::IsUser;
use crate::db_interaction::get_notifications;
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct GetNotificationsQuery{
    pub page: i64,
    pub limit: i64
}

#[tracing::instrument(
    "Getting notifications for logged in user",
    skip(pool, uid)
)]
pub async fn get_notifications_route(
    pool: web::Data<DealershipPool>,
    query: web::Query<GetNotificationsQuery>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    let notifications = get_notifications(conn, uid.0, query.0.page, query.0.limit)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(notifications))
}
