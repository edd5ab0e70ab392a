use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;

use crate::auth::extractors::IsUser;
use crate::auth::jwt::UserRole;
use crate::db_interaction::get_deposits_with_items;
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct GetDepositQuery{
    pub page: i64,
    pub limit: i64
}

#[tracing::instrument(
    "Getting list of deposits",
    skip(pool, uid)
)]
pub async fn get_deposit(
    pool: web::Data<DealershipPool>,
    query: web::Query<GetDepositQuery>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error> {
    let user_id = uid.0;
    let is_staff = matches!(uid.1, UserRole::Staff | UserRole::Admin);

    let conn = get_pooled_connection(&pool)
                .await
                .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    let deposits = get_deposits_with_items(
        conn,
        query.0.page,
        query.0.limit,
        user_id,
        is_staff
    )
    .await
    .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(deposits))
}
