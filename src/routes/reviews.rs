use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsUser;
use crate::db_interaction::{delete_review, get_reviews_for_vehicle, insert_review, ReviewError};
use crate::models::Review;
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct ReviewForm{
    pub vehicle_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>
}

#[derive(Deserialize, Debug)]
pub struct GetReviewsQuery{
    pub vehicle_id: Uuid,
    pub page: i64,
    pub limit: i64
}

#[derive(Deserialize, Debug)]
pub struct DeleteReviewJson{
    pub review_id: Uuid
}

#[tracing::instrument(
    "Posting vehicle review",
    skip(pool, uid)
)]
pub async fn post_review(
    pool: web::Data<DealershipPool>,
    form: web::Json<ReviewForm>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    if !(1..=5).contains(&form.rating){
        return Err(ErrorBadRequest(
            anyhow::anyhow!("rating must be between 1 and 5")
        ))
    }

    let review = Review{
        review_id: Uuid::new_v4(),
        vehicle_id: form.vehicle_id,
        user_id: uid.0,
        rating: form.rating,
        comment: form.0.comment,
        created_at: Utc::now()
    };

    let review_id = review.review_id;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    insert_review(conn, review)
        .await
        .map_err(|e| match e {
            ReviewError::VehicleNotFound(_) => ErrorNotFound(e),
            _ => ErrorInternalServerError(e)
        })?;

    Ok(HttpResponse::Ok().json(review_id))
}

#[tracing::instrument(
    "Getting reviews for vehicle",
    skip(pool)
)]
pub async fn get_reviews(
    pool: web::Data<DealershipPool>,
    query: web::Query<GetReviewsQuery>
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    let reviews = get_reviews_for_vehicle(conn, query.0.vehicle_id, query.0.page, query.0.limit)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(reviews))
}

#[tracing::instrument(
    "Deleting review",
    skip(pool, uid)
)]
pub async fn delete_review_route(
    pool: web::Data<DealershipPool>,
    json: web::Json<DeleteReviewJson>,
    uid: IsUser
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    delete_review(conn, uid.0, json.review_id)
        .await
        .map_err(|e| match e {
            ReviewError::NotFound(_) => ErrorNotFound(e),
            _ => ErrorInternalServerError(e)
        })?;

    Ok(HttpResponse::Ok().finish())
}
