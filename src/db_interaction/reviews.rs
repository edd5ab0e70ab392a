use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Review;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DealershipConnection};

#[derive(Error)]
pub enum ReviewError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("The referenced vehicle doesn't exist")]
    VehicleNotFound(#[source] diesel::result::Error),
    #[error("review_id: {0} doesn't exist or belongs to another customer")]
    NotFound(Uuid),
    #[error("Failed to run query")]
    RunQueryError(#[source] diesel::result::Error)
}

impl Debug for ReviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Insert a review",
    skip_all
)]
pub async fn insert_review(
    mut conn: DealershipConnection,
    review: Review
) -> Result<(), ReviewError> {
    spawn_blocking_with_tracing(move || {
        use crate::schema::reviews;

        diesel::insert_into(reviews::table)
            .values(review)
            .execute(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                    _
                ) => ReviewError::VehicleNotFound(e),
                _ => ReviewError::RunQueryError(e)
            })
    })
    .await??;

    Ok(())
}

#[tracing::instrument(
    "Getting reviews for vehicle",
    skip(conn)
)]
pub async fn get_reviews_for_vehicle(
    mut conn: DealershipConnection,
    vehicle_id: Uuid,
    page: i64,
    limit: i64
) -> Result<Vec<Review>, anyhow::Error> {
    let offset_value = (page - 1) * limit;

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::reviews;

        reviews::table
            .filter(reviews::vehicle_id.eq(vehicle_id))
            .order(reviews::created_at.desc())
            .limit(limit)
            .offset(offset_value)
            .load::<Review>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to load reviews")?;

    Ok(res)
}

// Authors remove their own reviews only
#[tracing::instrument(
    "Deleting review",
    skip(conn)
)]
pub async fn delete_review(
    mut conn: DealershipConnection,
    user_id: Uuid,
    review_id: Uuid
) -> Result<(), ReviewError> {
    spawn_blocking_with_tracing(move || {
        use crate::schema::reviews;

        let affected_rows = diesel::delete(reviews::table)
            .filter(reviews::review_id.eq(review_id))
            .filter(reviews::user_id.eq(user_id))
            .execute(&mut conn)
            .map_err(ReviewError::RunQueryError)?;

        if affected_rows == 0 {
            return Err(ReviewError::NotFound(review_id))
        }

        Ok(())
    })
    .await??;

    Ok(())
}
