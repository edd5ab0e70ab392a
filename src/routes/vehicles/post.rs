use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::extractors::IsAdmin;
use crate::db_interaction::{insert_vehicle, VehicleInsertError};
use crate::models::{Vehicle, VehicleStatus};
use crate::utils::{error_fmt_chain, get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct VehicleForm{
    name: String,
    price: i64,
    color: Option<String>,
    engine: Option<String>,
    images: Vec<String>,
    production_year: Option<i32>,
    vehicle_type_id: Uuid,
    supplier_id: Option<Uuid>
}

#[derive(Error)]
pub enum PostVehicleError{
    #[error("Failed to insert vehicle")]
    InsertVehicleError(#[from] VehicleInsertError),
    #[error("Failed due to internal server error")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PostVehicleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostVehicleError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            PostVehicleError::InsertVehicleError(VehicleInsertError::AlreadyExists(_))
            | PostVehicleError::InsertVehicleError(VehicleInsertError::BadReference(_)) => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            _ => HttpResponse::InternalServerError().body(format!("{}", self))
        }
    }
}

#[tracing::instrument(
    "Posting vehicle to catalog",
    skip(pool)
)]
pub async fn post_vehicle(
    pool: web::Data<DealershipPool>,
    form: web::Json<VehicleForm>,
    _: IsAdmin
) -> Result<HttpResponse, PostVehicleError>{

    let form = form.into_inner();
    let vehicle = Vehicle{
        vehicle_id: Uuid::new_v4(),
        name: form.name,
        price: form.price,
        color: form.color,
        engine: form.engine,
        status: VehicleStatus::Available.as_str().to_string(),
        images: Vehicle::join_images(&form.images),
        production_year: form.production_year,
        vehicle_type_id: form.vehicle_type_id,
        supplier_id: form.supplier_id
    };

    let vehicle_id = vehicle.vehicle_id;

    let conn = get_pooled_connection(&pool)
                .await
                .context("Failed to get connection from pool")?;

    insert_vehicle(conn, vehicle).await?;

    Ok(HttpResponse::Ok().json(vehicle_id))
}
