use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsAdmin;
use crate::db_interaction::{update_vehicle, VehicleUpdateError};
use crate::models::{Vehicle, VehicleStatus};
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct UpdateVehicleForm{
    vehicle_id: Uuid,
    name: String,
    price: i64,
    color: Option<String>,
    engine: Option<String>,
    status: String,
    images: Vec<String>,
    production_year: Option<i32>,
    vehicle_type_id: Uuid,
    supplier_id: Option<Uuid>
}

#[tracing::instrument(
    "Updating catalog vehicle",
    skip(pool)
)]
pub async fn update_vehicle_route(
    pool: web::Data<DealershipPool>,
    form: web::Json<UpdateVehicleForm>,
    _: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let form = form.into_inner();

    // Only the known status vocabulary may be written back
    if VehicleStatus::parse(&form.status).is_none(){
        return Err(ErrorBadRequest(
            anyhow::anyhow!("{} is not a recognized vehicle status", form.status)
        ))
    }

    let vehicle = Vehicle{
        vehicle_id: form.vehicle_id,
        name: form.name,
        price: form.price,
        color: form.color,
        engine: form.engine,
        status: form.status,
        images: Vehicle::join_images(&form.images),
        production_year: form.production_year,
        vehicle_type_id: form.vehicle_type_id,
        supplier_id: form.supplier_id
    };

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    update_vehicle(conn, vehicle)
        .await
        .map_err(|e| match e {
            VehicleUpdateError::NotFound(_) => ErrorNotFound(e),
            _ => ErrorInternalServerError(e)
        })?;

    Ok(HttpResponse::Ok().finish())
}
