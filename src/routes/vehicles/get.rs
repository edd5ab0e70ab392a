use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db_interaction::get_vehicles;
use crate::models::Vehicle;
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct GetVehiclesQuery {
    page: i64,
    limit: i64
}

// Catalog view with the stored image string split back into a list
#[derive(Serialize)]
pub struct VehicleResponse{
    pub vehicle_id: Uuid,
    pub name: String,
    pub price: i64,
    pub color: Option<String>,
    pub engine: Option<String>,
    pub status: String,
    pub images: Vec<String>,
    pub production_year: Option<i32>,
    pub vehicle_type_id: Uuid,
    pub supplier_id: Option<Uuid>
}

impl From<Vehicle> for VehicleResponse{
    fn from(vehicle: Vehicle) -> Self{
        let images = vehicle.split_images();
        VehicleResponse{
            vehicle_id: vehicle.vehicle_id,
            name: vehicle.name,
            price: vehicle.price,
            color: vehicle.color,
            engine: vehicle.engine,
            status: vehicle.status,
            images,
            production_year: vehicle.production_year,
            vehicle_type_id: vehicle.vehicle_type_id,
            supplier_id: vehicle.supplier_id
        }
    }
}

#[tracing::instrument(
    "Get catalog vehicles",
    skip(pool)
)]
pub async fn get_vehicles_route(
    pool: web::Data<DealershipPool>,
    query: web::Query<GetVehiclesQuery>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    let vehicles = get_vehicles(conn, query.0.page, query.0.limit)
        .await
        .map_err(ErrorInternalServerError)?;

    let response: Vec<VehicleResponse> = vehicles.into_iter()
        .map(VehicleResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}
