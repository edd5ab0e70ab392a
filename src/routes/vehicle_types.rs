use actix_web::{error::{ErrorBadRequest, ErrorConflict, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsAdmin;
use crate::db_interaction::{delete_vehicle_type, get_vehicle_types, insert_vehicle_type, CatalogError};
use crate::models::VehicleType;
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct VehicleTypeForm{
    pub name: String,
    pub description: Option<String>
}

#[derive(Deserialize, Debug)]
pub struct DeleteVehicleTypeJson{
    pub vehicle_type_id: Uuid
}

fn map_catalog_error(e: CatalogError) -> actix_web::Error{
    match e {
        CatalogError::AlreadyExists(_) => ErrorBadRequest(e),
        CatalogError::HasDependents(_) => ErrorConflict(e),
        CatalogError::NotFound(_) => ErrorNotFound(e),
        _ => ErrorInternalServerError(e)
    }
}

#[tracing::instrument(
    "Posting vehicle type",
    skip(pool)
)]
pub async fn post_vehicle_type(
    pool: web::Data<DealershipPool>,
    form: web::Form<VehicleTypeForm>,
    _: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let vehicle_type = VehicleType{
        vehicle_type_id: Uuid::new_v4(),
        name: form.0.name,
        description: form.0.description
    };

    let vehicle_type_id = vehicle_type.vehicle_type_id;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    insert_vehicle_type(conn, vehicle_type)
        .await
        .map_err(map_catalog_error)?;

    Ok(HttpResponse::Ok().json(vehicle_type_id))
}

#[tracing::instrument(
    "Getting vehicle types",
    skip(pool)
)]
pub async fn get_vehicle_types_route(
    pool: web::Data<DealershipPool>
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    let types = get_vehicle_types(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(types))
}

#[tracing::instrument(
    "Deleting vehicle type",
    skip(pool)
)]
pub async fn delete_vehicle_type_route(
    pool: web::Data<DealershipPool>,
    json: web::Json<DeleteVehicleTypeJson>,
    _: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    delete_vehicle_type(conn, json.vehicle_type_id)
        .await
        .map_err(map_catalog_error)?;

    Ok(HttpResponse::Ok().finish())
}
