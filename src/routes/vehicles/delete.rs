use actix_web::{error::{ErrorConflict, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsAdmin;
use crate::db_interaction::{delete_vehicle, VehicleDeleteError};
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct DeleteVehicleJson{
    pub vehicle_id: Uuid
}

#[tracing::instrument(
    "Deleting vehicle by id",
    skip(pool)
)]
pub async fn delete_vehicle_route(
    pool: web::Data<DealershipPool>,
    json: web::Json<DeleteVehicleJson>,
    _: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
                    .await
                    .map_err(|_|{
                        ErrorInternalServerError(
                            anyhow::anyhow!("Failed due to internal error")
                        )
                    })?;

    delete_vehicle(conn, json.vehicle_id)
        .await
        .map_err(|e| match e {
            VehicleDeleteError::NotFound(_) => ErrorNotFound(e),
            VehicleDeleteError::HasDependents(_) => ErrorConflict(e),
            _ => ErrorInternalServerError(e)
        })?;

    Ok(HttpResponse::Ok().finish())
}
