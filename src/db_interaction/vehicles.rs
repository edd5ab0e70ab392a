use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Vehicle;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DealershipConnection};

#[tracing::instrument(
    "Getting vehicles from db",
    skip(conn)
)]
pub async fn get_vehicles(
    mut conn: DealershipConnection,
    page: i64,
    limit: i64
) -> Result<Vec<Vehicle>, anyhow::Error>{
    let offset_value = (page - 1) * limit;

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::vehicles;

        vehicles::table
            .limit(limit)
            .offset(offset_value)
            .load::<Vehicle>(&mut conn)
            .context("Failed to get vehicles")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Error)]
pub enum VehicleInsertError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("A vehicle with this id already exists")]
    AlreadyExists(#[source] diesel::result::Error),
    #[error("Referenced vehicle type or supplier does not exist")]
    BadReference(#[source] diesel::result::Error),
    #[error("Failed to insert into vehicles table")]
    InsertError(#[source] diesel::result::Error)
}

impl Debug for VehicleInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Insert a vehicle to db",
    skip_all
)]
pub async fn insert_vehicle(
    mut conn: DealershipConnection,
    vehicle: Vehicle
) -> Result<(), VehicleInsertError> {

    spawn_blocking_with_tracing(move || {
        use crate::schema::vehicles;

        diesel::insert_into(vehicles::table)
            .values(vehicle)
            .execute(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _
                ) => VehicleInsertError::AlreadyExists(e),
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                    _
                ) => VehicleInsertError::BadReference(e),
                _ => VehicleInsertError::InsertError(e)
            })
    })
    .await??;

    Ok(())
}

#[derive(Error)]
pub enum VehicleUpdateError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("vehicle_id: {0} doesn't exist")]
    NotFound(Uuid),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for VehicleUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Updating vehicle row",
    skip(conn, vehicle)
)]
pub async fn update_vehicle(
    mut conn: DealershipConnection,
    vehicle: Vehicle
) -> Result<(), VehicleUpdateError> {

    spawn_blocking_with_tracing(move || {
        use crate::schema::vehicles;

        let affected_rows = diesel::update(vehicles::table)
            .filter(vehicles::vehicle_id.eq(vehicle.vehicle_id))
            .set((
                vehicles::name.eq(vehicle.name),
                vehicles::price.eq(vehicle.price),
                vehicles::color.eq(vehicle.color),
                vehicles::engine.eq(vehicle.engine),
                vehicles::status.eq(vehicle.status),
                vehicles::images.eq(vehicle.images),
                vehicles::production_year.eq(vehicle.production_year),
                vehicles::vehicle_type_id.eq(vehicle.vehicle_type_id),
                vehicles::supplier_id.eq(vehicle.supplier_id)
            ))
            .execute(&mut conn)?;

        if affected_rows == 0 {
            return Err(VehicleUpdateError::NotFound(vehicle.vehicle_id))
        }

        Ok(())
    })
    .await??;

    Ok(())
}

#[derive(Error)]
pub enum VehicleDeleteError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("vehicle_id: {0} doesn't exist")]
    NotFound(Uuid),
    #[error("Vehicle has dependent deposits or reviews; remove them first")]
    HasDependents(#[source] diesel::result::Error),
    #[error("Failed to run query")]
    RunQueryError(#[source] diesel::result::Error)
}

impl Debug for VehicleDeleteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Deleting vehicle by id",
    skip(conn)
)]
pub async fn delete_vehicle(
    mut conn: DealershipConnection,
    vehicle_id: Uuid
) -> Result<(), VehicleDeleteError> {

    spawn_blocking_with_tracing(move || {
        use crate::schema::vehicles;

        let affected_rows = diesel::delete(vehicles::table)
            .filter(vehicles::vehicle_id.eq(vehicle_id))
            .execute(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                    _
                ) => VehicleDeleteError::HasDependents(e),
                _ => VehicleDeleteError::RunQueryError(e)
            })?;

        if affected_rows == 0 {
            return Err(VehicleDeleteError::NotFound(vehicle_id))
        }

        Ok(())
    })
    .await??;

    Ok(())
}

#[derive(Error)]
pub enum VehicleLookupError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("vehicle_id: {0} doesn't exist")]
    NotFound(Uuid),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for VehicleLookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Price snapshots for a cart; any missing id fails the whole lookup
#[tracing::instrument(
    "Getting current prices for cart vehicles",
    skip(conn)
)]
pub async fn get_vehicle_prices(
    mut conn: DealershipConnection,
    vehicle_ids: Vec<Uuid>
) -> Result<Vec<(Uuid, i64)>, VehicleLookupError> {

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::vehicles;

        let mut prices = Vec::with_capacity(vehicle_ids.len());

        for vehicle_id in vehicle_ids {
            let price = vehicles::table
                .filter(vehicles::vehicle_id.eq(vehicle_id))
                .select(vehicles::price)
                .first::<i64>(&mut conn)
                .optional()?
                .ok_or(VehicleLookupError::NotFound(vehicle_id))?;

            prices.push((vehicle_id, price));
        }

        Ok::<_, VehicleLookupError>(prices)
    })
    .await??;

    Ok(res)
}
