use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Supplier, VehicleType};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DealershipConnection};

// Shared error shape for the two small catalog tables
#[derive(Error)]
pub enum CatalogError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("An entry with this name already exists")]
    AlreadyExists(#[source] diesel::result::Error),
    #[error("Entry still has dependent vehicles; remove them first")]
    HasDependents(#[source] diesel::result::Error),
    #[error("id: {0} doesn't exist")]
    NotFound(Uuid),
    #[error("Failed to run query")]
    RunQueryError(#[source] diesel::result::Error)
}

impl Debug for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

fn map_insert_error(e: diesel::result::Error) -> CatalogError{
    match e {
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        ) => CatalogError::AlreadyExists(e),
        _ => CatalogError::RunQueryError(e)
    }
}

fn map_delete_error(e: diesel::result::Error) -> CatalogError{
    match e {
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            _
        ) => CatalogError::HasDependents(e),
        _ => CatalogError::RunQueryError(e)
    }
}

#[tracing::instrument(
    "Insert a vehicle type",
    skip_all
)]
pub async fn insert_vehicle_type(
    mut conn: DealershipConnection,
    vehicle_type: VehicleType
) -> Result<(), CatalogError> {
    spawn_blocking_with_tracing(move || {
        use crate::schema::vehicle_types;

        diesel::insert_into(vehicle_types::table)
            .values(vehicle_type)
            .execute(&mut conn)
            .map_err(map_insert_error)
    })
    .await??;

    Ok(())
}

#[tracing::instrument(
    "Getting vehicle types",
    skip_all
)]
pub async fn get_vehicle_types(
    mut conn: DealershipConnection
) -> Result<Vec<VehicleType>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::vehicle_types;

        vehicle_types::table
            .order(vehicle_types::name.asc())
            .load::<VehicleType>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to load vehicle types")?;

    Ok(res)
}

#[tracing::instrument(
    "Deleting vehicle type",
    skip(conn)
)]
pub async fn delete_vehicle_type(
    mut conn: DealershipConnection,
    vehicle_type_id: Uuid
) -> Result<(), CatalogError> {
    spawn_blocking_with_tracing(move || {
        use crate::schema::vehicle_types;

        let affected_rows = diesel::delete(vehicle_types::table)
            .filter(vehicle_types::vehicle_type_id.eq(vehicle_type_id))
            .execute(&mut conn)
            .map_err(map_delete_error)?;

        if affected_rows == 0 {
            return Err(CatalogError::NotFound(vehicle_type_id))
        }

        Ok(())
    })
    .await??;

    Ok(())
}

#[tracing::instrument(
    "Insert a supplier",
    skip_all
)]
pub async fn insert_supplier(
    mut conn: DealershipConnection,
    supplier: Supplier
) -> Result<(), CatalogError> {
    spawn_blocking_with_tracing(move || {
        use crate::schema::suppliers;

        diesel::insert_into(suppliers::table)
            .values(supplier)
            .execute(&mut conn)
            .map_err(map_insert_error)
    })
    .await??;

    Ok(())
}

#[tracing::instrument(
    "Getting suppliers",
    skip_all
)]
pub async fn get_suppliers(
    mut conn: DealershipConnection
) -> Result<Vec<Supplier>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::suppliers;

        suppliers::table
            .order(suppliers::name.asc())
            .load::<Supplier>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to load suppliers")?;

    Ok(res)
}

#[tracing::instrument(
    "Deleting supplier",
    skip(conn)
)]
pub async fn delete_supplier(
    mut conn: DealershipConnection,
    supplier_id: Uuid
) -> Result<(), CatalogError> {
    spawn_blocking_with_tracing(move || {
        use crate::schema::suppliers;

        let affected_rows = diesel::delete(suppliers::table)
            .filter(suppliers::supplier_id.eq(supplier_id))
            .execute(&mut conn)
            .map_err(map_delete_error)?;

        if affected_rows == 0 {
            return Err(CatalogError::NotFound(supplier_id))
        }

        Ok(())
    })
    .await??;

    Ok(())
}
