use std::{error::Error, fmt::Debug};

use chrono::{DateTime, Utc};
use diesel::{Connection, ExpressionMethods, JoinOnDsl, NullableExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::pricing::{quote_deposit, CartLine, DepositPercent};
use crate::models::{Deposit, DepositItem, PickupAppointment, VehicleStatus};
use crate::payment_client::PickupRequest;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DealershipConnection};

// Error associated with creating a deposit and reserving the vehicle
#[derive(Error)]
pub enum CreateDepositError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("vehicle_id: {0} doesn't exist")]
    VehicleNotFound(Uuid),
    #[error("The vehicle already carries an outstanding deposit")]
    VehicleUnavailable(Uuid),
    #[error("{0}")]
    PricingError(#[from] crate::domain::pricing::PricingError)
}

impl Debug for CreateDepositError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

pub struct NewDepositRequest{
    pub vehicle_id: Uuid,
    pub quantity: i32,
    pub percent: DepositPercent,
    pub pickup: Option<PickupRequest>
}

// Confirmed deposit creation. One transaction: price lookup, vehicle
// reservation via a conditional status flip (the double-deposit guard),
// deposit insert, line-item upsert keyed by vehicle id, optional pickup
// appointment.
#[tracing::instrument(
    "Creating deposit and reserving vehicle",
    skip_all
)]
pub async fn create_deposit_and_reserve_vehicle(
    mut conn: DealershipConnection,
    user_id: Uuid,
    request: NewDepositRequest
) -> Result<Deposit, CreateDepositError> {

    let ret = spawn_blocking_with_tracing(move || {
        use crate::schema::deposit_items;
        use crate::schema::deposits;
        use crate::schema::pickup_appointments;
        use crate::schema::vehicles;

        conn.transaction::<Deposit, CreateDepositError, _>(|conn|{
            let unit_price = vehicles::table
                .filter(vehicles::vehicle_id.eq(request.vehicle_id))
                .select(vehicles::price)
                .first::<i64>(conn)
                .optional()?
                .ok_or(CreateDepositError::VehicleNotFound(request.vehicle_id))?;

            // Reservation succeeds only while the vehicle is still available
            let affected_rows = diesel::update(
                    vehicles::table
                        .filter(vehicles::vehicle_id.eq(request.vehicle_id))
                        .filter(vehicles::status.eq(VehicleStatus::Available.as_str()))
                )
                .set(vehicles::status.eq(VehicleStatus::Deposited.as_str()))
                .execute(conn)?;

            if affected_rows == 0 {
                return Err(CreateDepositError::VehicleUnavailable(request.vehicle_id))
            }

            let quote = quote_deposit(
                &[CartLine{
                    vehicle_id: request.vehicle_id,
                    quantity: request.quantity,
                    unit_price
                }],
                request.percent
            )?;

            let deposit = Deposit{
                deposit_id: Uuid::new_v4(),
                vehicle_id: request.vehicle_id,
                user_id,
                deposit_date: Utc::now(),
                amount: quote.deposit_vnd,
                status: "confirmed".to_string()
            };

            diesel::insert_into(deposits::table)
                .values(&deposit)
                .execute(conn)?;

            // One line item per vehicle; re-depositing a previously released
            // vehicle reclaims the historical row
            let item = DepositItem{
                deposit_item_id: Uuid::new_v4(),
                deposit_id: Some(deposit.deposit_id),
                vehicle_id: request.vehicle_id,
                quantity: request.quantity,
                unit_price
            };

            diesel::insert_into(deposit_items::table)
                .values(&item)
                .on_conflict(deposit_items::vehicle_id)
                .do_update()
                .set((
                    deposit_items::deposit_id.eq(item.deposit_id),
                    deposit_items::quantity.eq(item.quantity),
                    deposit_items::unit_price.eq(item.unit_price)
                ))
                .execute(conn)?;

            if let Some(pickup) = request.pickup {
                let appointment = PickupAppointment{
                    appointment_id: Uuid::new_v4(),
                    deposit_id: Some(deposit.deposit_id),
                    scheduled_at: pickup.scheduled_at,
                    location: pickup.location
                };

                diesel::insert_into(pickup_appointments::table)
                    .values(appointment)
                    .execute(conn)?;
            }

            Ok(deposit)
        })
    })
    .await??;

    Ok(ret)
}

// Error associated with cancelling a deposit
#[derive(Error)]
pub enum CancelDepositError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("deposit_id: {0} doesn't exist")]
    NotFound(Uuid),
    #[error("The deposit belongs to another customer")]
    NotOwner(Uuid)
}

impl Debug for CancelDepositError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Cancellation: appointments go away, the line item keeps its history with
// a nulled back-reference, the deposit row is removed and the vehicle is
// released. One transaction so a concurrent confirm sees either all of it
// or none of it.
#[tracing::instrument(
    "Cancelling deposit and releasing vehicle",
    skip(conn)
)]
pub async fn cancel_deposit_and_release_vehicle(
    mut conn: DealershipConnection,
    deposit_id: Uuid,
    requester: Uuid,
    is_staff: bool
) -> Result<Deposit, CancelDepositError> {

    let ret = spawn_blocking_with_tracing(move || {
        use crate::schema::deposit_items;
        use crate::schema::deposits;
        use crate::schema::pickup_appointments;
        use crate::schema::vehicles;

        conn.transaction::<Deposit, CancelDepositError, _>(|conn| {
            let deposit = deposits::table
                .filter(deposits::deposit_id.eq(deposit_id))
                .first::<Deposit>(conn)
                .optional()?
                .ok_or(CancelDepositError::NotFound(deposit_id))?;

            if !is_staff && deposit.user_id != requester {
                return Err(CancelDepositError::NotOwner(deposit_id))
            }

            diesel::delete(pickup_appointments::table)
                .filter(pickup_appointments::deposit_id.eq(Some(deposit_id)))
                .execute(conn)?;

            diesel::update(deposit_items::table)
                .filter(deposit_items::deposit_id.eq(Some(deposit_id)))
                .set(deposit_items::deposit_id.eq(None::<Uuid>))
                .execute(conn)?;

            diesel::delete(deposits::table)
                .filter(deposits::deposit_id.eq(deposit_id))
                .execute(conn)?;

            diesel::update(vehicles::table)
                .filter(vehicles::vehicle_id.eq(deposit.vehicle_id))
                .set(vehicles::status.eq(VehicleStatus::Available.as_str()))
                .execute(conn)?;

            Ok(deposit)
        })
    })
    .await??;

    Ok(ret)
}

// Struct to represent a deposit joined with its line item
#[derive(Serialize, Deserialize)]
pub struct DepositWithItem {
    pub deposit_id: Uuid,
    pub vehicle_id: Uuid,
    pub user_id: Uuid,
    pub deposit_date: String,
    pub amount: i64,
    pub status: String,
    pub quantity: i32,
    pub unit_price: i64,
}

#[tracing::instrument(
    "Getting deposits along with their line items",
    skip_all
)]
pub async fn get_deposits_with_items(
    mut conn: DealershipConnection,
    page: i64,
    limit: i64,
    user_id: Uuid,
    is_staff: bool
) -> Result<Vec<DepositWithItem>, anyhow::Error> {

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::deposit_items;
        use crate::schema::deposits;

        let mut query = deposits::table
            .inner_join(deposit_items::table.on(deposit_items::deposit_id.eq(deposits::deposit_id.nullable())))
            .into_boxed();

        if !is_staff {
            query = query.filter(deposits::user_id.eq(user_id));
        }

        let offset_value = (page - 1) * limit;

        let rows = query
            .select((
                deposits::deposit_id,
                deposits::vehicle_id,
                deposits::user_id,
                deposits::deposit_date,
                deposits::amount,
                deposits::status,
                deposit_items::quantity,
                deposit_items::unit_price
            ))
            .limit(limit)
            .offset(offset_value)
            .load::<(Uuid, Uuid, Uuid, DateTime<Utc>, i64, String, i32, i64)>(&mut conn)
            .context("Failed to load deposits with items")?;

        let deposits = rows.into_iter()
            .map(|(deposit_id, vehicle_id, user_id, deposit_date, amount, status, quantity, unit_price)| {
                DepositWithItem{
                    deposit_id,
                    vehicle_id,
                    user_id,
                    deposit_date: deposit_date.to_string(),
                    amount,
                    status,
                    quantity,
                    unit_price
                }
            })
            .collect();

        Ok::<_, anyhow::Error>(deposits)
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Error associated with updating deposit status
#[derive(Error)]
pub enum UpdateDepositStatusError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("deposit_id: {0} doesn't exist")]
    NoDepositIdError(Uuid)
}

impl Debug for UpdateDepositStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Staff move a deposit to "completed" once the pickup has happened
pub async fn update_deposit_status(
    mut conn: DealershipConnection,
    status: String,
    deposit_id: Uuid
) -> Result<(), UpdateDepositStatusError> {

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::deposits;

        conn.transaction::<(), UpdateDepositStatusError, _>(|conn| {
            let affected_rows = diesel::update(deposits::table)
                                    .filter(deposits::deposit_id.eq(deposit_id))
                                    .set(deposits::status.eq(status))
                                    .execute(conn)?;

            if affected_rows == 0 {
                return Err(UpdateDepositStatusError::NoDepositIdError(deposit_id))
            }

            Ok(())
        })
    })
    .await??;

    Ok(res)
}
