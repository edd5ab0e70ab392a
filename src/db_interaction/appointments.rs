use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::{DateTime, Utc};
use diesel::{Connection, ExpressionMethods, JoinOnDsl, NullableExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::models::PickupAppointment;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DealershipConnection};

#[derive(Error)]
pub enum AppointmentError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("deposit_id: {0} doesn't exist or belongs to another customer")]
    DepositNotFound(Uuid),
    #[error("appointment_id: {0} doesn't exist or belongs to another customer")]
    AppointmentNotFound(Uuid)
}

impl Debug for AppointmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Customers schedule pickups only against deposits they own
#[tracing::instrument(
    "Creating pickup appointment",
    skip(conn)
)]
pub async fn insert_pickup_appointment(
    mut conn: DealershipConnection,
    user_id: Uuid,
    deposit_id: Uuid,
    scheduled_at: DateTime<Utc>,
    location: String
) -> Result<PickupAppointment, AppointmentError> {

    let ret = spawn_blocking_with_tracing(move || {
        use crate::schema::deposits;
        use crate::schema::pickup_appointments;

        conn.transaction::<PickupAppointment, AppointmentError, _>(|conn| {
            let owner = deposits::table
                .filter(deposits::deposit_id.eq(deposit_id))
                .select(deposits::user_id)
                .first::<Uuid>(conn)
                .optional()?
                .ok_or(AppointmentError::DepositNotFound(deposit_id))?;

            if owner != user_id {
                return Err(AppointmentError::DepositNotFound(deposit_id))
            }

            let appointment = PickupAppointment{
                appointment_id: Uuid::new_v4(),
                deposit_id: Some(deposit_id),
                scheduled_at,
                location
            };

            diesel::insert_into(pickup_appointments::table)
                .values(&appointment)
                .execute(conn)?;

            Ok(appointment)
        })
    })
    .await??;

    Ok(ret)
}

// Rescheduling replaces date and place in one go
#[tracing::instrument(
    "Rescheduling pickup appointment",
    skip(conn)
)]
pub async fn reschedule_pickup_appointment(
    mut conn: DealershipConnection,
    user_id: Uuid,
    appointment_id: Uuid,
    scheduled_at: DateTime<Utc>,
    location: String
) -> Result<(), AppointmentError> {

    spawn_blocking_with_tracing(move || {
        use crate::schema::deposits;
        use crate::schema::pickup_appointments;

        conn.transaction::<(), AppointmentError, _>(|conn| {
            let owned_appointment = pickup_appointments::table
                .inner_join(deposits::table.on(
                    pickup_appointments::deposit_id.eq(deposits::deposit_id.nullable())
                ))
                .filter(pickup_appointments::appointment_id.eq(appointment_id))
                .filter(deposits::user_id.eq(user_id))
                .select(pickup_appointments::appointment_id)
                .first::<Uuid>(conn)
                .optional()?;

            if owned_appointment.is_none(){
                return Err(AppointmentError::AppointmentNotFound(appointment_id))
            }

            diesel::update(pickup_appointments::table)
                .filter(pickup_appointments::appointment_id.eq(appointment_id))
                .set((
                    pickup_appointments::scheduled_at.eq(scheduled_at),
                    pickup_appointments::location.eq(location)
                ))
                .execute(conn)?;

            Ok(())
        })
    })
    .await??;

    Ok(())
}

// The listing is owner-scoped like create and reschedule; a deposit that
// belongs to someone else reads as having no appointments
#[tracing::instrument(
    "Getting appointments for deposit",
    skip(conn)
)]
pub async fn get_appointments_for_deposit(
    mut conn: DealershipConnection,
    user_id: Uuid,
    deposit_id: Uuid
) -> Result<Vec<PickupAppointment>, anyhow::Error> {

    let res = spawn_blocking_with_tracing(move || {
        use crate::schema::deposits;
        use crate::schema::pickup_appointments;

        pickup_appointments::table
            .inner_join(deposits::table.on(
                pickup_appointments::deposit_id.eq(deposits::deposit_id.nullable())
            ))
            .filter(pickup_appointments::deposit_id.eq(Some(deposit_id)))
            .filter(deposits::user_id.eq(user_id))
            .select((
                pickup_appointments::appointment_id,
                pickup_appointments::deposit_id,
                pickup_appointments::scheduled_at,
                pickup_appointments::location
            ))
            .order(pickup_appointments::scheduled_at.asc())
            .load::<PickupAppointment>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to load appointments")?;

    Ok(res)
}
