use std::{error::Error, fmt::Debug};

use anyhow::{anyhow, Context};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::jwt::UserRole;
use crate::models::{User, UserProfileInfo};
use crate::password::compute_password_hash;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DealershipConnection};

#[derive(Error)]
pub enum UserInsertError{
    #[error("email field is not unique")]
    EmailNotUnique(#[source] anyhow::Error),
    #[error("unexpected database / hashing error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for UserInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting user into the database",
    skip_all
)]
pub async fn insert_user_into_database(
    mut conn: DealershipConnection,
    name: String,
    email: String,
    password: SecretString,
    role: UserRole
) -> Result<Uuid, UserInsertError> {

    let password_hash = spawn_blocking_with_tracing(move || {
        compute_password_hash(password)
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(UserInsertError::UnexpectedError)?
    .map_err(UserInsertError::UnexpectedError)?;

    let uid = Uuid::new_v4();
    let user = User{
        user_id: uid,
        name,
        email,
        password: password_hash.expose_secret().to_string(),
        role: role.as_str().to_string(),
        phone_number: None,
        address: None
    };

    spawn_blocking_with_tracing(move || {
        use crate::schema::users;

        diesel::insert_into(users::table)
            .values(user)
            .execute(&mut conn)
            .map_err(|e|{
                match e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        a
                    ) => {
                        UserInsertError::EmailNotUnique(anyhow!(a.message().to_string()))
                    },

                    _ => UserInsertError::UnexpectedError(anyhow!("Unexpected diesel / database error"))
                }
            })
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(UserInsertError::UnexpectedError)??;

    Ok(uid)
}

#[tracing::instrument(
    "Getting user info from email",
    skip(conn)
)]
pub async fn get_user_by_email(
    mut conn: DealershipConnection,
    email: String
) -> Result<Option<User>, anyhow::Error>{
    let user = spawn_blocking_with_tracing(move || {
        use crate::schema::users;

        users::table
            .filter(users::email.eq(email))
            .first::<User>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to query user by email")?;

    Ok(user)
}

#[tracing::instrument(
    "Getting user profile info",
    skip(conn)
)]
pub async fn get_user_profile_info(
    mut conn: DealershipConnection,
    user_id: Uuid
) -> Result<UserProfileInfo, anyhow::Error>{
    let info = spawn_blocking_with_tracing(move || {
        use crate::schema::users;

        users::table
            .filter(users::user_id.eq(user_id))
            .select((
                users::name,
                users::email,
                users::phone_number,
                users::address
            ))
            .first::<UserProfileInfo>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to get user profile info")?;

    Ok(info)
}

// Staff accounts are the fan-out targets for deposit notifications
#[tracing::instrument(
    "Getting staff user ids",
    skip_all
)]
pub async fn get_staff_user_ids(
    mut conn: DealershipConnection
) -> Result<Vec<Uuid>, anyhow::Error>{
    let ids = spawn_blocking_with_tracing(move || {
        use crate::schema::users;

        users::table
            .filter(users::role.eq(UserRole::Staff.as_str()))
            .select(users::user_id)
            .load::<Uuid>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?
    .context("Failed to load staff user ids")?;

    Ok(ids)
}
