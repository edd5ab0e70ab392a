use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::auth::jwt::UserRole;
use crate::db_interaction::{insert_user_into_database, UserInsertError};
use crate::domain::user_email::UserEmail;
use crate::utils::{error_fmt_chain, get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct RegistrationForm{
    email: String,
    name: String,
    password: SecretString,
    confirm_password: SecretString
}

#[derive(Error)]
enum RegisterError{
    #[error("the password and confirm passwords don't match")]
    PasswordNotMatching,
    #[error("user already exists")]
    UserAlreadyExists(#[from] UserInsertError),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for RegisterError{
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            RegisterError::PasswordNotMatching | RegisterError::UserAlreadyExists(_) => {
                HttpResponse::BadRequest().body(format!("{}", self))
            },
            RegisterError::UnexpectedError(_) => {
                HttpResponse::InternalServerError().body(format!("{}", self))
            }
        }
    }
}

#[tracing::instrument(
    "User registration started",
    skip(pool, form)
)]
pub async fn register(
    form: web::Form<RegistrationForm>,
    pool: web::Data<DealershipPool>
) -> Result<HttpResponse, actix_web::Error> {

    if form.password.expose_secret() != form.confirm_password.expose_secret(){
        return Err(RegisterError::PasswordNotMatching.into())
    }

    let email = match UserEmail::parse(form.email.clone()){
        Ok(email) => email,
        Err(e) => return Ok(HttpResponse::BadRequest().body(e))
    };

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|e| RegisterError::UnexpectedError(e.into()))?;

    // Public registration always yields a customer account; staff and admin
    // accounts are provisioned out of band
    insert_user_into_database(conn, form.0.name, email.inner(), form.0.password, UserRole::Customer)
        .await
        .map_err(|e| {
            match e {
                UserInsertError::EmailNotUnique(_) => RegisterError::UserAlreadyExists(e),
                UserInsertError::UnexpectedError(_) => RegisterError::UnexpectedError(e.into())
            }
        })?;

    Ok(HttpResponse::Ok().finish())
}
