use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError, ErrorUnauthorized}, web, HttpResponse};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{Tokenizer, UserRole};
use crate::db_interaction::get_user_by_email;
use crate::domain::user_email::UserEmail;
use crate::password::verify_password;
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct LoginForm{
    pub email: String,
    pub password: SecretString
}

#[derive(Serialize)]
pub struct LoginResponse{
    pub token: String
}

#[tracing::instrument(
    "Logging in user",
    skip(pool, tokenizer, form)
)]
pub async fn login(
    pool: web::Data<DealershipPool>,
    tokenizer: web::Data<Tokenizer>,
    form: web::Form<LoginForm>
) -> Result<HttpResponse, actix_web::Error>{
    let email = UserEmail::parse(form.0.email)
                    .map_err(ErrorBadRequest)?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    let user = match get_user_by_email(conn, email.inner()).await
                        .map_err(ErrorInternalServerError)?{
        Some(u) => u,
        None => return Err(ErrorBadRequest(anyhow::anyhow!("No user registered with this email")))
    };

    match verify_password(form.0.password, user.password.clone()).await{
        Ok(res) => {
            if !res {
                tracing::info!("Passwords did not match");
                return Err(ErrorUnauthorized("Email or password is incorrect"))
            }
        },
        Err(e) => {
            let err = e.to_string();
            tracing::error!(err);
            return Err(ErrorInternalServerError("Failed to login"));
        }
    }

    let role = UserRole::parse(&user.role)
        .ok_or_else(|| ErrorInternalServerError("Stored role is not recognized"))?;

    let token = tokenizer.generate_key(user.user_id, user.email, role)
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(LoginResponse{ token }))
}
