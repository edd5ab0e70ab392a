use actix_web::{error::ErrorUnauthorized, web, FromRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use super::jwt::{Claims, Tokenizer, UserRole};

// Extractor for any authenticated account; carries the role for handlers
// that branch on it
pub struct IsUser(pub Uuid, pub UserRole);

// Extractor for staff-or-admin endpoints
pub struct IsStaff(pub Uuid);

// Extractor for admin-only endpoints
pub struct IsAdmin(pub Uuid);

fn decode_bearer_claims(req: &actix_web::HttpRequest) -> Result<Claims, actix_web::Error>{
    let tokenizer: &web::Data<Tokenizer> = req.app_data()
        .ok_or_else(|| ErrorUnauthorized("Invalid token"))?;

    let auth = req.headers()
        .get("Authorization")
        .ok_or_else(|| ErrorUnauthorized("Invalid token"))?;

    let header_value = auth.to_str()
        .map_err(|_| ErrorUnauthorized("Invalid token"))?;
    let token = header_value
        .strip_prefix("Bearer")
        .ok_or_else(|| ErrorUnauthorized("Invalid token"))?
        .trim();

    tokenizer.decode_key(token.to_string())
        .ok_or_else(|| ErrorUnauthorized("Invalid Token"))
}

impl FromRequest for IsUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            decode_bearer_claims(req)
                .map(|claims| IsUser(claims.sub, claims.role))
        )
    }
}

impl FromRequest for IsStaff {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            decode_bearer_claims(req)
                .and_then(|claims| match claims.role {
                    UserRole::Staff | UserRole::Admin => Ok(IsStaff(claims.sub)),
                    UserRole::Customer => Err(ErrorUnauthorized("Unauthorized Role"))
                })
        )
    }
}

impl FromRequest for IsAdmin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            decode_bearer_claims(req)
                .and_then(|claims| match claims.role {
                    UserRole::Admin => Ok(IsAdmin(claims.sub)),
                    _ => Err(ErrorUnauthorized("Unauthorized Role"))
                })
        )
    }
}
