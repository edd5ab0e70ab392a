use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::configuration::JWTSettings;

#[derive(Clone)]
pub struct Tokenizer{
    pub secret: SecretString,
    pub expiry_hours: u64
}

impl Tokenizer {
    pub fn new(settings: &JWTSettings) -> Self {
        Self{
            secret: settings.secret.clone(),
            expiry_hours: settings.expiry_hours
        }
    }

    pub fn generate_key(&self, user_id: Uuid, email: String, role: UserRole) -> Result<String, anyhow::Error>{
        let expiry = Utc::now() + Duration::hours(self.expiry_hours as i64);

        let claims = Claims{
            sub: user_id,
            exp: expiry.timestamp() as usize,
            email,
            role
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes())
        )
        .map_err(|_| anyhow::anyhow!("Failed to encode claims into a token"))
    }

    // Pure verification: a typed claims object on success, None on any decline
    pub fn decode_key(&self, token: String) -> Option<Claims>{
        match jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &Validation::new(Algorithm::HS256)
        ) {
            Ok(decoded_data) => Some(decoded_data.claims),
            Err(_) => None
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims{
    pub sub: Uuid,
    pub exp: usize,
    pub email: String,
    pub role: UserRole
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole{
    Customer,
    Staff,
    Admin,
}

impl UserRole{
    pub fn as_str(&self) -> &'static str{
        match self {
            UserRole::Customer => "customer",
            UserRole::Staff => "staff",
            UserRole::Admin => "admin"
        }
    }

    pub fn parse(s: &str) -> Option<UserRole>{
        match s {
            "customer" => Some(UserRole::Customer),
            "staff" => Some(UserRole::Staff),
            "admin" => Some(UserRole::Admin),
            _ => None
        }
    }
}
