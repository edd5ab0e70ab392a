use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsStaff;
use crate::db_interaction::{update_deposit_status, UpdateDepositStatusError};
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct UpdateDepositStatusForm{
    pub deposit_id: Uuid,
    pub status: DepositStatus
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus{
    Pending,
    Confirmed,
    Completed
}

impl DepositStatus{
    fn as_str(&self) -> &'static str{
        match self {
            DepositStatus::Pending => "pending",
            DepositStatus::Confirmed => "confirmed",
            DepositStatus::Completed => "completed"
        }
    }
}

// Staff record lifecycle progress; completion happens when the pickup
// appointment is done. Cancellation is not a status write, it goes through
// the delete endpoint.
#[tracing::instrument(
    "Updating deposit status",
    skip(pool)
)]
pub async fn update_deposit(
    pool: web::Data<DealershipPool>,
    form: web::Form<UpdateDepositStatusForm>,
    _: IsStaff
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError(anyhow::anyhow!("Failed due to internal error")))?;

    update_deposit_status(conn, form.status.as_str().to_string(), form.deposit_id)
        .await
        .map_err(|e| match e {
            UpdateDepositStatusError::NoDepositIdError(_) => ErrorNotFound(e),
            _ => ErrorInternalServerError(e)
        })?;

    Ok(HttpResponse::Ok().finish())
}
