use actix_web::{error::{ErrorBadRequest, ErrorConflict, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::IsAdmin;
use crate::db_interaction::{delete_supplier, get_suppliers, insert_supplier, CatalogError};
use crate::domain::user_email::UserEmail;
use crate::models::Supplier;
use crate::utils::{get_pooled_connection, DealershipPool};

#[derive(Deserialize, Debug)]
pub struct SupplierForm{
    pub name: String,
    pub contact_email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>
}

#[derive(Deserialize, Debug)]
pub struct DeleteSupplierJson{
    pub supplier_id: Uuid
}

fn map_catalog_error(e: CatalogError) -> actix_web::Error{
    match e {
        CatalogError::AlreadyExists(_) => ErrorBadRequest(e),
        CatalogError::HasDependents(_) => ErrorConflict(e),
        CatalogError::NotFound(_) => ErrorNotFound(e),
        _ => ErrorInternalServerError(e)
    }
}

#[tracing::instrument(
    "Posting supplier",
    skip(pool)
)]
pub async fn post_supplier(
    pool: web::Data<DealershipPool>,
    form: web::Form<SupplierForm>,
    _: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    if let Some(email) = &form.contact_email{
        UserEmail::parse(email.clone())
            .map_err(ErrorBadRequest)?;
    }

    let supplier = Supplier{
        supplier_id: Uuid::new_v4(),
        name: form.0.name,
        contact_email: form.0.contact_email,
        phone_number: form.0.phone_number,
        address: form.0.address
    };

    let supplier_id = supplier.supplier_id;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    insert_supplier(conn, supplier)
        .await
        .map_err(map_catalog_error)?;

    Ok(HttpResponse::Ok().json(supplier_id))
}

#[tracing::instrument(
    "Getting suppliers",
    skip(pool)
)]
pub async fn get_suppliers_route(
    pool: web::Data<DealershipPool>
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    let suppliers = get_suppliers(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(suppliers))
}

#[tracing::instrument(
    "Deleting supplier",
    skip(pool)
)]
pub async fn delete_supplier_route(
    pool: web::Data<DealershipPool>,
    json: web::Json<DeleteSupplierJson>,
    _: IsAdmin
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|_| ErrorInternalServerError("Failed due to internal error"))?;

    delete_supplier(conn, json.supplier_id)
        .await
        .map_err(map_catalog_error)?;

    Ok(HttpResponse::Ok().finish())
}
