use super::Resource;
use crate::auth::{Caller, ANY_ROLE};
use crate::error::AppResult;
use crate::services::run_blocking;
use crate::store::Store;
use actix_web::{web, HttpResponse};
use common::requests::QrQuery;
use serde_json::json;

/// `GET /{kind}/{id}/qr[?tipo=chefe]`: the QR payload text of a stored record.
///
/// Clients render the text into the printed badge, card or pallet sheet.
/// `tipo` only matters for workers; asking for the supervisor badge of a
/// worker who is not a supervisor is a `400`.
pub async fn process<R: Resource>(
    caller: Caller,
    store: web::Data<Store>,
    id: web::Path<String>,
    query: web::Query<QrQuery>,
) -> AppResult<HttpResponse> {
    caller.require(ANY_ROLE)?;
    let store = store.get_ref().clone();
    let id = id.into_inner();
    let badge = query.tipo.unwrap_or_default();
    let record = run_blocking(move || store.get::<R>(&id)).await?;
    let payload = record.qr_payload(badge)?;
    Ok(HttpResponse::Ok().json(json!({
        "id": record.id(),
        "tipo": badge,
        "qr_code": payload,
    })))
}
