//! `DELETE /{kind}/{id}`.
//!
//! Work sessions that reference the record are not touched; the work log
//! keeps showing them with a placeholder name.

use super::Resource;
use crate::auth::{Caller, MANAGERS};
use crate::error::AppResult;
use crate::services::run_blocking;
use crate::store::Store;
use actix_web::{web, HttpResponse};
use serde_json::json;

pub async fn process<R: Resource>(
    caller: Caller,
    store: web::Data<Store>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    caller.require(MANAGERS)?;
    let store = store.get_ref().clone();
    let id = id.into_inner();
    run_blocking(move || store.delete::<R>(&id)).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": R::DELETED_MESSAGE })))
}
