use super::Resource;
use crate::auth::{Caller, ANY_ROLE};
use crate::error::AppResult;
use crate::services::run_blocking;
use crate::store::Store;
use actix_web::{web, HttpResponse};

/// `GET /{kind}/{id}`: one record, or `404` naming the kind and id.
pub async fn process<R: Resource>(
    caller: Caller,
    store: web::Data<Store>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    caller.require(ANY_ROLE)?;
    let store = store.get_ref().clone();
    let id = id.into_inner();
    let record = run_blocking(move || store.get::<R>(&id)).await?;
    Ok(HttpResponse::Ok().json(record))
}
