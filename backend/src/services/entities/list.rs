use super::Resource;
use crate::auth::{Caller, ANY_ROLE};
use crate::error::AppResult;
use crate::services::run_blocking;
use crate::store::Store;
use actix_web::{web, HttpResponse};

/// `GET /{kind}`: every stored record of the kind as a JSON array.
pub async fn process<R: Resource>(
    caller: Caller,
    store: web::Data<Store>,
) -> AppResult<HttpResponse> {
    caller.require(ANY_ROLE)?;
    let store = store.get_ref().clone();
    let records = run_blocking(move || store.list::<R>()).await?;
    Ok(HttpResponse::Ok().json(records))
}
