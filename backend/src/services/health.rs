//! `GET /health`: liveness plus a trivial database round trip. Needs no token.

use crate::error::AppResult;
use crate::services::run_blocking;
use crate::store::Store;
use actix_web::web::{get, resource};
use actix_web::{web, HttpResponse, Resource};
use serde_json::json;

pub fn configure_routes() -> Resource {
    resource("/health").route(get().to(process))
}

async fn process(store: web::Data<Store>) -> AppResult<HttpResponse> {
    let store = store.get_ref().clone();
    run_blocking(move || {
        store.with_conn(|conn| Ok(conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?))
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
