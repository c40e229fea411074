//! `POST /{kind}`: registers a worker, pallet or task.
//!
//! The body is the kind's creation payload (`NewWorker`, `NewPallet`,
//! `NewTask`). Required fields are checked against the kind's schema before
//! anything is written, and every missing one is listed in the `400` reply.
//! On success the reply is `201` with the new id under the kind's id field
//! and the QR payload text for each printed code.

use super::Resource;
use crate::auth::{Caller, MANAGERS};
use crate::error::AppResult;
use crate::services::run_blocking;
use crate::store::Store;
use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

pub async fn process<R: Resource>(
    caller: Caller,
    store: web::Data<Store>,
    body: web::Json<R::New>,
) -> AppResult<HttpResponse> {
    caller.require(MANAGERS)?;
    let store = store.get_ref().clone();
    let new = body.into_inner();
    let record = run_blocking(move || store.create::<R>(new)).await?;
    Ok(HttpResponse::Created().json(created_reply(&record)))
}

fn created_reply<R: Resource>(record: &R) -> Map<String, Value> {
    let mut reply = Map::new();
    reply.insert("message".into(), R::CREATED_MESSAGE.into());
    reply.insert(R::ID_FIELD.into(), record.id().into());
    for (field, payload) in record.qr_codes() {
        reply.insert(field.into(), payload.map_or(Value::Null, Value::from));
    }
    reply
}
