//! Shop-floor work tracking backend.
//!
//! Registers workers, pallets and tasks, hands out the QR payload text that
//! identifies each of them, and turns three-code scans into work sessions.

pub mod auth;
pub mod config;
pub mod error;
pub mod reports;
pub mod services;
pub mod sessions;
pub mod store;

use crate::auth::AccessTokens;
use crate::error::AppError;
use crate::sessions::{Clock, SessionMachine};
use crate::store::Store;
use actix_web::web;
use common::model::pallet::Pallet;
use common::model::task::Task;
use common::model::worker::Worker;
use std::sync::Arc;

/// Request bodies are small JSON documents.
const JSON_LIMIT: usize = 256 * 1024;

/// Everything the handlers share, built once in `main` (or a test) and
/// installed on each worker's `App`.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub machine: SessionMachine,
    pub tokens: AccessTokens,
}

impl AppState {
    pub fn new(store: Store, clock: Arc<dyn Clock>, tokens: AccessTokens) -> Self {
        let machine = SessionMachine::new(store.clone(), clock);
        Self {
            store,
            machine,
            tokens,
        }
    }

    /// Installs shared state, extractor settings and every route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.store.clone()))
            .app_data(web::Data::new(self.machine.clone()))
            .app_data(web::Data::new(self.tokens.clone()))
            .app_data(
                web::JsonConfig::default()
                    .limit(JSON_LIMIT)
                    .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
            )
            .service(services::health::configure_routes())
            .service(services::entities::configure_routes::<Worker>())
            .service(services::entities::configure_routes::<Pallet>())
            .service(services::entities::configure_routes::<Task>())
            .configure(services::work_log::configure_routes);
    }
}
