//! # Registered Entity Services
//!
//! Workers, pallets and tasks share one set of handlers. Each kind plugs in
//! through [`Resource`], which adds the HTTP-facing details (base path, reply
//! messages, QR payloads) on top of its storage schema.
//!
//! ## Sub-modules:
//! - `create`: validates and stores a new record, replies with its QR payload text.
//! - `list`: every record of the kind.
//! - `get`: one record by id.
//! - `delete`: removes a record; its work sessions stay in the log.
//! - `qr`: the QR payload text of a stored record.

mod create;
mod delete;
mod get;
mod list;
mod qr;

use crate::error::{AppError, AppResult};
use crate::store::entity::Entity;
use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;
use common::model::pallet::Pallet;
use common::model::task::Task;
use common::model::worker::Worker;
use common::qr::{pallet_payload, task_payload, worker_payload};
use common::requests::BadgeKind;

pub trait Resource: Entity {
    /// Base path of the kind's routes.
    const API_PATH: &'static str;
    /// Name of the id field in the creation reply.
    const ID_FIELD: &'static str;
    const CREATED_MESSAGE: &'static str;
    const DELETED_MESSAGE: &'static str;

    /// QR payload texts returned on creation, keyed by reply field.
    fn qr_codes(&self) -> Vec<(&'static str, Option<String>)>;

    /// The payload printed on the record's badge, card or sheet.
    fn qr_payload(&self, badge: BadgeKind) -> AppResult<String>;
}

impl Resource for Worker {
    const API_PATH: &'static str = "/trabalhadores";
    const ID_FIELD: &'static str = "id";
    const CREATED_MESSAGE: &'static str = "Trabalhador adicionado com sucesso!";
    const DELETED_MESSAGE: &'static str = "Trabalhador removido com sucesso!";

    fn qr_codes(&self) -> Vec<(&'static str, Option<String>)> {
        let chefe = self
            .is_supervisor
            .then(|| worker_payload(self, BadgeKind::Chefe));
        vec![
            (
                "qr_code_trabalhador",
                Some(worker_payload(self, BadgeKind::Trabalhador)),
            ),
            ("qr_code_chefe", chefe),
        ]
    }

    fn qr_payload(&self, badge: BadgeKind) -> AppResult<String> {
        if badge == BadgeKind::Chefe && !self.is_supervisor {
            return Err(AppError::Validation(format!(
                "worker {} is not a supervisor",
                self.id
            )));
        }
        Ok(worker_payload(self, badge))
    }
}

impl Resource for Pallet {
    const API_PATH: &'static str = "/paletes";
    const ID_FIELD: &'static str = "palete_id";
    const CREATED_MESSAGE: &'static str = "Palete adicionada com sucesso!";
    const DELETED_MESSAGE: &'static str = "Palete removida com sucesso!";

    fn qr_codes(&self) -> Vec<(&'static str, Option<String>)> {
        vec![("qr_code", Some(pallet_payload(self)))]
    }

    fn qr_payload(&self, _: BadgeKind) -> AppResult<String> {
        Ok(pallet_payload(self))
    }
}

impl Resource for Task {
    const API_PATH: &'static str = "/tarefas";
    const ID_FIELD: &'static str = "tarefa_id";
    const CREATED_MESSAGE: &'static str = "Tarefa adicionada com sucesso!";
    const DELETED_MESSAGE: &'static str = "Tarefa removida com sucesso!";

    fn qr_codes(&self) -> Vec<(&'static str, Option<String>)> {
        vec![("qr_code", Some(task_payload(self)))]
    }

    fn qr_payload(&self, _: BadgeKind) -> AppResult<String> {
        Ok(task_payload(self))
    }
}

/// Configures and returns the Actix `Scope` for one entity kind.
///
/// # Registered Routes:
///
/// *   **`GET /`** (`list::process`): every record, any role.
/// *   **`POST /`** (`create::process`): JSON creation payload, `admin` or `chefe`.
///     Replies `201` with the new id and the QR payload text(s).
/// *   **`GET /{id}`** (`get::process`): one record, any role.
/// *   **`DELETE /{id}`** (`delete::process`): `admin` or `chefe`.
/// *   **`GET /{id}/qr`** (`qr::process`): payload text; `?tipo=chefe` selects a
///     supervisor badge.
pub fn configure_routes<R: Resource>() -> Scope {
    scope(R::API_PATH)
        .route("", get().to(list::process::<R>))
        .route("", post().to(create::process::<R>))
        .route("/{id}", get().to(get::process::<R>))
        .route("/{id}", delete().to(delete::process::<R>))
        .route("/{id}/qr", get().to(qr::process::<R>))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(is_supervisor: bool) -> Worker {
        Worker {
            id: "w1".into(),
            name: "Ana".into(),
            is_supervisor,
        }
    }

    #[test]
    fn supervisor_badge_only_for_supervisors() {
        assert!(matches!(
            worker(false).qr_payload(BadgeKind::Chefe),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            worker(true).qr_payload(BadgeKind::Chefe).unwrap(),
            "ID:w1;Tipo:Chefe;Nome:Ana"
        );
    }

    #[test]
    fn creation_reply_carries_both_worker_badges() {
        let codes = worker(false).qr_codes();
        assert_eq!(codes[0].1.as_deref(), Some("ID:w1;Tipo:Trabalhador;Nome:Ana"));
        assert_eq!(codes[1], ("qr_code_chefe", None));
    }
}
