//! # Work Registration
//!
//! Backend logic for `POST /registro_trabalho` (also served as `/trabalho`).
//!
//! ## Workflow
//!
//! 1.  **Role check**: only `chefe` and `funcionario` callers register work.
//! 2.  **Body check**: all three QR texts must be present and non-blank,
//!     otherwise `400` naming the first missing field.
//! 3.  **Toggle**: `SessionMachine::toggle` resolves the codes and opens or
//!     closes the session inside one transaction on the blocking pool.
//! 4.  **Reply**: `201` with `event: "started"` for a new session, `200` with
//!     `event: "finished"` when an open one was closed. The stored session is
//!     returned under `registro`.

use crate::auth::{Caller, SCANNERS};
use crate::error::AppResult;
use crate::services::run_blocking;
use crate::sessions::{ScanTriple, SessionMachine};
use actix_web::{web, HttpResponse};
use common::model::work_session::{ScanOutcome, SessionEvent};
use common::requests::WorkScanRequest;
use log::warn;

const STARTED_MESSAGE: &str = "Registro de trabalho iniciado com sucesso!";
const FINISHED_MESSAGE: &str = "Tarefa finalizada com sucesso!";

pub async fn process(
    caller: Caller,
    machine: web::Data<SessionMachine>,
    body: web::Json<WorkScanRequest>,
) -> AppResult<HttpResponse> {
    caller.require(SCANNERS)?;
    let scan = ScanTriple::try_from(body.into_inner())
        .inspect_err(|e| warn!("Scan rejected: {}", e))?;

    let machine = machine.get_ref().clone();
    let transition = run_blocking(move || machine.toggle(&scan)).await?;

    let (mut reply, message) = match transition.event {
        SessionEvent::Started => (HttpResponse::Created(), STARTED_MESSAGE),
        SessionEvent::Finished => (HttpResponse::Ok(), FINISHED_MESSAGE),
    };
    Ok(reply.json(ScanOutcome {
        event: transition.event,
        message: message.to_string(),
        session: transition.session,
    }))
}
