//! Turns three scanned QR payloads into stored entities and the session they
//! currently have open, if any.
//!
//! Resolution reads only. Every failure is returned before the caller writes
//! anything, so a rejected scan leaves the store untouched.

use crate::error::{AppError, AppResult};
use crate::store::{entity, sessions};
use common::model::pallet::Pallet;
use common::model::task::Task;
use common::model::work_session::WorkSession;
use common::model::worker::Worker;
use common::qr::{QrPayload, DEFAULT_SECTION};
use common::requests::WorkScanRequest;
use rusqlite::Connection;

/// The raw payloads of one scan, all three present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTriple {
    pub task_qr: String,
    pub worker_qr: String,
    pub pallet_qr: String,
}

impl TryFrom<WorkScanRequest> for ScanTriple {
    type Error = AppError;

    fn try_from(request: WorkScanRequest) -> AppResult<Self> {
        fn required(value: Option<String>, field: &'static str) -> AppResult<String> {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or(AppError::MissingField(field))
        }

        Ok(Self {
            task_qr: required(request.tarefa_qr, "tarefa_qr")?,
            worker_qr: required(request.trabalhador_qr, "trabalhador_qr")?,
            pallet_qr: required(request.palete_qr, "palete_qr")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedContext {
    pub task: Task,
    pub worker: Worker,
    pub pallet: Pallet,
    /// Taken from the task payload, not from the stored task.
    pub section: String,
    pub open_session: Option<WorkSession>,
}

pub fn resolve(conn: &Connection, scan: &ScanTriple) -> AppResult<ResolvedContext> {
    let task_qr = QrPayload::parse(&scan.task_qr);
    let task_id = task_qr.id().ok_or(AppError::InvalidPayload("tarefa_qr"))?;
    let worker_id = QrPayload::parse(&scan.worker_qr)
        .id()
        .ok_or(AppError::InvalidPayload("trabalhador_qr"))?;
    let pallet_id = QrPayload::parse(&scan.pallet_qr)
        .id()
        .ok_or(AppError::InvalidPayload("palete_qr"))?;
    let section = task_qr.section().unwrap_or(DEFAULT_SECTION).to_string();

    let task = entity::fetch::<Task>(conn, task_id)?;
    let worker = entity::fetch::<Worker>(conn, worker_id)?;
    let pallet = entity::fetch::<Pallet>(conn, pallet_id)?;

    let open_session = sessions::find_open(conn, &task.id, &pallet.id, &worker.id)?;

    Ok(ResolvedContext {
        task,
        worker,
        pallet,
        section,
        open_session,
    })
}
