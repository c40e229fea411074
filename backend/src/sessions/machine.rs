use super::clock::Clock;
use super::resolver::{resolve, ScanTriple};
use crate::error::AppResult;
use crate::store::{sessions, Store};
use common::model::work_session::{SessionEvent, WorkSession};
use log::{info, warn};
use rusqlite::TransactionBehavior;
use std::sync::Arc;
use uuid::Uuid;

/// Result of applying one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub event: SessionEvent,
    pub session: WorkSession,
}

/// Start-or-finish toggle over the work-session table.
///
/// Each call resolves the scan and applies the write inside one `IMMEDIATE`
/// transaction while holding the store's connection, so two scans of the same
/// triple can never both see "no open session".
#[derive(Clone)]
pub struct SessionMachine {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl SessionMachine {
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn toggle(&self, scan: &ScanTriple) -> AppResult<Transition> {
        let result = self.store.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let context = resolve(&tx, scan)?;
            let now = self.clock.now();

            let transition = match context.open_session {
                None => {
                    let session = WorkSession {
                        id: Uuid::new_v4().to_string(),
                        task_id: context.task.id,
                        worker_id: context.worker.id,
                        pallet_id: context.pallet.id,
                        section: context.section,
                        started_at: now,
                        finished_at: None,
                    };
                    sessions::insert(&tx, &session)?;
                    Transition {
                        event: SessionEvent::Started,
                        session,
                    }
                }
                Some(mut session) => {
                    let finished_at = now.max(session.started_at);
                    sessions::close(&tx, &session.id, finished_at)?;
                    session.finished_at = Some(finished_at);
                    Transition {
                        event: SessionEvent::Finished,
                        session,
                    }
                }
            };

            tx.commit()?;
            Ok(transition)
        });

        match &result {
            Ok(t) => info!(
                "Work session {} {:?}: task={} pallet={} worker={} section={}",
                t.session.id,
                t.event,
                t.session.task_id,
                t.session.pallet_id,
                t.session.worker_id,
                t.session.section
            ),
            Err(e) => warn!("Scan rejected: {}", e),
        }
        result
    }
}
