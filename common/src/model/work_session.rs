use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One worker performing one task on one pallet in one section.
///
/// A session is open while `finished_at` is `None`. It is closed exactly once
/// and never deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSession {
    pub id: String,
    #[serde(rename = "tarefa_id")]
    pub task_id: String,
    #[serde(rename = "trabalhador_id")]
    pub worker_id: String,
    #[serde(rename = "palete_id")]
    pub pallet_id: String,
    #[serde(rename = "secao")]
    pub section: String,
    #[serde(rename = "hora_inicio")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "hora_fim")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl WorkSession {
    pub fn is_open(&self) -> bool {
        self.finished_at.is_none()
    }

    /// Elapsed time of a closed session.
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }
}

/// Which way a scan toggled the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionEvent {
    Started,
    Finished,
}

/// Body returned by `POST /registro_trabalho`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub event: SessionEvent,
    pub message: String,
    #[serde(rename = "registro")]
    pub session: WorkSession,
}
