//! Read-only views derived from the stored work sessions.
//!
//! Nothing here is persisted; the backend rebuilds these on every request.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Id plus display name of a referenced entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalletRef {
    pub id: String,
    #[serde(rename = "referencia")]
    pub reference: String,
}

/// Flat work-log entry served by `GET /registro_trabalho`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLogEntry {
    pub id: String,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "palete")]
    pub pallet: PalletRef,
    #[serde(rename = "secao")]
    pub section: String,
    #[serde(rename = "tarefa")]
    pub task: NamedRef,
    #[serde(rename = "trabalhador")]
    pub worker: NamedRef,
    #[serde(rename = "hora_inicio")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "hora_fim")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Sessions started on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "paletes")]
    pub pallets: Vec<PalletReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalletReport {
    #[serde(rename = "palete")]
    pub pallet: PalletRef,
    #[serde(rename = "secoes")]
    pub sections: Vec<SectionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionReport {
    #[serde(rename = "secao")]
    pub section: String,
    #[serde(rename = "tarefas")]
    pub tasks: Vec<TaskReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReport {
    #[serde(rename = "tarefa")]
    pub task: NamedRef,
    #[serde(rename = "registros")]
    pub entries: Vec<ReportEntry>,
}

/// A single session inside the hierarchy. `in_progress` is set while the
/// session has no finish time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    #[serde(rename = "registro_id")]
    pub session_id: String,
    #[serde(rename = "trabalhador")]
    pub worker: NamedRef,
    #[serde(rename = "hora_inicio")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "hora_fim")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(rename = "em_andamento")]
    pub in_progress: bool,
}
