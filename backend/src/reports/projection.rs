//! Read-only views over the work-session table.
//!
//! Sessions only store ids. A [`Directory`] snapshot of the registered
//! entities supplies the display names. Sessions whose worker, pallet or task
//! has since been deleted are still shown, with [`REMOVED`] as the name.

use common::model::pallet::Pallet;
use common::model::report::{
    DayReport, NamedRef, PalletRef, PalletReport, ReportEntry, SectionReport, TaskReport,
    WorkLogEntry,
};
use common::model::task::Task;
use common::model::work_session::WorkSession;
use common::model::worker::Worker;
use std::collections::{BTreeMap, HashMap};

/// Display name used for an entity that no longer exists.
pub const REMOVED: &str = "(removido)";

/// Column headers shared by the XLSX and CSV exports.
pub const EXPORT_HEADERS: [&str; 8] = [
    "data",
    "referencia",
    "secao",
    "tarefa_nome",
    "trabalhador_nome",
    "hora_inicio",
    "hora_fim",
    "duracao_minutos",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default)]
pub struct Directory {
    workers: HashMap<String, Worker>,
    pallets: HashMap<String, Pallet>,
    tasks: HashMap<String, Task>,
}

impl Directory {
    pub fn new(workers: Vec<Worker>, pallets: Vec<Pallet>, tasks: Vec<Task>) -> Self {
        Self {
            workers: workers.into_iter().map(|w| (w.id.clone(), w)).collect(),
            pallets: pallets.into_iter().map(|p| (p.id.clone(), p)).collect(),
            tasks: tasks.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    fn worker(&self, id: &str) -> NamedRef {
        NamedRef {
            id: id.to_string(),
            name: self
                .workers
                .get(id)
                .map_or(REMOVED, |w| w.name.as_str())
                .to_string(),
        }
    }

    fn task(&self, id: &str) -> NamedRef {
        NamedRef {
            id: id.to_string(),
            name: self
                .tasks
                .get(id)
                .map_or(REMOVED, |t| t.name.as_str())
                .to_string(),
        }
    }

    fn pallet(&self, id: &str) -> PalletRef {
        PalletRef {
            id: id.to_string(),
            reference: self
                .pallets
                .get(id)
                .map_or(REMOVED, |p| p.reference.as_str())
                .to_string(),
        }
    }
}

/// One session flattened for spreadsheet export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub date: String,
    pub pallet_reference: String,
    pub section: String,
    pub task_name: String,
    pub worker_name: String,
    pub started_at: String,
    pub finished_at: String,
    /// Whole minutes, only for closed sessions.
    pub duration_minutes: Option<i64>,
}

impl ExportRow {
    pub fn cells(&self) -> [String; 8] {
        [
            self.date.clone(),
            self.pallet_reference.clone(),
            self.section.clone(),
            self.task_name.clone(),
            self.worker_name.clone(),
            self.started_at.clone(),
            self.finished_at.clone(),
            self.duration_minutes
                .map(|m| m.to_string())
                .unwrap_or_default(),
        ]
    }
}

/// Flat list with names joined in, in stored order.
pub fn work_log(sessions: &[WorkSession], directory: &Directory) -> Vec<WorkLogEntry> {
    sessions
        .iter()
        .map(|s| WorkLogEntry {
            id: s.id.clone(),
            date: s.started_at.date_naive(),
            pallet: directory.pallet(&s.pallet_id),
            section: s.section.clone(),
            task: directory.task(&s.task_id),
            worker: directory.worker(&s.worker_id),
            started_at: s.started_at,
            finished_at: s.finished_at,
        })
        .collect()
}

type TaskKey = (String, String);
type PalletKey = (String, String);
type Sections<'a> = BTreeMap<String, BTreeMap<TaskKey, Vec<&'a WorkSession>>>;

/// Day / pallet / section / task hierarchy. Every level is sorted by its
/// display key (then id), and entries within a task by start time.
pub fn project(sessions: &[WorkSession], directory: &Directory) -> Vec<DayReport> {
    let mut days: BTreeMap<_, BTreeMap<PalletKey, Sections>> = BTreeMap::new();

    for session in sessions {
        let pallet = directory.pallet(&session.pallet_id);
        let task = directory.task(&session.task_id);
        days.entry(session.started_at.date_naive())
            .or_default()
            .entry((pallet.reference, pallet.id))
            .or_default()
            .entry(session.section.clone())
            .or_default()
            .entry((task.name, task.id))
            .or_default()
            .push(session);
    }

    days.into_iter()
        .map(|(date, pallets)| DayReport {
            date,
            pallets: pallets
                .into_iter()
                .map(|((reference, id), sections)| PalletReport {
                    pallet: PalletRef { id, reference },
                    sections: sections
                        .into_iter()
                        .map(|(section, tasks)| SectionReport {
                            section,
                            tasks: tasks
                                .into_iter()
                                .map(|((name, id), entries)| TaskReport {
                                    task: NamedRef { id, name },
                                    entries: report_entries(entries, directory),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

fn report_entries(mut sessions: Vec<&WorkSession>, directory: &Directory) -> Vec<ReportEntry> {
    sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at).then_with(|| a.id.cmp(&b.id)));
    sessions
        .into_iter()
        .map(|s| ReportEntry {
            session_id: s.id.clone(),
            worker: directory.worker(&s.worker_id),
            started_at: s.started_at,
            finished_at: s.finished_at,
            in_progress: s.is_open(),
        })
        .collect()
}

/// One export row per session, in stored order.
pub fn flatten(sessions: &[WorkSession], directory: &Directory) -> Vec<ExportRow> {
    sessions
        .iter()
        .map(|s| ExportRow {
            date: s.started_at.date_naive().to_string(),
            pallet_reference: directory.pallet(&s.pallet_id).reference,
            section: s.section.clone(),
            task_name: directory.task(&s.task_id).name,
            worker_name: directory.worker(&s.worker_id).name,
            started_at: s.started_at.format(TIMESTAMP_FORMAT).to_string(),
            finished_at: s
                .finished_at
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
            duration_minutes: s.duration().map(|d| d.num_minutes()),
        })
        .collect()
}
