//! Work-session rows (`registros_trabalho`).
//!
//! Only the session state machine writes here. The partial unique index keeps
//! at most one open row per (task, pallet, worker) even if two writers ever
//! get past the transaction that normally serialises them.

use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use common::model::work_session::WorkSession;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

pub const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS registros_trabalho (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        palete_id TEXT NOT NULL,
        secao TEXT NOT NULL,
        tarefa_id TEXT NOT NULL,
        trabalhador_id TEXT NOT NULL,
        hora_inicio TEXT NOT NULL,
        hora_fim TEXT
    );
    CREATE UNIQUE INDEX IF NOT EXISTS registros_trabalho_aberto
        ON registros_trabalho (tarefa_id, palete_id, trabalhador_id)
        WHERE hora_fim IS NULL;
";

const SELECT: &str = "SELECT id, tarefa_id, trabalhador_id, palete_id, secao, hora_inicio, hora_fim
     FROM registros_trabalho";

fn from_row(row: &Row<'_>) -> rusqlite::Result<WorkSession> {
    Ok(WorkSession {
        id: row.get(0)?,
        task_id: row.get(1)?,
        worker_id: row.get(2)?,
        pallet_id: row.get(3)?,
        section: row.get(4)?,
        started_at: row.get(5)?,
        finished_at: row.get(6)?,
    })
}

/// The open session for a (task, pallet, worker) tuple, if any.
pub fn find_open(
    conn: &Connection,
    task_id: &str,
    pallet_id: &str,
    worker_id: &str,
) -> AppResult<Option<WorkSession>> {
    let sql = format!(
        "{SELECT} WHERE tarefa_id = ?1 AND palete_id = ?2 AND trabalhador_id = ?3 AND hora_fim IS NULL"
    );
    Ok(conn
        .query_row(&sql, params![task_id, pallet_id, worker_id], from_row)
        .optional()?)
}

pub fn insert(conn: &Connection, session: &WorkSession) -> AppResult<()> {
    let result = conn.execute(
        "INSERT INTO registros_trabalho (
            id, data, palete_id, secao, tarefa_id, trabalhador_id, hora_inicio, hora_fim
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            session.id,
            session.started_at.date_naive(),
            session.pallet_id,
            session.section,
            session.task_id,
            session.worker_id,
            session.started_at,
            session.finished_at,
        ],
    );
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(AppError::ConflictRace)
        }
        Err(e) => Err(e.into()),
    }
}

/// Sets the finish time of an open session. A session that is already closed
/// means another writer got there first.
pub fn close(conn: &Connection, id: &str, finished_at: DateTime<Utc>) -> AppResult<()> {
    let updated = conn.execute(
        "UPDATE registros_trabalho SET hora_fim = ?1 WHERE id = ?2 AND hora_fim IS NULL",
        params![finished_at, id],
    )?;
    match updated {
        1 => Ok(()),
        _ => Err(AppError::ConflictRace),
    }
}

/// Every session, oldest start first.
pub fn list(conn: &Connection) -> AppResult<Vec<WorkSession>> {
    let mut stmt = conn.prepare(&format!("{SELECT} ORDER BY hora_inicio, id"))?;
    let rows = stmt.query_map([], from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Number of sessions whose `column` references `id`.
pub fn count_referencing(conn: &Connection, column: &str, id: &str) -> AppResult<usize> {
    let sql = format!("SELECT COUNT(*) FROM registros_trabalho WHERE {column} = ?1");
    let count: i64 = conn.query_row(&sql, params![id], |row| row.get(0))?;
    Ok(count as usize)
}
