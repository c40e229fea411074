//! # Persistent Store
//!
//! All state lives in one SQLite database. The [`Store`] handle owns a single
//! connection behind a mutex and is cloned into every actix worker as
//! `web::Data<Store>`. Handlers reach it through `run_blocking` so the blocking
//! SQLite calls stay off the async executor.
//!
//! ## Sub-modules:
//! - `entity`: declarative schema and CRUD for workers, pallets and tasks.
//! - `sessions`: the `registros_trabalho` table and its open-session index.

pub mod entity;
pub mod sessions;

use crate::error::{AppError, AppResult};
use common::model::pallet::Pallet;
use common::model::task::Task;
use common::model::work_session::WorkSession;
use common::model::worker::Worker;
use entity::Entity;
use log::{info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (or creates) the database file and makes sure every table exists.
    pub fn open(path: &Path) -> AppResult<Self> {
        let conn = Connection::open(path)?;
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        info!("Opened database {} (journal_mode={})", path.display(), mode);
        Self::init(conn)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> AppResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        create_tables(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with_conn<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| AppError::Internal("database connection lock poisoned".into()))?;
        f(&mut conn)
    }

    /// Validates and stores a new record, returning it with its assigned id.
    pub fn create<E: Entity>(&self, new: E::New) -> AppResult<E> {
        let record = entity::build::<E>(new)?;
        self.with_conn(|conn| entity::insert(conn, &record))?;
        info!("{} {} created", E::KIND, record.id());
        Ok(record)
    }

    pub fn get<E: Entity>(&self, id: &str) -> AppResult<E> {
        self.with_conn(|conn| entity::fetch::<E>(conn, id))
    }

    pub fn list<E: Entity>(&self) -> AppResult<Vec<E>> {
        self.with_conn(|conn| entity::list::<E>(conn))
    }

    /// Deletes a record. Sessions that reference it are kept as history.
    pub fn delete<E: Entity>(&self, id: &str) -> AppResult<()> {
        let referencing = self.with_conn(|conn| {
            let tx = conn.transaction()?;
            entity::remove::<E>(&tx, id)?;
            let count = sessions::count_referencing(&tx, E::SESSION_COLUMN, id)?;
            tx.commit()?;
            Ok(count)
        })?;
        if referencing > 0 {
            warn!(
                "{} {} deleted while referenced by {} work session(s)",
                E::KIND,
                id,
                referencing
            );
        } else {
            info!("{} {} deleted", E::KIND, id);
        }
        Ok(())
    }

    pub fn sessions(&self) -> AppResult<Vec<WorkSession>> {
        self.with_conn(|conn| sessions::list(conn))
    }
}

fn create_tables(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(&entity::create_table_sql::<Worker>())?;
    conn.execute_batch(&entity::create_table_sql::<Pallet>())?;
    conn.execute_batch(&entity::create_table_sql::<Task>())?;
    conn.execute_batch(sessions::CREATE_TABLE)?;
    Ok(())
}
