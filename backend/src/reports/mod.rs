//! # Reporting
//!
//! Views of the work log derived on demand from the stored sessions.
//!
//! ## Sub-modules:
//! - `projection`: flat list, day/pallet/section/task hierarchy and export rows.
//! - `export`: XLSX and CSV renderings of the export rows.

pub mod export;
pub mod projection;

use crate::error::AppResult;
use crate::store::{entity, sessions, Store};
use common::model::pallet::Pallet;
use common::model::task::Task;
use common::model::work_session::WorkSession;
use common::model::worker::Worker;
use projection::Directory;

/// Every session plus the names they refer to, read under one hold of the
/// connection.
pub fn snapshot(store: &Store) -> AppResult<(Vec<WorkSession>, Directory)> {
    store.with_conn(|conn| {
        let directory = Directory::new(
            entity::list::<Worker>(conn)?,
            entity::list::<Pallet>(conn)?,
            entity::list::<Task>(conn)?,
        );
        Ok((sessions::list(conn)?, directory))
    })
}
