//! # Work Log Service Module
//!
//! Endpoints that record work on the shop floor and read the log back. The
//! paths sit at the root of the API because scanners and spreadsheets in use
//! already call them there.
//!
//! ## Sub-modules:
//! - `register`: applies one three-code scan to the session toggle.
//! - `list`: the log as a flat list or as a day/pallet/section/task hierarchy.
//! - `export`: the log as an XLSX workbook or a CSV file.

mod export;
mod list;
mod register;

use actix_web::web::{self, get, post, resource};

/// Registers the work-log resources on the application.
///
/// # Registered Routes:
///
/// *   **`POST /registro_trabalho`** and **`POST /trabalho`**:
///     - **Handler**: `register::process`
///     - **Description**: Body `{tarefa_qr, trabalhador_qr, palete_qr}` with the
///       raw text of the three scanned codes. Opens a session (`201`) or closes
///       the open one for the same task, pallet and worker (`200`).
///
/// *   **`GET /registro_trabalho[?formato=hierarquico]`**:
///     - **Handler**: `list::process`
///     - **Description**: Every session with worker, pallet and task names
///       joined in. `formato=hierarquico` groups by day, pallet, section and task.
///
/// *   **`GET /exportar_registros[?formato=csv]`**:
///     - **Handler**: `export::process`
///     - **Description**: Downloads the log as `registros_trabalho.xlsx`, or as
///       `registros_trabalho.csv` with `formato=csv`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        resource("/registro_trabalho")
            .route(post().to(register::process))
            .route(get().to(list::process)),
    )
    .service(resource("/trabalho").route(post().to(register::process)))
    .service(resource("/exportar_registros").route(get().to(export::process)));
}
