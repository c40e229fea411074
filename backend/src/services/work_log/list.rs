//! `GET /registro_trabalho`.
//!
//! Any role may read the log. The default `formato=lista` is a flat array of
//! sessions with names joined in; `formato=hierarquico` nests them by day,
//! pallet, section and task. The spreadsheet formats are served as downloads
//! under the same role rule as `/exportar_registros`.

use super::export::download;
use crate::auth::{Caller, ANY_ROLE, MANAGERS};
use crate::error::AppResult;
use crate::reports::{projection, snapshot};
use crate::services::run_blocking;
use crate::store::Store;
use actix_web::{web, HttpResponse};
use common::requests::{ReportFormat, ReportQuery};

pub async fn process(
    caller: Caller,
    store: web::Data<Store>,
    query: web::Query<ReportQuery>,
) -> AppResult<HttpResponse> {
    caller.require(ANY_ROLE)?;
    let store = store.get_ref().clone();

    match query.formato.unwrap_or_default() {
        ReportFormat::Lista => {
            let entries = run_blocking(move || {
                let (sessions, directory) = snapshot(&store)?;
                Ok(projection::work_log(&sessions, &directory))
            })
            .await?;
            Ok(HttpResponse::Ok().json(entries))
        }
        ReportFormat::Hierarquico => {
            let days = run_blocking(move || {
                let (sessions, directory) = snapshot(&store)?;
                Ok(projection::project(&sessions, &directory))
            })
            .await?;
            Ok(HttpResponse::Ok().json(days))
        }
        spreadsheet => {
            caller.require(MANAGERS)?;
            download(store, spreadsheet).await
        }
    }
}
