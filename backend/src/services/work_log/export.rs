use crate::auth::{Caller, MANAGERS};
use crate::error::{AppError, AppResult};
use crate::reports::export::{to_csv, to_xlsx, CSV_CONTENT_TYPE, XLSX_CONTENT_TYPE};
use crate::reports::{projection, snapshot};
use crate::services::run_blocking;
use crate::store::Store;
use actix_web::http::header::CONTENT_DISPOSITION;
use actix_web::{web, HttpResponse};
use common::requests::{ReportFormat, ReportQuery};

const FILE_STEM: &str = "registros_trabalho";

/// `GET /exportar_registros[?formato=csv]`: the whole log as a download,
/// XLSX unless CSV is asked for. `admin` and `chefe` only.
pub async fn process(
    caller: Caller,
    store: web::Data<Store>,
    query: web::Query<ReportQuery>,
) -> AppResult<HttpResponse> {
    caller.require(MANAGERS)?;
    let format = query.formato.unwrap_or(ReportFormat::Xlsx);
    download(store.get_ref().clone(), format).await
}

/// Renders the log as a spreadsheet attachment in `format`.
pub(super) async fn download(store: Store, format: ReportFormat) -> AppResult<HttpResponse> {
    let (extension, content_type) = match format {
        ReportFormat::Xlsx => ("xlsx", XLSX_CONTENT_TYPE),
        ReportFormat::Csv => ("csv", CSV_CONTENT_TYPE),
        other => {
            return Err(AppError::Validation(format!(
                "formato {:?} cannot be exported, use xlsx or csv",
                other
            )))
        }
    };

    let bytes = run_blocking(move || {
        let (sessions, directory) = snapshot(&store)?;
        let rows = projection::flatten(&sessions, &directory);
        match format {
            ReportFormat::Csv => to_csv(&rows),
            _ => to_xlsx(&rows),
        }
    })
    .await?;

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{FILE_STEM}.{extension}\""),
        ))
        .body(bytes))
}
