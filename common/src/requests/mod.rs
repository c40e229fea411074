use serde::{Deserialize, Serialize};

/// Body of `POST /registro_trabalho`: the raw text of the three scanned QR
/// codes. Fields are optional so a missing one is reported by name instead of
/// failing JSON extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkScanRequest {
    #[serde(default)]
    pub tarefa_qr: Option<String>,
    #[serde(default)]
    pub trabalhador_qr: Option<String>,
    #[serde(default)]
    pub palete_qr: Option<String>,
}

/// Output shape selector for the work-log endpoints (`?formato=`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Lista,
    Hierarquico,
    Xlsx,
    Csv,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub formato: Option<ReportFormat>,
}

/// Badge selector for `GET /trabalhadores/{id}/qr?tipo=chefe`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    #[default]
    Trabalhador,
    Chefe,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QrQuery {
    #[serde(default)]
    pub tipo: Option<BadgeKind>,
}
