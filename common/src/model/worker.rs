use serde::{Deserialize, Serialize};

/// A registered shop-floor worker.
///
/// Supervisors (`chefe`) get a second badge whose QR payload is tagged
/// `Tipo:Chefe`; both badges carry the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "chefe")]
    pub is_supervisor: bool,
}

/// Registration payload for `POST /trabalhadores`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWorker {
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(rename = "chefe", default)]
    pub is_supervisor: bool,
}
