use serde::{Deserialize, Serialize};

/// A unit of work performed inside a named production section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "secao")]
    pub section: String,
}

/// Creation payload for `POST /tarefas`. The name arrives as `nome_tarefa`
/// (or `nome`) and is re-emitted under the stored field name `nome`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    #[serde(
        rename(serialize = "nome", deserialize = "nome_tarefa"),
        alias = "nome",
        default
    )]
    pub name: Option<String>,
    #[serde(rename = "secao", default)]
    pub section: Option<String>,
}
