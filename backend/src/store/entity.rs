//! Generic persistence for the registered entities (workers, pallets, tasks).
//!
//! Each kind describes itself once through [`Entity`]: its table, its columns
//! and which of them are required or printed inside a QR payload. Validation,
//! DDL, insert, lookup, listing and delete are written a single time against
//! that description. Records travel between the wire model and SQL through
//! their serde representation, so column names are the JSON field names.

use crate::error::{AppError, AppResult};
use common::model::pallet::{NewPallet, Pallet};
use common::model::task::{NewTask, Task};
use common::model::worker::{NewWorker, Worker};
use common::qr;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Flag,
}

/// One stored attribute of an entity kind.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub required: bool,
    /// Printed inside the entity's QR payload, so `;` is not allowed.
    pub in_qr: bool,
}

impl Column {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            ty: ColumnType::Text,
            required: true,
            in_qr: false,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            ty: ColumnType::Integer,
            ..Self::text(name)
        }
    }

    pub const fn flag(name: &'static str) -> Self {
        Self {
            ty: ColumnType::Flag,
            ..Self::text(name)
        }
    }

    pub const fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    pub const fn in_qr(self) -> Self {
        Self {
            in_qr: true,
            ..self
        }
    }

    fn sql_type(&self) -> &'static str {
        match self.ty {
            ColumnType::Text => "TEXT",
            ColumnType::Integer | ColumnType::Flag => "INTEGER",
        }
    }
}

/// A registered record kind with a declarative schema.
pub trait Entity: Serialize + DeserializeOwned + Send + 'static {
    /// Creation payload as received from clients.
    type New: Serialize + DeserializeOwned + Send + 'static;

    /// Kind name used in errors and logs.
    const KIND: &'static str;
    const TABLE: &'static str;
    /// Stored attributes, excluding the `id` primary key.
    const COLUMNS: &'static [Column];
    /// Column of the work-session table that references this kind.
    const SESSION_COLUMN: &'static str;

    fn id(&self) -> &str;
}

impl Entity for Worker {
    type New = NewWorker;
    const KIND: &'static str = "Worker";
    const TABLE: &'static str = "trabalhadores";
    const COLUMNS: &'static [Column] = &[
        Column::text("nome").in_qr(),
        Column::flag("chefe").optional(),
    ];
    const SESSION_COLUMN: &'static str = "trabalhador_id";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Pallet {
    type New = NewPallet;
    const KIND: &'static str = "Pallet";
    const TABLE: &'static str = "paletes";
    const COLUMNS: &'static [Column] = &[
        Column::text("data_entrega"),
        Column::text("op"),
        Column::text("referencia").in_qr(),
        Column::text("nome_produto").in_qr(),
        Column::text("medida"),
        Column::text("cor_botao"),
        Column::text("cor_ribete"),
        Column::flag("leva_embalagem"),
        Column::integer("quantidade"),
        Column::text("data_hora"),
        Column::text("numero_lote").in_qr(),
    ];
    const SESSION_COLUMN: &'static str = "palete_id";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Task {
    type New = NewTask;
    const KIND: &'static str = "Task";
    const TABLE: &'static str = "tarefas";
    const COLUMNS: &'static [Column] = &[
        Column::text("nome").in_qr(),
        Column::text("secao").in_qr(),
    ];
    const SESSION_COLUMN: &'static str = "tarefa_id";

    fn id(&self) -> &str {
        &self.id
    }
}

pub fn create_table_sql<E: Entity>() -> String {
    let columns: Vec<String> = E::COLUMNS
        .iter()
        .map(|c| format!("{} {} NOT NULL", c.name, c.sql_type()))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, {})",
        E::TABLE,
        columns.join(", ")
    )
}

/// Checks a creation payload against the kind's schema and returns its
/// attributes with text values trimmed. Every missing field is reported.
pub fn validate<E: Entity>(new: &E::New) -> AppResult<Map<String, Value>> {
    let mut attributes = match serde_json::to_value(new)? {
        Value::Object(map) => map,
        other => {
            return Err(AppError::Internal(format!(
                "{} payload is not an object: {}",
                E::KIND,
                other
            )))
        }
    };

    for value in attributes.values_mut() {
        if let Value::String(s) = value {
            *s = s.trim().to_string();
        }
    }

    let missing: Vec<&str> = E::COLUMNS
        .iter()
        .filter(|c| c.required)
        .filter(|c| match attributes.get(c.name) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        })
        .map(|c| c.name)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    for column in E::COLUMNS.iter().filter(|c| c.in_qr) {
        if let Some(Value::String(s)) = attributes.get(column.name) {
            if !qr::is_embeddable(s) {
                return Err(AppError::Validation(format!(
                    "field {} must not contain ';'",
                    column.name
                )));
            }
        }
    }

    Ok(attributes)
}

/// Validates a payload and assigns a fresh id.
pub fn build<E: Entity>(new: E::New) -> AppResult<E> {
    let mut attributes = validate::<E>(&new)?;
    attributes.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
    Ok(serde_json::from_value(Value::Object(attributes))?)
}

pub fn insert<E: Entity>(conn: &Connection, entity: &E) -> AppResult<()> {
    let attributes = match serde_json::to_value(entity)? {
        Value::Object(map) => map,
        _ => return Err(AppError::Internal(format!("{} is not an object", E::KIND))),
    };

    let mut values = vec![SqlValue::Text(entity.id().to_string())];
    values.extend(
        E::COLUMNS
            .iter()
            .map(|c| to_sql_value(c, attributes.get(c.name))),
    );

    let names: Vec<&str> = E::COLUMNS.iter().map(|c| c.name).collect();
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} (id, {}) VALUES ({})",
        E::TABLE,
        names.join(", "),
        placeholders.join(", ")
    );
    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

pub fn find<E: Entity>(conn: &Connection, id: &str) -> AppResult<Option<E>> {
    let sql = format!("{} WHERE id = ?1", select_sql::<E>());
    let row = conn
        .query_row(&sql, params![id], row_to_json::<E>)
        .optional()?;
    row.map(|value| serde_json::from_value(value).map_err(AppError::from))
        .transpose()
}

/// Point lookup that turns a missing record into `NotFound(kind, id)`.
pub fn fetch<E: Entity>(conn: &Connection, id: &str) -> AppResult<E> {
    find::<E>(conn, id)?.ok_or_else(|| AppError::not_found(E::KIND, id))
}

pub fn list<E: Entity>(conn: &Connection) -> AppResult<Vec<E>> {
    let mut stmt = conn.prepare(&select_sql::<E>())?;
    let rows = stmt.query_map([], row_to_json::<E>)?;
    let mut records = Vec::new();
    for row in rows {
        records.push(serde_json::from_value(row?)?);
    }
    Ok(records)
}

pub fn remove<E: Entity>(conn: &Connection, id: &str) -> AppResult<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", E::TABLE);
    match conn.execute(&sql, params![id])? {
        0 => Err(AppError::not_found(E::KIND, id)),
        _ => Ok(()),
    }
}

fn select_sql<E: Entity>() -> String {
    let names: Vec<&str> = E::COLUMNS.iter().map(|c| c.name).collect();
    format!("SELECT id, {} FROM {}", names.join(", "), E::TABLE)
}

fn row_to_json<E: Entity>(row: &Row<'_>) -> rusqlite::Result<Value> {
    let mut map = Map::new();
    map.insert("id".into(), Value::String(row.get(0)?));
    for (i, column) in E::COLUMNS.iter().enumerate() {
        let value = match column.ty {
            ColumnType::Text => Value::from(row.get::<_, String>(i + 1)?),
            ColumnType::Integer => Value::from(row.get::<_, i64>(i + 1)?),
            ColumnType::Flag => Value::from(row.get::<_, bool>(i + 1)?),
        };
        map.insert(column.name.into(), value);
    }
    Ok(Value::Object(map))
}

fn to_sql_value(column: &Column, value: Option<&Value>) -> SqlValue {
    match (column.ty, value) {
        (ColumnType::Text, Some(Value::String(s))) => SqlValue::Text(s.clone()),
        (ColumnType::Integer, Some(v)) => v.as_i64().map_or(SqlValue::Null, SqlValue::Integer),
        (ColumnType::Flag, Some(Value::Bool(b))) => SqlValue::Integer(i64::from(*b)),
        _ => SqlValue::Null,
    }
}
