//! # QR payload text format
//!
//! Every badge, task card and pallet sheet carries a QR code whose text is a
//! flat list of `Key:Value` segments joined by `;`, for example
//! `ID:5f0c...;Tipo:Trabalhador;Nome:Ana`.
//!
//! The format has no escaping. A value may contain `:` (only the first colon of
//! a segment separates key from value) but never `;`, so the backend rejects
//! `;` in any value that ends up in a payload. The layout is kept as is because
//! codes already printed on the shop floor must keep scanning.
//!
//! Decoding never fails: a key that is not present, or a segment without a
//! colon, simply yields `None` and the caller decides what that means.

use crate::model::pallet::Pallet;
use crate::model::task::Task;
use crate::model::worker::Worker;
use crate::requests::BadgeKind;

pub const FIELD_ID: &str = "ID";
pub const FIELD_NAME: &str = "Nome";
pub const FIELD_KIND: &str = "Tipo";
pub const FIELD_SECTION: &str = "Secao";
pub const FIELD_TASK: &str = "Tarefa";
pub const FIELD_REFERENCE: &str = "Referencia";
pub const FIELD_LOT: &str = "NumeroLote";

/// Section recorded when a task payload carries no `Secao` segment.
pub const DEFAULT_SECTION: &str = "Default";

const SEGMENT_SEPARATOR: &str = ";";
const KEY_SEPARATOR: char = ':';

/// Joins `field:value` pairs with `;`, in the given order.
pub fn encode(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{key}{KEY_SEPARATOR}{value}"))
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

/// Returns the value of the first segment whose key is `field`.
pub fn decode<'a>(payload: &'a str, field: &str) -> Option<&'a str> {
    segments(payload).find(|(key, _)| *key == field).map(|(_, value)| value)
}

/// True when `value` can be embedded in a payload without breaking decoding.
pub fn is_embeddable(value: &str) -> bool {
    !value.contains(SEGMENT_SEPARATOR)
}

fn segments(payload: &str) -> impl Iterator<Item = (&str, &str)> {
    payload
        .split(SEGMENT_SEPARATOR)
        .filter_map(|segment| segment.split_once(KEY_SEPARATOR))
        .map(|(key, value)| (key.trim(), value))
}

/// A decoded view over one scanned payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload<'a> {
    fields: Vec<(&'a str, &'a str)>,
}

impl<'a> QrPayload<'a> {
    pub fn parse(payload: &'a str) -> Self {
        Self {
            fields: segments(payload).collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&'a str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == field)
            .map(|(_, value)| *value)
    }

    /// The `ID` segment, ignoring surrounding whitespace. Blank ids count as
    /// absent.
    pub fn id(&self) -> Option<&'a str> {
        self.get(FIELD_ID).map(str::trim).filter(|id| !id.is_empty())
    }

    pub fn section(&self) -> Option<&'a str> {
        self.get(FIELD_SECTION).map(str::trim).filter(|s| !s.is_empty())
    }
}

pub fn worker_payload(worker: &Worker, badge: BadgeKind) -> String {
    let kind = match badge {
        BadgeKind::Trabalhador => "Trabalhador",
        BadgeKind::Chefe => "Chefe",
    };
    encode(&[
        (FIELD_ID, worker.id.as_str()),
        (FIELD_KIND, kind),
        (FIELD_NAME, worker.name.as_str()),
    ])
}

pub fn task_payload(task: &Task) -> String {
    encode(&[
        (FIELD_ID, task.id.as_str()),
        (FIELD_TASK, task.name.as_str()),
        (FIELD_SECTION, task.section.as_str()),
    ])
}

pub fn pallet_payload(pallet: &Pallet) -> String {
    encode(&[
        (FIELD_ID, pallet.id.as_str()),
        (FIELD_REFERENCE, pallet.reference.as_str()),
        (FIELD_NAME, pallet.product_name.as_str()),
        (FIELD_LOT, pallet.lot_number.as_str()),
    ])
}
