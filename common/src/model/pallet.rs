use serde::{Deserialize, Serialize};

/// A batch of product moving through the production sections.
///
/// All descriptive fields are free text as typed on the pallet sheet, except
/// `quantity` and `needs_packaging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pallet {
    pub id: String,
    #[serde(rename = "data_entrega")]
    pub delivery_date: String,
    /// Production order.
    #[serde(rename = "op")]
    pub order_ref: String,
    #[serde(rename = "referencia")]
    pub reference: String,
    #[serde(rename = "nome_produto")]
    pub product_name: String,
    #[serde(rename = "medida")]
    pub size: String,
    #[serde(rename = "cor_botao")]
    pub button_color: String,
    #[serde(rename = "cor_ribete")]
    pub trim_color: String,
    #[serde(rename = "leva_embalagem")]
    pub needs_packaging: bool,
    #[serde(rename = "quantidade")]
    pub quantity: i64,
    #[serde(rename = "data_hora")]
    pub produced_at: String,
    #[serde(rename = "numero_lote")]
    pub lot_number: String,
}

/// Creation payload for `POST /paletes`. Every field is required; they are
/// optional here so that validation can report all the missing ones at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPallet {
    #[serde(rename = "data_entrega", default)]
    pub delivery_date: Option<String>,
    #[serde(rename = "op", default)]
    pub order_ref: Option<String>,
    #[serde(rename = "referencia", default)]
    pub reference: Option<String>,
    #[serde(rename = "nome_produto", default)]
    pub product_name: Option<String>,
    #[serde(rename = "medida", default)]
    pub size: Option<String>,
    #[serde(rename = "cor_botao", default)]
    pub button_color: Option<String>,
    #[serde(rename = "cor_ribete", default)]
    pub trim_color: Option<String>,
    #[serde(rename = "leva_embalagem", default)]
    pub needs_packaging: Option<bool>,
    #[serde(rename = "quantidade", default)]
    pub quantity: Option<i64>,
    #[serde(rename = "data_hora", default)]
    pub produced_at: Option<String>,
    #[serde(rename = "numero_lote", default)]
    pub lot_number: Option<String>,
}
