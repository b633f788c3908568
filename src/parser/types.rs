use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ligne brute telle que lue du CSV, avant toute validation.
#[derive(Debug, Default)]
pub struct SalesRecordRaw {
    pub customer_id: Option<String>,
    pub date: Option<String>,
    pub region: Option<String>,
    pub product: Option<String>,
    pub sales: Option<String>,
    pub profit: Option<String>,
    pub customer_age: Option<String>,
    pub customer_gender: Option<String>,
}

/// Transaction de vente normalisée — l'unité de base de toutes les analyses.
///
/// Les colonnes obligatoires sont garanties présentes par le parseur ;
/// `customer_id` est attribué séquentiellement depuis la position de la
/// ligne quand la colonne est absente (unique par ligne une fois attribué).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub customer_id: u64,
    pub date: NaiveDate,
    pub region: String,
    pub product: String,
    pub sales: f64,
    pub profit: f64,
    pub customer_age: u32,
    pub customer_gender: String,
}

/// Avertissement émis pour une ligne rejetée pendant l'import.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}
