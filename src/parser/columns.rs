use std::collections::HashMap;

use crate::error::DashboardError;

/// Colonnes obligatoires — l'import échoue si l'une d'elles est absente.
pub const REQUIRED: &[&str] = &[
    "Date",
    "Region",
    "Product",
    "Sales",
    "Profit",
    "Customer Age",
    "Customer Gender",
];

/// Colonnes optionnelles — absentes = valeur dérivée, signalées dans le résultat.
pub const OPTIONAL: &[&str] = &["Customer ID"];

/// Associe les noms de colonnes à leur index dans un enregistrement CSV.
pub struct ColumnMap {
    indices: HashMap<String, usize>,
    headers: Vec<String>,
}

impl ColumnMap {
    /// Construit la table depuis la ligne d'en-tête (champs débarrassés des espaces).
    pub fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut indices = HashMap::new();
        let mut header_list = Vec::new();
        for (i, field) in headers.iter().enumerate() {
            let name = field.trim().trim_start_matches('\u{feff}').to_string();
            indices.insert(name.clone(), i);
            header_list.push(name);
        }
        ColumnMap {
            indices,
            headers: header_list,
        }
    }

    /// Valeur d'une colonne nommée dans un enregistrement.
    pub fn get<'a>(&self, record: &'a csv::StringRecord, col: &str) -> Option<&'a str> {
        self.indices.get(col).and_then(|&i| record.get(i))
    }

    pub fn has(&self, col: &str) -> bool {
        self.indices.contains_key(col)
    }

    /// Tous les noms d'en-tête, dans l'ordre du fichier.
    pub fn all_headers(&self) -> &[String] {
        &self.headers
    }
}

/// Résultat de la validation des colonnes.
#[derive(Debug)]
pub struct ColumnValidation {
    /// Colonnes présentes dans le CSV.
    pub present: Vec<String>,
    /// Colonnes optionnelles absentes.
    pub missing_optional: Vec<String>,
}

/// Vérifie que toutes les colonnes obligatoires sont présentes.
/// Retourne `DashboardError::MissingColumns` sinon.
pub fn validate_columns(col_map: &ColumnMap) -> Result<ColumnValidation, DashboardError> {
    let missing_required: Vec<String> = REQUIRED
        .iter()
        .filter(|&&c| !col_map.has(c))
        .map(|c| c.to_string())
        .collect();

    if !missing_required.is_empty() {
        return Err(DashboardError::MissingColumns(missing_required));
    }

    let missing_optional = OPTIONAL
        .iter()
        .filter(|&&c| !col_map.has(c))
        .map(|c| c.to_string())
        .collect();

    Ok(ColumnValidation {
        present: col_map.all_headers().to_vec(),
        missing_optional,
    })
}
