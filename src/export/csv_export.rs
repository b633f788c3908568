//! Export CSV — sérialisation sans perte de la table courante.
//!
//! Les colonnes d'origine et l'ordre des lignes sont préservés tels quels :
//! exporter puis réimporter redonne une table identique.

use std::io::Write;

use crate::error::DashboardError;
use crate::parser::SalesRecord;

/// Ordre canonique des colonnes à l'export.
const EXPORT_HEADERS: &[&str] = &[
    "Customer ID",
    "Date",
    "Region",
    "Product",
    "Sales",
    "Profit",
    "Customer Age",
    "Customer Gender",
];

/// Sérialise la table vers n'importe quel `Write`.
pub fn export_csv<W: Write>(records: &[SalesRecord], writer: W) -> Result<(), DashboardError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADERS)?;

    for r in records {
        wtr.write_record(&[
            r.customer_id.to_string(),
            r.date.format("%Y-%m-%d").to_string(),
            r.region.clone(),
            r.product.clone(),
            // Display de f64 : représentation la plus courte qui round-trip
            r.sales.to_string(),
            r.profit.to_string(),
            r.customer_age.to_string(),
            r.customer_gender.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Sérialise la table dans un fichier.
pub fn export_csv_to_path(records: &[SalesRecord], path: &str) -> Result<(), DashboardError> {
    let file = std::fs::File::create(path)?;
    export_csv(records, std::io::BufWriter::new(file))
}
