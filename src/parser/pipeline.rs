use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::DashboardError;
use crate::parser::columns::{validate_columns, ColumnMap};
use crate::parser::deserializers::{
    parse_amount, parse_iso_date, parse_opt_u64, parse_positive_u32,
};
use crate::parser::types::{ParseWarning, SalesRecord, SalesRecordRaw};

/// Sortie de `parse_csv` — table normalisée et métadonnées d'import.
#[derive(Debug)]
pub struct ParseOutput {
    pub records: Vec<SalesRecord>,
    pub warnings: Vec<ParseWarning>,
    pub total_rows_processed: usize,
    pub skipped_rows: usize,
    pub detected_columns: Vec<String>,
    pub missing_optional_columns: Vec<String>,
    pub unique_regions: Vec<String>,
    pub unique_products: Vec<String>,
    pub parse_duration_ms: u64,
}

/// Parse un fichier CSV de ventes depuis `path`.
pub fn parse_csv(path: &str) -> Result<ParseOutput, DashboardError> {
    let file = std::fs::File::open(path)?;
    parse_csv_reader(std::io::BufReader::new(file))
}

/// Politique "fail soft" de la frontière de chargement : fichier absent →
/// table vide avec diagnostic journalisé. Toute autre erreur (colonnes
/// manquantes, fichier corrompu) reste une erreur explicite — l'appelant ne
/// peut pas confondre "pas de données" et "chargement raté".
pub fn load_or_empty(path: &str) -> Result<Vec<SalesRecord>, DashboardError> {
    if !Path::new(path).exists() {
        warn!(path, "fichier de données introuvable, table vide retournée");
        return Ok(Vec::new());
    }
    parse_csv(path).map(|out| out.records)
}

/// Logique de parsing — accepte toute source `Read`, pratique pour les tests.
pub fn parse_csv_reader<R: Read>(reader: R) -> Result<ParseOutput, DashboardError> {
    let start = Instant::now();

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    // Phase 1 : validation des colonnes
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(DashboardError::EmptyFile);
    }
    let col_map = ColumnMap::from_headers(&headers);
    let col_validation = validate_columns(&col_map)?;

    // Phase 2 : parsing et normalisation des lignes
    let mut records: Vec<SalesRecord> = Vec::new();
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut skipped = 0usize;
    let mut row_idx = 0usize;

    let mut unique_regions: HashSet<String> = HashSet::new();
    let mut unique_products: HashSet<String> = HashSet::new();

    for result in rdr.records() {
        row_idx += 1;

        match result {
            Ok(record) => {
                let raw = record_to_raw(&col_map, &record);
                match normalize_record(&raw, row_idx) {
                    Ok(normalized) => {
                        unique_regions.insert(normalized.region.clone());
                        unique_products.insert(normalized.product.clone());
                        records.push(normalized);
                    }
                    Err(msg) => {
                        warnings.push(ParseWarning {
                            line: row_idx + 1, // +1 pour la ligne d'en-tête
                            message: msg,
                        });
                        skipped += 1;
                    }
                }
            }
            Err(err) => {
                warnings.push(ParseWarning {
                    line: row_idx + 1,
                    message: err.to_string(),
                });
                skipped += 1;
            }
        }
    }

    if row_idx == 0 {
        return Err(DashboardError::EmptyFile);
    }

    let mut unique_regions: Vec<String> = unique_regions.into_iter().collect();
    unique_regions.sort();
    let mut unique_products: Vec<String> = unique_products.into_iter().collect();
    unique_products.sort();

    debug!(
        rows = row_idx,
        accepted = records.len(),
        skipped,
        "import CSV terminé"
    );

    Ok(ParseOutput {
        records,
        warnings,
        total_rows_processed: row_idx,
        skipped_rows: skipped,
        detected_columns: col_validation.present,
        missing_optional_columns: col_validation.missing_optional,
        unique_regions,
        unique_products,
        parse_duration_ms: start.elapsed().as_millis() as u64,
    })
}

fn record_to_raw(col_map: &ColumnMap, record: &csv::StringRecord) -> SalesRecordRaw {
    SalesRecordRaw {
        customer_id: col_map.get(record, "Customer ID").map(str::to_string),
        date: col_map.get(record, "Date").map(str::to_string),
        region: col_map.get(record, "Region").map(str::to_string),
        product: col_map.get(record, "Product").map(str::to_string),
        sales: col_map.get(record, "Sales").map(str::to_string),
        profit: col_map.get(record, "Profit").map(str::to_string),
        customer_age: col_map.get(record, "Customer Age").map(str::to_string),
        customer_gender: col_map.get(record, "Customer Gender").map(str::to_string),
    }
}

fn normalize_record(raw: &SalesRecordRaw, row_idx: usize) -> Result<SalesRecord, String> {
    // Date (obligatoire)
    let date_str = raw.date.as_deref().unwrap_or("");
    let date =
        parse_iso_date(date_str).ok_or_else(|| format!("Date invalide: {date_str:?}"))?;

    // Région / produit / genre (obligatoires, non vides)
    let region = raw.region.as_deref().unwrap_or("").trim().to_string();
    if region.is_empty() {
        return Err("Region manquante".to_string());
    }
    let product = raw.product.as_deref().unwrap_or("").trim().to_string();
    if product.is_empty() {
        return Err("Product manquant".to_string());
    }
    let customer_gender = raw
        .customer_gender
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();
    if customer_gender.is_empty() {
        return Err("Customer Gender manquant".to_string());
    }

    // Ventes : montant non négatif
    let sales_str = raw.sales.as_deref().unwrap_or("");
    let sales =
        parse_amount(sales_str).ok_or_else(|| format!("Sales invalide: {sales_str:?}"))?;
    if sales < 0.0 {
        return Err(format!("Sales négatif: {sales}"));
    }

    // Profit : peut être négatif
    let profit_str = raw.profit.as_deref().unwrap_or("");
    let profit =
        parse_amount(profit_str).ok_or_else(|| format!("Profit invalide: {profit_str:?}"))?;

    // Âge client : entier strictement positif
    let age_str = raw.customer_age.as_deref().unwrap_or("");
    let customer_age = parse_positive_u32(age_str)
        .ok_or_else(|| format!("Customer Age invalide: {age_str:?}"))?;

    // ID client : colonne optionnelle, sinon position de la ligne (1-based)
    let customer_id = raw
        .customer_id
        .as_deref()
        .and_then(parse_opt_u64)
        .unwrap_or(row_idx as u64);

    Ok(SalesRecord {
        customer_id,
        date,
        region,
        product,
        sales,
        profit,
        customer_age,
        customer_gender,
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const HDR: &str = "Customer ID,Date,Region,Product,Sales,Profit,Customer Age,Customer Gender";

    fn parse(csv: &str) -> ParseOutput {
        parse_csv_reader(csv.as_bytes()).unwrap()
    }

    fn parse_err(csv: &str) -> DashboardError {
        parse_csv_reader(csv.as_bytes()).unwrap_err()
    }

    #[test]
    fn test_basic_row() {
        let csv = format!("{HDR}\n1,2024-01-01,Central,Maize Seeds,5000,900,34,Male");
        let out = parse(&csv);
        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.customer_id, 1);
        assert_eq!(r.date.to_string(), "2024-01-01");
        assert_eq!(r.region, "Central");
        assert_eq!(r.product, "Maize Seeds");
        assert!((r.sales - 5000.0).abs() < 1e-12);
        assert!((r.profit - 900.0).abs() < 1e-12);
        assert_eq!(r.customer_age, 34);
        assert_eq!(r.customer_gender, "Male");
    }

    #[test]
    fn test_customer_id_column_absent_assigns_row_position() {
        let hdr = "Date,Region,Product,Sales,Profit,Customer Age,Customer Gender";
        let csv = format!(
            "{hdr}\n2024-01-01,Central,Fertilizer,1000,100,30,Female\n\
             2024-01-02,Northern,Fertilizer,2000,200,40,Male"
        );
        let out = parse(&csv);
        assert_eq!(out.records[0].customer_id, 1);
        assert_eq!(out.records[1].customer_id, 2);
        assert!(
            out.missing_optional_columns
                .contains(&"Customer ID".to_string()),
            "Customer ID doit figurer dans missing_optional_columns"
        );
        // Invariant : identifiants uniques une fois attribués
        let ids: std::collections::HashSet<u64> =
            out.records.iter().map(|r| r.customer_id).collect();
        assert_eq!(ids.len(), out.records.len());
    }

    #[test]
    fn test_negative_profit_accepted() {
        let csv = format!("{HDR}\n1,2024-03-10,Southern,Pesticides,800,-120,51,Female");
        let out = parse(&csv);
        assert_eq!(out.records.len(), 1);
        assert!((out.records[0].profit + 120.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_sales_rejected() {
        let csv = format!("{HDR}\n1,2024-03-10,Southern,Pesticides,-800,120,51,Female");
        let out = parse(&csv);
        assert!(out.records.is_empty());
        assert_eq!(out.skipped_rows, 1);
    }

    #[test]
    fn test_malformed_lines_skip() {
        // Ligne 2 : date invalide ; ligne 3 : âge invalide → sautées
        let csv = format!(
            "{HDR}\n\
             1,2024-01-01,Central,Maize Seeds,5000,900,34,Male\n\
             2,pas-une-date,Central,Maize Seeds,5000,900,34,Male\n\
             3,2024-01-03,Central,Maize Seeds,5000,900,zero,Male\n\
             4,2024-01-04,Northern,Animal Feed,2500,300,41,Female"
        );
        let out = parse(&csv);
        assert_eq!(out.records.len(), 2, "2 lignes valides attendues");
        assert_eq!(out.skipped_rows, 2);
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.warnings[0].line, 3);
    }

    #[test]
    fn test_unique_regions_and_products_sorted() {
        let csv = format!(
            "{HDR}\n\
             1,2024-01-01,Southern,Fertilizer,1000,100,30,Male\n\
             2,2024-01-02,Central,Animal Feed,2000,200,40,Female\n\
             3,2024-01-03,Central,Fertilizer,1500,150,35,Male"
        );
        let out = parse(&csv);
        assert_eq!(out.unique_regions, vec!["Central", "Southern"]);
        assert_eq!(out.unique_products, vec!["Animal Feed", "Fertilizer"]);
    }

    #[test]
    fn test_missing_required_column_error() {
        let csv = "Date,Region,Sales\n2024-01-01,Central,1000";
        match parse_err(csv) {
            DashboardError::MissingColumns(cols) => {
                assert!(cols.contains(&"Customer Age".to_string()));
                assert!(cols.contains(&"Profit".to_string()));
            }
            e => panic!("MissingColumns attendu, reçu {e:?}"),
        }
    }

    #[test]
    fn test_header_only_file() {
        let err = parse_err(HDR);
        assert!(matches!(err, DashboardError::EmptyFile));
    }

    #[test]
    fn test_empty_file_error() {
        match parse_err("") {
            DashboardError::EmptyFile
            | DashboardError::MissingColumns(_)
            | DashboardError::Csv(_) => {}
            e => panic!("EmptyFile ou apparenté attendu, reçu {e:?}"),
        }
    }

    #[test]
    fn test_bom_utf8() {
        let csv = format!("\u{feff}{HDR}\n1,2024-01-01,Central,Maize Seeds,5000,900,34,Male");
        let out = parse(&csv);
        assert_eq!(out.records.len(), 1, "le BOM doit être ignoré");
    }

    #[test]
    fn test_load_or_empty_missing_file() {
        let records = load_or_empty("/chemin/inexistant/ventes.csv").unwrap();
        assert!(records.is_empty());
    }
}
