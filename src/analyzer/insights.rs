use std::collections::BTreeMap;

use crate::locale::Language;
use crate::parser::SalesRecord;

/// Génère la phrase de diagnostic : meilleure région, pire région, écart.
///
/// Précondition souple : au moins une ligne. Sinon la phrase sentinelle
/// "données insuffisantes" est retournée — jamais une erreur, la sortie
/// alimente directement l'affichage.
pub fn generate_insight(records: &[SalesRecord], language: Language) -> String {
    if records.is_empty() {
        return language.insufficient_data().to_string();
    }

    // BTreeMap : ordre des régions déterministe, les égalités de montant
    // se départagent par ordre alphabétique.
    let mut region_sales: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *region_sales.entry(record.region.as_str()).or_insert(0.0) += record.sales;
    }

    let (top_region, top_sales) = region_sales
        .iter()
        .fold(("", f64::NEG_INFINITY), |acc, (&region, &sales)| {
            if sales > acc.1 {
                (region, sales)
            } else {
                acc
            }
        });
    let (drop_region, drop_sales) = region_sales
        .iter()
        .fold(("", f64::INFINITY), |acc, (&region, &sales)| {
            if sales < acc.1 {
                (region, sales)
            } else {
                acc
            }
        });

    let gap = language.format_currency(top_sales - drop_sales);
    language.insight_sentence(top_region, drop_region, &gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_record(region: &str, sales: f64) -> SalesRecord {
        SalesRecord {
            customer_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            region: region.into(),
            product: "Maize Seeds".into(),
            sales,
            profit: sales * 0.2,
            customer_age: 35,
            customer_gender: "Male".into(),
        }
    }

    #[test]
    fn test_best_and_worst_region() {
        // Scénario du cahier des charges : Central 1000, Northern 500 → écart MWK 500
        let records = vec![make_record("Central", 1000.0), make_record("Northern", 500.0)];
        let sentence = generate_insight(&records, Language::En);
        assert!(sentence.contains("Central"), "phrase: {sentence}");
        assert!(sentence.contains("Northern"), "phrase: {sentence}");
        assert!(sentence.contains("MWK 500"), "phrase: {sentence}");
    }

    #[test]
    fn test_sums_are_per_region() {
        let records = vec![
            make_record("Central", 300.0),
            make_record("Central", 300.0),
            make_record("Southern", 500.0),
        ];
        // Central totalise 600 > Southern 500 → écart 100
        let sentence = generate_insight(&records, Language::En);
        assert!(sentence.contains("best-performing region is Central"));
        assert!(sentence.contains("MWK 100"));
    }

    #[test]
    fn test_empty_table_sentinel() {
        assert_eq!(
            generate_insight(&[], Language::En),
            Language::En.insufficient_data()
        );
        assert_eq!(
            generate_insight(&[], Language::Ny),
            Language::Ny.insufficient_data()
        );
    }

    #[test]
    fn test_single_region_zero_gap() {
        let records = vec![make_record("Central", 1000.0)];
        let sentence = generate_insight(&records, Language::En);
        assert!(sentence.contains("MWK 0"));
    }

    #[test]
    fn test_chichewa_sentence() {
        let records = vec![make_record("Central", 1000.0), make_record("Northern", 500.0)];
        let sentence = generate_insight(&records, Language::Ny);
        assert!(sentence.contains("Central"));
        assert!(sentence.contains("MK 500"), "phrase: {sentence}");
    }
}
