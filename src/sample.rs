//! Générateur de données d'exemple — un jeu de ventes plausible et
//! reproductible pour les tests et les démonstrations.

use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use crate::parser::SalesRecord;

const REGIONS: &[&str] = &["Central", "Northern", "Southern"];
const PRODUCTS: &[&str] = &[
    "Maize Seeds",
    "Fertilizer",
    "Pesticides",
    "Irrigation Kit",
    "Animal Feed",
];
const GENDERS: &[&str] = &["Male", "Female"];

/// Génère `num_days` enregistrements journaliers à partir du 2024-01-01 :
/// ventes 1000..=10000, profit 10–30 % des ventes, âge 18..=65.
/// Même graine → même jeu de données.
pub fn generate_sample_records(num_days: usize, seed: u64) -> Vec<SalesRecord> {
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date de départ valide");

    (0..num_days)
        .map(|i| {
            let sales = rng.gen_range(1000..=10_000) as f64;
            let profit = (sales * rng.gen_range(0.1..0.3)).round();
            SalesRecord {
                customer_id: (i + 1) as u64,
                date: start + chrono::Duration::days(i as i64),
                region: REGIONS[rng.gen_range(0..REGIONS.len())].to_string(),
                product: PRODUCTS[rng.gen_range(0..PRODUCTS.len())].to_string(),
                sales,
                profit,
                customer_age: rng.gen_range(18..=65),
                customer_gender: GENDERS[rng.gen_range(0..GENDERS.len())].to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_generation() {
        let a = generate_sample_records(50, 42);
        let b = generate_sample_records(50, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_value_ranges() {
        let records = generate_sample_records(100, 42);
        assert_eq!(records.len(), 100);
        for r in &records {
            assert!((1000.0..=10_000.0).contains(&r.sales));
            assert!(r.profit >= r.sales * 0.1 - 1.0);
            assert!(r.profit <= r.sales * 0.3 + 1.0);
            assert!((18..=65).contains(&r.customer_age));
            assert!(REGIONS.contains(&r.region.as_str()));
            assert!(PRODUCTS.contains(&r.product.as_str()));
        }
    }

    #[test]
    fn test_dates_are_consecutive_and_ids_unique() {
        let records = generate_sample_records(30, 7);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.customer_id, (i + 1) as u64);
            assert_eq!(
                r.date,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
            );
        }
    }
}
