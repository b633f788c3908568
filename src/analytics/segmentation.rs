//! Segmentation clients — K-Means sur (âge, ventes) standardisés.

use std::collections::BTreeSet;

use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::Serialize;

use crate::analyzer::stats::{moyenne, standardize};
use crate::error::DashboardError;
use crate::parser::SalesRecord;

/// Nombre de redémarrages K-Means ; le résultat de moindre inertie est gardé.
const N_RUNS: usize = 10;
const MAX_ITERATIONS: u64 = 300;

/// Enregistrement annoté de son étiquette de segment dans [0, k).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSegment {
    #[serde(flatten)]
    pub record: SalesRecord,
    pub segment: usize,
}

/// Synthèse d'un segment pour la couche d'affichage.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
    pub segment: usize,
    pub size: usize,
    pub mean_age: f64,
    pub mean_sales: f64,
}

/// Résultat complet de la segmentation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationOutput {
    pub records: Vec<CustomerSegment>,
    pub clusters: Vec<SegmentSummary>,
    pub k: usize,
}

/// Partitionne les clients en `k` segments sur (Customer Age, Sales).
///
/// Les deux features sont standardisées (moyenne nulle, variance unitaire)
/// sur l'entrée courante — l'échelle n'est jamais persistée entre appels.
/// Initialisation K-Means++ avec [`N_RUNS`] redémarrages, graine fournie par
/// l'appelant. Les étiquettes sont canoniques : les segments sont réindexés
/// par âge moyen de centroïde croissant, donc stables à graine fixée.
///
/// # Erreurs
/// `InvalidInput` si la table est vide, si `k == 0`, ou s'il y a moins de
/// points (âge, ventes) distincts que de segments demandés — pas de cluster
/// vide silencieux.
pub fn segment_customers(
    records: &[SalesRecord],
    k: usize,
    seed: u64,
) -> Result<SegmentationOutput, DashboardError> {
    if records.is_empty() {
        return Err(DashboardError::InvalidInput(
            "la table des ventes est vide".into(),
        ));
    }
    if k == 0 {
        return Err(DashboardError::InvalidInput("k doit être > 0".into()));
    }

    let distinct: BTreeSet<(u32, u64)> = records
        .iter()
        .map(|r| (r.customer_age, r.sales.to_bits()))
        .collect();
    if distinct.len() < k {
        return Err(DashboardError::InvalidInput(format!(
            "{} points distincts pour k={k} segments demandés",
            distinct.len()
        )));
    }

    let n = records.len();
    let ages: Vec<f64> = records.iter().map(|r| r.customer_age as f64).collect();
    let sales: Vec<f64> = records.iter().map(|r| r.sales).collect();
    let ages_z = standardize(&ages);
    let sales_z = standardize(&sales);

    let mut features = Array2::<f64>::zeros((n, 2));
    for i in 0..n {
        features[[i, 0]] = ages_z[i];
        features[[i, 1]] = sales_z[i];
    }

    let dataset = DatasetBase::from(features.clone());
    let rng = Xoshiro256Plus::seed_from_u64(seed);

    let model = KMeans::params_with_rng(k, rng)
        .n_runs(N_RUNS)
        .max_n_iterations(MAX_ITERATIONS)
        .tolerance(1e-4f64)
        .fit(&dataset)
        .map_err(|e| DashboardError::InvalidInput(format!("K-Means (k={k}) erreur: {e}")))?;

    let centroids = model.centroids().clone();
    let labels_array: Array1<usize> = model.predict(&features);
    let raw_labels: Vec<usize> = labels_array.iter().copied().collect();

    // Réindexation canonique : centroïdes triés par âge moyen croissant
    // (puis ventes moyennes, puis index d'origine en cas d'égalité)
    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| {
        let key_a = (centroids[[a, 0]], centroids[[a, 1]]);
        let key_b = (centroids[[b, 0]], centroids[[b, 1]]);
        key_a
            .partial_cmp(&key_b)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let mut remap = vec![0usize; k];
    for (new_label, &old_label) in order.iter().enumerate() {
        remap[old_label] = new_label;
    }

    let segments: Vec<CustomerSegment> = records
        .iter()
        .zip(&raw_labels)
        .map(|(record, &raw)| CustomerSegment {
            record: record.clone(),
            segment: remap[raw],
        })
        .collect();

    let clusters = build_summaries(&segments, k);

    Ok(SegmentationOutput {
        records: segments,
        clusters,
        k,
    })
}

fn build_summaries(segments: &[CustomerSegment], k: usize) -> Vec<SegmentSummary> {
    (0..k)
        .map(|label| {
            let members: Vec<&CustomerSegment> =
                segments.iter().filter(|s| s.segment == label).collect();
            let ages: Vec<f64> = members
                .iter()
                .map(|s| s.record.customer_age as f64)
                .collect();
            let sales: Vec<f64> = members.iter().map(|s| s.record.sales).collect();
            SegmentSummary {
                segment: label,
                size: members.len(),
                mean_age: moyenne(&ages),
                mean_sales: moyenne(&sales),
            }
        })
        .collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
