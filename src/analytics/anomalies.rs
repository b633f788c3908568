//! Détection d'anomalies sur la série des ventes — Isolation Forest 1-D.
//!
//! Le modèle partitionne l'intervalle des valeurs par coupes récursives
//! aléatoires ; un point isolé en peu de coupes obtient un score élevé.
//! La fraction de points au score le plus haut, au plus proche du taux de
//! contamination, est marquée anormale.

use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::Serialize;

use crate::error::DashboardError;
use crate::parser::SalesRecord;

/// Nombre d'arbres de la forêt.
const N_TREES: usize = 100;
/// Taille maximale du sous-échantillon par arbre.
const SUBSAMPLE: usize = 256;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Enregistrement trié par date, annoté du score et du drapeau d'anomalie.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnomaly {
    #[serde(flatten)]
    pub record: SalesRecord,
    /// Score d'isolation dans [0, 1] ; proche de 1 = isolé en peu de coupes.
    pub anomaly_score: f64,
    pub anomaly: bool,
}

/// Détecte les ventes anormales par Isolation Forest sur la colonne `Sales`.
///
/// # Arguments
/// * `records` — table non vide (sinon `InvalidInput`)
/// * `contamination` — fraction de points attendus aberrants, dans (0, 0.5]
/// * `seed` — graine du générateur ; même graine + même entrée = mêmes drapeaux
///
/// Les enregistrements sont d'abord triés par date croissante. Une
/// distribution dégénérée (toutes les ventes identiques) ne marque rien :
/// un seuil par taux de contamination se comporte mal à variance nulle.
pub fn detect_sales_anomalies(
    records: &[SalesRecord],
    contamination: f64,
    seed: u64,
) -> Result<Vec<SalesAnomaly>, DashboardError> {
    if records.is_empty() {
        return Err(DashboardError::InvalidInput(
            "la table des ventes est vide".into(),
        ));
    }
    if !(contamination > 0.0 && contamination <= 0.5) {
        return Err(DashboardError::InvalidInput(format!(
            "contamination doit être dans (0, 0.5], reçu {contamination}"
        )));
    }

    let mut sorted: Vec<SalesRecord> = records.to_vec();
    sorted.sort_by(|a, b| (a.date, a.customer_id).cmp(&(b.date, b.customer_id)));

    let values: Vec<f64> = sorted.iter().map(|r| r.sales).collect();
    let n = values.len();

    // Distribution dégénérée : aucune coupe ne peut isoler quoi que ce soit
    let spread = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
        - values.iter().cloned().fold(f64::INFINITY, f64::min);
    if spread < 1e-12 {
        return Ok(sorted
            .into_iter()
            .map(|record| SalesAnomaly {
                record,
                anomaly_score: 0.5,
                anomaly: false,
            })
            .collect());
    }

    let scores = isolation_scores(&values, seed);

    // Marque les round(n * contamination) points aux scores les plus hauts
    let n_flag = ((n as f64) * contamination).round() as usize;
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let mut flags = vec![false; n];
    for &idx in order.iter().take(n_flag.min(n)) {
        flags[idx] = true;
    }

    Ok(sorted
        .into_iter()
        .zip(scores)
        .zip(flags)
        .map(|((record, anomaly_score), anomaly)| SalesAnomaly {
            record,
            anomaly_score,
            anomaly,
        })
        .collect())
}

// ─── Forêt d'isolation ────────────────────────────────────────────────────────

enum IsoNode {
    Leaf {
        size: usize,
    },
    Split {
        value: f64,
        below: Box<IsoNode>,
        above: Box<IsoNode>,
    },
}

/// Score d'isolation de chaque point : s = 2^(-E[h(x)] / c(psi)).
fn isolation_scores(values: &[f64], seed: u64) -> Vec<f64> {
    let n = values.len();
    let psi = n.min(SUBSAMPLE);
    // Hauteur moyenne d'un BST de psi points : plafond de la récursion
    let depth_limit = (psi as f64).log2().ceil().max(1.0) as usize;
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);

    let mut path_sums = vec![0.0f64; n];
    for _ in 0..N_TREES {
        let subsample: Vec<f64> = if n <= psi {
            values.to_vec()
        } else {
            rand::seq::index::sample(&mut rng, n, psi)
                .into_iter()
                .map(|i| values[i])
                .collect()
        };
        let tree = build_tree(subsample, 0, depth_limit, &mut rng);
        for (i, &v) in values.iter().enumerate() {
            path_sums[i] += path_length(&tree, v, 0.0);
        }
    }

    let c_psi = c_factor(psi);
    path_sums
        .into_iter()
        .map(|sum| {
            let avg = sum / N_TREES as f64;
            2f64.powf(-avg / c_psi)
        })
        .collect()
}

fn build_tree(
    values: Vec<f64>,
    depth: usize,
    limit: usize,
    rng: &mut Xoshiro256Plus,
) -> IsoNode {
    let size = values.len();
    if size <= 1 || depth >= limit {
        return IsoNode::Leaf { size };
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max - min < 1e-12 {
        return IsoNode::Leaf { size };
    }

    // split dans [min, max) : les deux côtés sont garantis non vides
    let split = rng.gen_range(min..max);
    let (below, above): (Vec<f64>, Vec<f64>) = values.into_iter().partition(|&v| v <= split);

    IsoNode::Split {
        value: split,
        below: Box::new(build_tree(below, depth + 1, limit, rng)),
        above: Box::new(build_tree(above, depth + 1, limit, rng)),
    }
}

/// Longueur de chemin d'un point, ajustée de c(taille) à la feuille.
fn path_length(node: &IsoNode, x: f64, depth: f64) -> f64 {
    match node {
        IsoNode::Leaf { size } => depth + c_factor(*size),
        IsoNode::Split {
            value,
            below,
            above,
        } => {
            if x <= *value {
                path_length(below, x, depth + 1.0)
            } else {
                path_length(above, x, depth + 1.0)
            }
        }
    }
}

/// Longueur de chemin moyenne d'une recherche ratée dans un BST de n points.
fn c_factor(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let nf = n as f64;
            2.0 * (((nf - 1.0).ln()) + EULER_GAMMA) - 2.0 * (nf - 1.0) / nf
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
