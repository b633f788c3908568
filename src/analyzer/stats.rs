//! Fonctions statistiques réutilisées par les passes analytiques.

/// Moyenne arithmétique. Retourne 0.0 pour une slice vide.
pub fn moyenne(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Écart-type (population). Retourne 0.0 pour une slice vide.
pub fn ecart_type(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = moyenne(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Standardise une série à moyenne nulle / variance unitaire (z-scores),
/// calculée sur l'entrée courante — rien n'est persisté entre appels.
/// Série à variance nulle → tous les z-scores valent 0.0.
pub fn standardize(values: &[f64]) -> Vec<f64> {
    let mean = moyenne(values);
    let std = ecart_type(values);
    if std < 1e-12 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / std).collect()
}
