use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::locale::Language;

/// Configuration du tableau de bord.
///
/// Tous les paramètres analytiques sont explicites — y compris la graine
/// aléatoire des modèles : le déterminisme est un contrat visible, pas un
/// défaut enfoui dans une bibliothèque.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    /// Langue d'affichage des libellés, phrases et montants.
    pub language: Language,
    /// Fraction de points attendus comme aberrants (détection d'anomalies).
    pub contamination: f64,
    /// Horizon de prévision en jours.
    pub forecast_horizon_days: usize,
    /// Nombre de segments clients (K-Means).
    pub n_clusters: usize,
    /// Graine des initialisations aléatoires (isolation forest, K-Means).
    pub random_seed: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            language: Language::En,
            contamination: 0.05,
            forecast_horizon_days: 30,
            n_clusters: 3,
            random_seed: 42,
        }
    }
}

impl DashboardConfig {
    /// Vérifie la cohérence des paramètres avant toute passe analytique.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(DashboardError::InvalidInput(format!(
                "contamination doit être dans (0, 0.5], reçu {}",
                self.contamination
            )));
        }
        if self.forecast_horizon_days == 0 {
            return Err(DashboardError::InvalidInput(
                "forecastHorizonDays doit être > 0".into(),
            ));
        }
        if self.n_clusters == 0 {
            return Err(DashboardError::InvalidInput(
                "nClusters doit être > 0".into(),
            ));
        }
        Ok(())
    }
}
