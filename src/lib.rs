//! Noyau analytique du tableau de bord BI pour PME malawiennes.
//!
//! Charge un CSV de transactions en table mémoire, calcule les KPI,
//! génère un diagnostic en langage naturel et exécute trois passes
//! analytiques : détection d'anomalies (isolation forest), prévision des
//! ventes (modèle additif tendance + saisonnalité) et segmentation clients
//! (K-Means). La couche de présentation consomme les sorties sérialisées ;
//! chaque appel repart d'une table empruntée et d'un modèle réajusté, sans
//! état mutable partagé.

pub mod analytics;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod export;
pub mod locale;
pub mod parser;
pub mod sample;

pub use config::DashboardConfig;
pub use error::DashboardError;
pub use locale::Language;
pub use parser::SalesRecord;

// ─── E2E Integration Tests ──────────────────────────────────────────────────
