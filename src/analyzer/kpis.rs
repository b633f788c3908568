use serde::Serialize;

use crate::parser::SalesRecord;

/// Les trois indicateurs clés du tableau de bord.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_sales: f64,
    pub total_profit: f64,
    /// Marge en pourcentage ; 0.0 quand le total des ventes est nul.
    pub profit_margin: f64,
}

/// Réduit la table aux trois KPI métier. Fonction pure, table vide → zéros.
pub fn compute_kpis(records: &[SalesRecord]) -> Kpis {
    let total_sales: f64 = records.iter().map(|r| r.sales).sum();
    let total_profit: f64 = records.iter().map(|r| r.profit).sum();
    let profit_margin = if total_sales > 0.0 {
        total_profit / total_sales * 100.0
    } else {
        0.0
    };

    Kpis {
        total_sales,
        total_profit,
        profit_margin,
    }
}
