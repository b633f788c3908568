//! Prévision des ventes — modèle additif tendance + saisonnalité annuelle.
//!
//! Les ventes sont agrégées en totaux journaliers puis ajustées par moindres
//! carrés : tendance linéaire, plus un bloc saisonnier annuel en harmoniques
//! de Fourier quand l'historique couvre au moins deux cycles complets.
//! L'intervalle d'incertitude à 80 % vient de l'écart-type des résidus et
//! s'élargit en sqrt(h) au-delà de l'historique.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::analyzer::stats::ecart_type;
use crate::error::DashboardError;
use crate::parser::SalesRecord;

/// Minimum de points journaliers distincts requis avant d'ajuster le modèle.
pub const MIN_HISTORY_POINTS: usize = 90;
/// Période saisonnière (année moyenne, en jours).
pub const SEASONAL_PERIOD_DAYS: f64 = 365.25;
/// Couverture minimale pour activer le bloc saisonnier : deux cycles complets.
const MIN_SEASONAL_SPAN_DAYS: i64 = 730;
/// Nombre d'harmoniques de Fourier du bloc saisonnier.
const N_HARMONICS: usize = 3;
/// z bilatéral pour un intervalle de confiance à 80 %.
const Z80: f64 = 1.28;

/// Un point de prévision : estimation centrale et bornes basse/haute.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Résultat complet de la prévision.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastOutput {
    /// Un point par jour dans [début historique, fin historique + horizon].
    pub points: Vec<ForecastPoint>,
    pub model_info: String,
    pub mae: f64,
    pub history_length: usize,
}

/// Prévoit les ventes journalières sur `horizon_days` jours au-delà de
/// l'historique.
///
/// # Préconditions
/// * `horizon_days > 0` (sinon `InvalidInput`)
/// * au moins [`MIN_HISTORY_POINTS`] dates distinctes (sinon
///   `InsufficientData` — le modèle n'est jamais sollicité en dessous)
///
/// # Invariant
/// `yhat_lower <= yhat <= yhat_upper` sur chaque point produit.
pub fn forecast_sales(
    records: &[SalesRecord],
    horizon_days: usize,
) -> Result<ForecastOutput, DashboardError> {
    if horizon_days == 0 {
        return Err(DashboardError::InvalidInput(
            "horizon_days doit être > 0".into(),
        ));
    }

    // Agrégation en totaux journaliers, triés par date
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        *daily.entry(record.date).or_insert(0.0) += record.sales;
    }

    let n = daily.len();
    if n < MIN_HISTORY_POINTS {
        return Err(DashboardError::InsufficientData {
            required: MIN_HISTORY_POINTS,
            actual: n,
        });
    }

    let first_date = *daily.keys().next().unwrap();
    let last_date = *daily.keys().next_back().unwrap();
    let last_t = (last_date - first_date).num_days();

    let ts: Vec<f64> = daily
        .keys()
        .map(|d| (*d - first_date).num_days() as f64)
        .collect();
    let ys: Vec<f64> = daily.values().copied().collect();

    // Bloc saisonnier seulement avec deux cycles complets d'historique :
    // en dessous, les harmoniques absorberaient la tendance
    let seasonal = last_t >= MIN_SEASONAL_SPAN_DAYS;
    let coeffs = fit_additive_model(&ts, &ys, seasonal);

    // Résidus sur l'historique
    let fitted: Vec<f64> = ts.iter().map(|&t| predict(&coeffs, t)).collect();
    let residuals: Vec<f64> = ys.iter().zip(&fitted).map(|(y, f)| y - f).collect();
    let std_res = ecart_type(&residuals);
    let mae = compute_mae(&ys, &fitted);

    // Un point par jour : historique (ajusté) puis horizon (extrapolé)
    let mut points = Vec::with_capacity((last_t as usize) + horizon_days + 1);
    for d in 0..=(last_t + horizon_days as i64) {
        let raw = predict(&coeffs, d as f64);
        // L'incertitude croît avec la distance à l'historique
        let margin = if d <= last_t {
            Z80 * std_res
        } else {
            Z80 * std_res * ((d - last_t) as f64).sqrt()
        };
        // Les ventes sont non négatives ; le rognage préserve lower <= yhat <= upper
        let yhat = raw.max(0.0);
        let yhat_upper = (raw + margin).max(yhat);
        let yhat_lower = (raw - margin).clamp(0.0, yhat);

        points.push(ForecastPoint {
            date: first_date + chrono::Duration::days(d),
            yhat,
            yhat_lower,
            yhat_upper,
        });
    }

    let model_info = if seasonal {
        format!("tendance linéaire + saisonnalité annuelle ({N_HARMONICS} harmoniques)")
    } else {
        "tendance linéaire seule (historique < 2 cycles annuels)".to_string()
    };

    Ok(ForecastOutput {
        points,
        model_info,
        mae,
        history_length: n,
    })
}

// ─── Ajustement par moindres carrés ───────────────────────────────────────────

/// Matrice de régression : [1, t] plus, en mode saisonnier, les paires
/// (sin, cos) des harmoniques annuelles.
fn design_row(t: f64, seasonal: bool) -> Vec<f64> {
    let mut row = vec![1.0, t];
    if seasonal {
        for k in 1..=N_HARMONICS {
            let omega = 2.0 * std::f64::consts::PI * (k as f64) * t / SEASONAL_PERIOD_DAYS;
            row.push(omega.sin());
            row.push(omega.cos());
        }
    }
    row
}

/// Ajuste les coefficients par équations normales. En cas de système
/// dégénéré (ne devrait pas arriver avec 90+ points distincts), dégrade
/// vers la tendance seule, puis vers la moyenne.
fn fit_additive_model(ts: &[f64], ys: &[f64], seasonal: bool) -> Vec<f64> {
    if let Some(coeffs) = solve_normal_equations(ts, ys, seasonal) {
        return coeffs;
    }
    if seasonal {
        if let Some(coeffs) = solve_normal_equations(ts, ys, false) {
            return coeffs;
        }
    }
    vec![crate::analyzer::stats::moyenne(ys), 0.0]
}

fn solve_normal_equations(ts: &[f64], ys: &[f64], seasonal: bool) -> Option<Vec<f64>> {
    let n = ts.len();
    let p = design_row(0.0, seasonal).len();
    if n < p {
        return None;
    }

    let mut x = Array2::<f64>::zeros((n, p));
    for (i, &t) in ts.iter().enumerate() {
        for (j, v) in design_row(t, seasonal).into_iter().enumerate() {
            x[[i, j]] = v;
        }
    }
    let y = Array1::from(ys.to_vec());

    let mut xtx = x.t().dot(&x);
    let xty = x.t().dot(&y);
    // Légère régularisation : garde le système défini positif
    for j in 0..p {
        xtx[[j, j]] += 1e-8;
    }

    solve_linear_system(&xtx, &xty)
}

/// Élimination de Gauss avec pivot partiel sur un petit système p×p.
fn solve_linear_system(a: &Array2<f64>, b: &Array1<f64>) -> Option<Vec<f64>> {
    let p = b.len();
    let mut m: Vec<Vec<f64>> = (0..p)
        .map(|i| {
            let mut row: Vec<f64> = (0..p).map(|j| a[[i, j]]).collect();
            row.push(b[i]);
            row
        })
        .collect();

    for col in 0..p {
        // Pivot partiel
        let pivot_row = (col..p).max_by(|&i, &j| {
            m[i][col]
                .abs()
                .partial_cmp(&m[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if m[pivot_row][col].abs() < 1e-12 {
            return None;
        }
        m.swap(col, pivot_row);

        for row in (col + 1)..p {
            let factor = m[row][col] / m[col][col];
            for k in col..=p {
                m[row][k] -= factor * m[col][k];
            }
        }
    }

    // Substitution arrière
    let mut coeffs = vec![0.0f64; p];
    for col in (0..p).rev() {
        let mut acc = m[col][p];
        for k in (col + 1)..p {
            acc -= m[col][k] * coeffs[k];
        }
        coeffs[col] = acc / m[col][col];
    }
    Some(coeffs)
}

fn predict(coeffs: &[f64], t: f64) -> f64 {
    let seasonal = coeffs.len() > 2;
    design_row(t, seasonal)
        .iter()
        .zip(coeffs)
        .map(|(x, c)| x * c)
        .sum()
}

/// Mean Absolute Error entre observé et ajusté.
fn compute_mae(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    actual[..n]
        .iter()
        .zip(&predicted[..n])
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n as f64
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(date: NaiveDate, sales: f64) -> SalesRecord {
        SalesRecord {
            customer_id: 1,
            date,
            region: "Central".into(),
            product: "Maize Seeds".into(),
            sales,
            profit: sales * 0.2,
            customer_age: 30,
            customer_gender: "Female".into(),
        }
    }

    fn daily_series(n: usize, f: impl Fn(usize) -> f64) -> Vec<SalesRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| make_record(start + chrono::Duration::days(i as i64), f(i)))
            .collect()
    }

    #[test]
    fn test_insufficient_history_fails_fast() {
        let records = daily_series(10, |_| 1000.0);
        match forecast_sales(&records, 30).unwrap_err() {
            DashboardError::InsufficientData { required, actual } => {
                assert_eq!(required, MIN_HISTORY_POINTS);
                assert_eq!(actual, 10);
            }
            e => panic!("InsufficientData attendu, reçu {e:?}"),
        }
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let records = daily_series(100, |_| 1000.0);
        assert!(matches!(
            forecast_sales(&records, 0).unwrap_err(),
            DashboardError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_linear_trend_100_days() {
        // Série croissante : 1000, 1010, 1020, ...
        let records = daily_series(100, |i| 1000.0 + 10.0 * i as f64);
        let out = forecast_sales(&records, 30).unwrap();

        assert_eq!(out.history_length, 100);
        // Un point par jour : 100 jours d'historique + 30 d'horizon
        assert_eq!(out.points.len(), 130);
        assert!(out.model_info.contains("tendance"));
        assert!(!out.model_info.contains("saisonnalité"));

        // Tendance captée : la prévision finale dépasse le début
        assert!(out.points.last().unwrap().yhat > out.points[0].yhat + 1000.0);
        // Ajustement quasi exact sur une droite
        assert!(out.mae < 1.0, "MAE = {} sur une série linéaire", out.mae);
    }

    #[test]
    fn test_bounds_invariant() {
        let records = daily_series(120, |i| 2000.0 + 15.0 * i as f64 + (i % 5) as f64 * 40.0);
        let out = forecast_sales(&records, 45).unwrap();
        for p in &out.points {
            assert!(
                p.yhat_lower <= p.yhat && p.yhat <= p.yhat_upper,
                "bornes incohérentes le {}: {} / {} / {}",
                p.date,
                p.yhat_lower,
                p.yhat,
                p.yhat_upper
            );
        }
    }

    #[test]
    fn test_forecast_non_negative() {
        // Série décroissante qui plongerait sous zéro sans rognage
        let records = daily_series(100, |i| (5000.0 - 60.0 * i as f64).max(0.0));
        let out = forecast_sales(&records, 60).unwrap();
        for p in &out.points {
            assert!(p.yhat >= 0.0);
            assert!(p.yhat_lower >= 0.0);
        }
    }

    #[test]
    fn test_duplicate_dates_aggregated() {
        // Deux transactions par jour → toujours 100 points distincts
        let mut records = daily_series(100, |i| 1000.0 + i as f64);
        records.extend(daily_series(100, |i| 500.0 + i as f64));
        let out = forecast_sales(&records, 30).unwrap();
        assert_eq!(out.history_length, 100);
        // Premier jour ajusté proche du total 1500
        assert!((out.points[0].yhat - 1500.0).abs() < 100.0);
    }

    #[test]
    fn test_yearly_seasonality_on_long_history() {
        // Trois ans : tendance douce + cycle annuel marqué
        let records = daily_series(365 * 3, |i| {
            let t = i as f64;
            3000.0 + 0.5 * t + 800.0 * (2.0 * std::f64::consts::PI * t / 365.25).sin()
        });
        let out = forecast_sales(&records, 30).unwrap();
        assert!(out.model_info.contains("saisonnalité"));
        // Le cycle de ±800 doit être largement absorbé par le modèle
        assert!(out.mae < 200.0, "MAE = {} avec saisonnalité", out.mae);
    }
}
