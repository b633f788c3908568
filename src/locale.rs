//! Langue d'affichage et formatage monétaire.
//!
//! La langue est une valeur explicite passée aux fonctions de formatage,
//! jamais un état global : la sortie est déterministe à entrées égales.

use serde::{Deserialize, Serialize};

/// Langues supportées par le tableau de bord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Anglais (défaut)
    #[default]
    En,
    /// Chichewa
    Ny,
}

impl Language {
    /// Préfixe monétaire du kwacha malawien selon la langue.
    pub fn currency_prefix(self) -> &'static str {
        match self {
            Language::En => "MWK",
            Language::Ny => "MK",
        }
    }

    /// Formate un montant en kwacha, arrondi à l'unité, avec séparateur de milliers.
    /// Ex. `Language::En.format_currency(1234567.8)` → `"MWK 1,234,568"`.
    pub fn format_currency(self, value: f64) -> String {
        format!("{} {}", self.currency_prefix(), group_thousands(value.round() as i64))
    }

    /// Libellés des sections du tableau de bord (consommés par la couche d'affichage).
    pub fn label(self, key: &str) -> &'static str {
        match (self, key) {
            (Language::En, "total_sales") => "Total Sales",
            (Language::En, "total_profit") => "Total Profit",
            (Language::En, "profit_margin") => "Profit Margin",
            (Language::En, "insight_title") => "Business Diagnosis",
            (Language::En, "region_sales") => "Sales by Region",
            (Language::En, "customer_age") => "Customer Age Distribution",
            (Language::En, "gender_split") => "Customer Gender Split",
            (Language::Ny, "total_sales") => "Malonda Yonse",
            (Language::Ny, "total_profit") => "Phindu Lonse",
            (Language::Ny, "profit_margin") => "Mphamvu ya Phindu",
            (Language::Ny, "insight_title") => "Kuyerekezera kwa Bizinesi",
            (Language::Ny, "region_sales") => "Malonda Madera",
            (Language::Ny, "customer_age") => "Gawanyo la Msinkhu wa Makasitomala",
            (Language::Ny, "gender_split") => "Gawanyo la Amuna ndi Akazi",
            _ => "",
        }
    }

    /// Phrase sentinelle affichée quand la table ne permet aucun diagnostic.
    pub fn insufficient_data(self) -> &'static str {
        match self {
            Language::En => "Not enough data to generate a business insight.",
            Language::Ny => "Palibe deta yokwanira kupanga kuyerekezera kwa bizinesi.",
        }
    }

    /// Phrase de diagnostic : meilleure région, pire région, écart formaté.
    pub fn insight_sentence(self, top: &str, drop: &str, gap: &str) -> String {
        match self {
            Language::En => format!(
                "Your best-performing region is {top}, while {drop} had the lowest sales. \
                 The sales gap between them is {gap}."
            ),
            Language::Ny => format!(
                "Dera lopambana pa malonda ndi {top}, pamene {drop} linali ndi malonda ochepa. \
                 Kusiyana kwake ndi {gap}."
            ),
        }
    }
}

/// Groupe un entier par milliers avec des virgules ("1234567" → "1,234,567").
fn group_thousands(n: i64) -> String {
    let negative = n < 0;
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
