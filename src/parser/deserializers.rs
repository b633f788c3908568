use chrono::NaiveDate;

const ISO_DATE_FMT: &str = "%Y-%m-%d";

/// Parse une date ISO (YYYY-MM-DD). Un éventuel suffixe horaire
/// ("2024-01-05 00:00:00") est ignoré. Retourne None si illisible.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.len() < 10 {
        return None;
    }
    NaiveDate::parse_from_str(&trimmed[..10], ISO_DATE_FMT).ok()
}

/// Parse un montant numérique ("1 234.5" → 1234.5, espaces et espaces
/// insécables supprimés). Retourne None pour vide ou illisible.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse un entier positif ("35" → Some(35), "" ou "0" → None).
pub fn parse_positive_u32(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|&v| v > 0)
}

/// Parse un identifiant entier optionnel ("" → None, "17" → Some(17)).
pub fn parse_opt_u64(s: &str) -> Option<u64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        let d = parse_iso_date("2024-01-05").unwrap();
        assert_eq!(d.to_string(), "2024-01-05");
    }

    #[test]
    fn test_parse_iso_date_with_time_suffix() {
        let d = parse_iso_date("2024-01-05 00:00:00").unwrap();
        assert_eq!(d.to_string(), "2024-01-05");
    }

    #[test]
    fn test_parse_iso_date_invalid() {
        assert!(parse_iso_date("").is_none());
        assert!(parse_iso_date("   ").is_none());
        assert!(parse_iso_date("05-01-2024").is_none());
        assert!(parse_iso_date("2024-13-40").is_none());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1000"), Some(1000.0));
        assert_eq!(parse_amount("1234.5"), Some(1234.5));
        assert_eq!(parse_amount("1 234.5"), Some(1234.5));
        assert_eq!(parse_amount("-250"), Some(-250.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_parse_positive_u32() {
        assert_eq!(parse_positive_u32("35"), Some(35));
        assert_eq!(parse_positive_u32(" 18 "), Some(18));
        assert_eq!(parse_positive_u32("0"), None);
        assert_eq!(parse_positive_u32(""), None);
        assert_eq!(parse_positive_u32("-3"), None);
    }

    #[test]
    fn test_parse_opt_u64() {
        assert_eq!(parse_opt_u64("17"), Some(17));
        assert_eq!(parse_opt_u64(""), None);
        assert_eq!(parse_opt_u64("x"), None);
    }
}
