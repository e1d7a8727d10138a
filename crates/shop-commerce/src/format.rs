//! Display helpers for dates and product-name messages.

use chrono::{DateTime, Utc};

/// Format a timestamp as "Month Day, Year" (e.g., "January 1, 2024").
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// English plural of a product name for cart messages.
pub fn pluralize(word: &str, count: i64) -> String {
    if count == 1 || word.is_empty() {
        return word.to_string();
    }

    let lower = word.to_lowercase();
    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| lower.ends_with(suffix)) {
        return format!("{}es", word);
    }

    let mut chars = lower.chars().rev();
    if let (Some('y'), Some(prev)) = (chars.next(), chars.next()) {
        if !"aeiou".contains(prev) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }

    format!("{}s", word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_date(&date), "January 1, 2024");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Lamp", 1), "Lamp");
        assert_eq!(pluralize("Lamp", 2), "Lamps");
        assert_eq!(pluralize("Couch", 3), "Couches");
        assert_eq!(pluralize("Glass", 2), "Glasses");
        assert_eq!(pluralize("Accessory", 2), "Accessories");
        assert_eq!(pluralize("Tray", 2), "Trays");
    }
}
