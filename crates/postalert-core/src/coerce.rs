//! Total conversions from loosely-typed spreadsheet cells.
//!
//! Both functions are pure and never fail: anything they cannot interpret
//! degrades to `false` or to the cell's raw string.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};

use crate::config::DateSettings;
use crate::types::CellValue;

/// The glyph some sheets use instead of a real checkbox.
pub const CHECK_MARK: &str = "✓";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y年%m月%d日"];

/// Largest serial Sheets can hold (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

/// `true` only for a real boolean `true`, the string "true" in any case, or "✓".
pub fn coerce_boolean(value: &CellValue) -> bool {
    match value {
        CellValue::Bool(b) => *b,
        CellValue::Text(s) => s.to_lowercase() == "true" || s == CHECK_MARK,
        _ => false,
    }
}

/// Render a date cell with the configured zone and pattern.
///
/// Empty cells give "". Numbers are spreadsheet date serials (days since
/// 1899-12-30, wall clock in the configured zone). Text that does not parse
/// as a date, out-of-range numbers and booleans come back as their raw
/// string, so they never equal a real date.
pub fn coerce_date(value: &CellValue, settings: &DateSettings) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Date(dt) => dt
            .with_timezone(&settings.offset)
            .format(&settings.format)
            .to_string(),
        CellValue::Text(s) => match parse_date_text(s.trim(), settings) {
            Some(dt) => dt.format(&settings.format).to_string(),
            None => s.clone(),
        },
        CellValue::Number(n) => match serial_to_naive(*n)
            .and_then(|naive| settings.offset.from_local_datetime(&naive).single())
        {
            Some(dt) => dt.format(&settings.format).to_string(),
            None => value.as_text(),
        },
        CellValue::Bool(_) => value.as_text(),
    }
}

/// Sheets/Excel serial date: whole days since 1899-12-30, fraction is time of day.
pub fn serial_to_naive(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

fn parse_date_text(
    s: &str,
    settings: &DateSettings,
) -> Option<DateTime<chrono::FixedOffset>> {
    // "2024/05/02 (木)": drop a trailing weekday annotation.
    let s = match s.strip_suffix(')').and_then(|rest| rest.rfind('(').map(|i| &rest[..i])) {
        Some(head) => head.trim_end(),
        None => s,
    };
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&settings.offset));
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    // Naive values are wall-clock times in the sheet's own zone.
    settings.offset.from_local_datetime(&naive).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tokyo() -> DateSettings {
        DateSettings::new("+09:00", "%Y/%m/%d").unwrap()
    }

    #[test]
    fn boolean_true_forms() {
        assert!(coerce_boolean(&CellValue::Bool(true)));
        assert!(coerce_boolean(&CellValue::text("true")));
        assert!(coerce_boolean(&CellValue::text("TRUE")));
        assert!(coerce_boolean(&CellValue::text("True")));
        assert!(coerce_boolean(&CellValue::text("✓")));
    }

    #[test]
    fn boolean_everything_else_is_false() {
        assert!(!coerce_boolean(&CellValue::Bool(false)));
        assert!(!coerce_boolean(&CellValue::Empty));
        assert!(!coerce_boolean(&CellValue::Number(1.0)));
        assert!(!coerce_boolean(&CellValue::text("yes")));
        assert!(!coerce_boolean(&CellValue::text(" true")));
        assert!(!coerce_boolean(&CellValue::text("✔")));
    }

    #[test]
    fn empty_date_is_empty_string() {
        assert_eq!(coerce_date(&CellValue::Empty, &tokyo()), "");
    }

    #[test]
    fn date_values_shift_into_configured_zone() {
        // 2024-05-01T16:00Z is already May 2nd in Tokyo.
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap();
        assert_eq!(coerce_date(&CellValue::Date(dt), &tokyo()), "2024/05/02");
    }

    #[test]
    fn text_dates_are_parsed_and_reformatted() {
        let s = tokyo();
        assert_eq!(coerce_date(&CellValue::text("2024/05/02"), &s), "2024/05/02");
        assert_eq!(coerce_date(&CellValue::text("2024/5/2"), &s), "2024/05/02");
        assert_eq!(coerce_date(&CellValue::text("2024-05-02"), &s), "2024/05/02");
        assert_eq!(coerce_date(&CellValue::text("2024/05/02 23:30"), &s), "2024/05/02");
        assert_eq!(
            coerce_date(&CellValue::text("2024-05-01T16:00:00Z"), &s),
            "2024/05/02"
        );
    }

    #[test]
    fn unparseable_text_falls_back_to_raw() {
        assert_eq!(coerce_date(&CellValue::text("next week"), &tokyo()), "next week");
    }

    #[test]
    fn display_variants_are_parsed() {
        let s = tokyo();
        assert_eq!(coerce_date(&CellValue::text("5/2/2024"), &s), "2024/05/02");
        assert_eq!(coerce_date(&CellValue::text("05/02/2024 9:30"), &s), "2024/05/02");
        assert_eq!(coerce_date(&CellValue::text("2024年5月2日"), &s), "2024/05/02");
        assert_eq!(coerce_date(&CellValue::text("2024/05/02 (木)"), &s), "2024/05/02");
        assert_eq!(coerce_date(&CellValue::text("(tbd)"), &s), "(tbd)");
    }

    #[test]
    fn numbers_are_date_serials() {
        let s = tokyo();
        assert_eq!(coerce_date(&CellValue::Number(45414.0), &s), "2024/05/02");
        // 23:00 on May 2nd stays May 2nd in the sheet's zone.
        assert_eq!(coerce_date(&CellValue::Number(45414.958333), &s), "2024/05/02");
        assert_eq!(coerce_date(&CellValue::Number(-1.0), &s), "-1");
        assert_eq!(coerce_date(&CellValue::Number(f64::NAN), &s), "NaN");
    }

    #[test]
    fn serial_epoch() {
        let d = serial_to_naive(1.0).unwrap();
        assert_eq!(d.to_string(), "1899-12-31 00:00:00");
        let noon = serial_to_naive(45414.5).unwrap();
        assert_eq!(noon.to_string(), "2024-05-02 12:00:00");
    }

    #[test]
    fn bools_use_raw_form() {
        assert_eq!(coerce_date(&CellValue::Bool(true), &tokyo()), "true");
    }

    #[test]
    fn custom_pattern_is_honoured() {
        let s = DateSettings::new("+00:00", "%d.%m.%Y").unwrap();
        assert_eq!(coerce_date(&CellValue::text("2024-05-02"), &s), "02.05.2024");
    }
}
