use postalert_core::coerce::{coerce_boolean, coerce_date};
use postalert_core::config::DateSettings;
use postalert_core::{AlertReason, AlertTarget, CellValue, ScheduleRow};
use postalert_members::{resolve_mention, NameDirectory};
use tracing::debug;

/// Readiness rule: missing content wins over an unticked reservation.
///
/// Returns `None` only when the row has content and is reserved.
pub fn classify(has_content: bool, is_checked: bool) -> Option<AlertReason> {
    if !has_content {
        Some(AlertReason::ContentEmpty)
    } else if !is_checked {
        Some(AlertReason::ReservationUnchecked)
    } else {
        None
    }
}

/// Blank text, `false`, zero and NaN all count as no content.
fn has_content(cell: &CellValue) -> bool {
    match cell {
        CellValue::Empty | CellValue::Bool(false) => false,
        CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
        other => !other.as_text().trim().is_empty(),
    }
}

/// Check one row against the target date.
///
/// Rows for other dates and ready rows yield `None`.
pub fn evaluate_row(
    row: &ScheduleRow,
    target_date: &str,
    settings: &DateSettings,
    directory: &NameDirectory,
) -> Option<AlertTarget> {
    let date_str = coerce_date(&row.post_date, settings);
    if date_str != target_date {
        return None;
    }

    let has_content = has_content(&row.content);
    let is_checked = coerce_boolean(&row.reserved);
    let reason = classify(has_content, is_checked)?;

    debug!(row = row.row_index, %reason, "row not ready");
    Some(AlertTarget {
        row_index: row.row_index,
        date_str,
        author_mention: resolve_mention(&row.author_name.as_text(), directory),
        reason,
    })
}

/// Every not-ready row for `target_date`, in sheet order.
pub fn collect_targets(
    rows: &[ScheduleRow],
    target_date: &str,
    settings: &DateSettings,
    directory: &NameDirectory,
) -> Vec<AlertTarget> {
    rows.iter()
        .filter_map(|row| evaluate_row(row, target_date, settings, directory))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const TARGET: &str = "2024/05/02";

    fn settings() -> DateSettings {
        DateSettings::new("+09:00", "%Y/%m/%d").unwrap()
    }

    fn directory() -> NameDirectory {
        [("Alice", "123")].into_iter().collect()
    }

    fn row(date: CellValue, reserved: CellValue, content: &str, author: &str) -> ScheduleRow {
        ScheduleRow {
            row_index: 5,
            post_date: date,
            reserved,
            content: CellValue::text(content),
            author_name: CellValue::text(author),
        }
    }

    fn eval(r: &ScheduleRow) -> Option<AlertTarget> {
        evaluate_row(r, TARGET, &settings(), &directory())
    }

    #[test]
    fn other_dates_never_alert() {
        for date in [
            CellValue::text("2024/05/03"),
            CellValue::text("2024/05/01"),
            CellValue::Empty,
            CellValue::text("TBD"),
            CellValue::Number(45415.0),
            CellValue::Bool(true),
        ] {
            assert!(eval(&row(date, CellValue::Empty, "", "Alice")).is_none());
        }
    }

    #[test]
    fn empty_content_alerts_regardless_of_reservation() {
        for reserved in [
            CellValue::Bool(true),
            CellValue::Bool(false),
            CellValue::text("✓"),
            CellValue::Empty,
        ] {
            let t = eval(&row(CellValue::text(TARGET), reserved, "  \n ", "Alice")).unwrap();
            assert_eq!(t.reason, AlertReason::ContentEmpty);
            assert_eq!(t.date_str, TARGET);
            assert_eq!(t.row_index, 5);
        }
    }

    #[test]
    fn reserved_rows_with_content_are_ready() {
        for reserved in [
            CellValue::Bool(true),
            CellValue::text("true"),
            CellValue::text("TRUE"),
            CellValue::text("✓"),
        ] {
            assert!(eval(&row(CellValue::text(TARGET), reserved, "Hello", "Alice")).is_none());
        }
    }

    #[test]
    fn content_without_reservation_alerts() {
        for reserved in [
            CellValue::Bool(false),
            CellValue::Empty,
            CellValue::Number(1.0),
            CellValue::text("yes"),
            CellValue::text("false"),
        ] {
            let t = eval(&row(CellValue::text(TARGET), reserved, "Hello", "Alice")).unwrap();
            assert_eq!(t.reason, AlertReason::ReservationUnchecked);
        }
    }

    #[test]
    fn author_is_resolved() {
        let known = eval(&row(CellValue::text(TARGET), CellValue::Empty, "", "Alice")).unwrap();
        assert_eq!(known.author_mention, "<@123>");

        let unknown = eval(&row(CellValue::text(TARGET), CellValue::Empty, "", " Bob ")).unwrap();
        assert_eq!(unknown.author_mention, "Bob");

        let blank = eval(&row(CellValue::text(TARGET), CellValue::Empty, "", "")).unwrap();
        assert_eq!(blank.author_mention, "unknown");
    }

    #[test]
    fn date_typed_cells_match_in_configured_zone() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 15, 30, 0).unwrap();
        let t = eval(&row(CellValue::Date(dt), CellValue::Empty, "x", "Alice")).unwrap();
        assert_eq!(t.date_str, TARGET);
    }

    #[test]
    fn serial_dates_match() {
        let t = eval(&row(CellValue::Number(45414.0), CellValue::Empty, "x", "Alice")).unwrap();
        assert_eq!(t.date_str, TARGET);
    }

    #[test]
    fn falsy_content_counts_as_empty() {
        for content in [CellValue::Number(0.0), CellValue::Bool(false), CellValue::Number(f64::NAN)] {
            let mut r = row(CellValue::text(TARGET), CellValue::Bool(true), "", "Alice");
            r.content = content;
            assert_eq!(eval(&r).unwrap().reason, AlertReason::ContentEmpty);
        }
        for content in [CellValue::Number(7.0), CellValue::Bool(true), CellValue::text("0")] {
            let mut r = row(CellValue::text(TARGET), CellValue::Bool(true), "", "Alice");
            r.content = content;
            assert!(eval(&r).is_none());
        }
    }

    #[test]
    fn classify_table() {
        assert_eq!(classify(false, false), Some(AlertReason::ContentEmpty));
        assert_eq!(classify(false, true), Some(AlertReason::ContentEmpty));
        assert_eq!(classify(true, false), Some(AlertReason::ReservationUnchecked));
        assert_eq!(classify(true, true), None);
    }

    #[test]
    fn collect_keeps_sheet_order() {
        let rows = ScheduleRow::from_data_block(&[
            vec![CellValue::text(TARGET), CellValue::Bool(true), CellValue::text("ok")],
            vec![CellValue::text(TARGET), CellValue::Bool(false), CellValue::text("draft")],
            vec![CellValue::text("2024/05/09")],
            vec![CellValue::text(TARGET)],
        ]);
        let targets = collect_targets(&rows, TARGET, &settings(), &directory());
        let got: Vec<(u32, AlertReason)> = targets.iter().map(|t| (t.row_index, t.reason)).collect();
        assert_eq!(
            got,
            vec![
                (3, AlertReason::ReservationUnchecked),
                (5, AlertReason::ContentEmpty)
            ]
        );
    }
}
