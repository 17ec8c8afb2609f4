use postalert_core::AlertTarget;

/// Deep link that opens the spreadsheet with the offending row selected.
pub fn row_link(sheet_url: &str, sheet_gid: &str, row_index: u32) -> String {
    format!("{sheet_url}#gid={sheet_gid}&range={row_index}:{row_index}")
}

/// Render the six-line alert for one target. Line order is fixed.
pub fn compose_message(
    target: &AlertTarget,
    role_id: &str,
    sheet_url: &str,
    sheet_gid: &str,
) -> String {
    [
        format!("# 【Tomorrow's Post Alert ({})】", target.date_str),
        format!("<@&{role_id}>"),
        format!("The post for {} is not ready yet", target.date_str),
        format!("Author: {}", target.author_mention),
        format!("Reason: **{}**", target.reason.phrase()),
        format!(
            "Row link: {}",
            row_link(sheet_url, sheet_gid, target.row_index)
        ),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use postalert_core::AlertReason;

    fn target(reason: AlertReason) -> AlertTarget {
        AlertTarget {
            row_index: 5,
            date_str: "2024/05/02".to_string(),
            author_mention: "<@123>".to_string(),
            reason,
        }
    }

    #[test]
    fn six_lines_in_order() {
        let msg = compose_message(
            &target(AlertReason::ContentEmpty),
            "999",
            "https://docs.google.com/spreadsheets/d/abc/edit",
            "0",
        );
        let lines: Vec<&str> = msg.split('\n').collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "# 【Tomorrow's Post Alert (2024/05/02)】");
        assert_eq!(lines[1], "<@&999>");
        assert!(lines[2].contains("2024/05/02"));
        assert_eq!(lines[3], "Author: <@123>");
        assert_eq!(lines[4], "Reason: **content is empty**");
        assert_eq!(
            lines[5],
            "Row link: https://docs.google.com/spreadsheets/d/abc/edit#gid=0&range=5:5"
        );
        assert!(lines[5].ends_with("range=5:5"));
    }

    #[test]
    fn reservation_reason_phrase() {
        let msg = compose_message(&target(AlertReason::ReservationUnchecked), "1", "u", "7");
        assert!(msg.contains("Reason: **reservation checkbox is unticked**"));
        assert!(msg.ends_with("u#gid=7&range=5:5"));
    }
}
