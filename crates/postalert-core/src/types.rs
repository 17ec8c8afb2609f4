use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column positions (0-based) in the schedule tab.
pub const COL_POST_DATE: usize = 0;
pub const COL_RESERVED: usize = 1;
pub const COL_CONTENT: usize = 2;
pub const COL_AUTHOR: usize = 6;
/// Row 1 is the header, so the first data row is row 2.
pub const FIRST_DATA_ROW: u32 = 2;

/// A single spreadsheet cell as delivered by the tabular store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    /// A cell the store already knows is a date/time.
    Date(DateTime<Utc>),
}

impl CellValue {
    /// Build a text cell, collapsing "" to `Empty`.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Raw string form of the value. `Empty` renders as "".
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Date(dt) => dt.to_rfc3339(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Whole numbers print without a trailing ".0" so IDs and counts read naturally.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One data row of the schedule tab.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    /// 1-based sheet row number (≥ 2).
    pub row_index: u32,
    pub post_date: CellValue,
    pub reserved: CellValue,
    pub content: CellValue,
    pub author_name: CellValue,
}

impl ScheduleRow {
    /// Pick the fixed columns out of a raw row. Missing trailing cells read as `Empty`.
    pub fn from_cells(row_index: u32, cells: &[CellValue]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            row_index,
            post_date: cell(COL_POST_DATE),
            reserved: cell(COL_RESERVED),
            content: cell(COL_CONTENT),
            author_name: cell(COL_AUTHOR),
        }
    }

    /// Turn the data block below the header into rows numbered from [`FIRST_DATA_ROW`].
    pub fn from_data_block(rows: &[Vec<CellValue>]) -> Vec<Self> {
        rows.iter()
            .enumerate()
            .map(|(i, cells)| Self::from_cells(FIRST_DATA_ROW + i as u32, cells))
            .collect()
    }
}

/// Why a row for the target date is not ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertReason {
    ContentEmpty,
    ReservationUnchecked,
}

impl AlertReason {
    /// Human-readable phrase used in the alert body.
    pub fn phrase(&self) -> &'static str {
        match self {
            AlertReason::ContentEmpty => "content is empty",
            AlertReason::ReservationUnchecked => "reservation checkbox is unticked",
        }
    }
}

impl fmt::Display for AlertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertReason::ContentEmpty => "content-empty",
            AlertReason::ReservationUnchecked => "reservation-unchecked",
        };
        write!(f, "{s}")
    }
}

/// A not-ready row that will be alerted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTarget {
    pub row_index: u32,
    /// Always equal to the run's target date string.
    pub date_str: String,
    /// `<@id>`, a plain display name, or the "unknown" fallback.
    pub author_mention: String,
    pub reason: AlertReason,
}
