use async_trait::async_trait;
use postalert_core::types::FIRST_DATA_ROW;
use postalert_core::{CellValue, ScheduleRow};
use tracing::debug;

use crate::error::Result;

/// A tab inside the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub title: String,
    /// Numeric tab ID used in `#gid=` deep links.
    pub gid: String,
}

/// How cell values come back from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRender {
    /// Typed values: booleans stay booleans, numbers stay numbers.
    Unformatted,
    /// Every cell as the text the sheet displays. Keeps long numeric IDs intact.
    Formatted,
}

/// Read side of the spreadsheet the schedule lives in.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Look up a tab by title. Fails with `SheetNotFound` when it does not exist.
    async fn open_sheet(&self, name: &str) -> Result<SheetInfo>;

    /// Every row of the tab, header included. Trailing empty cells may be absent.
    async fn read_values(&self, sheet: &SheetInfo, render: ValueRender)
        -> Result<Vec<Vec<CellValue>>>;

    /// Base URL deep links are built on.
    fn spreadsheet_url(&self) -> String;
}

/// Schedule rows below the header. Short rows read their missing columns as empty.
pub async fn load_schedule_rows(
    store: &dyn ScheduleStore,
    sheet: &SheetInfo,
) -> Result<Vec<ScheduleRow>> {
    let values = store.read_values(sheet, ValueRender::Unformatted).await?;
    let data: Vec<Vec<CellValue>> = values
        .into_iter()
        .skip((FIRST_DATA_ROW - 1) as usize)
        .collect();
    debug!(sheet = %sheet.title, rows = data.len(), "schedule rows loaded");
    Ok(ScheduleRow::from_data_block(&data))
}
