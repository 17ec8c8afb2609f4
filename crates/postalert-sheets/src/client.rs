use async_trait::async_trait;
use postalert_core::config::SheetConfig;
use postalert_core::CellValue;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Result, SheetsError};
use crate::store::{ScheduleStore, SheetInfo, ValueRender};

/// Google Sheets REST v4 client authenticated with an API key.
///
/// The spreadsheet must be readable by the key (e.g. shared as "anyone with
/// the link can view").
pub struct SheetsClient {
    client: reqwest::Client,
    api_base: String,
    spreadsheet_id: String,
    spreadsheet_url: String,
    api_key: String,
}

impl SheetsClient {
    pub fn new(config: &SheetConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            spreadsheet_url: config.spreadsheet_url(),
            api_key,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "Sheets API error");
            return Err(SheetsError::Api {
                status,
                message: text,
            });
        }

        resp.json()
            .await
            .map_err(|e| SheetsError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ScheduleStore for SheetsClient {
    async fn open_sheet(&self, name: &str) -> Result<SheetInfo> {
        let url = format!("{}/v4/spreadsheets/{}", self.api_base, self.spreadsheet_id);
        debug!(sheet = name, "fetching spreadsheet metadata");

        let meta: SpreadsheetMeta = self
            .get_json(&url, &[("fields", "sheets.properties(sheetId,title)")])
            .await?;

        meta.sheets
            .into_iter()
            .map(|s| s.properties)
            .find(|p| p.title == name)
            .map(|p| SheetInfo {
                title: p.title,
                gid: p.sheet_id.to_string(),
            })
            .ok_or_else(|| SheetsError::SheetNotFound {
                name: name.to_string(),
            })
    }

    async fn read_values(
        &self,
        sheet: &SheetInfo,
        render: ValueRender,
    ) -> Result<Vec<Vec<CellValue>>> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.api_base,
            self.spreadsheet_id,
            urlencoding::encode(&a1_sheet_range(&sheet.title))
        );
        let render_option = match render {
            ValueRender::Unformatted => "UNFORMATTED_VALUE",
            ValueRender::Formatted => "FORMATTED_VALUE",
        };
        debug!(sheet = %sheet.title, render = render_option, "reading values");

        let range: ValueRange = self
            .get_json(
                &url,
                &[
                    ("majorDimension", "ROWS"),
                    ("valueRenderOption", render_option),
                    ("dateTimeRenderOption", "SERIAL_NUMBER"),
                ],
            )
            .await?;

        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_from_json).collect())
            .collect())
    }

    fn spreadsheet_url(&self) -> String {
        self.spreadsheet_url.clone()
    }
}

/// A1 range covering a whole tab. Quotes inside titles are doubled.
fn a1_sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn cell_from_json(value: serde_json::Value) -> CellValue {
    use serde_json::Value;
    match value {
        Value::Null => CellValue::Empty,
        Value::Bool(b) => CellValue::Bool(b),
        Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
        Value::String(s) => CellValue::text(s),
        other => CellValue::Text(other.to_string()),
    }
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    /// Absent entirely when the tab has no data.
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}
