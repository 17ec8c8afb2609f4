use chrono::format::{Item, StrftimeItems};
use chrono::FixedOffset;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AlertError, Result};

pub const DEFAULT_SCHEDULE_SHEET: &str = "Posts";
pub const DEFAULT_MEMBERS_SHEET: &str = "Members";
pub const DEFAULT_UTC_OFFSET: &str = "+09:00";
pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
/// Discord allows roughly one webhook post per second per channel before 429s.
pub const DEFAULT_SEND_DELAY_MS: u64 = 1200;
const ENV_PREFIX: &str = "POSTALERT_";

/// Top-level config (postalert.toml + POSTALERT_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostalertConfig {
    pub sheet: SheetConfig,
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
}

/// Where the schedule lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Google spreadsheet ID (the long token in the sheet URL).
    pub spreadsheet_id: String,
    /// Tab holding the post schedule. Columns: A date, B reserved, C content, G author.
    #[serde(default = "default_schedule_sheet")]
    pub schedule_sheet: String,
    /// Tab holding the name → Discord user ID table. Columns: A name, B user ID.
    #[serde(default = "default_members_sheet")]
    pub members_sheet: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Overrides the link base used in alerts. Defaults to the spreadsheet's edit URL.
    pub spreadsheet_url: Option<String>,
}

impl SheetConfig {
    pub fn spreadsheet_url(&self) -> String {
        self.spreadsheet_url.clone().unwrap_or_else(|| {
            format!(
                "https://docs.google.com/spreadsheets/d/{}/edit",
                self.spreadsheet_id
            )
        })
    }
}

/// How outgoing alerts are grouped into webhook posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageGrouping {
    /// One webhook post per not-ready row.
    #[default]
    PerTarget,
    /// All alerts of a run joined into as few posts as the length limit allows.
    Batched,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Fixed offset of the single zone the schedule is kept in, e.g. "+09:00".
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    /// strftime pattern the schedule dates are compared in.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Fixed role to ping. When unset the `MENTION_ROLE_ID` secret is used.
    /// Accepts a bare integer too, since env overrides of a snowflake parse as one.
    #[serde(default, deserialize_with = "string_or_integer")]
    pub role_id: Option<String>,
    #[serde(default)]
    pub grouping: MessageGrouping,
    #[serde(default = "default_send_delay_ms")]
    pub send_delay_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
            date_format: default_date_format(),
            role_id: None,
            grouping: MessageGrouping::default(),
            send_delay_ms: default_send_delay_ms(),
        }
    }
}

impl AlertConfig {
    /// Validate the zone and pattern and bundle them for date formatting.
    pub fn date_settings(&self) -> Result<DateSettings> {
        DateSettings::new(&self.utc_offset, &self.date_format)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    /// JSON file holding secrets written by `postalert setup`.
    pub path: Option<String>,
}

impl SecretsConfig {
    pub fn path(&self) -> String {
        self.path.clone().unwrap_or_else(default_secrets_path)
    }
}

/// Timezone and pattern every schedule date is rendered with before comparison.
#[derive(Debug, Clone)]
pub struct DateSettings {
    pub offset: FixedOffset,
    pub format: String,
}

impl DateSettings {
    pub fn new(utc_offset: &str, format: &str) -> Result<Self> {
        let offset = parse_utc_offset(utc_offset)?;
        if format.is_empty() || StrftimeItems::new(format).any(|i| matches!(i, Item::Error)) {
            return Err(AlertError::Config(format!(
                "invalid date_format pattern: {format:?}"
            )));
        }
        Ok(Self {
            offset,
            format: format.to_string(),
        })
    }
}

/// Parse "+09:00", "-0530", "Z" or "UTC" into a fixed offset.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0)
            .ok_or_else(|| AlertError::Config("invalid utc_offset".to_string()));
    }

    let invalid = || AlertError::Config(format!("invalid utc_offset: {raw:?}"));

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn default_schedule_sheet() -> String {
    DEFAULT_SCHEDULE_SHEET.to_string()
}
fn default_members_sheet() -> String {
    DEFAULT_MEMBERS_SHEET.to_string()
}
fn default_api_base() -> String {
    DEFAULT_SHEETS_API_BASE.to_string()
}
fn default_utc_offset() -> String {
    DEFAULT_UTC_OFFSET.to_string()
}
fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}
fn default_send_delay_ms() -> u64 {
    DEFAULT_SEND_DELAY_MS
}
fn string_or_integer<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(s) => s,
        Id::Unsigned(n) => n.to_string(),
        Id::Signed(n) => n.to_string(),
    }))
}

fn default_secrets_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.postalert/secrets.json", home)
}

impl PostalertConfig {
    /// Load config from a TOML file with POSTALERT_* env var overrides.
    ///
    /// Nested keys use a double underscore: `POSTALERT_ALERT__ROLE_ID`.
    /// Path order: explicit argument, then ~/.postalert/postalert.toml.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::load_with_env(config_path, ENV_PREFIX)
    }

    fn load_with_env(config_path: Option<&str>, env_prefix: &str) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed(env_prefix).split("__"))
            .extract()
            .map_err(|e| AlertError::Config(e.to_string()))
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.postalert/postalert.toml", home)
}
