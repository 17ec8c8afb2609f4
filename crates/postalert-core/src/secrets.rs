//! Key-value secret storage for values that must not live in postalert.toml.
//!
//! Secrets are written once by `postalert setup` into a JSON file. An env var
//! with the same name as the key wins over the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{AlertError, Result};

/// Secrets the alert run knows how to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKey {
    /// Discord webhook the alerts are posted to.
    WebhookUrl,
    /// Role pinged in every alert, when no fixed role is configured.
    RoleId,
    /// Google API key used to read the spreadsheet.
    SheetsApiKey,
}

impl SecretKey {
    pub fn name(&self) -> &'static str {
        match self {
            SecretKey::WebhookUrl => "DISCORD_ALERT_WEBHOOK_URL",
            SecretKey::RoleId => "MENTION_ROLE_ID",
            SecretKey::SheetsApiKey => "SHEETS_API_KEY",
        }
    }

    /// Argument to `postalert setup` that stores this secret.
    pub fn setup_arg(&self) -> &'static str {
        match self {
            SecretKey::WebhookUrl => "webhook",
            SecretKey::RoleId => "role",
            SecretKey::SheetsApiKey => "sheets-key",
        }
    }

    /// Reject values that can never work before they are persisted.
    pub fn validate(&self, value: &str) -> Result<()> {
        let invalid = |reason: &str| AlertError::InvalidSecret {
            key: self.name().to_string(),
            reason: reason.to_string(),
        };
        if value.is_empty() {
            return Err(invalid("value is empty"));
        }
        match self {
            SecretKey::WebhookUrl
                if !(value.starts_with("https://") || value.starts_with("http://")) =>
            {
                Err(invalid("expected an http(s) URL"))
            }
            SecretKey::RoleId if !value.chars().all(|c| c.is_ascii_digit()) => {
                Err(invalid("expected a numeric Discord role ID"))
            }
            _ => Ok(()),
        }
    }
}

pub trait SecretStore: Send + Sync {
    /// Trimmed, non-empty value for `key`, if one is stored.
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Fetch a secret the run cannot continue without.
pub fn require_secret(store: &dyn SecretStore, key: SecretKey) -> Result<String> {
    store.get(key.name()).ok_or(AlertError::MissingSecret {
        key: key.name().to_string(),
        setup_arg: key.setup_arg(),
    })
}

/// JSON-file secret store with env var overrides.
pub struct FileSecretStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
    env_override: bool,
}

impl FileSecretStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no secrets file yet");
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            values,
            env_override: true,
        })
    }

    /// Ignore environment variables and read only the file.
    pub fn without_env(mut self) -> Self {
        self.env_override = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Option<String> {
        let from_env = if self.env_override {
            std::env::var(key).ok()
        } else {
            None
        };
        from_env
            .or_else(|| self.values.get(key).cloned())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.trim().to_string());
        self.persist()?;
        info!(key, path = %self.path.display(), "secret saved");
        Ok(())
    }
}
