//! One-time storage of the secrets an alert run needs.

use std::io::BufRead;

use clap::ValueEnum;
use postalert_core::secrets::{SecretKey, SecretStore};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SetupTarget {
    /// Discord webhook URL alerts are posted to.
    Webhook,
    /// Discord role ID pinged in every alert.
    Role,
    /// Google API key with read access to the spreadsheet.
    SheetsKey,
}

impl From<SetupTarget> for SecretKey {
    fn from(target: SetupTarget) -> Self {
        match target {
            SetupTarget::Webhook => SecretKey::WebhookUrl,
            SetupTarget::Role => SecretKey::RoleId,
            SetupTarget::SheetsKey => SecretKey::SheetsApiKey,
        }
    }
}

/// Ask for a value on stderr and read one line from `input`.
pub fn prompt_value(key: SecretKey, mut input: impl BufRead) -> std::io::Result<String> {
    eprint!("Enter {}: ", key.name());
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

/// Trim, validate and persist a secret.
pub fn store_secret(
    store: &mut dyn SecretStore,
    key: SecretKey,
    raw: &str,
) -> postalert_core::Result<()> {
    let value = raw.trim();
    key.validate(value)?;
    store.set(key.name(), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemorySecrets(HashMap<String, String>);

    impl SecretStore for MemorySecrets {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> postalert_core::Result<()> {
            self.0.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn stores_trimmed_value() {
        let mut store = MemorySecrets::default();
        store_secret(
            &mut store,
            SecretKey::WebhookUrl,
            "  https://discord.com/api/webhooks/1/abc\n",
        )
        .unwrap();
        assert_eq!(
            store.get("DISCORD_ALERT_WEBHOOK_URL").as_deref(),
            Some("https://discord.com/api/webhooks/1/abc")
        );
    }

    #[test]
    fn rejects_blank_and_invalid_values() {
        let mut store = MemorySecrets::default();
        assert!(store_secret(&mut store, SecretKey::WebhookUrl, "   ").is_err());
        assert!(store_secret(&mut store, SecretKey::RoleId, "@moderators").is_err());
        assert!(store.0.is_empty());
    }

    #[test]
    fn prompt_reads_one_line() {
        let input = std::io::Cursor::new("12345\nignored\n");
        let value = prompt_value(SecretKey::RoleId, input).unwrap();
        assert_eq!(value.trim(), "12345");
    }

    #[test]
    fn setup_targets_map_to_keys() {
        assert_eq!(SecretKey::from(SetupTarget::Webhook), SecretKey::WebhookUrl);
        assert_eq!(SecretKey::from(SetupTarget::Role), SecretKey::RoleId);
        assert_eq!(SecretKey::from(SetupTarget::SheetsKey), SecretKey::SheetsApiKey);
    }
}
