use chrono::{DateTime, Duration, Utc};

use crate::config::DateSettings;

/// Source of "now". Injected so the target date is reproducible in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Tomorrow's date string: `now + 24h`, rendered in the configured zone and pattern.
pub fn target_date(now: DateTime<Utc>, settings: &DateSettings) -> String {
    (now + Duration::hours(24))
        .with_timezone(&settings.offset)
        .format(&settings.format)
        .to_string()
}
