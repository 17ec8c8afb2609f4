//! One alert pass: read the schedule, find tomorrow's not-ready posts, post alerts.

use postalert_alerts::{collect_targets, compose_message};
use postalert_core::clock::{target_date, Clock};
use postalert_core::secrets::{require_secret, SecretKey, SecretStore};
use postalert_core::{AlertTarget, PostalertConfig};
use postalert_discord::{group_messages, DispatchReport, Dispatcher};
use postalert_members::NameDirectory;
use postalert_sheets::{load_schedule_rows, ScheduleStore, ValueRender};
use tracing::info;

#[derive(Debug, Default)]
pub struct RunOptions {
    /// Compose but do not post; the webhook secret is not required.
    pub dry_run: bool,
    /// Replaces tomorrow's date string.
    pub target_date: Option<String>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub target_date: String,
    pub targets: Vec<AlertTarget>,
    /// Webhook posts, after grouping.
    pub posts: Vec<String>,
    /// `None` when nothing was sent (dry run or no targets).
    pub report: Option<DispatchReport>,
}

impl RunSummary {
    fn empty(target_date: String) -> Self {
        Self {
            target_date,
            targets: Vec::new(),
            posts: Vec::new(),
            report: None,
        }
    }
}

/// Collaborators for a single run. Everything is borrowed and rebuilt per invocation.
pub struct AlertRun<'a> {
    pub config: &'a PostalertConfig,
    pub store: &'a dyn ScheduleStore,
    pub secrets: &'a dyn SecretStore,
    pub clock: &'a dyn Clock,
    pub dispatcher: &'a Dispatcher,
}

impl AlertRun<'_> {
    /// Setup problems (missing tab, missing secret, unreadable sheet) abort
    /// before anything is sent; delivery problems are only reported.
    pub async fn execute(&self, options: &RunOptions) -> anyhow::Result<RunSummary> {
        let settings = self.config.alert.date_settings()?;

        let schedule = self
            .store
            .open_sheet(&self.config.sheet.schedule_sheet)
            .await?;

        let webhook_url = if options.dry_run {
            None
        } else {
            Some(require_secret(self.secrets, SecretKey::WebhookUrl)?)
        };
        let role_id = match &self.config.alert.role_id {
            Some(fixed) => fixed.clone(),
            None => require_secret(self.secrets, SecretKey::RoleId)?,
        };

        let target = options
            .target_date
            .clone()
            .unwrap_or_else(|| target_date(self.clock.now(), &settings));
        info!(target_date = %target, sheet = %schedule.title, "checking schedule");

        let rows = load_schedule_rows(self.store, &schedule).await?;
        if rows.is_empty() {
            info!("schedule has no data rows");
            return Ok(RunSummary::empty(target));
        }

        let members = self
            .store
            .open_sheet(&self.config.sheet.members_sheet)
            .await?;
        let directory = NameDirectory::from_rows(
            &self
                .store
                .read_values(&members, ValueRender::Formatted)
                .await?,
        );

        let targets = collect_targets(&rows, &target, &settings, &directory);
        if targets.is_empty() {
            info!(rows = rows.len(), "every post for the target date is ready");
            return Ok(RunSummary::empty(target));
        }
        info!(count = targets.len(), "not-ready posts found");

        let sheet_url = self.store.spreadsheet_url();
        let messages = targets
            .iter()
            .map(|t| compose_message(t, &role_id, &sheet_url, &schedule.gid))
            .collect();
        let posts = group_messages(messages, self.config.alert.grouping);

        let report = match webhook_url {
            Some(url) => Some(self.dispatcher.dispatch(&url, &posts).await),
            None => {
                info!(posts = posts.len(), "dry run, nothing sent");
                None
            }
        };

        Ok(RunSummary {
            target_date: target,
            targets,
            posts,
            report,
        })
    }
}
