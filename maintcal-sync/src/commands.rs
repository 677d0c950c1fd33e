//! Entry points behind the `maintcal` subcommands.

use chrono::NaiveDate;
use extractors::PatternCatalog;
use shared_types::{CredentialType, MaintenanceEvent, MaintenanceNotification};
use std::io::Write;
use std::path::Path;

use crate::config::SyncConfig;
use crate::database::ScheduleStore;
use crate::error::{Result, SyncError};
use crate::helpers::google_oauth::GoogleOAuthClient;
use crate::helpers::keyring_service::KeyringService;
use crate::integrations::message_parser::parse_message;
use crate::integrations::{GoogleCalendarClient, RealImapClient};
use crate::jobs::{
    find_overlaps, log_overlaps, notifications_for, sync_notifications, MaintenanceLister,
    SyncSummary,
};

pub fn load_catalog(config: &SyncConfig) -> Result<PatternCatalog> {
    let catalog = PatternCatalog::load(&config.patterns.directory)?;
    if catalog.is_empty() {
        tracing::warn!(
            "No pattern rules found in {}",
            config.patterns.directory.display()
        );
    }
    Ok(catalog)
}

pub fn connect_mailbox(config: &SyncConfig) -> Result<RealImapClient> {
    let mailbox = &config.mailbox;
    let username = mailbox.username.as_deref().ok_or_else(|| {
        SyncError::Config("mailbox.username is not set (or IMAP_USERNAME)".to_string())
    })?;
    let password = KeyringService::get_password(&CredentialType::Imap, &mailbox.address, username)?;

    RealImapClient::connect_with_password(&mailbox.address, mailbox.port, username, &password)
}

pub fn connect_calendar(config: &SyncConfig) -> Result<GoogleCalendarClient> {
    let calendar = &config.calendar;
    let client_id = calendar
        .client_id
        .as_deref()
        .ok_or_else(|| SyncError::Config("calendar.client_id is not set".to_string()))?;
    let refresh_token = KeyringService::get_password(
        &CredentialType::GoogleCalendar,
        &calendar.calendar_id,
        client_id,
    )?;

    let oauth = GoogleOAuthClient::new(client_id, calendar.client_secret.as_deref())?;
    let access_token = oauth.access_token(&refresh_token)?;

    Ok(GoogleCalendarClient::new(
        &calendar.api_base,
        &calendar.calendar_id,
        access_token,
    ))
}

fn open_store(config: &SyncConfig) -> Result<Option<ScheduleStore>> {
    if !config.storage.record_schedule {
        return Ok(None);
    }
    ScheduleStore::open(&config.storage.resolved_schedule_path()).map(Some)
}

fn write_json_line<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

/// Publishes every maintenance window found since `since` to the calendar.
///
/// With `dry_run` the events are printed instead and the calendar is not
/// contacted.
pub fn run<W: Write>(
    config: &SyncConfig,
    since: Option<NaiveDate>,
    dry_run: bool,
    out: &mut W,
) -> Result<SyncSummary> {
    let catalog = load_catalog(config)?;
    let since = since.unwrap_or_else(|| config.mailbox.default_since());
    let mut lister = MaintenanceLister::new(connect_mailbox(config)?, &catalog, &config.mailbox.folder);

    let summary = if dry_run {
        let mut summary = SyncSummary::default();
        for notification in lister.list(since)? {
            let notification = notification?;
            summary.seen += 1;
            write_json_line(out, &MaintenanceEvent::from(&notification))?;
        }
        tracing::info!("Dry run: {} events would be checked against the calendar", summary.seen);
        summary
    } else {
        let calendar = connect_calendar(config)?;
        let store = open_store(config)?;
        sync_notifications(lister.list(since)?, &calendar, store.as_ref())?
    };

    lister.into_mailbox().logout();
    Ok(summary)
}

/// Prints the maintenance windows found since `since` as JSON lines.
pub fn list<W: Write>(config: &SyncConfig, since: Option<NaiveDate>, out: &mut W) -> Result<usize> {
    let catalog = load_catalog(config)?;
    let since = since.unwrap_or_else(|| config.mailbox.default_since());
    let mut lister = MaintenanceLister::new(connect_mailbox(config)?, &catalog, &config.mailbox.folder);

    let mut count = 0;
    for notification in lister.list(since)? {
        write_json_line(out, &notification?)?;
        count += 1;
    }

    lister.into_mailbox().logout();
    Ok(count)
}

/// Runs the pattern catalog against a saved `.eml` file.
pub fn extract_eml<W: Write>(
    config: &SyncConfig,
    path: &Path,
    out: &mut W,
) -> Result<Vec<MaintenanceNotification>> {
    let catalog = load_catalog(config)?;
    let raw = std::fs::read(path)?;
    let message = parse_message(&raw)?;

    let notifications = notifications_for(&message, &catalog, &path.display().to_string());
    for notification in &notifications {
        write_json_line(out, notification)?;
    }

    if notifications.is_empty() {
        tracing::info!("No pattern produced a maintenance window for {}", path.display());
    }
    Ok(notifications)
}

/// Logs every pair of overlapping events on the calendar.
pub fn overlaps(config: &SyncConfig) -> Result<usize> {
    let calendar = connect_calendar(config)?;
    let windows = calendar.list_windows()?;
    let overlaps = find_overlaps(&windows);

    log_overlaps(&overlaps);
    Ok(overlaps.len())
}

/// Prints the local schedule as JSON lines.
pub fn records<W: Write>(config: &SyncConfig, out: &mut W) -> Result<usize> {
    let path = config.storage.resolved_schedule_path();
    if !path.exists() {
        tracing::info!("No schedule recorded yet at {}", path.display());
        return Ok(0);
    }

    let store = ScheduleStore::open(&path)?;
    let records = store.list_records()?;
    for record in &records {
        write_json_line(out, record)?;
    }
    Ok(records.len())
}

/// Stores a secret for `kind` under the account the other commands look up.
pub fn store_secret(
    config: &SyncConfig,
    kind: CredentialType,
    username: Option<&str>,
    secret: &str,
) -> Result<()> {
    let secret = secret.trim();
    if secret.is_empty() {
        return Err(SyncError::Config("Refusing to store an empty secret".to_string()));
    }

    match kind {
        CredentialType::Imap => {
            let username = username
                .or(config.mailbox.username.as_deref())
                .ok_or_else(|| {
                    SyncError::Config("--username or mailbox.username is required".to_string())
                })?;
            KeyringService::set_password(&kind, &config.mailbox.address, username, secret)?;
        }
        CredentialType::GoogleCalendar => {
            let client_id = username
                .or(config.calendar.client_id.as_deref())
                .ok_or_else(|| {
                    SyncError::Config("--username or calendar.client_id is required".to_string())
                })?;
            KeyringService::set_password(&kind, &config.calendar.calendar_id, client_id, secret)?;
        }
    }

    Ok(())
}
