use chrono::{DateTime, NaiveDate, Utc};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use shared_types::{iso_timestamp, CalendarWindow, MaintenanceEvent};

use crate::error::{Result, SyncError};
use crate::integrations::calendar::{CalendarPublisher, PublishAck};

pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar REST client over blocking HTTP.
pub struct GoogleCalendarClient {
    http: Client,
    api_base: String,
    calendar_id: String,
    access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventBody<'a> {
    id: &'a str,
    summary: &'a str,
    location: &'a str,
    description: &'a str,
    start: EventTime,
    end: EventTime,
    reminders: Reminders,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Reminders {
    use_default: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedEvent {
    html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventList {
    #[serde(default)]
    items: Vec<ListedEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListedEvent {
    id: String,
    summary: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
}

impl EventTime {
    fn at(time: &DateTime<Utc>, time_zone: &str) -> Self {
        Self {
            date_time: Some(iso_timestamp(time)),
            date: None,
            time_zone: Some(time_zone.to_string()),
        }
    }

    /// All-day events only carry a date; those start at midnight UTC.
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        if let Some(date_time) = &self.date_time {
            return DateTime::parse_from_rfc3339(date_time)
                .ok()
                .map(|t| t.with_timezone(&Utc));
        }
        self.date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|t| t.and_utc())
    }
}

impl GoogleCalendarClient {
    pub fn new(api_base: &str, calendar_id: &str, access_token: String) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.to_string(),
            calendar_id: calendar_id.to_string(),
            access_token,
        }
    }

    fn events_url(&self, event_id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| SyncError::Config(format!("Invalid calendar API base {}: {}", self.api_base, e)))?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                SyncError::Config(format!("Calendar API base {} cannot hold a path", self.api_base))
            })?;
            segments
                .pop_if_empty()
                .extend(["calendars", self.calendar_id.as_str(), "events"]);
            if let Some(id) = event_id {
                segments.push(id);
            }
        }

        Ok(url)
    }

    /// Every event on the calendar, recurring events expanded.
    pub fn list_windows(&self) -> Result<Vec<CalendarWindow>> {
        let mut windows = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.events_url(None)?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("singleEvents", "true");
                query.append_pair("maxResults", "250");
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self
                .http
                .get(url)
                .bearer_auth(&self.access_token)
                .send()
                .map_err(|e| SyncError::Calendar(format!("Failed to list events: {}", e)))?;

            if !response.status().is_success() {
                return Err(unexpected_status("list events", response));
            }

            let page: EventList = response
                .json()
                .map_err(|e| SyncError::Calendar(format!("Failed to decode event list: {}", e)))?;

            for event in page.items {
                let start = event.start.as_ref().and_then(EventTime::to_utc);
                let end = event.end.as_ref().and_then(EventTime::to_utc);
                match (start, end) {
                    (Some(start), Some(end)) => windows.push(CalendarWindow {
                        id: event.id,
                        summary: event.summary,
                        start,
                        end,
                    }),
                    _ => tracing::debug!("Skipping event {} without start/end", event.id),
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!("Read {} events from calendar {}", windows.len(), self.calendar_id);
        Ok(windows)
    }
}

impl CalendarPublisher for GoogleCalendarClient {
    fn exists(&self, event_id: &str) -> Result<bool> {
        let response = self
            .http
            .get(self.events_url(Some(event_id))?)
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|e| SyncError::Calendar(format!("Failed to look up event {}: {}", event_id, e)))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(unexpected_status("look up event", response)),
        }
    }

    fn publish(&self, event: &MaintenanceEvent) -> Result<PublishAck> {
        let body = EventBody {
            id: &event.id,
            summary: &event.summary,
            location: &event.location,
            description: &event.description,
            start: EventTime::at(&event.start, &event.time_zone),
            end: EventTime::at(&event.end, &event.time_zone),
            reminders: Reminders { use_default: true },
        };

        let response = self
            .http
            .post(self.events_url(None)?)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .map_err(|e| SyncError::Calendar(format!("Failed to insert event {}: {}", event.id, e)))?;

        match response.status() {
            status if status.is_success() => {
                let created: CreatedEvent = response.json().map_err(|e| {
                    SyncError::Calendar(format!("Failed to decode created event: {}", e))
                })?;
                Ok(PublishAck::Created {
                    link: created.html_link,
                })
            }
            StatusCode::CONFLICT => Ok(PublishAck::AlreadyExisted),
            _ => Err(unexpected_status("insert event", response)),
        }
    }
}

fn unexpected_status(action: &str, response: reqwest::blocking::Response) -> SyncError {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    SyncError::Calendar(format!("Failed to {}: HTTP {} {}", action, status, body))
}
