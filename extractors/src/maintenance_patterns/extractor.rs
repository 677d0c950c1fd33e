use crate::attachment_parser::{IcsParser, InviteWindow};
use crate::maintenance_patterns::MaintenancePattern;
use chrono::{DateTime, Utc};
use regex::Regex;
use shared_types::{BodyPartKind, RawEmailMessage};

/// A time as found in the message: captured text still to be parsed with the
/// rule's format, or an already structured value from a calendar invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTime {
    Text(String),
    Structured(DateTime<Utc>),
}

impl RawTime {
    fn is_structured(&self) -> bool {
        matches!(self, RawTime::Structured(_))
    }
}

/// Fields pulled out of one message by one pattern, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMaintenanceFields {
    pub cid: Option<String>,
    pub start: Option<RawTime>,
    pub end: Option<RawTime>,
    /// Body of the part the CID was captured from
    pub body: Option<String>,
}

impl RawMaintenanceFields {
    pub fn is_empty(&self) -> bool {
        self.cid.is_none() && self.start.is_none() && self.end.is_none() && self.body.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.cid.is_some() && self.start.is_some() && self.end.is_some()
    }

    /// Nothing a later part could contribute would change these fields.
    fn is_settled(&self) -> bool {
        self.cid.is_some()
            && self.start.as_ref().is_some_and(RawTime::is_structured)
            && self.end.as_ref().is_some_and(RawTime::is_structured)
    }

    /// Invite times replace text captures but never an earlier invite's times.
    fn take_invite_window(&mut self, window: InviteWindow) {
        if let Some(start) = window.start {
            if !self.start.as_ref().is_some_and(RawTime::is_structured) {
                self.start = Some(RawTime::Structured(start));
            }
        }
        if let Some(end) = window.end {
            if !self.end.as_ref().is_some_and(RawTime::is_structured) {
                self.end = Some(RawTime::Structured(end));
            }
        }
    }

    fn match_body(&mut self, pattern: &MaintenancePattern, body: &str) {
        if self.cid.is_none() {
            if let Some(cid) = capture(&pattern.cid, body) {
                self.cid = Some(cid);
                self.body = Some(body.to_string());
            }
        }
        if self.start.is_none() {
            self.start = capture(&pattern.start_time, body).map(RawTime::Text);
        }
        if self.end.is_none() {
            self.end = capture(&pattern.end_time, body).map(RawTime::Text);
        }
    }
}

/// Extracts CID, start and end time from `message` using `pattern`.
///
/// Returns empty fields when the pattern's sender or subject filter rejects
/// the message. Body parts are visited in order and the first capture of
/// each field wins; times from a calendar invite take precedence over times
/// captured from text.
pub fn extract(message: &RawEmailMessage, pattern: &MaintenancePattern) -> RawMaintenanceFields {
    let mut fields = RawMaintenanceFields::default();

    if !pattern.applies_to(message) {
        return fields;
    }

    let ics_parser = IcsParser::default();

    for part in &message.parts {
        let kind = part.kind();
        if kind == BodyPartKind::Other {
            continue;
        }

        let Some(body) = part.text() else {
            tracing::debug!("Skipping undecodable {} part", part.content_type);
            continue;
        };

        if kind == BodyPartKind::CalendarInvite {
            match ics_parser.parse_window(body) {
                Ok(Some(window)) => fields.take_invite_window(window),
                Ok(None) => {}
                Err(e) => tracing::debug!("Ignoring unparseable calendar invite: {}", e),
            }
        }

        fields.match_body(pattern, body);

        if fields.is_settled() {
            break;
        }
    }

    fields
}

fn capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}
