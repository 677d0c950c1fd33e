use serde::{Deserialize, Serialize};

/// A fetched email, reduced to what the extractors need.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEmailMessage {
    pub subject: String,
    /// Sender as `Name <address>` or the bare address
    pub sender: String,
    /// MIME parts in depth-first order, multipart containers included
    pub parts: Vec<BodyPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyPart {
    pub content_type: String,
    /// Transfer-decoded payload
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPartKind {
    PlainText,
    Html,
    CalendarInvite,
    Other,
}

impl BodyPart {
    pub fn new(content_type: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            payload: payload.into(),
        }
    }

    pub fn kind(&self) -> BodyPartKind {
        let mime = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "text/plain" => BodyPartKind::PlainText,
            "text/html" => BodyPartKind::Html,
            "text/calendar" | "application/ics" => BodyPartKind::CalendarInvite,
            _ => BodyPartKind::Other,
        }
    }

    /// The payload as text, or `None` when it is empty or not valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        if self.payload.is_empty() {
            return None;
        }
        std::str::from_utf8(&self.payload).ok()
    }
}

impl RawEmailMessage {
    pub fn new(subject: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            sender: sender.into(),
            parts: Vec::new(),
        }
    }

    pub fn with_part(mut self, content_type: &str, payload: impl Into<Vec<u8>>) -> Self {
        self.parts.push(BodyPart::new(content_type, payload));
        self
    }
}
