//! Structured attachments carried inside notification emails.

mod ics;

pub use ics::{IcsParser, IcsParserConfig, InviteWindow};
