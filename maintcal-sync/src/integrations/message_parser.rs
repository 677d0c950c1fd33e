use mail_parser::{Addr, Message, MessageParser, MessagePart, MimeHeaders, PartType};
use shared_types::{BodyPart, RawEmailMessage};

use crate::error::{Result, SyncError};

/// Decodes an RFC 822 message into subject, sender and its MIME parts in
/// document order. Parts of attached messages follow the attachment part.
pub fn parse_message(raw: &[u8]) -> Result<RawEmailMessage> {
    let parser = MessageParser::default();
    let parsed = parser
        .parse(raw)
        .ok_or_else(|| SyncError::Mailbox("Failed to parse email".to_string()))?;

    let subject = parsed.subject().unwrap_or_default().to_string();
    let sender = parsed
        .from()
        .and_then(|addrs| addrs.first())
        .map(format_sender)
        .unwrap_or_default();

    let mut message = RawEmailMessage::new(subject, sender);
    collect_parts(&parsed, &mut message.parts);

    Ok(message)
}

fn collect_parts(message: &Message, parts: &mut Vec<BodyPart>) {
    for part in &message.parts {
        parts.push(BodyPart::new(content_type(part), part.contents().to_vec()));
        if let PartType::Message(attached) = &part.body {
            collect_parts(attached, parts);
        }
    }
}

fn format_sender(addr: &Addr) -> String {
    match (addr.name(), addr.address()) {
        (Some(name), Some(address)) => format!("{} <{}>", name, address),
        (None, Some(address)) => address.to_string(),
        (Some(name), None) => name.to_string(),
        (None, None) => String::new(),
    }
}

/// Parts without a Content-Type header are plain text.
fn content_type(part: &MessagePart) -> String {
    match part.content_type() {
        Some(ct) => match ct.subtype() {
            Some(subtype) => format!("{}/{}", ct.ctype(), subtype),
            None => ct.ctype().to_string(),
        },
        None => "text/plain".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::BodyPartKind;

    const MULTIPART: &str = "From: Partner Ops <ops@partner.example>\r\n\
To: noc@example.com\r\n\
Subject: Scheduled Maintenance Notice\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"XYZ\"\r\n\
\r\n\
--XYZ\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
CID: ABC1234XYZ\r\n\
--XYZ\r\n\
Content-Type: text/calendar; method=REQUEST\r\n\
\r\n\
BEGIN:VCALENDAR\r\n\
END:VCALENDAR\r\n\
--XYZ--\r\n";

    #[test]
    fn test_parse_multipart_message() {
        let message = parse_message(MULTIPART.as_bytes()).unwrap();

        assert_eq!(message.subject, "Scheduled Maintenance Notice");
        assert_eq!(message.sender, "Partner Ops <ops@partner.example>");

        let text_parts: Vec<_> = message
            .parts
            .iter()
            .filter(|part| part.kind() == BodyPartKind::PlainText)
            .collect();
        assert_eq!(text_parts.len(), 1);
        assert!(text_parts[0].text().unwrap().contains("CID: ABC1234XYZ"));

        let plain = message
            .parts
            .iter()
            .position(|part| part.kind() == BodyPartKind::PlainText)
            .unwrap();
        let invite = message
            .parts
            .iter()
            .position(|part| part.kind() == BodyPartKind::CalendarInvite)
            .unwrap();
        assert!(plain < invite);
    }

    #[test]
    fn test_single_part_without_content_type() {
        let raw = "From: noc@partner.example\r\nSubject: Notice\r\n\r\nCID: ABC1234XYZ\r\n";
        let message = parse_message(raw.as_bytes()).unwrap();

        assert_eq!(message.sender, "noc@partner.example");
        assert_eq!(message.parts.len(), 1);
        assert_eq!(message.parts[0].kind(), BodyPartKind::PlainText);
        assert!(message.parts[0].text().unwrap().starts_with("CID: ABC1234XYZ"));
    }

    const FORWARDED: &str = "From: Colleague <colleague@example.com>\r\n\
To: noc@example.com\r\n\
Subject: Fwd: Scheduled Maintenance Notice\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"OUTER\"\r\n\
\r\n\
--OUTER\r\n\
Content-Type: text/plain\r\n\
\r\n\
see attached\r\n\
--OUTER\r\n\
Content-Type: message/rfc822\r\n\
\r\n\
From: Partner Ops <ops@partner.example>\r\n\
Subject: Scheduled Maintenance Notice\r\n\
Content-Type: text/plain\r\n\
\r\n\
CID: ABC1234XYZ\r\n\
Start: 2017-12-01T01:00:00\r\n\
--OUTER--\r\n";

    #[test]
    fn test_forwarded_message_parts_are_included() {
        let message = parse_message(FORWARDED.as_bytes()).unwrap();

        assert_eq!(message.subject, "Fwd: Scheduled Maintenance Notice");

        let texts: Vec<&str> = message
            .parts
            .iter()
            .filter(|part| part.kind() == BodyPartKind::PlainText)
            .filter_map(|part| part.text())
            .collect();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].contains("see attached"));
        assert!(texts[1].contains("CID: ABC1234XYZ"));
    }
}
