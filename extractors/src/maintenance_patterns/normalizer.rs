use crate::error::NormalizeError;
use crate::maintenance_patterns::{MaintenancePattern, RawMaintenanceFields, RawTime};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use sha1::{Digest, Sha1};
use shared_types::{MaintenanceNotification, RawEmailMessage};

/// Turns extracted fields into a notification.
///
/// Returns `Ok(None)` when CID, start or end is missing. A captured time
/// that does not match the rule's format is an error for this
/// (message, pattern) pairing only.
pub fn normalize(
    fields: RawMaintenanceFields,
    pattern: &MaintenancePattern,
    message: &RawEmailMessage,
) -> Result<Option<MaintenanceNotification>, NormalizeError> {
    let RawMaintenanceFields {
        cid: Some(cid),
        start: Some(start),
        end: Some(end),
        body,
    } = fields
    else {
        return Ok(None);
    };

    let rule = pattern.rule();
    let start_time = resolve_time("start", start, &rule.start_time_format)?;
    let end_time = resolve_time("end", end, &rule.end_time_format)?;
    let event_uuid = event_identity(&cid, &start_time, &end_time);

    Ok(Some(MaintenanceNotification {
        subject: message.subject.clone(),
        cid,
        partner: rule.partner_name.clone(),
        start_time,
        end_time,
        original_message: body.unwrap_or_default(),
        event_uuid,
    }))
}

fn resolve_time(
    field: &'static str,
    raw: RawTime,
    format: &str,
) -> Result<DateTime<Utc>, NormalizeError> {
    match raw {
        RawTime::Structured(time) => Ok(time),
        RawTime::Text(value) => {
            parse_time(&value, format).ok_or_else(|| NormalizeError::TimeFormat {
                field,
                value,
                format: format.to_string(),
            })
        }
    }
}

/// Parses `value` with a strftime-style `format`.
///
/// Zone-aware formats are converted to UTC; naive date-times and bare dates
/// are taken as UTC.
pub fn parse_time(value: &str, format: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(time) = DateTime::parse_from_str(value, format) {
        return Some(time.with_timezone(&Utc));
    }

    if let Ok(time) = NaiveDateTime::parse_from_str(value, format) {
        return Some(time.and_utc());
    }

    NaiveDate::parse_from_str(value, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc())
}

/// Deduplication key for a maintenance window: hex SHA-1 over the CID
/// followed by the start and end times in offset-less ISO-8601.
///
/// The layout must stay byte-compatible with event ids already in the
/// calendar.
pub fn event_identity(cid: &str, start_time: &DateTime<Utc>, end_time: &DateTime<Utc>) -> String {
    let mut hasher = Sha1::new();
    hasher.update(cid.as_bytes());
    hasher.update(identity_timestamp(start_time).as_bytes());
    hasher.update(identity_timestamp(end_time).as_bytes());
    hex::encode(hasher.finalize())
}

/// `2017-12-01T01:00:00`, with `.ffffff` appended for sub-second times
/// (nine digits when the microseconds do not cover the fraction).
fn identity_timestamp(time: &DateTime<Utc>) -> String {
    let naive = time.naive_utc();
    let format = match naive.nanosecond() {
        0 => "%Y-%m-%dT%H:%M:%S",
        nanos if nanos % 1_000 == 0 => "%Y-%m-%dT%H:%M:%S%.6f",
        _ => "%Y-%m-%dT%H:%M:%S%.9f",
    };
    naive.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance_patterns::extract;
    use crate::maintenance_patterns::test_support::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 12, 1, hour, 0, 0).unwrap()
    }

    fn complete_fields() -> RawMaintenanceFields {
        RawMaintenanceFields {
            cid: Some("ABC1234XYZ".to_string()),
            start: Some(RawTime::Text("2017-12-01T01:00:00".to_string())),
            end: Some(RawTime::Text("2017-12-01T02:00:00".to_string())),
            body: Some("CID: ABC1234XYZ".to_string()),
        }
    }

    #[test]
    fn test_partner_a_scenario() {
        let message = partner_a_email(
            "CID: ABC1234XYZ\nStart: 2017-12-01T01:00:00\nEnd: 2017-12-01T02:00:00\n",
        );
        let pattern = partner_a();

        let first = normalize(extract(&message, &pattern), &pattern, &message)
            .unwrap()
            .unwrap();
        let second = normalize(extract(&message, &pattern), &pattern, &message)
            .unwrap()
            .unwrap();

        assert_eq!(first.cid, "ABC1234XYZ");
        assert_eq!(first.partner, "Partner A");
        assert_eq!(first.subject, "Scheduled Maintenance Notice");
        assert_eq!(first.start_time, at(1));
        assert_eq!(first.end_time, at(2));
        assert!(first.end_time >= first.start_time);
        assert_eq!(first.event_uuid, second.event_uuid);
        assert_eq!(first.event_uuid, event_identity("ABC1234XYZ", &at(1), &at(2)));
    }

    #[test]
    fn test_identity_is_deterministic() {
        let a = event_identity("ABC1234XYZ", &at(1), &at(2));
        let b = event_identity("ABC1234XYZ", &at(1), &at(2));

        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_identity_is_stable_across_processes() {
        // sha1("ABC1234XYZ2017-12-01T01:00:002017-12-01T02:00:00")
        assert_eq!(
            event_identity("ABC1234XYZ", &at(1), &at(2)),
            "f637b66211eb476d5e76fb826bda65df6af8a2e2"
        );
    }

    #[test]
    fn test_identity_timestamp_layout() {
        assert_eq!(identity_timestamp(&at(1)), "2017-12-01T01:00:00");
        assert_eq!(
            identity_timestamp(&(at(1) + Duration::milliseconds(500))),
            "2017-12-01T01:00:00.500000"
        );
        assert_eq!(
            identity_timestamp(&(at(1) + Duration::nanoseconds(7))),
            "2017-12-01T01:00:00.000000007"
        );
    }

    #[test]
    fn test_identity_changes_with_each_input() {
        let base = event_identity("ABC1234XYZ", &at(1), &at(2));

        assert_ne!(base, event_identity("ABC1234XYW", &at(1), &at(2)));
        assert_ne!(base, event_identity("ABC1234XYZ", &(at(1) + Duration::seconds(1)), &at(2)));
        assert_ne!(
            base,
            event_identity("ABC1234XYZ", &(at(1) + Duration::milliseconds(500)), &at(2))
        );
        assert_ne!(
            base,
            event_identity("ABC1234XYZ", &at(1), &(at(2) + Duration::nanoseconds(1)))
        );
        assert_ne!(base, event_identity("ABC1234XYZ", &at(1), &at(3)));
        assert_ne!(base, event_identity("ABC1234XYZ", &at(2), &at(1)));
    }

    #[test]
    fn test_missing_field_yields_nothing() {
        let pattern = partner_a();
        let message = partner_a_email("");

        for strip in 0..3 {
            let mut fields = complete_fields();
            match strip {
                0 => fields.cid = None,
                1 => fields.start = None,
                _ => fields.end = None,
            }
            assert_eq!(normalize(fields, &pattern, &message).unwrap(), None);
        }
    }

    #[test]
    fn test_format_mismatch_is_an_error() {
        let pattern = partner_a();
        let message = partner_a_email("");
        let mut fields = complete_fields();
        fields.end = Some(RawTime::Text("December 1st, 2am".to_string()));

        let err = normalize(fields, &pattern, &message).unwrap_err();
        match err {
            NormalizeError::TimeFormat { field, value, .. } => {
                assert_eq!(field, "end");
                assert_eq!(value, "December 1st, 2am");
            }
        }
    }

    #[test]
    fn test_structured_times_pass_through() {
        let pattern = partner_a();
        let message = partner_a_email("");
        let mut fields = complete_fields();
        fields.start = Some(RawTime::Structured(at(5)));
        fields.end = Some(RawTime::Structured(at(7)));

        let notification = normalize(fields, &pattern, &message).unwrap().unwrap();
        assert_eq!(notification.start_time, at(5));
        assert_eq!(notification.end_time, at(7));
        assert_eq!(notification.original_message, "CID: ABC1234XYZ");
    }

    #[test]
    fn test_parse_time_formats() {
        assert_eq!(parse_time("2017-12-01T01:00:00", "%Y-%m-%dT%H:%M:%S"), Some(at(1)));
        assert_eq!(
            parse_time("2017-12-01 03:00 +0200", "%Y-%m-%d %H:%M %z"),
            Some(at(1))
        );
        assert_eq!(
            parse_time("01-Dec-2017 01:00", "%d-%b-%Y %H:%M"),
            Some(at(1))
        );
        assert_eq!(parse_time("2017/12/01", "%Y/%m/%d"), Some(at(0)));
        assert_eq!(parse_time(" 2017-12-01T01:00:00 ", "%Y-%m-%dT%H:%M:%S"), Some(at(1)));
        assert_eq!(parse_time("garbage", "%Y-%m-%d"), None);
    }
}
