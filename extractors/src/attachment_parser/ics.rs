use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use ical::parser::ical::component::IcalEvent;

/// Start and end of the first event in a calendar invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InviteWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

pub struct IcsParser {
    config: IcsParserConfig,
}

#[derive(Debug, Clone)]
pub struct IcsParserConfig {
    /// Zone for "floating" times that carry neither `Z` nor a known `TZID`
    pub floating_timezone: Tz,
}

impl Default for IcsParserConfig {
    fn default() -> Self {
        Self {
            floating_timezone: Tz::UTC,
        }
    }
}

impl Default for IcsParser {
    fn default() -> Self {
        Self::new(IcsParserConfig::default())
    }
}

impl IcsParser {
    pub fn new(config: IcsParserConfig) -> Self {
        Self { config }
    }

    /// Reads `DTSTART`/`DTEND` of the first `VEVENT` found.
    ///
    /// Returns `Ok(None)` when the content holds no event with either time.
    pub fn parse_window(&self, content: &str) -> anyhow::Result<Option<InviteWindow>> {
        let reader = ical::IcalParser::new(content.as_bytes());

        for calendar in reader {
            let calendar = calendar?;

            if let Some(event) = calendar.events.first() {
                let window = InviteWindow {
                    start: self.event_time(event, "DTSTART")?,
                    end: self.event_time(event, "DTEND")?,
                };

                if window.start.is_none() && window.end.is_none() {
                    return Ok(None);
                }
                return Ok(Some(window));
            }
        }

        Ok(None)
    }

    fn event_time(&self, event: &IcalEvent, name: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
        let Some(property) = event.properties.iter().find(|p| p.name == name) else {
            return Ok(None);
        };
        let Some(value) = property.value.as_deref() else {
            return Ok(None);
        };

        let tzid = property
            .params
            .as_ref()
            .and_then(|params| params.iter().find(|(key, _)| key == "TZID"))
            .and_then(|(_, values)| values.first())
            .map(|tzid| tzid.trim_matches('"'));

        self.parse_ics_date(value, tzid).map(Some)
    }

    fn parse_ics_date(&self, date_str: &str, tzid: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
        // 20260125T140000Z, 20260125T140000 or 20260125
        let date_str = date_str.trim().replace([':', '-'], "");

        if date_str.len() == 8 {
            let date = NaiveDate::parse_from_str(&date_str, "%Y%m%d")?;
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| anyhow::anyhow!("Invalid date: {}", date_str))?;
            return self.localize(midnight, tzid);
        }

        let stamp = date_str
            .get(..15)
            .ok_or_else(|| anyhow::anyhow!("Invalid date format: {}", date_str))?;
        let dt = NaiveDateTime::parse_from_str(stamp, "%Y%m%dT%H%M%S")?;

        if date_str.ends_with('Z') {
            Ok(dt.and_utc())
        } else {
            self.localize(dt, tzid)
        }
    }

    fn localize(&self, dt: NaiveDateTime, tzid: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
        let tz = match tzid {
            Some(id) => id.parse::<Tz>().unwrap_or_else(|_| {
                tracing::debug!("Unknown TZID {:?}, using {}", id, self.config.floating_timezone);
                self.config.floating_timezone
            }),
            None => self.config.floating_timezone,
        };

        tz.from_local_datetime(&dt)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| anyhow::anyhow!("{} does not exist in {}", dt, tz))
    }
}
