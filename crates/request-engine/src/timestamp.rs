//! Timestamp parsing and display.
//!
//! Records carry timestamps as text in two dialects: RFC 3339 from browsers
//! and `18-Oct-26 02:30 PM` written by the backend in its own local clock.
//! Everything here is lenient: text that cannot be parsed yields `None` (or is
//! echoed back by the display helpers).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// Format the backend uses for `sentAt`, `archivedAt`, `createdAt`.
pub const BACKEND_TIMESTAMP_FORMAT: &str = "%d-%b-%y %I:%M %p";

/// UTC offset of the backend clock.
pub const BACKEND_UTC_OFFSET_HOURS: i32 = 2;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    BACKEND_TIMESTAMP_FORMAT,
    "%d-%b-%Y %I:%M %p",
];

const SECONDS_PER_DAY: i64 = 86_400;

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y", "%d-%b-%Y", "%d-%b-%y"];

/// Fixed offset for a whole number of hours; out-of-range values fall back to UTC.
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Offset of the backend clock.
pub fn backend_offset() -> FixedOffset {
    offset_from_hours(BACKEND_UTC_OFFSET_HOURS)
}

/// Evaluation context: the instant treated as "now" and the offset naive
/// timestamps and calendar days are read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    now: DateTime<FixedOffset>,
}

impl EvalContext {
    /// Fixed "now", mostly for tests and replays.
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// Wall-clock now, viewed in `offset`.
    pub fn now_in(offset: FixedOffset) -> Self {
        Self {
            now: Utc::now().with_timezone(&offset),
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    pub fn offset(&self) -> FixedOffset {
        *self.now.offset()
    }

    /// Parse `text` in this context's offset.
    pub fn parse(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(text, self.offset())
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::now_in(backend_offset())
    }
}

/// Parse a record timestamp.
///
/// Accepts RFC 3339, naive ISO date-times, the backend format and a few date
/// only forms. Naive values are read in `offset`; dates become midnight.
pub fn parse_timestamp(text: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    offset.from_local_datetime(&naive).single()
}

/// Format `now` the way the backend writes timestamps.
pub fn backend_timestamp(now: DateTime<FixedOffset>) -> String {
    now.format(BACKEND_TIMESTAMP_FORMAT).to_string()
}

/// `"25 Jan 2024\n14:30"`; `"—"` when empty, the input itself when unparseable.
pub fn format_date(text: &str, offset: FixedOffset) -> String {
    render(text, offset, "—", "%d %b %Y\n%H:%M")
}

/// `"25 Jan\n14:30"`; `"—"` when empty, the input itself when unparseable.
pub fn format_date_short(text: &str, offset: FixedOffset) -> String {
    render(text, offset, "—", "%d %b\n%H:%M")
}

/// `"25 Jan"`; empty when empty, the input itself when unparseable.
pub fn format_short_date(text: &str, offset: FixedOffset) -> String {
    render(text, offset, "", "%d %b")
}

/// Relative rendering for activity lists.
///
/// Same day: `Today 14:30`; one day back: `Yesterday 09:05`; under a week:
/// `3 days ago`; older: `25 Jan`. Timestamps in the future count as today.
pub fn format_relative(text: &str, ctx: &EvalContext) -> String {
    if text.trim().is_empty() {
        return "Unknown".to_string();
    }
    let Some(at) = ctx.parse(text) else {
        return text.to_string();
    };
    let local = at.with_timezone(&ctx.offset());
    let days = (ctx.now() - at).num_seconds().div_euclid(SECONDS_PER_DAY);

    match days {
        d if d <= 0 => format!("Today {}", local.format("%H:%M")),
        1 => format!("Yesterday {}", local.format("%H:%M")),
        d if d < 7 => format!("{d} days ago"),
        _ => local.format("%d %b").to_string(),
    }
}

fn render(text: &str, offset: FixedOffset, empty: &str, fmt: &str) -> String {
    if text.trim().is_empty() {
        return empty.to_string();
    }
    match parse_timestamp(text, offset) {
        Some(at) => at.with_timezone(&offset).format(fmt).to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cairo() -> FixedOffset {
        backend_offset()
    }

    fn ctx(text: &str) -> EvalContext {
        EvalContext::at(DateTime::parse_from_rfc3339(text).unwrap())
    }

    #[test]
    fn test_parse_rfc3339_keeps_offset() {
        let at = parse_timestamp("2026-10-18T10:00:00Z", cairo()).unwrap();
        assert_eq!(at.to_rfc3339(), "2026-10-18T10:00:00+00:00");
    }

    #[test]
    fn test_parse_backend_format_in_backend_clock() {
        let at = parse_timestamp("18-Oct-26 02:30 PM", cairo()).unwrap();
        assert_eq!(at.to_rfc3339(), "2026-10-18T14:30:00+02:00");
        assert_eq!(at.with_timezone(&Utc).to_rfc3339(), "2026-10-18T12:30:00+00:00");
    }

    #[test]
    fn test_parse_date_only_forms() {
        let a = parse_timestamp("2026-10-18", cairo()).unwrap();
        let b = parse_timestamp("18 Oct 2026", cairo()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_rfc3339(), "2026-10-18T00:00:00+02:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("", cairo()).is_none());
        assert!(parse_timestamp("Unknown", cairo()).is_none());
        assert!(parse_timestamp("2026-13-45", cairo()).is_none());
    }

    #[test]
    fn test_backend_timestamp_round_trips() {
        let now = DateTime::parse_from_rfc3339("2026-01-05T09:07:00+02:00").unwrap();
        let text = backend_timestamp(now);
        assert_eq!(text, "05-Jan-26 09:07 AM");
        assert_eq!(parse_timestamp(&text, cairo()), Some(now));
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(format_date("2024-01-25T14:30:00+02:00", cairo()), "25 Jan 2024\n14:30");
        assert_eq!(format_date_short("2024-01-25T14:30:00+02:00", cairo()), "25 Jan\n14:30");
        assert_eq!(format_short_date("2024-01-25T14:30:00+02:00", cairo()), "25 Jan");
        assert_eq!(format_date("", cairo()), "—");
        assert_eq!(format_short_date("", cairo()), "");
        assert_eq!(format_date("not a date", cairo()), "not a date");
    }

    #[test]
    fn test_format_relative() {
        let ctx = ctx("2026-10-18T15:00:00+02:00");
        assert_eq!(format_relative("2026-10-18T09:15:00+02:00", &ctx), "Today 09:15");
        assert_eq!(format_relative("2026-10-17T09:15:00+02:00", &ctx), "Yesterday 09:15");
        assert_eq!(format_relative("2026-10-14T09:15:00+02:00", &ctx), "4 days ago");
        assert_eq!(format_relative("2026-09-01T09:15:00+02:00", &ctx), "01 Sep");
        assert_eq!(format_relative("2026-10-19T09:15:00+02:00", &ctx), "Today 09:15");
        assert_eq!(format_relative("", &ctx), "Unknown");
        assert_eq!(format_relative("soon", &ctx), "soon");
    }

    #[test]
    fn test_offset_from_hours_out_of_range() {
        assert_eq!(offset_from_hours(48), Utc.fix());
        assert_eq!(offset_from_hours(-5).local_minus_utc(), -5 * 3600);
    }
}
