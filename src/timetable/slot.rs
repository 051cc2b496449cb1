//! Slot normalization: raw timetable rows into canonical records.
//!
//! Rows arrive from the query service as arbitrary JSON — any field may be
//! null, missing, numeric, or padded with whitespace. Normalization is the
//! only place that shape is dealt with; everything downstream works on
//! [`NormalizedSlot`] and can assume trimmed, non-null strings.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Matches `H:MM` / `HH:MM` 24-hour clock text.
static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("clock regex is valid"));

/// A timetable row with trimmed display fields and lowercase grouping keys.
///
/// The grouping keys are a pure, case-insensitive function of the
/// corresponding display field. They exist only for equality comparison
/// during coalescing and are never rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSlot {
    pub weekday: String,
    pub period: String,
    pub start: String,
    pub end: String,
    pub subject: String,
    pub class: String,
    pub room: String,
    pub subject_key: String,
    pub class_key: String,
    pub room_key: String,
}

/// Converts a JSON field into display text: null/absent → empty string,
/// numbers → their decimal form, everything else stringified and trimmed.
pub fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string().trim().to_owned(),
    }
}

/// Normalizes a raw row. Returns `None` when the row is not a JSON object;
/// malformed fields inside an object degrade to empty strings instead.
pub fn normalize(row: &Value) -> Option<NormalizedSlot> {
    let obj = row.as_object()?;
    let field = |name: &str| display_text(obj.get(name));

    let subject = field("Subject");
    let class = field("Class");
    let room = field("Room");

    Some(NormalizedSlot {
        weekday: field("Weekday"),
        period: field("Period"),
        start: field("Start"),
        end: field("End"),
        subject_key: subject.to_lowercase(),
        class_key: class.to_lowercase(),
        room_key: room.to_lowercase(),
        subject,
        class,
        room,
    })
}

/// Parses `H:MM`/`HH:MM` text into minutes since midnight.
///
/// Anything that doesn't match the pattern is indeterminate (`None`);
/// callers fall through to their next comparison rule.
pub fn parse_minutes(text: &str) -> Option<u32> {
    let caps = CLOCK_RE.captures(text.trim())?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Parses a purely numeric period label. Mixed labels like `"1A"` are
/// indeterminate and never participate in numeric ordering or adjacency.
pub fn parse_period(label: &str) -> Option<i64> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}
