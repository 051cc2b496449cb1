//! Markdown rendering for timetable answers and clarification prompts.

use indexmap::IndexMap;
use serde_json::Value;

use crate::query::models::{ClarifyDescriptor, TimetablePayload};
use crate::timetable::coalesce::{MergedSlot, coalesce_day_slots};
use crate::timetable::slot::display_text;

/// Canonical weekday ordering with the spelled-out names used for day
/// headings. Codes outside this table sort after every recognized day.
const WEEKDAYS: [(&str, &str); 7] = [
    ("Mon", "Monday"),
    ("Tue", "Tuesday"),
    ("Wed", "Wednesday"),
    ("Thu", "Thursday"),
    ("Fri", "Friday"),
    ("Sat", "Saturday"),
    ("Sun", "Sunday"),
];

const PLACEHOLDER: &str = "—";

fn weekday_rank(code: &str) -> usize {
    WEEKDAYS
        .iter()
        .position(|(short, _)| short.eq_ignore_ascii_case(code))
        .unwrap_or(WEEKDAYS.len())
}

fn weekday_full_name(code: &str) -> &str {
    WEEKDAYS
        .iter()
        .find(|(short, _)| short.eq_ignore_ascii_case(code))
        .map(|(_, full)| *full)
        .unwrap_or(code)
}

fn display_cell(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.is_empty() { PLACEHOLDER } else { trimmed }
}

/// Renders a disambiguation prompt for an ambiguous upstream query.
///
/// With candidates, lists each distinct non-empty name once in received
/// order; without, asks the user to be more specific about the input that
/// failed to resolve. The descriptor's message is echoed as the heading.
pub fn format_clarify(descriptor: &ClarifyDescriptor, question: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    let message = descriptor.message.trim();
    if !message.is_empty() {
        lines.push(format!("## {message}"));
    }
    let question = question.trim();
    if !question.is_empty() {
        lines.push(format!("> {question}"));
        lines.push(String::new());
    }

    let mut candidates: Vec<&str> = Vec::new();
    for candidate in &descriptor.candidates {
        let name = candidate.trim();
        if !name.is_empty() && !candidates.contains(&name) {
            candidates.push(name);
        }
    }

    if candidates.is_empty() {
        let input = descriptor.input.trim();
        if input.is_empty() {
            lines.push("Please be more specific so the timetable can be looked up.".to_owned());
        } else {
            lines.push(format!(
                "Please be more specific about \"{input}\" so the timetable can be looked up."
            ));
        }
    } else {
        lines.push("Please pick one of the following:".to_owned());
        lines.push(String::new());
        for name in candidates {
            lines.push(format!("- {name}"));
        }
    }

    lines.join("\n").trim_end().to_owned()
}

/// Renders a full timetable as one Markdown section per weekday, with
/// adjacent matching periods coalesced into single table rows.
pub fn format_full_timetable(
    timetable: &TimetablePayload,
    title: Option<&str>,
    notes: Option<&str>,
    teachers: &[String],
) -> String {
    let teacher = timetable
        .teacher
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or_else(|| teachers.iter().map(String::as_str).map(str::trim).find(|t| !t.is_empty()))
        .unwrap_or("Teacher");

    let groups = day_groups(timetable);
    if groups.is_empty() {
        return format!("No timetable entries found for {teacher}.");
    }

    let heading = match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => title.to_owned(),
        None => format!("{teacher} timetable"),
    };

    let mut lines: Vec<String> = vec![format!("## {heading}")];
    if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
        lines.push(format!("*{notes}*"));
    }

    let mut ordered: Vec<(&String, &Vec<Value>)> = groups.iter().collect();
    ordered.sort_by_key(|(day, _)| weekday_rank(day));

    for (day, rows) in ordered {
        let merged = coalesce_day_slots(rows);
        if merged.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("### {}", weekday_full_name(day)));
        lines.push(String::new());
        lines.push("| Period | Start | End | Subject | Class | Room |".to_owned());
        lines.push("| --- | --- | --- | --- | --- | --- |".to_owned());
        for slot in &merged {
            lines.push(table_row(slot));
        }
    }

    lines.join("\n").trim_end().to_owned()
}

fn table_row(slot: &MergedSlot) -> String {
    format!(
        "| {} | {} | {} | {} | {} | {} |",
        display_cell(&slot.period),
        display_cell(&slot.start),
        display_cell(&slot.end),
        display_cell(&slot.subject),
        display_cell(&slot.class),
        display_cell(&slot.room),
    )
}

/// Resolves the day-grouped rows: an explicit non-empty `grouped` map wins,
/// otherwise rows are partitioned by their `Weekday` field in first-seen
/// order. Rows without a weekday land in an "Unknown" bucket.
fn day_groups(timetable: &TimetablePayload) -> IndexMap<String, Vec<Value>> {
    if let Some(grouped) = &timetable.grouped
        && !grouped.is_empty()
    {
        return grouped.clone();
    }

    let mut groups: IndexMap<String, Vec<Value>> = IndexMap::new();
    for row in &timetable.rows {
        let weekday = row
            .as_object()
            .map(|obj| display_text(obj.get("Weekday")))
            .unwrap_or_default();
        let bucket = if weekday.is_empty() {
            "Unknown".to_owned()
        } else {
            weekday
        };
        groups.entry(bucket).or_default().push(row.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(rows: Vec<Value>) -> TimetablePayload {
        TimetablePayload {
            teacher: Some("Ms. Reed".to_owned()),
            rows,
            grouped: None,
        }
    }

    fn row(day: &str, period: &str, subject: &str) -> Value {
        json!({
            "Weekday": day,
            "Period": period,
            "Start": "",
            "End": "",
            "Subject": subject,
            "Class": "10A",
            "Room": "101",
        })
    }

    #[test]
    fn empty_timetable_reports_teacher() {
        let text = format_full_timetable(&payload(vec![]), None, None, &[]);
        assert_eq!(text, "No timetable entries found for Ms. Reed.");
    }

    #[test]
    fn teacher_falls_back_through_list_to_literal() {
        let mut timetable = payload(vec![]);
        timetable.teacher = None;

        let text = format_full_timetable(&timetable, None, None, &["Mr. Frost".to_owned()]);
        assert_eq!(text, "No timetable entries found for Mr. Frost.");

        let text = format_full_timetable(&timetable, None, None, &[]);
        assert_eq!(text, "No timetable entries found for Teacher.");
    }

    #[test]
    fn days_render_in_canonical_order() {
        let text = format_full_timetable(
            &payload(vec![row("Wed", "1", "Math"), row("Mon", "1", "Art")]),
            None,
            None,
            &[],
        );
        let monday = text.find("### Monday").expect("monday section");
        let wednesday = text.find("### Wednesday").expect("wednesday section");
        assert!(monday < wednesday);
    }

    #[test]
    fn unknown_weekday_sorts_last() {
        let text = format_full_timetable(
            &payload(vec![row("XYZ", "1", "Math"), row("Fri", "1", "Art")]),
            None,
            None,
            &[],
        );
        let friday = text.find("### Friday").expect("friday section");
        let unknown = text.find("### XYZ").expect("raw-code section");
        assert!(friday < unknown);
    }

    #[test]
    fn title_overrides_derived_heading() {
        let text = format_full_timetable(
            &payload(vec![row("Mon", "1", "Math")]),
            Some("Week 12"),
            None,
            &[],
        );
        assert!(text.starts_with("## Week 12"));
    }

    #[test]
    fn notes_render_italicized_under_heading() {
        let text = format_full_timetable(
            &payload(vec![row("Mon", "1", "Math")]),
            None,
            Some("Room changes possible"),
            &[],
        );
        assert!(text.contains("*Room changes possible*"));
    }

    #[test]
    fn missing_room_renders_placeholder() {
        let text = format_full_timetable(
            &payload(vec![json!({
                "Weekday": "Mon",
                "Period": "1",
                "Start": "9:00",
                "End": "9:50",
                "Subject": "Math",
                "Class": "10A",
                "Room": null,
            })]),
            None,
            None,
            &[],
        );
        assert!(text.contains("| Math | 10A | — |"));
    }

    #[test]
    fn explicit_grouping_wins_over_rows() {
        let timetable = TimetablePayload {
            teacher: None,
            rows: vec![row("Mon", "1", "Ignored")],
            grouped: Some(IndexMap::from([(
                "Tue".to_owned(),
                vec![row("Tue", "1", "Physics")],
            )])),
        };
        let text = format_full_timetable(&timetable, None, None, &[]);
        assert!(text.contains("### Tuesday"));
        assert!(text.contains("Physics"));
        assert!(!text.contains("Ignored"));
    }

    #[test]
    fn rows_without_weekday_fall_into_unknown_bucket() {
        let text = format_full_timetable(
            &payload(vec![json!({"Period": "1", "Subject": "Math", "Class": "10A", "Room": "1"})]),
            None,
            None,
            &[],
        );
        assert!(text.contains("### Unknown"));
    }

    #[test]
    fn clarify_lists_each_candidate_once() {
        let descriptor = ClarifyDescriptor {
            required: true,
            kind: "teacher".to_owned(),
            input: "Jane".to_owned(),
            message: "Multiple teachers match".to_owned(),
            candidates: vec![
                "Jane Smith".to_owned(),
                "Jane Doe".to_owned(),
                "Jane Smith".to_owned(),
                "  ".to_owned(),
            ],
        };
        let text = format_clarify(&descriptor, "When does Jane teach math?");
        assert!(text.contains("## Multiple teachers match"));
        assert_eq!(text.matches("Jane Smith").count(), 1);
        assert_eq!(text.matches("Jane Doe").count(), 1);
        let smith = text.find("Jane Smith").unwrap();
        let doe = text.find("Jane Doe").unwrap();
        assert!(smith < doe, "candidates keep received order");
    }

    #[test]
    fn clarify_without_candidates_references_input() {
        let descriptor = ClarifyDescriptor {
            required: true,
            kind: "teacher".to_owned(),
            input: "J.".to_owned(),
            message: "Could not resolve teacher".to_owned(),
            candidates: vec![],
        };
        let text = format_clarify(&descriptor, "");
        assert!(text.contains("\"J.\""));
        assert!(text.contains("more specific"));
    }
}
