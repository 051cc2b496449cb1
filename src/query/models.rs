//! Wire types for the spreadsheet-backed query service.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Timetable payload attached to a `FULL_TIMETABLE` query result.
///
/// `rows` are untyped on purpose: the service forwards spreadsheet rows
/// verbatim and any field may be missing or malformed. The core normalizes
/// them; nothing here should assume shape beyond "JSON value".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetablePayload {
    pub teacher: Option<String>,
    #[serde(default)]
    pub rows: Vec<Value>,
    /// Pre-grouped rows keyed by weekday code. Insertion order is
    /// meaningful: it breaks ties for unrecognized codes.
    #[serde(default)]
    pub grouped: Option<IndexMap<String, Vec<Value>>>,
}

/// Signals that the query matched more than one entity (typically a
/// teacher name) and no timetable can be produced until the user picks one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarifyDescriptor {
    #[serde(default)]
    pub required: bool,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub candidates: Vec<String>,
}

/// Raw response envelope as the query service sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub query_type: Option<String>,
    #[serde(default)]
    pub clarify: Option<ClarifyDescriptor>,
    #[serde(default)]
    pub timetable: Option<TimetablePayload>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub teachers: Vec<String>,
    #[serde(default)]
    pub results: Option<Value>,
}

/// Classified query result the dispatcher routes on.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// Deterministically renderable timetable.
    FullTimetable {
        timetable: TimetablePayload,
        title: Option<String>,
        notes: Option<String>,
        teachers: Vec<String>,
    },
    /// Ambiguous query; the user must disambiguate first.
    Clarify(ClarifyDescriptor),
    /// Anything else: free-form results handed to the completion provider.
    Results(Value),
}

pub const QUERY_TYPE_FULL_TIMETABLE: &str = "FULL_TIMETABLE";

impl QueryResponse {
    /// Classifies the envelope. A clarify descriptor takes precedence over
    /// everything else; an explicit `FULL_TIMETABLE` type goes to the
    /// formatter; the rest is free-form.
    pub fn into_outcome(self) -> QueryOutcome {
        if let Some(clarify) = self.clarify {
            return QueryOutcome::Clarify(clarify);
        }
        if self.query_type.as_deref() == Some(QUERY_TYPE_FULL_TIMETABLE) {
            return QueryOutcome::FullTimetable {
                timetable: self.timetable.unwrap_or_default(),
                title: self.title,
                notes: self.notes,
                teachers: self.teachers,
            };
        }
        QueryOutcome::Results(self.results.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> QueryResponse {
        serde_json::from_value(value).expect("valid envelope")
    }

    #[test]
    fn clarify_takes_precedence() {
        let outcome = parse(json!({
            "queryType": "FULL_TIMETABLE",
            "clarify": {
                "required": true,
                "type": "teacher",
                "input": "Jane",
                "message": "Multiple matches",
                "candidates": ["Jane Smith", "Jane Doe"],
            },
        }))
        .into_outcome();
        assert!(matches!(outcome, QueryOutcome::Clarify(c) if c.candidates.len() == 2));
    }

    #[test]
    fn full_timetable_routes_to_formatter() {
        let outcome = parse(json!({
            "queryType": "FULL_TIMETABLE",
            "timetable": {"teacher": "Ms. Reed", "rows": [{"Weekday": "Mon"}]},
            "notes": "Week A",
        }))
        .into_outcome();
        match outcome {
            QueryOutcome::FullTimetable { timetable, notes, .. } => {
                assert_eq!(timetable.teacher.as_deref(), Some("Ms. Reed"));
                assert_eq!(timetable.rows.len(), 1);
                assert_eq!(notes.as_deref(), Some("Week A"));
            }
            other => panic!("expected FullTimetable, got {other:?}"),
        }
    }

    #[test]
    fn anything_else_is_free_form_results() {
        let outcome = parse(json!({"results": [{"answer": 42}]})).into_outcome();
        assert!(matches!(outcome, QueryOutcome::Results(Value::Array(_))));
    }

    #[test]
    fn empty_envelope_degrades_to_null_results() {
        let outcome = parse(json!({})).into_outcome();
        assert!(matches!(outcome, QueryOutcome::Results(Value::Null)));
    }
}
