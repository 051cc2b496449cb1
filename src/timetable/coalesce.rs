//! Coalescing of a single day's slots into merged period ranges.
//!
//! Adjacent periods that share subject, class, and room collapse into one
//! row ("Math, periods 1-2, 9:00-10:40") so the rendered table stays
//! compact. Malformed rows never fail the day: they are dropped at
//! normalization or treated as non-adjacent.

use std::cmp::Ordering;

use serde_json::Value;

use crate::timetable::slot::{self, NormalizedSlot, parse_minutes, parse_period};

/// One or more contiguous slots merged into a single display row.
///
/// Start, subject, class, and room come from the first constituent slot;
/// the end time comes from the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedSlot {
    pub period: String,
    pub start: String,
    pub end: String,
    pub subject: String,
    pub class: String,
    pub room: String,
}

/// In-progress merge: the last emitted-slot-to-be plus the period labels of
/// every constituent folded into it so far.
struct Accumulator {
    slot: NormalizedSlot,
    period_labels: Vec<String>,
}

impl Accumulator {
    fn start(slot: NormalizedSlot) -> Self {
        let label = slot.period.clone();
        Self {
            slot,
            period_labels: vec![label],
        }
    }

    fn same_group(&self, next: &NormalizedSlot) -> bool {
        self.slot.subject_key == next.subject_key
            && self.slot.class_key == next.class_key
            && self.slot.room_key == next.room_key
    }

    /// Whether `next` directly follows the accumulated range: its start time
    /// equals our end time, or its period number is the last constituent's
    /// plus one. Unparsable values on either side do not touch.
    fn touches(&self, next: &NormalizedSlot) -> bool {
        if let (Some(end), Some(start)) = (parse_minutes(&self.slot.end), parse_minutes(&next.start))
            && end == start
        {
            return true;
        }
        let last_label = self.period_labels.last().map(String::as_str).unwrap_or("");
        matches!(
            (parse_period(last_label), parse_period(&next.period)),
            (Some(last), Some(n)) if n == last + 1
        )
    }

    fn absorb(&mut self, next: NormalizedSlot) {
        self.slot.end = next.end;
        if self.slot.start.is_empty() {
            self.slot.start = next.start;
        }
        self.period_labels.push(next.period);
    }

    fn finish(self) -> MergedSlot {
        MergedSlot {
            period: reduce_period_labels(&self.period_labels),
            start: self.slot.start,
            end: self.slot.end,
            subject: self.slot.subject,
            class: self.slot.class,
            room: self.slot.room,
        }
    }
}

/// Normalizes, sorts, and merges one day's raw rows.
///
/// Sorting is stable: start time in minutes first; when either side is
/// unparsable (or tied) the numeric period breaks the tie; non-numeric
/// periods compare equal and keep their received order.
pub fn coalesce_day_slots(rows: &[Value]) -> Vec<MergedSlot> {
    let mut slots: Vec<NormalizedSlot> = rows.iter().filter_map(slot::normalize).collect();
    sort_slots(&mut slots);

    let mut merged = Vec::with_capacity(slots.len());
    let mut current: Option<Accumulator> = None;
    for next in slots {
        current = Some(match current.take() {
            Some(mut acc) if acc.same_group(&next) && acc.touches(&next) => {
                acc.absorb(next);
                acc
            }
            Some(acc) => {
                merged.push(acc.finish());
                Accumulator::start(next)
            }
            None => Accumulator::start(next),
        });
    }
    if let Some(acc) = current {
        merged.push(acc.finish());
    }
    merged
}

/// Stable insertion sort over [`compare_slots`].
///
/// When only some rows carry parseable start times the pairwise comparator
/// is not a total order (timed rows compare by clock, untimed ones by
/// period), and `slice::sort_by` asserts totality. Days hold at most a
/// handful of rows, so the quadratic sort costs nothing and never panics.
fn sort_slots(slots: &mut [NormalizedSlot]) {
    for i in 1..slots.len() {
        let mut j = i;
        while j > 0 && compare_slots(&slots[j - 1], &slots[j]) == Ordering::Greater {
            slots.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn compare_slots(a: &NormalizedSlot, b: &NormalizedSlot) -> Ordering {
    if let (Some(x), Some(y)) = (parse_minutes(&a.start), parse_minutes(&b.start))
        && x != y
    {
        return x.cmp(&y);
    }
    // Indeterminate or tied start times fall through to the period number.
    match (parse_period(&a.period), parse_period(&b.period)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => Ordering::Equal,
    }
}

/// Reduces constituent period labels to one display label: a hyphenated
/// range for consecutive integers, otherwise the distinct labels joined
/// with commas.
fn reduce_period_labels(labels: &[String]) -> String {
    match labels {
        [] => "—".to_owned(),
        [single] => single.clone(),
        _ => {
            let numbers: Option<Vec<i64>> =
                labels.iter().map(|label| parse_period(label)).collect();
            if let Some(numbers) = numbers
                && numbers.windows(2).all(|pair| pair[1] == pair[0] + 1)
            {
                return format!("{}-{}", numbers[0], numbers[numbers.len() - 1]);
            }

            let mut distinct: Vec<&str> = Vec::new();
            for label in labels {
                if !distinct.contains(&label.as_str()) {
                    distinct.push(label);
                }
            }
            distinct.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(period: &str, start: &str, end: &str, subject: &str, class: &str, room: &str) -> Value {
        json!({
            "Weekday": "Mon",
            "Period": period,
            "Start": start,
            "End": end,
            "Subject": subject,
            "Class": class,
            "Room": room,
        })
    }

    #[test]
    fn merges_slots_touching_by_time() {
        let merged = coalesce_day_slots(&[
            row("1", "9:00", "9:50", "Math", "10A", "101"),
            row("2", "9:50", "10:40", "Math", "10A", "101"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].period, "1-2");
        assert_eq!(merged[0].start, "9:00");
        assert_eq!(merged[0].end, "10:40");
        assert_eq!(merged[0].subject, "Math");
    }

    #[test]
    fn merges_slots_touching_by_period_without_times() {
        let merged = coalesce_day_slots(&[
            row("3", "", "", "History", "8C", "12"),
            row("4", "", "", "History", "8C", "12"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].period, "3-4");
    }

    #[test]
    fn different_rooms_never_merge() {
        let merged = coalesce_day_slots(&[
            row("1", "9:00", "9:50", "Math", "10A", "101"),
            row("2", "9:50", "10:40", "Math", "10A", "102"),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn non_sequential_periods_stay_separate() {
        let merged = coalesce_day_slots(&[
            row("1", "", "", "Math", "10A", "101"),
            row("3", "", "", "Math", "10A", "101"),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].period, "1");
        assert_eq!(merged[1].period, "3");
    }

    #[test]
    fn sorts_by_start_time_before_merging() {
        let merged = coalesce_day_slots(&[
            row("2", "9:50", "10:40", "Math", "10A", "101"),
            row("1", "9:00", "9:50", "Math", "10A", "101"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].period, "1-2");
        assert_eq!(merged[0].start, "9:00");
    }

    #[test]
    fn unparsable_times_fall_back_to_period_order() {
        let merged = coalesce_day_slots(&[
            row("2", "later", "", "Art", "7B", "Studio"),
            row("1", "early", "", "Art", "7B", "Studio"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].period, "1-2");
    }

    #[test]
    fn mixed_period_labels_are_never_adjacent() {
        // "1A" is unparsable: neither the period rule nor the (absent) time
        // rule can prove adjacency.
        let merged = coalesce_day_slots(&[
            row("1A", "", "", "Chem", "11A", "Lab"),
            row("2A", "", "", "Chem", "11A", "Lab"),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn three_way_merge_spans_first_to_last() {
        let merged = coalesce_day_slots(&[
            row("1", "8:00", "8:45", "PE", "6A", "Gym"),
            row("2", "8:45", "9:30", "PE", "6A", "Gym"),
            row("3", "9:30", "10:15", "PE", "6A", "Gym"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].period, "1-3");
        assert_eq!(merged[0].start, "8:00");
        assert_eq!(merged[0].end, "10:15");
    }

    #[test]
    fn adopts_start_time_from_later_constituent_when_missing() {
        let merged = coalesce_day_slots(&[
            row("1", "", "", "Music", "5A", "Hall"),
            row("2", "9:00", "9:45", "Music", "5A", "Hall"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].start, "9:00");
        assert_eq!(merged[0].end, "9:45");
    }

    #[test]
    fn non_numeric_labels_join_with_commas() {
        // Touching by time, so they merge, but "2B" blocks the range form.
        let merged = coalesce_day_slots(&[
            row("1", "9:00", "9:50", "Bio", "9C", "Lab"),
            row("2B", "9:50", "10:40", "Bio", "9C", "Lab"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].period, "1, 2B");
    }

    #[test]
    fn mixed_timed_and_untimed_rows_never_panic() {
        // Timed rows order by clock while untimed ones order by period, so
        // pairwise comparisons can cycle: timed(9:00, p1) < untimed(p2) <
        // timed(8:00, p3), yet the two timed rows compare the other way.
        // A large alternating day must still coalesce rather than abort.
        let mut rows = Vec::new();
        for i in 0..500i64 {
            let minutes = 500 - i; // descending clock, ascending periods
            rows.push(row(
                &(2 * i + 1).to_string(),
                &format!("{}:{:02}", 8 + minutes / 60, minutes % 60),
                "",
                "Math",
                "10A",
                "101",
            ));
            rows.push(row(&(2 * i + 2).to_string(), "", "", "Math", "10A", "101"));
        }
        let merged = coalesce_day_slots(&rows);
        assert!(!merged.is_empty());
    }

    #[test]
    fn untimed_row_between_timed_rows_keeps_all_three() {
        let merged = coalesce_day_slots(&[
            row("1", "9:00", "9:50", "Math", "10A", "101"),
            row("5", "", "", "History", "8C", "12"),
            row("2", "8:00", "8:45", "English", "7B", "3"),
        ]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn drops_malformed_rows_silently() {
        let merged = coalesce_day_slots(&[
            Value::Null,
            json!("not a row"),
            row("1", "9:00", "9:50", "Math", "10A", "101"),
        ]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(coalesce_day_slots(&[]).is_empty());
    }
}
