use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::time_to_minutes;

// ---------------------------------------------------------------------------
// Meeting
// ---------------------------------------------------------------------------

/// One weekly recurring interval on a single day, in minutes since midnight.
///
/// `start < end` is expected but not enforced: reversed or zero-length
/// intervals are carried as given and simply never intersect anything that
/// a well-formed interval would.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub day: i64,
    pub start: u32,
    pub end: u32,
    /// Identity of the schedule item this meeting was derived from.
    #[serde(rename = "id")]
    pub owner_id: Option<String>,
}

impl Meeting {
    /// Half-open intersection on the same day. Touching intervals
    /// (`a.end == b.start`) do not overlap.
    pub fn overlaps_with(&self, other: &Meeting) -> bool {
        self.day == other.day && intervals_overlap(self.start, self.end, other.start, other.end)
    }
}

/// `[a_start, a_end)` intersects `[b_start, b_end)`.
pub fn intervals_overlap(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> bool {
    a_start < b_end && a_end > b_start
}

// ---------------------------------------------------------------------------
// Event (calendar-facing)
// ---------------------------------------------------------------------------

/// A course block as held by the calendar grid.
///
/// Structurally the same as a flat schedule item, so a serialized `Event`
/// can be fed straight back into the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default = "generate_event_id")]
    pub id: String,
    pub course_name: String,
    pub day: i64,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub professor: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub credits: f64,
}

/// Build an id from the current time (base 36 millis) plus a random suffix.
pub fn generate_event_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("{}-{}", to_base36(millis), suffix)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

impl Event {
    pub fn new(
        course_name: impl Into<String>,
        day: i64,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Event {
            id: generate_event_id(),
            course_name: course_name.into(),
            day,
            start_time: start_time.into(),
            end_time: end_time.into(),
            professor: None,
            room: None,
            credits: 0.0,
        }
    }

    pub fn start_minutes(&self) -> Option<u32> {
        time_to_minutes(&self.start_time).ok()
    }

    pub fn end_minutes(&self) -> Option<u32> {
        time_to_minutes(&self.end_time).ok()
    }

    /// `None` when either time fails to parse.
    pub fn duration_minutes(&self) -> Option<i64> {
        Some(i64::from(self.end_minutes()?) - i64::from(self.start_minutes()?))
    }

    /// Same day and half-open interval intersection. An event with a
    /// malformed time overlaps nothing.
    pub fn overlaps_with(&self, other: &Event) -> bool {
        match (self.to_meeting(), other.to_meeting()) {
            (Some(a), Some(b)) => a.overlaps_with(&b),
            _ => false,
        }
    }

    pub fn to_meeting(&self) -> Option<Meeting> {
        Some(Meeting {
            day: self.day,
            start: self.start_minutes()?,
            end: self.end_minutes()?,
            owner_id: Some(self.id.clone()),
        })
    }
}

// ---------------------------------------------------------------------------
// Pairwise conflicts for the calendar grid
// ---------------------------------------------------------------------------

/// Two events on the calendar that overlap. `first < second` always.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub first: usize,
    pub second: usize,
    pub first_id: String,
    pub second_id: String,
}

impl Conflict {
    /// Both indices converted to a narrower integer type, failing rather
    /// than truncating.
    pub fn indices<T: TryFrom<usize>>(&self) -> Result<(T, T), T::Error> {
        Ok((T::try_from(self.first)?, T::try_from(self.second)?))
    }
}

/// Every overlapping pair of events, in index order.
pub fn find_conflicts(events: &[Event]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for (i, a) in events.iter().enumerate() {
        for (j, b) in events.iter().enumerate().skip(i + 1) {
            if a.overlaps_with(b) {
                conflicts.push(Conflict {
                    first: i,
                    second: j,
                    first_id: a.id.clone(),
                    second_id: b.id.clone(),
                });
            }
        }
    }
    conflicts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn event(id: &str, day: i64, start: &str, end: &str) -> Event {
        Event {
            id: id.to_string(),
            ..Event::new(id, day, start, end)
        }
    }

    #[test]
    fn test_overlap_half_open() {
        let a = event("a", 0, "09:00", "10:00");
        let b = event("b", 0, "09:30", "10:30");
        let c = event("c", 0, "10:00", "11:00");
        assert!(a.overlaps_with(&b));
        assert!(b.overlaps_with(&c));
        assert!(!a.overlaps_with(&c), "touching blocks must not overlap");
    }

    #[test]
    fn test_overlap_requires_same_day() {
        let a = event("a", 0, "09:00", "10:00");
        let b = event("b", 1, "09:00", "10:00");
        assert!(!a.overlaps_with(&b));
    }

    #[test]
    fn test_malformed_time_overlaps_nothing() {
        let a = event("a", 2, "9am", "10:00");
        let b = event("b", 2, "09:00", "10:00");
        assert!(!a.overlaps_with(&b));
        assert!(!b.overlaps_with(&a));
        assert_eq!(a.duration_minutes(), None);
    }

    #[test]
    fn test_derived_minutes() {
        let e = event("e", 3, "13:15", "14:45");
        assert_eq!(e.start_minutes(), Some(795));
        assert_eq!(e.end_minutes(), Some(885));
        assert_eq!(e.duration_minutes(), Some(90));
        let m = e.to_meeting().unwrap();
        assert_eq!(m.owner_id.as_deref(), Some("e"));
        assert_eq!((m.start, m.end), (795, 885));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = generate_event_id();
        let b = generate_event_id();
        assert_ne!(a, b);
        let (stamp, suffix) = a.split_once('-').unwrap();
        assert!(stamp.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(suffix.len(), 8);
    }

    #[test]
    fn test_event_deserialize_fills_id() {
        let e: Event = serde_json::from_str(
            r#"{"courseName":"CS 101","day":1,"startTime":"09:00","endTime":"09:50"}"#,
        )
        .unwrap();
        assert!(!e.id.is_empty());
        assert_eq!(e.credits, 0.0);
        assert_eq!(e.professor, None);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_find_conflicts_pairwise() {
        // A covers both B and C; B and C are disjoint.
        let events = vec![
            event("a", 0, "08:00", "12:00"),
            event("b", 0, "08:30", "09:00"),
            event("c", 0, "10:00", "11:00"),
            event("d", 1, "08:00", "12:00"),
        ];
        let conflicts = find_conflicts(&events);
        let pairs: Vec<(usize, usize)> = conflicts.iter().map(|c| (c.first, c.second)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2)]);
        assert_eq!(conflicts[1].second_id, "c");
    }

    #[test]
    fn test_conflict_indices_do_not_truncate() {
        let conflict = Conflict {
            first: 3,
            second: 300,
            first_id: "a".to_string(),
            second_id: "b".to_string(),
        };
        assert_eq!(conflict.indices::<u32>(), Ok((3, 300)));
        assert!(conflict.indices::<u8>().is_err());
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            d1 in 0i64..3, s1 in 0u32..1440, e1 in 0u32..1440,
            d2 in 0i64..3, s2 in 0u32..1440, e2 in 0u32..1440,
        ) {
            let a = Meeting { day: d1, start: s1, end: e1, owner_id: None };
            let b = Meeting { day: d2, start: s2, end: e2, owner_id: None };
            prop_assert_eq!(a.overlaps_with(&b), b.overlaps_with(&a));
        }
    }
}
