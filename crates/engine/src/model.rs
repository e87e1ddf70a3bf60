use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Meeting-bearing shapes
// ---------------------------------------------------------------------------

/// One entry of an explicit `meetings` list. Entries missing a day or a time
/// are kept here and skipped during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingEntry {
    pub day: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// A catalog section with compact day and time strings, e.g.
/// `days: "Mon/Wed/Fri"`, `time: "09:00-09:50"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub days: Option<String>,
    pub time: Option<String>,
}

/// Where a schedule item's weekly meetings come from.
///
/// When building from loosely shaped input the variants are tried in this
/// order and the first match wins, so an item carrying a day and both times
/// is a `FlatEvent` even if it also has `meetings` or `sections`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MeetingSource {
    /// A single block: `day` + `startTime` + `endTime` on the item itself.
    FlatEvent {
        day: i64,
        start_time: String,
        end_time: String,
    },
    /// An explicit list of meeting sub-records.
    Meetings(Vec<MeetingEntry>),
    /// A list of sections with compact day/time strings.
    Sections(Vec<Section>),
    /// Nothing recognizable; contributes no meetings.
    #[default]
    Unscheduled,
}

// ---------------------------------------------------------------------------
// Schedule item
// ---------------------------------------------------------------------------

/// Which field family a duplicate key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DedupBy {
    #[serde(rename = "code")]
    Code,
    #[serde(rename = "courseName")]
    CourseName,
}

/// A course, section or planner event submitted for validation.
///
/// Deserializes from any JSON value without failing: unknown or mistyped
/// fields are treated as absent and `credits` falls back to 0.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ScheduleItem {
    pub id: Option<String>,
    pub code: Option<String>,
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub credits: f64,
    pub source: MeetingSource,
}

impl ScheduleItem {
    /// Display label: first non-empty of `courseName`, `code`, `title`.
    pub fn label(&self) -> Option<&str> {
        first_of(&[&self.course_name, &self.code, &self.title])
    }

    /// Key used for duplicate detection: the course code when present,
    /// otherwise the course name / title / name.
    pub fn dedup_key(&self) -> Option<(DedupBy, &str)> {
        if let Some(code) = first_of(&[&self.code, &self.course_code]) {
            return Some((DedupBy::Code, code));
        }
        first_of(&[&self.course_name, &self.title, &self.name]).map(|n| (DedupBy::CourseName, n))
    }
}

fn first_of<'a>(fields: &[&'a Option<String>]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|f| f.as_deref())
        .find(|s| !s.is_empty())
}

impl From<Value> for ScheduleItem {
    fn from(v: Value) -> Self {
        ScheduleItem::from(&v)
    }
}

impl From<&Value> for ScheduleItem {
    fn from(v: &Value) -> Self {
        ScheduleItem {
            id: v.get("id").and_then(id_value),
            code: v.get("code").and_then(text),
            course_code: v.get("courseCode").and_then(text),
            course_name: v.get("courseName").and_then(text),
            title: v.get("title").and_then(text),
            name: v.get("name").and_then(text),
            credits: v.get("credits").and_then(coerce_number).unwrap_or(0.0),
            source: meeting_source(v),
        }
    }
}

fn meeting_source(v: &Value) -> MeetingSource {
    if let (Some(day), Some(start_time), Some(end_time)) = (
        v.get("day").and_then(integer),
        v.get("startTime").and_then(text),
        v.get("endTime").and_then(text),
    ) {
        return MeetingSource::FlatEvent {
            day,
            start_time,
            end_time,
        };
    }

    if let Some(Value::Array(meetings)) = v.get("meetings") {
        return MeetingSource::Meetings(
            meetings
                .iter()
                .map(|m| MeetingEntry {
                    day: m.get("day").and_then(integer),
                    start_time: m.get("startTime").and_then(text),
                    end_time: m.get("endTime").and_then(text),
                })
                .collect(),
        );
    }

    if let Some(Value::Array(sections)) = v.get("sections") {
        return MeetingSource::Sections(
            sections
                .iter()
                .map(|s| Section {
                    days: s.get("days").and_then(text),
                    time: s.get("time").and_then(text),
                })
                .collect(),
        );
    }

    MeetingSource::Unscheduled
}

// ---------------------------------------------------------------------------
// Lenient field readers
// ---------------------------------------------------------------------------

/// A non-empty string field.
fn text(v: &Value) -> Option<String> {
    v.as_str().filter(|s| !s.is_empty()).map(str::to_string)
}

/// Ids may arrive as strings or numbers.
fn id_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// An integral JSON number (`2` or `2.0`).
fn integer(v: &Value) -> Option<i64> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    v.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

/// Numeric coercion for credit counts and bounds: numbers as-is, numeric
/// strings parsed, booleans as 1/0. Anything else, or a non-finite result,
/// is `None`.
pub fn coerce_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    n.is_finite().then_some(n)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_event_wins_over_other_shapes() {
        let item = ScheduleItem::from(json!({
            "id": "x",
            "day": 2,
            "startTime": "09:00",
            "endTime": "10:00",
            "meetings": [{ "day": 0, "startTime": "08:00", "endTime": "09:00" }],
            "sections": [{ "days": "Mon", "time": "08:00-09:00" }]
        }));
        assert_eq!(
            item.source,
            MeetingSource::FlatEvent {
                day: 2,
                start_time: "09:00".to_string(),
                end_time: "10:00".to_string(),
            }
        );
    }

    #[test]
    fn test_partial_flat_event_falls_through_to_meetings() {
        let item = ScheduleItem::from(json!({
            "day": 2,
            "startTime": "09:00",
            "meetings": [{ "day": 1.0, "startTime": "08:00", "endTime": "09:00" }]
        }));
        assert_eq!(
            item.source,
            MeetingSource::Meetings(vec![MeetingEntry {
                day: Some(1),
                start_time: Some("08:00".to_string()),
                end_time: Some("09:00".to_string()),
            }])
        );
    }

    #[test]
    fn test_non_integer_day_is_not_a_flat_event() {
        let item = ScheduleItem::from(json!({
            "day": "1", "startTime": "09:00", "endTime": "10:00"
        }));
        assert_eq!(item.source, MeetingSource::Unscheduled);
        let item = ScheduleItem::from(json!({
            "day": 1.5, "startTime": "09:00", "endTime": "10:00"
        }));
        assert_eq!(item.source, MeetingSource::Unscheduled);
    }

    #[test]
    fn test_meetings_win_over_sections() {
        let item = ScheduleItem::from(json!({
            "id": "x",
            "meetings": [{ "day": 0, "startTime": "08:00", "endTime": "09:00" }],
            "sections": [{ "days": "Tue", "time": "08:00-09:00" }]
        }));
        assert_eq!(
            item.source,
            MeetingSource::Meetings(vec![MeetingEntry {
                day: Some(0),
                start_time: Some("08:00".to_string()),
                end_time: Some("09:00".to_string()),
            }])
        );
    }

    #[test]
    fn test_sections_shape() {
        let item = ScheduleItem::from(json!({
            "sections": [{ "days": "Tue/Thu", "time": "13:00-14:15" }, "junk"]
        }));
        match item.source {
            MeetingSource::Sections(s) => {
                assert_eq!(s.len(), 2);
                assert_eq!(s[0].days.as_deref(), Some("Tue/Thu"));
                assert_eq!(s[1], Section::default());
            }
            other => panic!("expected sections, got {:?}", other),
        }
    }

    #[test]
    fn test_credit_coercion() {
        let credits = |v: Value| ScheduleItem::from(json!({ "credits": v })).credits;
        assert_eq!(credits(json!(4)), 4.0);
        assert_eq!(credits(json!(3.5)), 3.5);
        assert_eq!(credits(json!(" 3 ")), 3.0);
        assert_eq!(credits(json!("three")), 0.0);
        assert_eq!(credits(json!("")), 0.0);
        assert_eq!(credits(json!(null)), 0.0);
        assert_eq!(credits(json!(true)), 1.0);
        assert_eq!(credits(json!([3])), 0.0);
        assert_eq!(credits(json!("NaN")), 0.0);
        assert_eq!(ScheduleItem::from(json!({})).credits, 0.0);
    }

    #[test]
    fn test_non_object_item_is_empty() {
        let item = ScheduleItem::from(json!(42));
        assert_eq!(item, ScheduleItem::default());
    }

    #[test]
    fn test_numeric_id() {
        let item = ScheduleItem::from(json!({ "id": 17 }));
        assert_eq!(item.id.as_deref(), Some("17"));
    }

    #[test]
    fn test_label_and_dedup_key() {
        let item = ScheduleItem::from(json!({
            "courseName": "", "code": "CS 101", "title": "Intro"
        }));
        assert_eq!(item.label(), Some("CS 101"));
        assert_eq!(item.dedup_key(), Some((DedupBy::Code, "CS 101")));

        let item = ScheduleItem::from(json!({ "courseCode": "MATH 20A", "courseName": "Calc" }));
        assert_eq!(item.dedup_key(), Some((DedupBy::Code, "MATH 20A")));

        let item = ScheduleItem::from(json!({ "name": "Gym" }));
        assert_eq!(item.dedup_key(), Some((DedupBy::CourseName, "Gym")));
        assert_eq!(item.label(), None);

        assert_eq!(ScheduleItem::from(json!({})).dedup_key(), None);
    }

    #[test]
    fn test_deserialize_vec() {
        let items: Vec<ScheduleItem> =
            serde_json::from_str(r#"[{"code":"A","credits":"4"}, 7, null]"#).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].credits, 4.0);
        assert_eq!(items[1], ScheduleItem::default());
    }
}
