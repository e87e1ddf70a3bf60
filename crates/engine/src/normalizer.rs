use tracing::trace;

use crate::clock::{time_to_minutes, Weekday};
use crate::event::Meeting;
use crate::model::{MeetingSource, ScheduleItem};

/// Flatten a schedule item into its weekly meetings.
///
/// Every meeting is tagged with the item's own id, including those coming
/// from sub-meetings or sections. Meetings whose times fail to parse are
/// dropped; unrecognized day abbreviations in section strings are dropped.
pub fn normalize_meetings(item: &ScheduleItem) -> Vec<Meeting> {
    let owner = item.id.as_deref();
    match &item.source {
        MeetingSource::FlatEvent {
            day,
            start_time,
            end_time,
        } => meeting(owner, *day, start_time, end_time).into_iter().collect(),
        MeetingSource::Meetings(entries) => entries
            .iter()
            .filter_map(|m| match (m.day, &m.start_time, &m.end_time) {
                (Some(day), Some(start), Some(end)) => meeting(owner, day, start, end),
                _ => None,
            })
            .collect(),
        MeetingSource::Sections(sections) => {
            let mut out = Vec::new();
            for section in sections {
                let (Some(days), Some(time)) = (&section.days, &section.time) else {
                    continue;
                };
                let Some((start, end)) = parse_section_time(time) else {
                    trace!(owner = ?owner, time = time.as_str(), "dropping section with unparseable time");
                    continue;
                };
                out.extend(parse_section_days(days).into_iter().map(|day| Meeting {
                    day: day.index(),
                    start,
                    end,
                    owner_id: owner.map(str::to_string),
                }));
            }
            out
        }
        MeetingSource::Unscheduled => Vec::new(),
    }
}

fn meeting(owner: Option<&str>, day: i64, start: &str, end: &str) -> Option<Meeting> {
    match (time_to_minutes(start), time_to_minutes(end)) {
        (Ok(start), Ok(end)) => Some(Meeting {
            day,
            start,
            end,
            owner_id: owner.map(str::to_string),
        }),
        (Err(e), _) | (_, Err(e)) => {
            trace!(owner = ?owner, error = %e, "dropping meeting with unparseable time");
            None
        }
    }
}

/// Parse a slash-delimited day list such as `"Mon/Wed/Fri"`. Tokens are
/// trimmed; anything that is not a three-letter abbreviation is skipped.
pub fn parse_section_days(days: &str) -> Vec<Weekday> {
    days.split('/')
        .filter_map(|d| Weekday::from_abbrev(d.trim()))
        .collect()
}

/// Parse `"<start>-<end>"` into minute offsets.
pub fn parse_section_time(time: &str) -> Option<(u32, u32)> {
    let (start, end) = time.split_once('-')?;
    let start = time_to_minutes(start.trim()).ok()?;
    let end = time_to_minutes(end.trim()).ok()?;
    Some((start, end))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
