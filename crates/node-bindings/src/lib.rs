#![deny(clippy::all)]

use coursegrid_engine::event as engine;
use coursegrid_engine::model::ScheduleItem;
use coursegrid_engine::normalizer;
use coursegrid_engine::request::ValidateRequest;
use napi_derive::napi;

// ---------------------------------------------------------------------------
// Mirror types
// ---------------------------------------------------------------------------

/// A calendar block as held by the front end.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct Event {
    /// Generated when omitted.
    pub id: Option<String>,
    pub course_name: String,
    pub day: i64,
    pub start_time: String,
    pub end_time: String,
    pub professor: Option<String>,
    pub room: Option<String>,
    pub credits: Option<f64>,
}

impl From<Event> for engine::Event {
    fn from(v: Event) -> Self {
        engine::Event {
            id: v.id.unwrap_or_else(engine::generate_event_id),
            course_name: v.course_name,
            day: v.day,
            start_time: v.start_time,
            end_time: v.end_time,
            professor: v.professor,
            room: v.room,
            credits: v.credits.unwrap_or(0.0),
        }
    }
}

impl From<engine::Event> for Event {
    fn from(v: engine::Event) -> Self {
        Event {
            id: Some(v.id),
            course_name: v.course_name,
            day: v.day,
            start_time: v.start_time,
            end_time: v.end_time,
            professor: v.professor,
            room: v.room,
            credits: Some(v.credits),
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct Meeting {
    pub day: i64,
    pub start: u32,
    pub end: u32,
    pub id: Option<String>,
}

impl From<engine::Meeting> for Meeting {
    fn from(v: engine::Meeting) -> Self {
        Meeting {
            day: v.day,
            start: v.start,
            end: v.end,
            id: v.owner_id,
        }
    }
}

#[napi(object)]
#[derive(Debug, Clone)]
pub struct Conflict {
    pub first: u32,
    pub second: u32,
    pub first_id: String,
    pub second_id: String,
}

impl TryFrom<engine::Conflict> for Conflict {
    type Error = napi::Error;

    fn try_from(v: engine::Conflict) -> napi::Result<Self> {
        let (first, second) = v
            .indices::<u32>()
            .map_err(|e| napi::Error::from_reason(e.to_string()))?;
        Ok(Conflict {
            first,
            second,
            first_id: v.first_id,
            second_id: v.second_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Exported functions
// ---------------------------------------------------------------------------

/// Validate a schedule. Takes the request body as JSON text
/// (`{ items, creditMin?, creditMax?, creditCap?, overlapScan? }`) and returns
/// the validation result as JSON text. Malformed bodies throw.
#[napi]
pub fn validate_schedule(request_json: String) -> napi::Result<String> {
    let request = ValidateRequest::from_json(&request_json)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_string(&request.validate()).map_err(|e| napi::Error::from_reason(e.to_string()))
}

/// Flatten one schedule item (as JSON text) into its weekly meetings.
#[napi]
pub fn normalize_meetings(item_json: String) -> napi::Result<Vec<Meeting>> {
    let item: ScheduleItem =
        serde_json::from_str(&item_json).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    Ok(normalizer::normalize_meetings(&item)
        .into_iter()
        .map(Meeting::from)
        .collect())
}

#[napi]
pub fn events_overlap(a: Event, b: Event) -> bool {
    engine::Event::from(a).overlaps_with(&engine::Event::from(b))
}

/// Every overlapping pair of calendar events, by index.
#[napi]
pub fn find_conflicts(events: Vec<Event>) -> napi::Result<Vec<Conflict>> {
    let events: Vec<engine::Event> = events.into_iter().map(Into::into).collect();
    engine::find_conflicts(&events)
        .into_iter()
        .map(Conflict::try_from)
        .collect()
}

/// Fill in a missing id and return the event as the engine sees it.
#[napi]
pub fn create_event(event: Event) -> Event {
    Event::from(engine::Event::from(event))
}

/// Minutes since midnight, or `null` for a malformed time.
#[napi]
pub fn time_to_minutes(time: String) -> Option<u32> {
    coursegrid_engine::clock::time_to_minutes(&time).ok()
}
