pub mod clock;
pub mod event;
pub mod model;
pub mod normalizer;
pub mod request;
pub mod validator;

pub use clock::{time_to_minutes, ClockTime, TimeParseError, Weekday};
pub use event::{find_conflicts, Conflict, Event, Meeting};
pub use model::{MeetingSource, ScheduleItem};
pub use normalizer::normalize_meetings;
pub use request::{RequestError, ValidateRequest};
pub use validator::{validate_schedule, OverlapScan, ValidationOptions, ValidationResult};
