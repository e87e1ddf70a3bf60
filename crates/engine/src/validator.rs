use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::event::{intervals_overlap, Meeting};
use crate::model::{coerce_number, DedupBy, ScheduleItem};
use crate::normalizer::normalize_meetings;

pub const DEFAULT_CREDIT_MIN: f64 = 12.0;
pub const DEFAULT_CREDIT_MAX: f64 = 20.0;

pub const DUPLICATE_WARNING: &str = "Duplicate course detected";
pub const OVERLAP_WARNING: &str = "Time overlaps detected";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How meetings within one day are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapScan {
    /// Sort by start and compare each meeting with its immediate predecessor
    /// only. Overlaps between meetings that are not adjacent in that order
    /// are not reported.
    #[default]
    Adjacent,
    /// Compare every pair of meetings in the day.
    Pairwise,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationOptions {
    /// Warn when the total is strictly below this.
    pub credit_min: f64,
    /// Warn when the total is strictly above this.
    pub credit_max: f64,
    pub overlap_scan: OverlapScan,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            credit_min: DEFAULT_CREDIT_MIN,
            credit_max: DEFAULT_CREDIT_MAX,
            overlap_scan: OverlapScan::Adjacent,
        }
    }
}

/// Legacy form: a bare number is the credit cap.
impl From<f64> for ValidationOptions {
    fn from(credit_max: f64) -> Self {
        ValidationOptions {
            credit_max,
            ..ValidationOptions::default()
        }
    }
}

/// Either a bare number (legacy credit cap) or an object with optional
/// `creditMin`, `creditMax` and `overlapScan`. Unusable values keep their
/// defaults.
impl From<&Value> for ValidationOptions {
    fn from(v: &Value) -> Self {
        let defaults = ValidationOptions::default();
        if let Value::Number(_) = v {
            return coerce_number(v).map(ValidationOptions::from).unwrap_or(defaults);
        }
        ValidationOptions {
            credit_min: v
                .get("creditMin")
                .and_then(coerce_number)
                .unwrap_or(defaults.credit_min),
            credit_max: v
                .get("creditMax")
                .and_then(coerce_number)
                .unwrap_or(defaults.credit_max),
            overlap_scan: v
                .get("overlapScan")
                .and_then(|s| OverlapScan::deserialize(s).ok())
                .unwrap_or(defaults.overlap_scan),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation result types
// ---------------------------------------------------------------------------

/// A later item whose key was already taken by an earlier one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateRecord {
    pub by: DedupBy,
    pub key: String,
    pub first_id: Option<String>,
    pub second_id: Option<String>,
}

/// `a` sorts before `b` within `day`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapRecord {
    pub day: i64,
    pub a: Meeting,
    pub b: Meeting,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDetails {
    pub duplicates: Vec<DuplicateRecord>,
    pub overlaps: Vec<OverlapRecord>,
    #[serde(serialize_with = "serialize_credits")]
    pub credit_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub warnings: Vec<String>,
    pub details: ValidationDetails,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Whole credit totals are written as integers (`7`, not `7.0`).
fn serialize_credits<S: Serializer>(total: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if total.fract() == 0.0 && total.abs() < 1e15 {
        serializer.serialize_i64(*total as i64)
    } else {
        serializer.serialize_f64(*total)
    }
}

// ---------------------------------------------------------------------------
// Validate implementation
// ---------------------------------------------------------------------------

/// Check a schedule for duplicate courses, credit load and time overlaps.
///
/// Never fails: malformed fields are defaulted or skipped. Warnings appear
/// in a fixed order: duplicates, credit minimum, credit cap, overlaps.
pub fn validate_schedule(
    items: &[ScheduleItem],
    options: impl Into<ValidationOptions>,
) -> ValidationResult {
    let options = options.into();
    let mut warnings: Vec<String> = Vec::new();

    // -----------------------------------------------------------------------
    // Credits and duplicates
    // -----------------------------------------------------------------------
    let mut credit_total = 0.0;
    let mut duplicates: Vec<DuplicateRecord> = Vec::new();
    {
        let mut by_code: HashMap<&str, Option<&str>> = HashMap::new();
        let mut by_name: HashMap<&str, Option<&str>> = HashMap::new();

        for item in items {
            credit_total += item.credits;

            let Some((by, key)) = item.dedup_key() else {
                continue;
            };
            let seen = match by {
                DedupBy::Code => &mut by_code,
                DedupBy::CourseName => &mut by_name,
            };
            match seen.entry(key) {
                Entry::Occupied(first) => duplicates.push(DuplicateRecord {
                    by,
                    key: key.to_string(),
                    first_id: first.get().map(str::to_string),
                    second_id: item.id.clone(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(item.id.as_deref());
                }
            }
        }
    }

    if !duplicates.is_empty() {
        warnings.push(DUPLICATE_WARNING.to_string());
    }

    // -----------------------------------------------------------------------
    // Credit bounds
    // -----------------------------------------------------------------------
    if credit_total < options.credit_min {
        warnings.push(format!(
            "Credit minimum not met (total {}, min {})",
            credit_total, options.credit_min
        ));
    }
    if credit_total > options.credit_max {
        warnings.push(format!(
            "Credit cap exceeded (total {}, cap {})",
            credit_total, options.credit_max
        ));
    }

    // -----------------------------------------------------------------------
    // Overlaps
    // -----------------------------------------------------------------------
    let mut by_day: BTreeMap<i64, Vec<Meeting>> = BTreeMap::new();
    for meeting in items.iter().flat_map(normalize_meetings) {
        by_day.entry(meeting.day).or_default().push(meeting);
    }

    let mut overlaps: Vec<OverlapRecord> = Vec::new();
    for (day, meetings) in &mut by_day {
        // Stable: equal starts keep input order.
        meetings.sort_by_key(|m| m.start);
        debug!(day = *day, meetings = meetings.len(), "scanning day for overlaps");
        match options.overlap_scan {
            OverlapScan::Adjacent => {
                for pair in meetings.windows(2) {
                    let (prev, cur) = (&pair[0], &pair[1]);
                    if cur.start < prev.end {
                        overlaps.push(OverlapRecord {
                            day: *day,
                            a: prev.clone(),
                            b: cur.clone(),
                        });
                    }
                }
            }
            OverlapScan::Pairwise => {
                for (i, a) in meetings.iter().enumerate() {
                    for b in &meetings[i + 1..] {
                        if intervals_overlap(a.start, a.end, b.start, b.end) {
                            overlaps.push(OverlapRecord {
                                day: *day,
                                a: a.clone(),
                                b: b.clone(),
                            });
                        }
                    }
                }
            }
        }
    }

    if !overlaps.is_empty() {
        warnings.push(OVERLAP_WARNING.to_string());
    }

    debug!(
        items = items.len(),
        credit_total,
        duplicates = duplicates.len(),
        overlaps = overlaps.len(),
        "validated schedule"
    );

    ValidationResult {
        ok: warnings.is_empty(),
        warnings,
        details: ValidationDetails {
            duplicates,
            overlaps,
            credit_total,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
