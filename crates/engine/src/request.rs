use serde_json::Value;

use crate::model::{coerce_number, ScheduleItem};
use crate::validator::{validate_schedule, ValidationOptions, ValidationResult};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// The request could not be turned into a validation call at all. Callers
/// report these as client errors.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid JSON input: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("'items' must be an array")]
    ItemsNotArray,
}

// ---------------------------------------------------------------------------
// Validate request
// ---------------------------------------------------------------------------

/// A validation call decoded from a request body of the form
/// `{ items: [...], creditMin?, creditMax?, creditCap?, overlapScan? }`.
///
/// `creditCap` is the old name for `creditMax` and is only read when
/// `creditMax` is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidateRequest {
    pub items: Vec<ScheduleItem>,
    pub options: ValidationOptions,
}

impl ValidateRequest {
    pub fn from_json(body: &str) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(&value)
    }

    pub fn from_value(body: &Value) -> Result<Self, RequestError> {
        if !body.is_object() {
            return Err(RequestError::NotAnObject);
        }
        let items = match body.get("items") {
            Some(Value::Array(items)) => items.iter().map(ScheduleItem::from).collect(),
            _ => return Err(RequestError::ItemsNotArray),
        };

        let mut options = ValidationOptions::from(body);
        let has_max = body.get("creditMax").is_some_and(|v| !v.is_null());
        if !has_max {
            if let Some(cap) = body.get("creditCap").and_then(coerce_number) {
                options.credit_max = cap;
            }
        }

        Ok(ValidateRequest { items, options })
    }

    pub fn validate(&self) -> ValidationResult {
        validate_schedule(&self.items, self.options)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
