use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use coursegrid_engine::event::{find_conflicts, Event};
use coursegrid_engine::model::ScheduleItem;
use coursegrid_engine::normalizer::normalize_meetings;
use coursegrid_engine::request::ValidateRequest;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
enum Request {
    /// Body: `items`, `creditMin?`, `creditMax?`, `creditCap?`, `overlapScan?`.
    Validate(Value),
    Normalize {
        item: ScheduleItem,
    },
    Conflicts {
        events: Vec<Event>,
    },
}

#[derive(Debug, Serialize)]
struct OkResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ErrResponse {
    ok: bool,
    error: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_ok<T: Serialize>(data: T) {
    let resp = OkResponse { ok: true, data };
    let json = serde_json::to_string(&resp).unwrap_or_else(|e| {
        format!("{{\"ok\":false,\"error\":\"serialization error: {}\"}}", e)
    });
    println!("{}", json);
    let _ = io::stdout().flush();
}

fn write_err(msg: impl std::fmt::Display) -> ! {
    warn!(error = %msg, "request failed");
    let resp = ErrResponse {
        ok: false,
        error: msg.to_string(),
    };
    let json = serde_json::to_string(&resp).unwrap_or_else(|_| {
        "{\"ok\":false,\"error\":\"double serialization error\"}".to_string()
    });
    println!("{}", json);
    let _ = io::stdout().flush();
    std::process::exit(1);
}

/// Logs go to stderr; stdout carries the response only.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    init_logging();

    // Read all of stdin
    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        write_err(format!("Failed to read stdin: {}", e));
    }

    // Parse request
    let request: Request = match serde_json::from_str(&input) {
        Ok(r) => r,
        Err(e) => write_err(format!("Invalid JSON input: {}", e)),
    };

    match request {
        Request::Validate(body) => match ValidateRequest::from_value(&body) {
            Ok(req) => {
                debug!(items = req.items.len(), "validate");
                write_ok(req.validate());
            }
            Err(e) => write_err(e),
        },
        Request::Normalize { item } => {
            debug!(id = ?item.id, label = ?item.label(), "normalize");
            write_ok(normalize_meetings(&item));
        }
        Request::Conflicts { events } => {
            debug!(events = events.len(), "conflicts");
            write_ok(find_conflicts(&events));
        }
    }
}
