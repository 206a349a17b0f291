use serde::{Deserialize, Serialize};
use serde_json::Value;

// Body sent by the page tracker. Both fields are optional; a missing path
// is recorded as an empty one.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TrackRequest {
    pub path: Option<String>,
    pub referer: Option<String>,
}

impl TrackRequest {
    /// Read the tracker fields from a JSON object. Fields that are not
    /// strings count as absent; only a non-object body is rejected.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            path: text("path"),
            referer: text("referer"),
        })
    }
}

// Acknowledgement for the tracking endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackResponse {
    pub success: bool,
}

// Error body for the data endpoint. Never carries internal detail.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
