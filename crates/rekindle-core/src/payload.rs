//! Fire-time job payload — what the job runner stores at registration time
//! and hands back when a job fires.
//!
//! Encoded with named tags (`"english"`, `"miss_you"`) rather than raw enum
//! ordinals, so reordering a variant set can never silently corrupt persisted
//! jobs. Decoding still accepts legacy integer ordinals for rows written by
//! older versions, validating that the ordinal is in range.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{RekindleError, Result};
use crate::types::{Language, MessageIntent};

pub const KEY_PHONE: &str = "phone";
pub const KEY_LANGUAGE: &str = "language";
pub const KEY_INTENT: &str = "intent";

/// The minimal data needed to regenerate content at fire time. Deliberately
/// not the full [`crate::ScheduleSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPayload {
    pub phone: String,
    pub language: Language,
    pub intent: MessageIntent,
}

impl JobPayload {
    pub fn encode(&self) -> Value {
        json!({
            KEY_PHONE: self.phone,
            KEY_LANGUAGE: self.language,
            KEY_INTENT: self.intent,
        })
    }

    /// Decode a stored payload. An absent or empty phone, an unknown tag, or
    /// an out-of-range ordinal fails that invocation with `MissingPayload`.
    pub fn decode(value: &Value) -> Result<Self> {
        let phone = value
            .get(KEY_PHONE)
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| RekindleError::MissingPayload(KEY_PHONE.into()))?
            .to_string();
        let language = decode_tag(value, KEY_LANGUAGE, Language::from_ordinal)?;
        let intent = decode_tag(value, KEY_INTENT, MessageIntent::from_ordinal)?;
        Ok(Self {
            phone,
            language,
            intent,
        })
    }
}

fn decode_tag<T>(value: &Value, key: &str, from_ordinal: fn(u64) -> Option<T>) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let field = value
        .get(key)
        .ok_or_else(|| RekindleError::MissingPayload(key.into()))?;
    match field {
        Value::String(_) => serde_json::from_value(field.clone())
            .map_err(|_| RekindleError::MissingPayload(key.into())),
        Value::Number(n) => n
            .as_u64()
            .and_then(from_ordinal)
            .ok_or_else(|| RekindleError::MissingPayload(key.into())),
        _ => Err(RekindleError::MissingPayload(key.into())),
    }
}
