//! Core data model — languages, message intents, and the validated schedule.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{RekindleError, Result};

/// Supported message languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Arabic,
    French,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Arabic, Language::French];

    /// Decode a legacy integer ordinal (index into the original variant
    /// order). Out-of-range ordinals are rejected, not wrapped.
    pub fn from_ordinal(n: u64) -> Option<Self> {
        match n {
            0 => Some(Language::English),
            1 => Some(Language::Arabic),
            2 => Some(Language::French),
            _ => None,
        }
    }
}

/// What kind of message to send when a schedule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageIntent {
    Morning,
    Night,
    MissYou,
}

impl MessageIntent {
    pub const ALL: [MessageIntent; 3] = [
        MessageIntent::Morning,
        MessageIntent::Night,
        MessageIntent::MissYou,
    ];

    /// Decode a legacy integer ordinal. Out-of-range ordinals are rejected.
    pub fn from_ordinal(n: u64) -> Option<Self> {
        match n {
            0 => Some(MessageIntent::Morning),
            1 => Some(MessageIntent::Night),
            2 => Some(MessageIntent::MissYou),
            _ => None,
        }
    }
}

/// One contact's delivery policy.
///
/// Built once by the configuration source, validated, then immutable. A
/// changed configuration produces a new spec that replaces the old
/// registration under the same `contact_id` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// Normalized phone number: digits only, no separators or leading `+`.
    /// Uniqueness key for job registration.
    pub contact_id: String,
    /// Human label. No behavioral effect.
    #[serde(default)]
    pub display_name: Option<String>,
    pub language: Language,
    /// Repeat interval in days. 1, 2, 3 and 7 are the typical choices, but
    /// any positive value is a valid period.
    pub cadence_days: u32,
    /// Delivery window start hour, 24h clock, in [0, 23].
    pub window_start_hour: u32,
    /// Delivery window end hour (exclusive). Must be greater than the start
    /// and at most 24. The width is not fixed to one hour.
    pub window_end_hour: u32,
    pub intent: MessageIntent,
}

impl ScheduleSpec {
    pub fn new(
        contact_id: impl Into<String>,
        display_name: Option<String>,
        language: Language,
        cadence_days: u32,
        window_start_hour: u32,
        window_end_hour: u32,
        intent: MessageIntent,
    ) -> Result<Self> {
        let spec = Self {
            contact_id: contact_id.into(),
            display_name,
            language,
            cadence_days,
            window_start_hour,
            window_end_hour,
            intent,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check every field invariant. `new` runs this for you; deserialized
    /// specs should be validated before use.
    pub fn validate(&self) -> Result<()> {
        if self.contact_id.is_empty() {
            return Err(RekindleError::InvalidSchedule("contact_id is empty".into()));
        }
        if !self.contact_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RekindleError::InvalidSchedule(format!(
                "contact_id '{}' must contain digits only",
                self.contact_id
            )));
        }
        if self.cadence_days == 0 {
            return Err(RekindleError::InvalidSchedule(
                "cadence_days must be positive".into(),
            ));
        }
        if self.window_start_hour > 23 {
            return Err(RekindleError::InvalidSchedule(format!(
                "window_start_hour {} not in 0..=23",
                self.window_start_hour
            )));
        }
        if self.window_end_hour <= self.window_start_hour || self.window_end_hour > 24 {
            return Err(RekindleError::InvalidSchedule(format!(
                "window {}..{} must satisfy start < end <= 24",
                self.window_start_hour, self.window_end_hour
            )));
        }
        Ok(())
    }

    /// Repeat interval between successive deliveries.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.cadence_days) * 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Result<ScheduleSpec> {
        ScheduleSpec::new(
            "15551234567",
            Some("Mom".into()),
            Language::English,
            1,
            8,
            9,
            MessageIntent::Morning,
        )
    }

    #[test]
    fn accepts_valid_spec() {
        let spec = valid().unwrap();
        assert_eq!(spec.contact_id, "15551234567");
        assert_eq!(spec.interval(), Duration::from_secs(86_400));
    }

    #[test]
    fn rejects_empty_contact() {
        let err = ScheduleSpec::new("", None, Language::English, 1, 8, 9, MessageIntent::Morning)
            .unwrap_err();
        assert!(matches!(err, RekindleError::InvalidSchedule(_)));
    }

    #[test]
    fn rejects_non_digit_contact() {
        assert!(
            ScheduleSpec::new(
                "+1 555 123",
                None,
                Language::English,
                1,
                8,
                9,
                MessageIntent::Morning
            )
            .is_err()
        );
    }

    #[test]
    fn rejects_zero_cadence() {
        assert!(
            ScheduleSpec::new(
                "15551234567",
                None,
                Language::French,
                0,
                8,
                9,
                MessageIntent::Night
            )
            .is_err()
        );
    }

    #[test]
    fn accepts_unusual_positive_cadence() {
        // 1/2/3/7 are the recognized choices, but any positive period works.
        assert!(
            ScheduleSpec::new(
                "15551234567",
                None,
                Language::Arabic,
                11,
                8,
                9,
                MessageIntent::MissYou
            )
            .is_ok()
        );
    }

    #[test]
    fn rejects_bad_window() {
        // start out of range
        assert!(
            ScheduleSpec::new(
                "15551234567",
                None,
                Language::English,
                1,
                24,
                25,
                MessageIntent::Morning
            )
            .is_err()
        );
        // end not after start
        assert!(
            ScheduleSpec::new(
                "15551234567",
                None,
                Language::English,
                1,
                9,
                9,
                MessageIntent::Morning
            )
            .is_err()
        );
        // end past midnight
        assert!(
            ScheduleSpec::new(
                "15551234567",
                None,
                Language::English,
                1,
                9,
                25,
                MessageIntent::Morning
            )
            .is_err()
        );
    }

    #[test]
    fn wide_window_is_allowed() {
        // The window width is configurable, not hard-coded to one hour.
        let spec = ScheduleSpec::new(
            "15551234567",
            None,
            Language::English,
            2,
            20,
            23,
            MessageIntent::Night,
        )
        .unwrap();
        assert_eq!(spec.window_end_hour - spec.window_start_hour, 3);
    }

    #[test]
    fn language_ordinals_round_trip() {
        for (i, lang) in Language::ALL.iter().enumerate() {
            assert_eq!(Language::from_ordinal(i as u64), Some(*lang));
        }
        assert_eq!(Language::from_ordinal(3), None);
        assert_eq!(MessageIntent::from_ordinal(99), None);
    }
}
