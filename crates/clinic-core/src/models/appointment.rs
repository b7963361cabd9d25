//! Appointment models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::fields::{blank_as_none, minutes_with_default, normalize_optional};

/// Duration used when a stored appointment has no usable duration.
pub const DEFAULT_APPOINTMENT_MINUTES: u32 = 30;

/// Error parsing an `HH:MM` time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time of day: {0:?} (expected HH:MM)")]
pub struct ParseTimeError(String);

/// Wall-clock time with minute precision, 24h.
///
/// Ordering is by hour, then minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Truncate a `NaiveTime` to the minute.
    pub fn from_naive(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    /// Accepts `H:MM` / `HH:MM`, with optional trailing `:SS` which is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeError(s.to_string());
        let trimmed = s.trim();
        // chrono reads single-digit minutes; stored times always carry two
        if trimmed.split(':').nth(1).map(str::len) != Some(2) {
            return Err(err());
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map(Self::from_naive)
            .map_err(|_| err())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A scheduled appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    /// Weak reference to a patient; may no longer resolve
    pub patient_id: String,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    #[serde(
        rename = "duration",
        default = "default_minutes",
        deserialize_with = "duration_minutes"
    )]
    pub duration_minutes: u32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub reason: Option<String>,
    pub created_at: String,
}

impl Appointment {
    pub fn from_input(id: String, input: AppointmentInput, created_at: String) -> Self {
        Self {
            id,
            patient_id: input.patient_id,
            date: input.date,
            time: input.time,
            duration_minutes: input.duration_minutes,
            reason: normalize_optional(input.reason),
            created_at,
        }
    }
}

fn default_minutes() -> u32 {
    DEFAULT_APPOINTMENT_MINUTES
}

fn duration_minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    minutes_with_default(deserializer, DEFAULT_APPOINTMENT_MINUTES)
}

/// Appointment booking form data.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentInput {
    pub patient_id: String,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub duration_minutes: u32,
    pub reason: Option<String>,
}

impl AppointmentInput {
    pub fn new(patient_id: impl Into<String>, date: NaiveDate, time: TimeOfDay) -> Self {
        Self {
            patient_id: patient_id.into(),
            date,
            time,
            duration_minutes: DEFAULT_APPOINTMENT_MINUTES,
            reason: None,
        }
    }
}
