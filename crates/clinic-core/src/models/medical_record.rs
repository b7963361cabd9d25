//! Medical record (visit note) models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fields::{blank_as_none, normalize_optional};

/// A diagnosis/treatment note attached to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: String,
    /// Weak reference to a patient; may no longer resolve
    pub patient_id: String,
    pub date: NaiveDate,
    pub diagnosis: String,
    pub treatment: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub prescriptions: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
    pub created_at: String,
}

impl MedicalRecord {
    pub fn from_input(id: String, input: MedicalRecordInput, created_at: String) -> Self {
        Self {
            id,
            patient_id: input.patient_id,
            date: input.date,
            diagnosis: input.diagnosis,
            treatment: input.treatment,
            prescriptions: normalize_optional(input.prescriptions),
            notes: normalize_optional(input.notes),
            created_at,
        }
    }
}

/// Medical record form data.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicalRecordInput {
    pub patient_id: String,
    pub date: NaiveDate,
    pub diagnosis: String,
    pub treatment: String,
    pub prescriptions: Option<String>,
    pub notes: Option<String>,
}

impl MedicalRecordInput {
    pub fn new(
        patient_id: impl Into<String>,
        date: NaiveDate,
        diagnosis: impl Into<String>,
        treatment: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            date,
            diagnosis: diagnosis.into(),
            treatment: treatment.into(),
            prescriptions: None,
            notes: None,
        }
    }
}
