//! Patient repository.

use crate::db::{Collection, Database, DbResult};
use crate::ids::new_id;
use crate::models::{Patient, PatientInput};

use super::timestamp;

/// Ordered patient collection.
#[derive(Debug, Clone, Default)]
pub struct PatientRepository {
    patients: Vec<Patient>,
}

impl PatientRepository {
    /// Load the patient collection from the store.
    pub fn load(db: &Database) -> DbResult<Self> {
        Ok(Self {
            patients: db.load(Collection::Patients)?,
        })
    }

    /// Patients matching `filter` in store order.
    ///
    /// An empty filter returns everyone. Otherwise matches "first last" or
    /// phone as a case-insensitive substring.
    pub fn list(&self, filter: &str) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| p.matches_filter(filter))
            .collect()
    }

    /// Get a patient by id.
    pub fn get_by_id(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Create or replace a patient.
    ///
    /// Without an id a new patient is appended. With an id the matching
    /// patient is replaced in place, keeping its id and `created_at`. An id
    /// that matches nobody is ignored and yields `Ok(None)`.
    pub fn save(&mut self, db: &Database, input: PatientInput) -> DbResult<Option<Patient>> {
        let target = input.target_id().map(str::to_owned);
        let mut next = self.patients.clone();

        let saved = match target {
            None => {
                let patient = Patient::from_input(new_id(), input, timestamp());
                next.push(patient.clone());
                tracing::debug!(id = %patient.id, "created patient");
                patient
            }
            Some(id) => {
                let Some(slot) = next.iter_mut().find(|p| p.id == id) else {
                    tracing::warn!(%id, "patient to update not found, ignoring save");
                    return Ok(None);
                };
                let created_at = std::mem::take(&mut slot.created_at);
                *slot = Patient::from_input(id, input, created_at);
                tracing::debug!(id = %slot.id, "updated patient");
                slot.clone()
            }
        };

        db.save(Collection::Patients, &next)?;
        self.patients = next;
        Ok(Some(saved))
    }

    /// Delete a patient. Appointments and records referencing it are untouched.
    pub fn delete(&mut self, db: &Database, id: &str) -> DbResult<bool> {
        if self.get_by_id(id).is_none() {
            return Ok(false);
        }

        let next: Vec<Patient> = self
            .patients
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect();
        db.save(Collection::Patients, &next)?;
        self.patients = next;
        tracing::debug!(%id, "deleted patient");
        Ok(true)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.patients.iter()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}
