//! Medical record repository.

use crate::db::{Collection, Database, DbResult};
use crate::ids::new_id;
use crate::models::{MedicalRecord, MedicalRecordInput};

use super::timestamp;

/// Ordered medical record collection. Records are create-only.
#[derive(Debug, Clone, Default)]
pub struct MedicalRecordRepository {
    records: Vec<MedicalRecord>,
}

impl MedicalRecordRepository {
    /// Load the medical record collection from the store.
    pub fn load(db: &Database) -> DbResult<Self> {
        Ok(Self {
            records: db.load(Collection::MedicalRecords)?,
        })
    }

    /// Add a new record.
    pub fn save(&mut self, db: &Database, input: MedicalRecordInput) -> DbResult<MedicalRecord> {
        let record = MedicalRecord::from_input(new_id(), input, timestamp());

        let mut next = self.records.clone();
        next.push(record.clone());
        db.save(Collection::MedicalRecords, &next)?;
        self.records = next;

        tracing::debug!(id = %record.id, patient_id = %record.patient_id, "created medical record");
        Ok(record)
    }

    /// Records for one patient in store order, or every record when
    /// `patient_id` is absent or empty.
    pub fn list_for_patient(&self, patient_id: Option<&str>) -> Vec<&MedicalRecord> {
        match patient_id.filter(|id| !id.is_empty()) {
            Some(id) => self.records.iter().filter(|r| r.patient_id == id).collect(),
            None => self.records.iter().collect(),
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<&MedicalRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
