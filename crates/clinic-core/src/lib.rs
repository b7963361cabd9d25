//! Clinic Core Library
//!
//! Local-first clinic records: patients, a weekly appointment calendar and
//! medical-record notes, kept in a single-device key-value store.
//!
//! # Architecture
//!
//! ```text
//!        Presentation layer (native UI via FFI, or Rust caller)
//!                              │
//!                     Command / query
//!                              │
//!                   ┌──────────▼──────────┐
//!                   │       Clinic        │
//!                   └──────────┬──────────┘
//!             ┌────────────────┼────────────────┐
//!             ▼                ▼                ▼
//!     PatientRepository  AppointmentRepo  MedicalRecordRepo
//!             │                │                │
//!             └──── write-through on every mutation ────┐
//!                                                       ▼
//!                               kv_store: patients / appointments / medicalRecords
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite-backed key-value store of JSON collections
//! - [`models`]: Domain types (Patient, Appointment, MedicalRecord)
//! - [`repo`]: In-memory repositories with write-through persistence
//! - [`query`]: Display names, day/week schedules, form defaults
//! - [`clinic`]: Facade and typed command interface
//! - [`config`]: TOML configuration

pub mod clinic;
pub mod config;
pub mod db;
pub mod ids;
pub mod models;
pub mod query;
pub mod repo;

// Re-export commonly used types
pub use clinic::{Clinic, Command, Outcome};
pub use config::{ClinicConfig, ConfigError};
pub use db::{Collection, Database, DbError};
pub use models::{
    Appointment, AppointmentInput, BloodType, Gender, MedicalRecord, MedicalRecordInput, Patient,
    PatientInput, TimeOfDay,
};
pub use query::UNKNOWN_PATIENT;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for ClinicError {
    fn from(e: db::DbError) -> Self {
        ClinicError::DatabaseError(e.to_string())
    }
}

impl From<config::ConfigError> for ClinicError {
    fn from(e: config::ConfigError) -> Self {
        ClinicError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ClinicError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ClinicError::InvalidInput(format!("Invalid date: {:?}", value)))
}

fn parse_field<T>(value: &str) -> Result<T, ClinicError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ClinicError::InvalidInput(e.to_string()))
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a clinic store at the given path.
#[uniffi::export]
pub fn open_clinic(path: String) -> Result<Arc<ClinicCore>, ClinicError> {
    let clinic = Clinic::open(&ClinicConfig::with_database(path))?;
    Ok(ClinicCore::wrap(clinic))
}

/// Open a clinic using a TOML config file.
#[uniffi::export]
pub fn open_clinic_with_config(config_path: String) -> Result<Arc<ClinicCore>, ClinicError> {
    let config = ClinicConfig::load(&config_path)?;
    let clinic = Clinic::open(&config)?;
    Ok(ClinicCore::wrap(clinic))
}

/// Create an in-memory clinic (for testing).
#[uniffi::export]
pub fn open_clinic_in_memory() -> Result<Arc<ClinicCore>, ClinicError> {
    let clinic = Clinic::open_in_memory()?;
    Ok(ClinicCore::wrap(clinic))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe clinic wrapper for FFI.
#[derive(uniffi::Object)]
pub struct ClinicCore {
    clinic: Mutex<Clinic>,
}

impl ClinicCore {
    fn wrap(clinic: Clinic) -> Arc<Self> {
        Arc::new(Self {
            clinic: Mutex::new(clinic),
        })
    }
}

#[uniffi::export]
impl ClinicCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Create (empty id) or replace (existing id) a patient.
    ///
    /// Returns `None` when the id names no existing patient.
    pub fn save_patient(&self, input: FfiPatientInput) -> Result<Option<FfiPatient>, ClinicError> {
        let input: PatientInput = input.try_into()?;
        let mut clinic = self.clinic.lock()?;
        let patient = clinic.save_patient(input)?;
        Ok(patient.map(Into::into))
    }

    /// Delete a patient. Appointments and records are kept.
    pub fn delete_patient(&self, id: String) -> Result<bool, ClinicError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.delete_patient(&id)?)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, ClinicError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.patient(&id).cloned().map(Into::into))
    }

    /// Search patients by name or phone; empty filter lists everyone.
    pub fn list_patients(&self, filter: String) -> Result<Vec<FfiPatient>, ClinicError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .patients(&filter)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Patient picker entries.
    pub fn patient_options(&self) -> Result<Vec<FfiPatientOption>, ClinicError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .patient_options()
            .into_iter()
            .map(|o| FfiPatientOption {
                id: o.id,
                label: o.label,
            })
            .collect())
    }

    /// "First Last" for a patient id, or "Unknown patient".
    pub fn display_name(&self, patient_id: String) -> Result<String, ClinicError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.display_name(&patient_id))
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    /// Book a new appointment.
    pub fn create_appointment(
        &self,
        input: FfiAppointmentInput,
    ) -> Result<FfiAppointment, ClinicError> {
        let input: AppointmentInput = input.try_into()?;
        let mut clinic = self.clinic.lock()?;
        let appointment = clinic.create_appointment(input)?;
        let patient_name = clinic.display_name(&appointment.patient_id);
        Ok(FfiAppointment::new(appointment, patient_name))
    }

    /// Appointments on a `YYYY-MM-DD` date, earliest first.
    pub fn day_schedule(&self, date: String) -> Result<FfiDaySchedule, ClinicError> {
        let date = parse_date(&date)?;
        let clinic = self.clinic.lock()?;
        Ok(clinic.day_schedule(date).into())
    }

    /// The calendar week containing a `YYYY-MM-DD` date.
    pub fn week_view(&self, reference_date: String) -> Result<FfiWeekView, ClinicError> {
        let reference = parse_date(&reference_date)?;
        let clinic = self.clinic.lock()?;
        Ok(clinic.week_view(reference).into())
    }

    /// Previous (`weeks < 0`) or following weeks relative to a `YYYY-MM-DD` date.
    pub fn shifted_week_view(
        &self,
        reference_date: String,
        weeks: i64,
    ) -> Result<FfiWeekView, ClinicError> {
        let reference = parse_date(&reference_date)?;
        let clinic = self.clinic.lock()?;
        Ok(clinic.shifted_week_view(reference, weeks).into())
    }

    /// Get an appointment with its patient name.
    pub fn appointment_details(&self, id: String) -> Result<Option<FfiAppointment>, ClinicError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.appointment_details(&id).map(Into::into))
    }

    /// Suggested date and time for a new booking, relative to local now.
    pub fn default_appointment_slot(&self) -> FfiSlot {
        let (date, time) = query::default_appointment_slot(chrono::Local::now().naive_local());
        FfiSlot {
            date: date.to_string(),
            time: time.to_string(),
        }
    }

    // =========================================================================
    // Medical Record Operations
    // =========================================================================

    /// Add a medical record.
    pub fn create_medical_record(
        &self,
        input: FfiMedicalRecordInput,
    ) -> Result<FfiMedicalRecord, ClinicError> {
        let input: MedicalRecordInput = input.try_into()?;
        let mut clinic = self.clinic.lock()?;
        let record = clinic.create_medical_record(input)?;
        let patient_name = clinic.display_name(&record.patient_id);
        Ok(FfiMedicalRecord::new(record, patient_name))
    }

    /// Records for a patient, or every record when `patient_id` is absent.
    pub fn list_medical_records(
        &self,
        patient_id: Option<String>,
    ) -> Result<Vec<FfiMedicalRecord>, ClinicError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .records_for(patient_id.as_deref())
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient form input. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientInput {
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    /// Comma-separated allergy list as typed
    pub allergies: String,
}

impl TryFrom<FfiPatientInput> for PatientInput {
    type Error = ClinicError;

    fn try_from(input: FfiPatientInput) -> Result<Self, Self::Error> {
        let blood_type: Option<BloodType> = models::normalize_optional(input.blood_type)
            .map(|b| parse_field(&b))
            .transpose()?;

        let mut patient = PatientInput::new(
            input.first_name,
            input.last_name,
            parse_date(&input.date_of_birth)?,
            parse_field(&input.gender)?,
            input.phone,
        );
        patient.id = input.id;
        patient.email = input.email;
        patient.address = input.address;
        patient.blood_type = blood_type;
        patient.allergies = models::parse_allergies(&input.allergies);
        Ok(patient)
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    pub allergies: Vec<String>,
    pub created_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            full_name: patient.full_name(),
            date_of_birth: patient.date_of_birth.to_string(),
            gender: patient.gender.to_string(),
            blood_type: patient.blood_type.map(|b| b.to_string()),
            id: patient.id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            phone: patient.phone,
            email: patient.email,
            address: patient.address,
            allergies: patient.allergies,
            created_at: patient.created_at,
        }
    }
}

/// FFI-safe patient picker entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientOption {
    pub id: String,
    pub label: String,
}

/// FFI-safe appointment booking input. Time is `HH:MM`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointmentInput {
    pub patient_id: String,
    pub date: String,
    pub time: String,
    pub duration_minutes: u32,
    pub reason: Option<String>,
}

impl TryFrom<FfiAppointmentInput> for AppointmentInput {
    type Error = ClinicError;

    fn try_from(input: FfiAppointmentInput) -> Result<Self, Self::Error> {
        Ok(AppointmentInput {
            date: parse_date(&input.date)?,
            time: parse_field(&input.time)?,
            patient_id: input.patient_id,
            duration_minutes: input.duration_minutes,
            reason: input.reason,
        })
    }
}

/// FFI-safe appointment with resolved patient name.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub date: String,
    pub time: String,
    pub duration_minutes: u32,
    pub reason: Option<String>,
    pub created_at: String,
}

impl FfiAppointment {
    fn new(appointment: Appointment, patient_name: String) -> Self {
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            patient_name,
            date: appointment.date.to_string(),
            time: appointment.time.to_string(),
            duration_minutes: appointment.duration_minutes,
            reason: appointment.reason,
            created_at: appointment.created_at,
        }
    }
}

impl From<query::AppointmentView> for FfiAppointment {
    fn from(view: query::AppointmentView) -> Self {
        Self::new(view.appointment, view.patient_name)
    }
}

/// FFI-safe single day of the calendar.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDaySchedule {
    pub date: String,
    pub header: String,
    pub appointments: Vec<FfiAppointment>,
}

impl From<query::DaySchedule> for FfiDaySchedule {
    fn from(day: query::DaySchedule) -> Self {
        Self {
            date: day.date.to_string(),
            header: day.header(),
            appointments: day.appointments.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe calendar week.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWeekView {
    pub start: String,
    pub end: String,
    pub label: String,
    pub days: Vec<FfiDaySchedule>,
}

impl From<query::WeekView> for FfiWeekView {
    fn from(week: query::WeekView) -> Self {
        Self {
            start: week.start.to_string(),
            end: week.end().to_string(),
            label: week.label(),
            days: week.days.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe booking slot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSlot {
    pub date: String,
    pub time: String,
}

/// FFI-safe medical record input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicalRecordInput {
    pub patient_id: String,
    pub date: String,
    pub diagnosis: String,
    pub treatment: String,
    pub prescriptions: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<FfiMedicalRecordInput> for MedicalRecordInput {
    type Error = ClinicError;

    fn try_from(input: FfiMedicalRecordInput) -> Result<Self, Self::Error> {
        Ok(MedicalRecordInput {
            date: parse_date(&input.date)?,
            patient_id: input.patient_id,
            diagnosis: input.diagnosis,
            treatment: input.treatment,
            prescriptions: input.prescriptions,
            notes: input.notes,
        })
    }
}

/// FFI-safe medical record with resolved patient name.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicalRecord {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub date: String,
    pub diagnosis: String,
    pub treatment: String,
    pub prescriptions: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl FfiMedicalRecord {
    fn new(record: MedicalRecord, patient_name: String) -> Self {
        Self {
            id: record.id,
            patient_id: record.patient_id,
            patient_name,
            date: record.date.to_string(),
            diagnosis: record.diagnosis,
            treatment: record.treatment,
            prescriptions: record.prescriptions,
            notes: record.notes,
            created_at: record.created_at,
        }
    }
}

impl From<query::RecordView> for FfiMedicalRecord {
    fn from(view: query::RecordView) -> Self {
        Self::new(view.record, view.patient_name)
    }
}
