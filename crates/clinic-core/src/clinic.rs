//! Clinic facade: owns the store and repositories and executes typed commands.

use chrono::{NaiveDate, Weekday};

use crate::config::ClinicConfig;
use crate::db::{Database, DbResult};
use crate::models::{
    Appointment, AppointmentInput, MedicalRecord, MedicalRecordInput, Patient, PatientInput,
};
use crate::query::{self, AppointmentView, DaySchedule, PatientOption, RecordView, WeekView};
use crate::repo::{AppointmentRepository, MedicalRecordRepository, PatientRepository};

/// A state-changing request from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create (no id) or replace (with id) a patient
    SavePatient(PatientInput),
    DeletePatient { id: String },
    CreateAppointment(AppointmentInput),
    CreateMedicalRecord(MedicalRecordInput),
}

/// Result of a [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `None` when an update named a patient that does not exist
    PatientSaved(Option<Patient>),
    PatientDeleted(bool),
    AppointmentCreated(Appointment),
    MedicalRecordCreated(MedicalRecord),
}

/// The clinic's data layer.
pub struct Clinic {
    db: Database,
    patients: PatientRepository,
    appointments: AppointmentRepository,
    records: MedicalRecordRepository,
    week_starts_on: Weekday,
}

impl Clinic {
    /// Open the store named by `config` and load every collection.
    pub fn open(config: &ClinicConfig) -> DbResult<Self> {
        let db = match &config.database_path {
            Some(path) => Database::open(path)?,
            None => Database::open_in_memory()?,
        };
        Self::with_database(db, config.week_starts_on)
    }

    /// In-memory clinic with default settings (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Self::open(&ClinicConfig::default())
    }

    /// Load every collection from an already open store.
    pub fn with_database(db: Database, week_starts_on: Weekday) -> DbResult<Self> {
        let patients = PatientRepository::load(&db)?;
        let appointments = AppointmentRepository::load(&db)?;
        let records = MedicalRecordRepository::load(&db)?;
        tracing::info!(
            patients = patients.len(),
            appointments = appointments.len(),
            records = records.len(),
            "loaded clinic data"
        );
        Ok(Self {
            db,
            patients,
            appointments,
            records,
            week_starts_on,
        })
    }

    /// Apply a command, writing through to the store.
    pub fn execute(&mut self, command: Command) -> DbResult<Outcome> {
        match command {
            Command::SavePatient(input) => self.save_patient(input).map(Outcome::PatientSaved),
            Command::DeletePatient { id } => self.delete_patient(&id).map(Outcome::PatientDeleted),
            Command::CreateAppointment(input) => self
                .create_appointment(input)
                .map(Outcome::AppointmentCreated),
            Command::CreateMedicalRecord(input) => self
                .create_medical_record(input)
                .map(Outcome::MedicalRecordCreated),
        }
    }

    pub fn save_patient(&mut self, input: PatientInput) -> DbResult<Option<Patient>> {
        self.patients.save(&self.db, input)
    }

    pub fn delete_patient(&mut self, id: &str) -> DbResult<bool> {
        self.patients.delete(&self.db, id)
    }

    pub fn create_appointment(&mut self, input: AppointmentInput) -> DbResult<Appointment> {
        self.appointments.save(&self.db, input)
    }

    pub fn create_medical_record(&mut self, input: MedicalRecordInput) -> DbResult<MedicalRecord> {
        self.records.save(&self.db, input)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Patients matching a name/phone filter; empty filter lists everyone.
    pub fn patients(&self, filter: &str) -> Vec<&Patient> {
        self.patients.list(filter)
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.get_by_id(id)
    }

    pub fn patient_options(&self) -> Vec<PatientOption> {
        query::patient_options(&self.patients)
    }

    pub fn display_name(&self, patient_id: &str) -> String {
        query::display_name(&self.patients, patient_id)
    }

    pub fn day_schedule(&self, date: NaiveDate) -> DaySchedule {
        DaySchedule::build(&self.patients, &self.appointments, date)
    }

    /// The calendar week containing `reference`.
    pub fn week_view(&self, reference: NaiveDate) -> WeekView {
        let start = query::week_start(reference, self.week_starts_on);
        WeekView::build(&self.patients, &self.appointments, start)
    }

    /// The week `weeks` whole weeks before (negative) or after `reference`'s week.
    pub fn shifted_week_view(&self, reference: NaiveDate, weeks: i64) -> WeekView {
        let start = query::week_start(reference, self.week_starts_on);
        let start = query::shift_week(start, weeks);
        WeekView::build(&self.patients, &self.appointments, start)
    }

    pub fn appointment_details(&self, id: &str) -> Option<AppointmentView> {
        self.appointments
            .get_by_id(id)
            .map(|a| AppointmentView::new(&self.patients, a))
    }

    /// Records for a patient, or all records when `patient_id` is absent/empty.
    pub fn records_for(&self, patient_id: Option<&str>) -> Vec<RecordView> {
        query::record_views(&self.patients, &self.records, patient_id)
    }

    pub fn week_starts_on(&self) -> Weekday {
        self.week_starts_on
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
