//! Derived views over the repositories.
//!
//! Everything here is read-only: weak patient references are resolved to
//! display names, appointments are grouped into days and weeks, and form
//! defaults are computed for the presentation layer.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::models::{Appointment, MedicalRecord, TimeOfDay};
use crate::repo::{AppointmentRepository, MedicalRecordRepository, PatientRepository};

/// Shown wherever a patient id no longer resolves.
pub const UNKNOWN_PATIENT: &str = "Unknown patient";

/// Resolve a patient id to "First Last", or [`UNKNOWN_PATIENT`].
pub fn display_name(patients: &PatientRepository, patient_id: &str) -> String {
    patients
        .get_by_id(patient_id)
        .map(|p| p.full_name())
        .unwrap_or_else(|| UNKNOWN_PATIENT.to_string())
}

/// First day of the week containing `reference`.
pub fn week_start(reference: NaiveDate, starts_on: Weekday) -> NaiveDate {
    let offset = (7 + reference.weekday().num_days_from_monday()
        - starts_on.num_days_from_monday())
        % 7;
    reference - Days::new(u64::from(offset))
}

/// Move a week start forward (positive) or back (negative) by whole weeks.
pub fn shift_week(start: NaiveDate, weeks: i64) -> NaiveDate {
    let days = Days::new(weeks.unsigned_abs() * 7);
    if weeks >= 0 {
        start + days
    } else {
        start - days
    }
}

/// "Jun 10, 2024".
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Default booking slot: the next half hour after `now`.
///
/// Before :30 the slot is :30 of the current hour, otherwise the top of the
/// next hour (rolling into the next day after 23:30).
pub fn default_appointment_slot(now: NaiveDateTime) -> (NaiveDate, TimeOfDay) {
    let hour_start = now
        .date()
        .and_hms_opt(now.hour(), 0, 0)
        .unwrap_or(now);
    let slot = if now.minute() < 30 {
        hour_start + chrono::Duration::minutes(30)
    } else {
        hour_start + chrono::Duration::hours(1)
    };
    (slot.date(), TimeOfDay::from_naive(slot.time()))
}

/// An appointment joined with its patient's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentView {
    pub appointment: Appointment,
    pub patient_name: String,
}

impl AppointmentView {
    pub fn new(patients: &PatientRepository, appointment: &Appointment) -> Self {
        Self {
            patient_name: display_name(patients, &appointment.patient_id),
            appointment: appointment.clone(),
        }
    }

    /// Reason text, or "Not specified".
    pub fn reason_or_default(&self) -> &str {
        self.appointment.reason.as_deref().unwrap_or("Not specified")
    }
}

/// A medical record joined with its patient's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    pub record: MedicalRecord,
    pub patient_name: String,
}

impl RecordView {
    pub fn new(patients: &PatientRepository, record: &MedicalRecord) -> Self {
        Self {
            patient_name: display_name(patients, &record.patient_id),
            record: record.clone(),
        }
    }
}

/// One calendar day of appointments, earliest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub appointments: Vec<AppointmentView>,
}

impl DaySchedule {
    pub fn build(
        patients: &PatientRepository,
        appointments: &AppointmentRepository,
        date: NaiveDate,
    ) -> Self {
        Self::from_day(patients, date, appointments.list_for_day(date))
    }

    fn from_day(patients: &PatientRepository, date: NaiveDate, day: Vec<&Appointment>) -> Self {
        Self {
            date,
            appointments: day
                .into_iter()
                .map(|a| AppointmentView::new(patients, a))
                .collect(),
        }
    }

    /// Column header, e.g. "Mon 10".
    pub fn header(&self) -> String {
        self.date.format("%a %-d").to_string()
    }
}

/// Seven consecutive days of appointments.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekView {
    pub start: NaiveDate,
    pub days: Vec<DaySchedule>,
}

impl WeekView {
    pub fn build(
        patients: &PatientRepository,
        appointments: &AppointmentRepository,
        start: NaiveDate,
    ) -> Self {
        let days = appointments
            .list_for_week(start)
            .into_iter()
            .zip(0u64..)
            .map(|(day, offset)| DaySchedule::from_day(patients, start + Days::new(offset), day))
            .collect();
        Self { start, days }
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Days::new(6)
    }

    /// "Jun 9, 2024 - Jun 15, 2024".
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            format_display_date(self.start),
            format_display_date(self.end())
        )
    }
}

/// A patient picker entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientOption {
    pub id: String,
    pub label: String,
}

/// Picker entries for every patient in store order.
pub fn patient_options(patients: &PatientRepository) -> Vec<PatientOption> {
    patients
        .iter()
        .map(|p| PatientOption {
            id: p.id.clone(),
            label: p.full_name(),
        })
        .collect()
}

/// Records for a patient (or all records) joined with display names.
pub fn record_views(
    patients: &PatientRepository,
    records: &MedicalRecordRepository,
    patient_id: Option<&str>,
) -> Vec<RecordView> {
    records
        .list_for_patient(patient_id)
        .into_iter()
        .map(|r| RecordView::new(patients, r))
        .collect()
}
