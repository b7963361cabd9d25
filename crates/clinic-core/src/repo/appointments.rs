//! Appointment repository.

use chrono::{Days, NaiveDate};

use crate::db::{Collection, Database, DbResult};
use crate::ids::new_id;
use crate::models::{Appointment, AppointmentInput};

use super::timestamp;

/// Ordered appointment collection. Appointments are create-only.
#[derive(Debug, Clone, Default)]
pub struct AppointmentRepository {
    appointments: Vec<Appointment>,
}

impl AppointmentRepository {
    /// Load the appointment collection from the store.
    pub fn load(db: &Database) -> DbResult<Self> {
        Ok(Self {
            appointments: db.load(Collection::Appointments)?,
        })
    }

    /// Book a new appointment.
    pub fn save(&mut self, db: &Database, input: AppointmentInput) -> DbResult<Appointment> {
        let appointment = Appointment::from_input(new_id(), input, timestamp());

        let mut next = self.appointments.clone();
        next.push(appointment.clone());
        db.save(Collection::Appointments, &next)?;
        self.appointments = next;

        tracing::debug!(
            id = %appointment.id,
            date = %appointment.date,
            time = %appointment.time,
            "created appointment"
        );
        Ok(appointment)
    }

    /// Appointments on `date`, earliest first.
    ///
    /// Equal times keep booking order.
    pub fn list_for_day(&self, date: NaiveDate) -> Vec<&Appointment> {
        let mut day: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.date == date)
            .collect();
        day.sort_by_key(|a| a.time);
        day
    }

    /// Seven days of appointments starting at `start_of_week`.
    ///
    /// Index `i` holds [`list_for_day`](Self::list_for_day) for `start_of_week + i`.
    /// Indices are offsets from `start_of_week`, not fixed weekdays: index 0
    /// is Sunday only when the week is configured to start on Sunday.
    pub fn list_for_week(&self, start_of_week: NaiveDate) -> [Vec<&Appointment>; 7] {
        std::array::from_fn(|offset| self.list_for_day(start_of_week + Days::new(offset as u64)))
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// All appointments in booking order.
    pub fn all(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeOfDay;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn book(
        db: &Database,
        repo: &mut AppointmentRepository,
        day: u32,
        time: &str,
        reason: &str,
    ) -> Appointment {
        let mut input = AppointmentInput::new("p1", date(day), time.parse().unwrap());
        input.reason = Some(reason.into());
        repo.save(db, input).unwrap()
    }

    fn reasons(list: &[&Appointment]) -> Vec<String> {
        list.iter().map(|a| a.reason.clone().unwrap()).collect()
    }

    #[test]
    fn test_save_assigns_id() {
        let db = Database::open_in_memory().unwrap();
        let mut repo = AppointmentRepository::load(&db).unwrap();

        let a = book(&db, &mut repo, 10, "09:00", "checkup");
        let b = book(&db, &mut repo, 10, "09:00", "checkup");
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(repo.get_by_id(&a.id), Some(&a));
    }

    #[test]
    fn test_list_for_day_sorted() {
        let db = Database::open_in_memory().unwrap();
        let mut repo = AppointmentRepository::load(&db).unwrap();

        book(&db, &mut repo, 10, "09:00", "nine");
        book(&db, &mut repo, 10, "08:30", "half-eight");
        book(&db, &mut repo, 11, "07:00", "next-day");
        book(&db, &mut repo, 10, "13:15", "afternoon");
        book(&db, &mut repo, 10, "08:30", "half-eight-second");

        let day = repo.list_for_day(date(10));
        assert_eq!(
            reasons(&day),
            vec!["half-eight", "half-eight-second", "nine", "afternoon"]
        );
        assert!(repo.list_for_day(date(12)).is_empty());
    }

    #[test]
    fn test_list_for_week() {
        let db = Database::open_in_memory().unwrap();
        let mut repo = AppointmentRepository::load(&db).unwrap();

        // 2024-06-09 is a Sunday
        book(&db, &mut repo, 9, "10:00", "sunday");
        book(&db, &mut repo, 12, "10:00", "wednesday");
        book(&db, &mut repo, 15, "10:00", "saturday");
        book(&db, &mut repo, 16, "10:00", "next-week");

        let week = repo.list_for_week(date(9));
        assert_eq!(reasons(&week[0]), vec!["sunday"]);
        assert_eq!(reasons(&week[3]), vec!["wednesday"]);
        assert_eq!(reasons(&week[6]), vec!["saturday"]);
        assert_eq!(week.iter().map(Vec::len).sum::<usize>(), 3);
    }

    #[test]
    fn test_write_through() {
        let db = Database::open_in_memory().unwrap();
        let mut repo = AppointmentRepository::load(&db).unwrap();
        let booked = book(&db, &mut repo, 10, "09:00", "checkup");

        let reloaded = AppointmentRepository::load(&db).unwrap();
        assert_eq!(reloaded.all(), &[booked]);
        assert_eq!(
            reloaded.all()[0].time,
            TimeOfDay::new(9, 0).unwrap()
        );
    }
}
