//! Property tests for repository and store invariants.

use chrono::NaiveDate;
use clinic_core::db::{Collection, Database};
use clinic_core::models::{Appointment, AppointmentInput, Gender, Patient, PatientInput, TimeOfDay};
use clinic_core::repo::{AppointmentRepository, MedicalRecordRepository, PatientRepository};
use proptest::prelude::*;

fn patient_input() -> impl Strategy<Value = PatientInput> {
    (
        "[A-Za-z]{1,10}",
        "[A-Za-z]{1,10}",
        "[0-9]{3}-[0-9]{4}",
        prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)],
        1..=28u32,
    )
        .prop_map(|(first, last, phone, gender, day)| {
            PatientInput::new(
                first,
                last,
                NaiveDate::from_ymd_opt(1990, 1, day).unwrap(),
                gender,
                phone,
            )
        })
}

fn booking() -> impl Strategy<Value = (u32, u8, u8)> {
    (10..=12u32, 0..24u8, prop_oneof![Just(0u8), Just(15), Just(30), Just(45)])
}

proptest! {
    #[test]
    fn prop_saved_patient_round_trips(input in patient_input()) {
        let db = Database::open_in_memory().unwrap();
        let mut repo = PatientRepository::load(&db).unwrap();

        let saved = repo.save(&db, input.clone()).unwrap().unwrap();
        let fetched = repo.get_by_id(&saved.id).unwrap();

        prop_assert_eq!(&fetched.first_name, &input.first_name);
        prop_assert_eq!(&fetched.last_name, &input.last_name);
        prop_assert_eq!(&fetched.phone, &input.phone);
        prop_assert_eq!(fetched.gender, input.gender);
        prop_assert_eq!(fetched.date_of_birth, input.date_of_birth);
    }

    #[test]
    fn prop_filter_returns_exact_subset(
        inputs in prop::collection::vec(patient_input(), 1..12),
        pick in any::<prop::sample::Index>(),
    ) {
        let db = Database::open_in_memory().unwrap();
        let mut repo = PatientRepository::load(&db).unwrap();
        for input in inputs {
            repo.save(&db, input).unwrap();
        }

        let all: Vec<Patient> = repo.list("").into_iter().cloned().collect();
        prop_assert_eq!(all.len(), repo.len());

        let target = &all[pick.index(all.len())];
        let filter = target.last_name.to_uppercase();
        let expected: Vec<&str> = all
            .iter()
            .filter(|p| {
                p.full_name().to_lowercase().contains(&filter.to_lowercase())
                    || p.phone.contains(&filter)
            })
            .map(|p| p.id.as_str())
            .collect();
        let actual: Vec<String> = repo.list(&filter).iter().map(|p| p.id.clone()).collect();

        prop_assert!(actual.contains(&target.id));
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_delete_removes(inputs in prop::collection::vec(patient_input(), 1..8)) {
        let db = Database::open_in_memory().unwrap();
        let mut repo = PatientRepository::load(&db).unwrap();
        let ids: Vec<String> = inputs
            .into_iter()
            .map(|i| repo.save(&db, i).unwrap().unwrap().id)
            .collect();

        let victim = &ids[0];
        prop_assert!(repo.delete(&db, victim).unwrap());
        prop_assert!(repo.get_by_id(victim).is_none());
        prop_assert!(repo.list("").iter().all(|p| &p.id != victim));
        prop_assert_eq!(repo.len(), ids.len() - 1);
    }

    #[test]
    fn prop_day_listing_sorted_and_stable(bookings in prop::collection::vec(booking(), 0..30)) {
        let db = Database::open_in_memory().unwrap();
        let mut repo = AppointmentRepository::load(&db).unwrap();
        let mut booked: Vec<Appointment> = Vec::new();
        for (day, hour, minute) in bookings {
            let input = AppointmentInput::new(
                "p1",
                NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
                TimeOfDay::new(hour, minute).unwrap(),
            );
            booked.push(repo.save(&db, input).unwrap());
        }

        let target = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
        let listed = repo.list_for_day(target);

        prop_assert!(listed.iter().all(|a| a.date == target));
        prop_assert_eq!(listed.len(), booked.iter().filter(|a| a.date == target).count());
        prop_assert!(listed.windows(2).all(|w| w[0].time <= w[1].time));

        // Equal times keep booking order
        let position = |id: &str| booked.iter().position(|a| a.id == id).unwrap();
        for w in listed.windows(2) {
            if w[0].time == w[1].time {
                prop_assert!(position(&w[0].id) < position(&w[1].id));
            }
        }
    }

    #[test]
    fn prop_store_round_trip_idempotent(inputs in prop::collection::vec(patient_input(), 0..8)) {
        let db = Database::open_in_memory().unwrap();
        let mut repo = PatientRepository::load(&db).unwrap();
        for input in inputs {
            repo.save(&db, input).unwrap();
        }

        let first: Vec<Patient> = db.load(Collection::Patients).unwrap();
        db.save(Collection::Patients, &first).unwrap();
        let second: Vec<Patient> = db.load(Collection::Patients).unwrap();
        prop_assert_eq!(first, second);

        // Untouched collections round-trip as empty
        let records: Vec<clinic_core::models::MedicalRecord> =
            db.load(Collection::MedicalRecords).unwrap();
        db.save(Collection::MedicalRecords, &records).unwrap();
        prop_assert_eq!(MedicalRecordRepository::load(&db).unwrap().len(), 0);
    }
}
