//! Domain models for the clinic records system.

mod appointment;
mod fields;
mod medical_record;
mod patient;

pub use appointment::*;
pub use fields::normalize_optional;
pub use medical_record::*;
pub use patient::*;
