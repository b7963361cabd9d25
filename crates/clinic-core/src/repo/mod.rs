//! In-memory entity repositories with write-through persistence.
//!
//! Each repository owns one collection, loaded from the [`Database`](crate::db::Database) once and
//! rewritten wholesale after every mutation. Mutations build the next
//! collection, persist it, and only then swap it in, so a failed write leaves
//! memory and store in agreement.

mod appointments;
mod patients;
mod records;

pub use appointments::*;
pub use patients::*;
pub use records::*;

/// Creation/update timestamp in the stored format.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
