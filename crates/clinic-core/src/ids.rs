//! Identifier generation for new entities.

/// Generate a fresh opaque identifier (random v4 UUID).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
