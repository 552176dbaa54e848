//! Structured-logging vocabulary shared across the crate: canonical event
//! names and field-value formatting helpers.

pub mod events;
pub mod fields;
