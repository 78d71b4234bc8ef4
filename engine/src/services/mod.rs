// Event handling for the feasibility form.
pub mod recalc_service;

pub use recalc_service::{FieldChange, FieldValue, RecalcEngine};
