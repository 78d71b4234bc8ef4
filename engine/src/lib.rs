// Engine library root: recalculation of the feasibility form.

pub mod config;
pub mod data;
pub mod derivation;
pub mod error;
pub mod report;
pub mod services;

pub use error::EngineError;
pub use services::{FieldChange, FieldValue, RecalcEngine};
