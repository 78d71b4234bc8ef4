// Engine configuration: type ranges, form field names and financial defaults.
pub mod settings;

pub use settings::{ConstructionStage, FeasibilitySettings, FinancialDefaults, PercentBand};
