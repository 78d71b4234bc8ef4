// Derived values of the feasibility form.
pub mod analysis;
pub mod coefficient;
pub mod financials;
pub mod row;
pub mod totals;

pub use analysis::{analyze, FeasibilityAnalysis, MarginHealth};
pub use coefficient::sync_coefficient_range;
pub use financials::{construction_stage_costs, project_financials, FinancialResults, ProjectInputs, StageCost};
pub use row::{compute_constructed_area, compute_equivalent_area};
pub use totals::{read_floor_rows, recalc_totals};
