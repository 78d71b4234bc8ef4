// Handler for the per-row "exclude from built area" checkbox.
use crate::data::form_store::FormStore;

use super::{FieldChange, RecalcEngine};

pub fn handle_exclusion_toggle(engine: &RecalcEngine, store: &mut dyn FormStore, row_id: &str) -> FieldChange {
    tracing::debug!(row_id = %row_id, "Exclusion toggled");
    FieldChange::Exclusion {
        row_id: row_id.to_string(),
        totals: engine.recalc_totals(store, false),
    }
}
