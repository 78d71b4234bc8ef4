// Handler for the coefficient slider of a floor row.
use crate::data::form_store::FormStore;
use crate::error::EngineError;

use super::helpers;
use super::{FieldChange, RecalcEngine};

pub fn handle_range_input(
    engine: &RecalcEngine,
    store: &mut dyn FormStore,
    name: &str,
    row_id: &str,
) -> Result<FieldChange, EngineError> {
    // The slider was just written, so it exists.
    let coefficient = helpers::clamp_to_slider(store, name, row_id)?.unwrap_or_default();
    engine.compute_equivalent_area(store, row_id);
    let totals = engine.recalc_totals(store, false);
    Ok(FieldChange::CoefficientRange {
        row_id: row_id.to_string(),
        coefficient,
        totals,
    })
}
