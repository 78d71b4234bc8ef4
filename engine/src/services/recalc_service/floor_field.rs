// Handler for edits of a floor row's repetitions, area, coefficient or type.
use crate::data::form_store::FormStore;
use crate::error::EngineError;

use super::helpers::{self, FloorField};
use super::{FieldChange, RecalcEngine};

pub fn handle_floor_field(
    engine: &RecalcEngine,
    store: &mut dyn FormStore,
    name: &str,
    field: FloorField,
    row_id: &str,
) -> Result<FieldChange, EngineError> {
    match field {
        FloorField::Coefficient => {
            // A typed coefficient follows the slider's bounds.
            helpers::clamp_to_slider(store, name, row_id)?;
        }
        FloorField::FloorType => {
            let selected = store.value(name).unwrap_or_default().to_string();
            engine.sync_coefficient_range(store, &selected, row_id);
        }
        FloorField::Repetitions | FloorField::Area => {}
    }

    let equivalent_area = engine.compute_equivalent_area(store, row_id);
    let totals = engine.recalc_totals(store, false);
    Ok(FieldChange::Floor {
        row_id: row_id.to_string(),
        equivalent_area,
        totals,
    })
}
