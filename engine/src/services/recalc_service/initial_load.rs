// First pass after the form is built: apply type ranges, then force totals.
use shared::models::FeasibilityTotals;

use crate::data::form_store::{fields, ControlKind, FormStore};

use super::RecalcEngine;

pub fn handle_initial_load(engine: &RecalcEngine, store: &mut dyn FormStore) -> Option<FeasibilityTotals> {
    let selectors: Vec<String> = store
        .control_names()
        .into_iter()
        .filter(|name| name.starts_with("tipo_"))
        .filter(|name| store.control(name).is_some_and(|c| c.kind == ControlKind::Select))
        .collect();

    for name in &selectors {
        let Some(row_id) = fields::row_id_of(name) else {
            continue;
        };
        let selected = store.value(name).unwrap_or_default().to_string();
        engine.sync_coefficient_range(store, &selected, row_id);
    }

    tracing::info!(selectors = selectors.len(), "Running initial recalculation");
    engine.recalc_totals(store, true)
}
