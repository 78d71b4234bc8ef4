// engine/src/services/recalc_service/mod.rs
// RecalcEngine and its entry points. Each kind of form event has a handler
// in a sibling module.

use shared::models::FeasibilityTotals;

use crate::config::FeasibilitySettings;
use crate::data::form_store::{ControlKind, FormStore};
use crate::derivation;
use crate::error::EngineError;

pub mod exclusion_toggle;
pub mod floor_field;
pub mod helpers;
pub mod initial_load;
pub mod range_input;

use helpers::FieldRoute;

/// New value of a control, as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<bool> for FieldValue {
    fn from(checked: bool) -> Self {
        FieldValue::Checked(checked)
    }
}

/// What the engine did in response to a field change.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Floor {
        row_id: String,
        equivalent_area: f64,
        /// `None` when the pass was skipped (focus guard or empty table).
        totals: Option<FeasibilityTotals>,
    },
    Exclusion {
        row_id: String,
        totals: Option<FeasibilityTotals>,
    },
    CoefficientRange {
        row_id: String,
        coefficient: f64,
        totals: Option<FeasibilityTotals>,
    },
    /// Value stored, nothing recomputed.
    Ignored,
    /// The handler failed and the error was logged.
    Failed { field: String, error: String },
}

/// The feasibility recalculation engine. Holds only configuration; every
/// call re-reads the form it is given.
pub struct RecalcEngine {
    settings: FeasibilitySettings,
}

impl RecalcEngine {
    pub fn new(settings: FeasibilitySettings) -> Self {
        RecalcEngine { settings }
    }

    pub fn settings(&self) -> &FeasibilitySettings {
        &self.settings
    }

    pub fn compute_equivalent_area(&self, store: &mut dyn FormStore, row_id: &str) -> f64 {
        derivation::compute_equivalent_area(store, row_id)
    }

    pub fn compute_constructed_area(
        &self,
        store: &mut dyn FormStore,
        row_id: &str,
        area: Option<f64>,
        repetitions: Option<f64>,
    ) -> Option<f64> {
        derivation::compute_constructed_area(store, row_id, area, repetitions)
    }

    pub fn sync_coefficient_range(&self, store: &mut dyn FormStore, selected_type: &str, row_id: &str) -> Option<f64> {
        derivation::sync_coefficient_range(store, &self.settings.type_ranges, selected_type, row_id)
    }

    pub fn recalc_totals(&self, store: &mut dyn FormStore, force: bool) -> Option<FeasibilityTotals> {
        derivation::recalc_totals(store, &self.settings, force)
    }

    /// Forced first pass once the form has been built.
    pub fn initialize(&self, store: &mut dyn FormStore) -> Option<FeasibilityTotals> {
        initial_load::handle_initial_load(self, store)
    }

    /// Single entry point for host events: stores `value` in the control named
    /// `name` and recomputes whatever depends on it. Never fails; handler
    /// errors are logged and reported as `FieldChange::Failed`.
    pub fn on_field_changed(&self, store: &mut dyn FormStore, name: &str, value: impl Into<FieldValue>) -> FieldChange {
        let value = value.into();
        tracing::debug!(field = %name, ?value, "Field changed");
        match self.dispatch(store, name, &value) {
            Ok(change) => change,
            Err(e) => {
                tracing::error!(field = %name, error = %e, "Field change handler failed");
                FieldChange::Failed {
                    field: name.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }

    fn dispatch(&self, store: &mut dyn FormStore, name: &str, value: &FieldValue) -> Result<FieldChange, EngineError> {
        match helpers::route_field(name) {
            FieldRoute::Floor { field, row_id } if store.in_floor_table(name) => {
                helpers::apply_value(store, name, value)?;
                floor_field::handle_floor_field(self, store, name, field, row_id)
            }
            FieldRoute::Exclusion { row_id }
                if store.control(name).is_some_and(|c| c.kind == ControlKind::Checkbox) =>
            {
                helpers::apply_value(store, name, value)?;
                Ok(exclusion_toggle::handle_exclusion_toggle(self, store, row_id))
            }
            FieldRoute::CoefficientRange { row_id } => {
                helpers::apply_value(store, name, value)?;
                range_input::handle_range_input(self, store, name, row_id)
            }
            _ => {
                if store.control(name).is_some() {
                    helpers::apply_value(store, name, value)?;
                }
                Ok(FieldChange::Ignored)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FormControl, MemoryFormStore};
    use shared::models::{FloorRow, AUTONOMOUS_PRIVATIVE_TYPE};

    fn floor(row_id: &str, floor_type: &str, area: f64, repetitions: f64, coefficient: f64) -> FloorRow {
        FloorRow {
            row_id: row_id.to_string(),
            name: String::new(),
            floor_type: floor_type.to_string(),
            area,
            repetitions,
            coefficient,
            excluded: false,
        }
    }

    fn create_test_engine() -> RecalcEngine {
        RecalcEngine::new(FeasibilitySettings::default())
    }

    fn create_test_store(engine: &RecalcEngine) -> MemoryFormStore {
        let ranges = &engine.settings().type_ranges;
        let rows = [
            floor("1", AUTONOMOUS_PRIVATIVE_TYPE, 100.0, 4.0, 1.0),
            floor("2", "Garagem (Subsolo)", 50.0, 1.0, 0.9),
            floor("3", "Varandas", 10.0, 2.0, 0.8),
        ];
        let mut store = MemoryFormStore::new();
        store.insert_control("nome", FormControl::text("Residencial Aurora"));
        store.insert_control("area_terreno", FormControl::number("1000"));
        store.insert_control("custo_area_privativa", FormControl::number("2.000,00"));
        store.insert_control("projeto_num_unidades", FormControl::number("4"));
        for row in &rows {
            store.add_floor_row(row, ranges.get(&row.floor_type));
        }
        store.add_summary_cards();
        store
    }

    #[test]
    fn test_initialize_clamps_and_forces_totals() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        store.set_focus(Some("area_terreno"));

        let totals = engine.initialize(&mut store).unwrap();
        // Garagem coefficient 0.9 clamps to 0.75.
        assert_eq!(store.value("coef_2"), Some("0.75"));
        assert_eq!(store.display_text("coef_val_2"), Some("0.75"));
        assert!(store.control("coef_range_1").unwrap().disabled);
        assert_eq!(totals.equivalent_area_total, 400.0 + 37.5 + 16.0);
        assert_eq!(store.display_text("card_area_construida"), Some("470,00"));
    }

    #[test]
    fn test_area_edit_recomputes_row_and_totals() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        engine.initialize(&mut store);
        store.set_focus(Some("area_3"));

        let change = engine.on_field_changed(&mut store, "area_3", "20");
        match change {
            FieldChange::Floor { row_id, equivalent_area, totals } => {
                assert_eq!(row_id, "3");
                assert_eq!(equivalent_area, 32.0);
                assert_eq!(totals.unwrap().constructed_area_total, 490.0);
            }
            other => panic!("unexpected change {:?}", other),
        }
        assert_eq!(store.display_text("area_eq_3"), Some("32,00"));
        assert_eq!(store.display_text("area_constr_3"), Some("40,00"));
    }

    #[test]
    fn test_project_field_focus_suppresses_totals_but_not_row() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        engine.initialize(&mut store);
        store.set_focus(Some("custo_area_privativa"));

        match engine.on_field_changed(&mut store, "rep_1", "5") {
            FieldChange::Floor { totals, .. } => assert_eq!(totals, None),
            other => panic!("unexpected change {:?}", other),
        }
        assert_eq!(store.display_text("area_constr_1"), Some("500,00"));
        assert_eq!(store.display_text("card_area_construida"), Some("470,00"));
    }

    #[test]
    fn test_project_fields_are_stored_but_ignored() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        engine.initialize(&mut store);

        let change = engine.on_field_changed(&mut store, "custo_area_privativa", "3.000,00");
        assert_eq!(change, FieldChange::Ignored);
        assert_eq!(store.value("custo_area_privativa"), Some("3.000,00"));
        assert_eq!(store.display_text("card_custo_direto"), Some("907.000,00"));

        let totals = engine.recalc_totals(&mut store, true).unwrap();
        assert_eq!(totals.direct_cost, 453.5 * 3000.0);
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        assert_eq!(engine.on_field_changed(&mut store, "observacoes", "x"), FieldChange::Ignored);
    }

    #[test]
    fn test_floor_named_field_outside_table_is_ignored() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        store.insert_control("area_99", FormControl::number("1"));
        assert_eq!(engine.on_field_changed(&mut store, "area_99", "5"), FieldChange::Ignored);
        assert_eq!(store.value("area_99"), Some("5"));
    }

    #[test]
    fn test_exclusion_toggle() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        engine.initialize(&mut store);

        match engine.on_field_changed(&mut store, "excluir_3", true) {
            FieldChange::Exclusion { row_id, totals } => {
                assert_eq!(row_id, "3");
                let totals = totals.unwrap();
                assert_eq!(totals.constructed_area_total, 450.0);
                assert_eq!(totals.equivalent_area_total, 453.5);
            }
            other => panic!("unexpected change {:?}", other),
        }
        assert_eq!(store.display_text("area_constr_3"), Some("0,00"));
        assert_eq!(store.display_text("area_eq_3"), Some("16,00"));
    }

    #[test]
    fn test_slider_mirrors_into_numeric_field() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        engine.initialize(&mut store);

        match engine.on_field_changed(&mut store, "coef_range_3", "0.9") {
            FieldChange::CoefficientRange { coefficient, totals, .. } => {
                assert_eq!(coefficient, 0.9);
                assert!(totals.is_some());
            }
            other => panic!("unexpected change {:?}", other),
        }
        assert_eq!(store.value("coef_3"), Some("0.9"));
        assert_eq!(store.display_text("area_eq_3"), Some("18,00"));

        engine.on_field_changed(&mut store, "coef_range_3", "3");
        assert_eq!(store.value("coef_3"), Some("1"));
    }

    #[test]
    fn test_typed_coefficient_is_clamped_to_slider() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        engine.initialize(&mut store);

        engine.on_field_changed(&mut store, "coef_3", "0,5");
        assert_eq!(store.value("coef_3"), Some("0.75"));
        assert_eq!(store.value("coef_range_3"), Some("0.75"));
        assert_eq!(store.display_text("area_eq_3"), Some("15,00"));
    }

    #[test]
    fn test_type_change_applies_new_range() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        engine.initialize(&mut store);

        engine.on_field_changed(&mut store, "tipo_3", "Serviço (unifam. baixa, aberta)");
        let slider = store.control("coef_range_3").unwrap();
        assert!(slider.disabled);
        assert_eq!(slider.value, "0.5");
        assert_eq!(store.value("coef_3"), Some("0.5"));
        assert_eq!(store.display_text("area_eq_3"), Some("10,00"));
    }

    #[test]
    fn test_type_change_to_unknown_type_keeps_coefficient() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        engine.initialize(&mut store);

        engine.on_field_changed(&mut store, "tipo_3", "Heliponto");
        assert_eq!(store.value("coef_3"), Some("0.8"));
    }

    #[test]
    fn test_malformed_row_is_logged_not_propagated() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        store.insert_control("coef_range_2", FormControl::select("oops"));

        // Range sync fails for row 2 but the forced pass still runs.
        let totals = engine.initialize(&mut store).unwrap();
        assert_eq!(totals.constructed_area_total, 470.0);
        assert_eq!(store.value("coef_2"), Some("0.9"));

        let change = engine.on_field_changed(&mut store, "coef_2", "0,6");
        assert!(matches!(change, FieldChange::Failed { ref field, .. } if field == "coef_2"));
        assert_eq!(store.value("coef_2"), Some("0,6"));
    }

    #[test]
    fn test_missing_checkbox_value_kind() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        let change = engine.on_field_changed(&mut store, "area_1", true);
        assert!(matches!(change, FieldChange::Failed { .. }));
    }

    #[test]
    fn test_constructed_area_delegate() {
        let engine = create_test_engine();
        let mut store = create_test_store(&engine);
        assert_eq!(engine.compute_constructed_area(&mut store, "2", None, None), Some(50.0));
        assert_eq!(store.display_text("area_constr_2"), Some("50,00"));
    }

    #[test]
    fn test_initialize_on_empty_form() {
        let engine = create_test_engine();
        let mut store = MemoryFormStore::new();
        assert_eq!(engine.initialize(&mut store), None);
    }
}
