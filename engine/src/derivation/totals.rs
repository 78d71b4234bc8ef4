// Full recalculation pass over the floor table and the summary cards.
use shared::models::{unit_count, FeasibilityTotals, FloorRow};
use shared::utils::brazilian_format::{format_decimal, format_fixed, parse_decimal};

use crate::config::FeasibilitySettings;
use crate::data::form_store::{fields, ControlKind, FormControl, FormStore};

use super::row::read_number;

/// Recomputes every row cell and summary card from the current form state.
///
/// Unless `force` is set, nothing happens while a project-level field has
/// focus. Returns `None` without writing when skipped or when the floor
/// table has no rows.
pub fn recalc_totals(
    store: &mut dyn FormStore,
    settings: &FeasibilitySettings,
    force: bool,
) -> Option<FeasibilityTotals> {
    if !force {
        if let Some(focused) = store.focused_field() {
            if settings.is_project_field(focused) {
                tracing::debug!(field = %focused, "Project field has focus, skipping recalculation");
                return None;
            }
        }
    }

    let table_rows = store.floor_table_rows();
    if table_rows.is_empty() {
        tracing::debug!("No floor rows found, skipping recalculation");
        return None;
    }

    let floors = read_floor_rows(store);
    tracing::debug!(rows = table_rows.len(), floors = floors.len(), force, "Recalculating totals");

    for floor in &floors {
        store.set_display_text(
            &fields::row_field(fields::EQUIVALENT_AREA_CELL, &floor.row_id),
            &format_decimal(floor.equivalent_area()),
        );
        store.set_display_text(
            &fields::row_field(fields::CONSTRUCTED_AREA_CELL, &floor.row_id),
            &format_decimal(floor.counted_constructed_area()),
        );
    }

    let unit_cost = read_number(store, &settings.unit_cost_field);
    let num_units = unit_count(parse_decimal(
        settings
            .unit_count_fields
            .iter()
            .find_map(|id| store.value(id)),
    ));
    let totals = FeasibilityTotals::from_rows(&floors, &settings.privative_type, unit_cost, num_units);

    let cards = [
        (fields::CARD_CONSTRUCTED_AREA, format_decimal(totals.constructed_area_total)),
        (fields::CARD_CONSTRUCTED_AREA_2, format_decimal(totals.constructed_area_total)),
        (fields::CARD_EQUIVALENT_AREA, format_decimal(totals.equivalent_area_total)),
        (fields::CARD_PRIVATIVE_AREA, format_decimal(totals.privative_area_total)),
        (fields::CARD_DIRECT_COST, format_decimal(totals.direct_cost)),
        (fields::CARD_COST_PER_AREA, format_decimal(totals.cost_per_area)),
        (fields::CARD_COST_PER_UNIT, format_decimal(totals.cost_per_unit)),
        (fields::CARD_PRIVATIVE_RATIO, format_fixed(totals.privative_to_constructed_ratio)),
    ];
    for (card, text) in cards {
        store.set_display_text(card, &text);
    }

    Some(totals)
}

/// Reads every complete row of the floor table. Rows lacking a repetitions,
/// area or coefficient input are skipped; the row id comes from the
/// repetitions field name.
pub fn read_floor_rows(store: &dyn FormStore) -> Vec<FloorRow> {
    store
        .floor_table_rows()
        .iter()
        .filter_map(|names| read_floor_row(store, names))
        .collect()
}

fn read_floor_row(store: &dyn FormStore, names: &[String]) -> Option<FloorRow> {
    let find = |prefix: &str, accept: fn(&FormControl) -> bool| {
        names.iter().find(|name| {
            name.starts_with(prefix) && store.control(name).is_some_and(accept)
        })
    };
    let value_input: fn(&FormControl) -> bool = FormControl::is_value_input;

    let rep_name = find("rep_", value_input)?;
    let area_name = find("area_", value_input)?;
    let coef_name = find("coef_", value_input)?;
    let row_id = fields::row_id_of(rep_name)?;

    let excluded = find("excluir_", |c| c.kind == ControlKind::Checkbox)
        .and_then(|name| store.control(name))
        .is_some_and(|c| c.checked);
    let floor_type = find("tipo_", |c| c.kind == ControlKind::Select)
        .and_then(|name| store.value(name))
        .unwrap_or_default();

    Some(FloorRow {
        row_id: row_id.to_string(),
        name: String::new(),
        floor_type: floor_type.to_string(),
        area: read_number(store, area_name),
        repetitions: read_number(store, rep_name),
        coefficient: read_number(store, coef_name),
        excluded,
    })
}
