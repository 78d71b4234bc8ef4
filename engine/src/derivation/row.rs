// Per-row derived values: equivalent area and constructed area display cells.
use shared::utils::brazilian_format::{format_decimal, parse_decimal};

use crate::data::form_store::{fields, FormStore};

/// Parsed value of a numeric control; missing or unparsable reads as 0.
pub fn read_number(store: &dyn FormStore, name: &str) -> f64 {
    parse_decimal(store.value(name))
}

/// Recomputes `area × rep × coef` for one row, writes it to the row's
/// equivalent-area cell when rendered, then refreshes the constructed-area
/// cell from the same parsed inputs.
pub fn compute_equivalent_area(store: &mut dyn FormStore, row_id: &str) -> f64 {
    let area = read_number(store, &fields::row_field(fields::AREA, row_id));
    let repetitions = read_number(store, &fields::row_field(fields::REPETITIONS, row_id));
    let coefficient = read_number(store, &fields::row_field(fields::COEFFICIENT, row_id));

    let equivalent_area = area * repetitions * coefficient;
    store.set_display_text(
        &fields::row_field(fields::EQUIVALENT_AREA_CELL, row_id),
        &format_decimal(equivalent_area),
    );
    tracing::debug!(row_id = %row_id, area, repetitions, coefficient, equivalent_area, "Equivalent area updated");

    compute_constructed_area(store, row_id, Some(area), Some(repetitions));
    equivalent_area
}

/// Writes `area × rep` to the constructed-area cell. Values not supplied are
/// read from the form. Does nothing when the cell is not rendered.
pub fn compute_constructed_area(
    store: &mut dyn FormStore,
    row_id: &str,
    area: Option<f64>,
    repetitions: Option<f64>,
) -> Option<f64> {
    let cell = fields::row_field(fields::CONSTRUCTED_AREA_CELL, row_id);
    store.display_text(&cell)?;

    let area = area.unwrap_or_else(|| read_number(store, &fields::row_field(fields::AREA, row_id)));
    let repetitions =
        repetitions.unwrap_or_else(|| read_number(store, &fields::row_field(fields::REPETITIONS, row_id)));

    let constructed_area = area * repetitions;
    store.set_display_text(&cell, &format_decimal(constructed_area));
    Some(constructed_area)
}
