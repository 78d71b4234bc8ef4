// Keeps a row's coefficient controls within the bounds of its floor type.
use shared::models::TypeRangeTable;
use shared::utils::brazilian_format::parse_decimal;

use crate::data::form_store::{fields, to_field_value, ControlKind, FormStore};
use crate::error::EngineError;

/// Applies the `[min, max]` range of `selected_type` to the row's slider and
/// numeric coefficient field, clamping the current value. A locked range
/// (`min == max`) disables the slider. Unknown types leave the row untouched.
///
/// Returns the coefficient now in the form. Errors are logged, never
/// propagated, so one malformed row cannot stop the rest of the table.
pub fn sync_coefficient_range(
    store: &mut dyn FormStore,
    ranges: &TypeRangeTable,
    selected_type: &str,
    row_id: &str,
) -> Option<f64> {
    match try_sync_coefficient_range(store, ranges, selected_type, row_id) {
        Ok(coefficient) => coefficient,
        Err(e) => {
            tracing::error!(
                row_id = %row_id,
                floor_type = %selected_type,
                error = %e,
                "Failed to sync coefficient range"
            );
            None
        }
    }
}

pub fn try_sync_coefficient_range(
    store: &mut dyn FormStore,
    ranges: &TypeRangeTable,
    selected_type: &str,
    row_id: &str,
) -> Result<Option<f64>, EngineError> {
    let Some(range) = ranges.get(selected_type) else {
        tracing::debug!(row_id = %row_id, floor_type = %selected_type, "No coefficient range for floor type");
        return Ok(None);
    };

    let range_name = fields::row_field(fields::COEFFICIENT_RANGE, row_id);
    let coef_name = fields::row_field(fields::COEFFICIENT, row_id);

    // Check both controls before writing so a bad row is left as it was.
    if let Some(slider) = store.control(&range_name) {
        slider.expect_kind(&range_name, ControlKind::Range)?;
    }
    if let Some(numeric) = store.control(&coef_name) {
        numeric.expect_value_input(&coef_name)?;
    }

    let clamped = match store.value(&coef_name).filter(|raw| !raw.is_empty()) {
        Some(raw) => range.clamp(parse_decimal(Some(raw))),
        None => range.min,
    };

    if let Some(slider) = store.control_mut(&range_name) {
        slider.min = Some(range.min);
        slider.max = Some(range.max);
        if range.is_locked() {
            slider.value = to_field_value(range.min);
            slider.disabled = true;
            slider.dimmed = true;
        } else {
            slider.value = to_field_value(clamped);
            slider.disabled = false;
            slider.dimmed = false;
        }
    }

    let mut label = String::new();
    if let Some(numeric) = store.control_mut(&coef_name) {
        numeric.min = Some(range.min);
        numeric.max = Some(range.max);
        numeric.value = to_field_value(clamped);
        label = numeric.value.clone();
    }
    store.set_display_text(&fields::row_field(fields::COEFFICIENT_LABEL, row_id), &label);

    tracing::debug!(row_id = %row_id, floor_type = %selected_type, coefficient = clamped, "Coefficient range synced");
    Ok(Some(clamped))
}
