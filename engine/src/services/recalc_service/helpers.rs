// Field routing and value application shared by the change handlers.
use shared::utils::brazilian_format::parse_decimal;

use crate::data::form_store::{fields, to_field_value, ControlKind, FormStore};
use crate::error::EngineError;

use super::FieldValue;

// Bounds assumed for a slider that carries none.
const DEFAULT_RANGE_MIN: f64 = 0.0;
const DEFAULT_RANGE_MAX: f64 = 9999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorField {
    Repetitions,
    Area,
    Coefficient,
    FloorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRoute<'a> {
    Floor { field: FloorField, row_id: &'a str },
    Exclusion { row_id: &'a str },
    CoefficientRange { row_id: &'a str },
    Other,
}

/// Classifies a control name. Floor fields must look like
/// `(rep|area|coef|tipo)_<digits>`, so project fields such as
/// `area_privativa` never route to a row.
pub fn route_field(name: &str) -> FieldRoute<'_> {
    if let Some(row_id) = name.strip_prefix("excluir_") {
        return FieldRoute::Exclusion { row_id };
    }
    if let Some(row_id) = name.strip_prefix("coef_range_") {
        if !row_id.is_empty() {
            return FieldRoute::CoefficientRange { row_id };
        }
    }
    let Some((prefix, row_id)) = name.split_once('_') else {
        return FieldRoute::Other;
    };
    if row_id.is_empty() || !row_id.bytes().all(|b| b.is_ascii_digit()) {
        return FieldRoute::Other;
    }
    let field = match prefix {
        fields::REPETITIONS => FloorField::Repetitions,
        fields::AREA => FloorField::Area,
        fields::COEFFICIENT => FloorField::Coefficient,
        fields::FLOOR_TYPE => FloorField::FloorType,
        _ => return FieldRoute::Other,
    };
    FieldRoute::Floor { field, row_id }
}

/// Stores a host-supplied value in the named control.
pub fn apply_value(store: &mut dyn FormStore, name: &str, value: &FieldValue) -> Result<(), EngineError> {
    let control = store
        .control_mut(name)
        .ok_or_else(|| EngineError::MissingControl(name.to_string()))?;
    match (control.kind, value) {
        (ControlKind::Checkbox, FieldValue::Checked(checked)) => control.checked = *checked,
        (ControlKind::Checkbox, FieldValue::Text(text)) => {
            control.checked = matches!(text.trim().to_lowercase().as_str(), "true" | "on" | "1" | "sim");
        }
        (_, FieldValue::Text(text)) => control.value = text.clone(),
        (found, FieldValue::Checked(_)) => {
            return Err(EngineError::ControlKindMismatch {
                name: name.to_string(),
                expected: ControlKind::Checkbox,
                found,
            })
        }
    }
    Ok(())
}

/// Clamps the named control's value into the bounds of the row's slider and
/// writes the result to both controls. Returns the clamped coefficient, or
/// `None` when the row has no slider.
pub fn clamp_to_slider(store: &mut dyn FormStore, source: &str, row_id: &str) -> Result<Option<f64>, EngineError> {
    let range_name = fields::row_field(fields::COEFFICIENT_RANGE, row_id);
    let coef_name = fields::row_field(fields::COEFFICIENT, row_id);

    let Some(slider) = store.control(&range_name) else {
        return Ok(None);
    };
    slider.expect_kind(&range_name, ControlKind::Range)?;
    let min = slider.min.unwrap_or(DEFAULT_RANGE_MIN);
    let max = slider.max.unwrap_or(DEFAULT_RANGE_MAX);

    let value = parse_decimal(store.value(source));
    let clamped = min.max(max.min(value));
    let text = to_field_value(clamped);

    for name in [&range_name, &coef_name] {
        if let Some(control) = store.control_mut(name) {
            control.value = text.clone();
        }
    }
    Ok(Some(clamped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FormControl, MemoryFormStore};

    #[test]
    fn test_route_floor_fields() {
        assert_eq!(route_field("area_1"), FieldRoute::Floor { field: FloorField::Area, row_id: "1" });
        assert_eq!(route_field("rep_12"), FieldRoute::Floor { field: FloorField::Repetitions, row_id: "12" });
        assert_eq!(route_field("coef_5"), FieldRoute::Floor { field: FloorField::Coefficient, row_id: "5" });
        assert_eq!(route_field("tipo_3"), FieldRoute::Floor { field: FloorField::FloorType, row_id: "3" });
    }

    #[test]
    fn test_route_project_fields_are_not_floor_fields() {
        for name in ["area_privativa", "custo_area_privativa", "area_total_construcao", "area_comum", "area_", "nome"] {
            assert_eq!(route_field(name), FieldRoute::Other, "field {}", name);
        }
    }

    #[test]
    fn test_route_exclusion_and_slider() {
        assert_eq!(route_field("excluir_4"), FieldRoute::Exclusion { row_id: "4" });
        assert_eq!(route_field("coef_range_4"), FieldRoute::CoefficientRange { row_id: "4" });
    }

    #[test]
    fn test_apply_value() {
        let mut store = MemoryFormStore::new();
        store.insert_control("area_1", FormControl::number("1"));
        store.insert_control("excluir_1", FormControl::checkbox(false));

        apply_value(&mut store, "area_1", &FieldValue::from("12,5")).unwrap();
        assert_eq!(store.value("area_1"), Some("12,5"));

        apply_value(&mut store, "excluir_1", &FieldValue::Checked(true)).unwrap();
        assert!(store.control("excluir_1").unwrap().checked);
        apply_value(&mut store, "excluir_1", &FieldValue::from("off")).unwrap();
        assert!(!store.control("excluir_1").unwrap().checked);

        assert!(matches!(
            apply_value(&mut store, "area_1", &FieldValue::Checked(true)),
            Err(EngineError::ControlKindMismatch { .. })
        ));
        assert!(matches!(
            apply_value(&mut store, "rep_1", &FieldValue::from("2")),
            Err(EngineError::MissingControl(_))
        ));
    }

    #[test]
    fn test_clamp_to_slider() {
        let mut store = MemoryFormStore::new();
        store.insert_control("coef_1", FormControl::number("1,2"));
        store.insert_control("coef_range_1", FormControl::range(0.6, 0.5, 0.75));

        assert_eq!(clamp_to_slider(&mut store, "coef_1", "1").unwrap(), Some(0.75));
        assert_eq!(store.value("coef_1"), Some("0.75"));
        assert_eq!(store.value("coef_range_1"), Some("0.75"));
    }

    #[test]
    fn test_clamp_without_slider() {
        let mut store = MemoryFormStore::new();
        store.insert_control("coef_1", FormControl::number("7"));
        assert_eq!(clamp_to_slider(&mut store, "coef_1", "1").unwrap(), None);
        assert_eq!(store.value("coef_1"), Some("7"));
    }

    #[test]
    fn test_clamp_slider_without_bounds() {
        let mut store = MemoryFormStore::new();
        let mut slider = FormControl::range(0.0, 0.0, 1.0);
        slider.min = None;
        slider.max = None;
        store.insert_control("coef_range_1", slider);
        store.insert_control("coef_1", FormControl::number("-3"));
        assert_eq!(clamp_to_slider(&mut store, "coef_1", "1").unwrap(), Some(0.0));
    }
}
