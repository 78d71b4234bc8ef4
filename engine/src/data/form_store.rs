// Read/write adapter over the feasibility form. The engine never touches a
// rendering surface directly; hosts implement `FormStore` over whatever holds
// the form (a DOM, a GUI model, or `MemoryFormStore` in tests and the CLI).
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Field and element naming used by the floor table and summary cards.
pub mod fields {
    pub const AREA: &str = "area";
    pub const REPETITIONS: &str = "rep";
    pub const COEFFICIENT: &str = "coef";
    pub const FLOOR_TYPE: &str = "tipo";
    pub const EXCLUDED: &str = "excluir";
    pub const COEFFICIENT_RANGE: &str = "coef_range";
    pub const COEFFICIENT_LABEL: &str = "coef_val";
    pub const EQUIVALENT_AREA_CELL: &str = "area_eq";
    pub const CONSTRUCTED_AREA_CELL: &str = "area_constr";

    pub const CARD_CONSTRUCTED_AREA: &str = "card_area_construida";
    pub const CARD_CONSTRUCTED_AREA_2: &str = "card_area_construida_2";
    pub const CARD_EQUIVALENT_AREA: &str = "card_area_equivalente";
    pub const CARD_PRIVATIVE_AREA: &str = "card_area_privativa";
    pub const CARD_DIRECT_COST: &str = "card_custo_direto";
    pub const CARD_COST_PER_AREA: &str = "card_custo_m2";
    pub const CARD_COST_PER_UNIT: &str = "card_custo_unidade";
    pub const CARD_PRIVATIVE_RATIO: &str = "card_rel_ap_ac";

    pub const SUMMARY_CARDS: [&str; 8] = [
        CARD_CONSTRUCTED_AREA,
        CARD_CONSTRUCTED_AREA_2,
        CARD_EQUIVALENT_AREA,
        CARD_PRIVATIVE_AREA,
        CARD_DIRECT_COST,
        CARD_COST_PER_AREA,
        CARD_COST_PER_UNIT,
        CARD_PRIVATIVE_RATIO,
    ];

    /// `<prefix>_<row_id>`
    pub fn row_field(prefix: &str, row_id: &str) -> String {
        format!("{}_{}", prefix, row_id)
    }

    /// Row id of a `<prefix>_<row_id>` name: the segment after the first `_`.
    pub fn row_id_of(name: &str) -> Option<&str> {
        name.split('_').nth(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKind {
    Text,
    Number,
    Checkbox,
    Select,
    Range,
}

/// An input-like control of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormControl {
    pub kind: ControlKind,
    pub value: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub checked: bool,
    pub disabled: bool,
    /// Rendered de-emphasized (a locked coefficient slider).
    pub dimmed: bool,
}

impl FormControl {
    fn with_kind(kind: ControlKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            min: None,
            max: None,
            checked: false,
            disabled: false,
            dimmed: false,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::with_kind(ControlKind::Text, value)
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self::with_kind(ControlKind::Number, value)
    }

    pub fn checkbox(checked: bool) -> Self {
        Self {
            checked,
            ..Self::with_kind(ControlKind::Checkbox, "on")
        }
    }

    pub fn select(value: impl Into<String>) -> Self {
        Self::with_kind(ControlKind::Select, value)
    }

    pub fn range(value: f64, min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::with_kind(ControlKind::Range, to_field_value(value))
        }
    }

    /// Text and number inputs both carry free-form numeric text.
    pub fn is_value_input(&self) -> bool {
        matches!(self.kind, ControlKind::Text | ControlKind::Number)
    }

    pub fn expect_kind(&self, name: &str, expected: ControlKind) -> Result<(), EngineError> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(EngineError::ControlKindMismatch {
                name: name.to_string(),
                expected,
                found: self.kind,
            })
        }
    }

    pub fn expect_value_input(&self, name: &str) -> Result<(), EngineError> {
        if self.is_value_input() {
            Ok(())
        } else {
            self.expect_kind(name, ControlKind::Number)
        }
    }
}

/// Text written back into a numeric control, shortest round-trip form
/// ("0.5", "1", "1234.56").
pub fn to_field_value(value: f64) -> String {
    format!("{}", value + 0.0)
}

pub trait FormStore {
    fn control(&self, name: &str) -> Option<&FormControl>;

    fn control_mut(&mut self, name: &str) -> Option<&mut FormControl>;

    /// Names of every control, in document order.
    fn control_names(&self) -> Vec<String>;

    /// Control names inside each row of the floor table body.
    fn floor_table_rows(&self) -> Vec<Vec<String>>;

    fn display_text(&self, id: &str) -> Option<&str>;

    /// Returns `false` when no such display element is rendered.
    fn set_display_text(&mut self, id: &str, text: &str) -> bool;

    fn focused_field(&self) -> Option<&str>;

    fn value(&self, name: &str) -> Option<&str> {
        self.control(name).map(|c| c.value.as_str())
    }

    fn in_floor_table(&self, name: &str) -> bool {
        self.floor_table_rows()
            .iter()
            .any(|row| row.iter().any(|n| n == name))
    }
}
