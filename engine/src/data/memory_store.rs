// In-memory form store, used by the CLI and by tests in place of a rendered page.
use shared::models::{FloorRow, TypeRange};
use std::collections::HashMap;

use super::form_store::{fields, to_field_value, FormControl, FormStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryFormStore {
    controls: HashMap<String, FormControl>,
    // Document order of `controls`.
    order: Vec<String>,
    displays: HashMap<String, String>,
    table_rows: Vec<Vec<String>>,
    focused: Option<String>,
}

impl MemoryFormStore {
    pub fn new() -> Self {
        MemoryFormStore::default()
    }

    pub fn insert_control(&mut self, name: impl Into<String>, control: FormControl) {
        let name = name.into();
        if !self.controls.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.controls.insert(name, control);
    }

    pub fn remove_control(&mut self, name: &str) -> Option<FormControl> {
        self.order.retain(|n| n != name);
        self.controls.remove(name)
    }

    /// Renders an empty display element.
    pub fn insert_display(&mut self, id: impl Into<String>) {
        self.displays.insert(id.into(), String::new());
    }

    pub fn remove_display(&mut self, id: &str) -> Option<String> {
        self.displays.remove(id)
    }

    /// Adds a row to the floor table body holding the given controls.
    pub fn push_table_row(&mut self, names: Vec<String>) {
        self.table_rows.push(names);
    }

    pub fn set_focus(&mut self, name: Option<&str>) {
        self.focused = name.map(str::to_string);
    }

    /// Lays out one floor row the way the feasibility page renders it:
    /// numeric inputs, type selector, exclusion checkbox, coefficient slider
    /// (when the type is known) and the three display cells.
    pub fn add_floor_row(&mut self, row: &FloorRow, range: Option<TypeRange>) {
        let id = row.row_id.as_str();
        let mut names = Vec::with_capacity(6);

        let mut add = |store: &mut Self, prefix: &str, control: FormControl| {
            let name = fields::row_field(prefix, id);
            store.insert_control(name.clone(), control);
            names.push(name);
        };
        add(self, fields::FLOOR_TYPE, FormControl::select(row.floor_type.clone()));
        add(self, fields::REPETITIONS, FormControl::number(to_field_value(row.repetitions)));
        add(self, fields::AREA, FormControl::number(to_field_value(row.area)));
        add(self, fields::COEFFICIENT, FormControl::number(to_field_value(row.coefficient)));
        if let Some(range) = range {
            add(
                self,
                fields::COEFFICIENT_RANGE,
                FormControl::range(range.clamp(row.coefficient), range.min, range.max),
            );
        }
        add(self, fields::EXCLUDED, FormControl::checkbox(row.excluded));

        for cell in [
            fields::COEFFICIENT_LABEL,
            fields::EQUIVALENT_AREA_CELL,
            fields::CONSTRUCTED_AREA_CELL,
        ] {
            self.insert_display(fields::row_field(cell, id));
        }
        self.table_rows.push(names);
    }

    pub fn add_summary_cards(&mut self) {
        for card in fields::SUMMARY_CARDS {
            self.insert_display(card);
        }
    }
}

impl FormStore for MemoryFormStore {
    fn control(&self, name: &str) -> Option<&FormControl> {
        self.controls.get(name)
    }

    fn control_mut(&mut self, name: &str) -> Option<&mut FormControl> {
        self.controls.get_mut(name)
    }

    fn control_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn floor_table_rows(&self) -> Vec<Vec<String>> {
        self.table_rows.clone()
    }

    fn display_text(&self, id: &str) -> Option<&str> {
        self.displays.get(id).map(String::as_str)
    }

    fn set_display_text(&mut self, id: &str, text: &str) -> bool {
        match self.displays.get_mut(id) {
            Some(current) => {
                current.clear();
                current.push_str(text);
                true
            }
            None => false,
        }
    }

    fn focused_field(&self) -> Option<&str> {
        self.focused.as_deref()
    }
}
