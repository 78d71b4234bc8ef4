use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Floor type whose built area counts as sellable private area.
pub const AUTONOMOUS_PRIVATIVE_TYPE: &str = "Área Privativa (Autônoma)";

/// One floor ("pavimento") of the feasibility table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorRow {
    pub row_id: String,
    #[serde(default)]
    pub name: String,
    pub floor_type: String,
    pub area: f64,
    pub repetitions: f64,
    pub coefficient: f64,
    #[serde(default)]
    pub excluded: bool,
}

impl FloorRow {
    /// Raw built area: `area × repetitions`.
    pub fn constructed_area(&self) -> f64 {
        self.area * self.repetitions
    }

    /// Weighted area used for cost allocation. Excluded rows still have one.
    pub fn equivalent_area(&self) -> f64 {
        self.constructed_area() * self.coefficient
    }

    /// Built area as it counts towards the constructed total.
    pub fn counted_constructed_area(&self) -> f64 {
        if self.excluded {
            0.0
        } else {
            self.constructed_area()
        }
    }

    pub fn is_type(&self, label: &str) -> bool {
        self.floor_type == label
    }
}

/// Coefficient bounds for one floor type, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct TypeRange {
    pub min: f64,
    pub max: f64,
}

impl TypeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        self.min.max(self.max.min(value))
    }

    /// A single admissible value; the coefficient control is locked.
    pub fn is_locked(&self) -> bool {
        self.min == self.max
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl From<[f64; 2]> for TypeRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<TypeRange> for [f64; 2] {
    fn from(range: TypeRange) -> Self {
        [range.min, range.max]
    }
}

/// Floor type label to coefficient bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRangeTable(BTreeMap<String, TypeRange>);

impl TypeRangeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the feasibility form.
    pub fn builtin() -> Self {
        [
            (AUTONOMOUS_PRIVATIVE_TYPE, 1.00, 1.00),
            ("Áreas de lazer ambientadas", 2.00, 4.00),
            ("Varandas", 0.75, 1.00),
            ("Terraços / Áreas Descobertas", 0.30, 0.60),
            ("Garagem (Subsolo)", 0.50, 0.75),
            ("Estacionamento (terreno)", 0.05, 0.10),
            ("Salas com Acabamento", 1.00, 1.00),
            ("Salas sem Acabamento", 0.75, 0.90),
            ("Loja sem Acabamento", 0.40, 0.60),
            ("Serviço (unifam. baixa, aberta)", 0.50, 0.50),
            ("Barrilete / Cx D'água / Casa Máquinas", 0.50, 0.75),
            ("Piscinas", 0.50, 0.75),
            ("Quintais / Calçadas / Jardins", 0.10, 0.30),
            ("Projeção Terreno sem Benfeitoria", 0.00, 0.00),
        ]
        .into_iter()
        .map(|(label, min, max)| (label.to_string(), TypeRange::new(min, max)))
        .collect()
    }

    /// Parses the `{"label": [min, max]}` mapping embedded in the form page.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn get(&self, label: &str) -> Option<TypeRange> {
        self.0.get(label).copied()
    }

    pub fn insert(&mut self, label: impl Into<String>, range: TypeRange) {
        self.0.insert(label.into(), range);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeRange)> {
        self.0.iter().map(|(label, range)| (label.as_str(), *range))
    }
}

impl FromIterator<(String, TypeRange)> for TypeRangeTable {
    fn from_iter<I: IntoIterator<Item = (String, TypeRange)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Aggregates of one recalculation pass over the floor table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeasibilityTotals {
    pub constructed_area_total: f64,
    pub equivalent_area_total: f64,
    pub privative_area_total: f64,
    pub direct_cost: f64,
    pub cost_per_area: f64,
    pub cost_per_unit: f64,
    pub privative_to_constructed_ratio: f64,
    pub num_units: u32,
}

impl FeasibilityTotals {
    pub fn from_rows<'a, I>(rows: I, privative_type: &str, unit_cost: f64, num_units: u32) -> Self
    where
        I: IntoIterator<Item = &'a FloorRow>,
    {
        let mut totals = FeasibilityTotals::default();
        for row in rows {
            totals.equivalent_area_total += row.equivalent_area();
            totals.constructed_area_total += row.counted_constructed_area();
            if row.is_type(privative_type) {
                totals.privative_area_total += row.constructed_area();
            }
        }

        let direct_cost = totals.equivalent_area_total * unit_cost;
        totals.direct_cost = if direct_cost.is_nan() { 0.0 } else { direct_cost };

        let num_units = num_units.max(1);
        totals.num_units = num_units;
        totals.cost_per_unit = totals.direct_cost / f64::from(num_units);

        if totals.constructed_area_total > 0.0 {
            totals.cost_per_area = totals.direct_cost / totals.constructed_area_total;
            totals.privative_to_constructed_ratio =
                totals.privative_area_total / totals.constructed_area_total;
        }
        totals
    }
}

/// Unit count as read from a form field: whole units, never below one.
pub fn unit_count(raw: f64) -> u32 {
    let whole = raw.trunc();
    if whole >= 1.0 {
        // `as` saturates at u32::MAX
        whole as u32
    } else {
        1
    }
}
