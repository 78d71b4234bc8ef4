pub mod models;
pub mod utils;

#[cfg(test)]
mod tests {
    use crate::models::*;

    fn row(area: f64, repetitions: f64, coefficient: f64, floor_type: &str, excluded: bool) -> FloorRow {
        FloorRow {
            row_id: "1".to_string(),
            name: String::new(),
            floor_type: floor_type.to_string(),
            area,
            repetitions,
            coefficient,
            excluded,
        }
    }

    #[test]
    fn test_row_areas() {
        let r = row(10.0, 2.0, 0.5, "Varandas", false);
        assert_eq!(r.equivalent_area(), 10.0);
        assert_eq!(r.constructed_area(), 20.0);
        assert_eq!(r.counted_constructed_area(), 20.0);
    }

    #[test]
    fn test_excluded_row_keeps_equivalent_area() {
        let r = row(10.0, 2.0, 0.5, "Varandas", true);
        let totals = FeasibilityTotals::from_rows([&r], AUTONOMOUS_PRIVATIVE_TYPE, 0.0, 1);
        assert_eq!(totals.constructed_area_total, 0.0);
        assert_eq!(totals.equivalent_area_total, 10.0);
    }

    #[test]
    fn test_totals_metrics() {
        let rows = vec![
            row(100.0, 4.0, 1.0, AUTONOMOUS_PRIVATIVE_TYPE, false),
            row(50.0, 1.0, 0.5, "Garagem (Subsolo)", false),
            row(30.0, 1.0, 0.3, "Terraços / Áreas Descobertas", true),
        ];
        let totals = FeasibilityTotals::from_rows(&rows, AUTONOMOUS_PRIVATIVE_TYPE, 2000.0, 4);
        assert_eq!(totals.constructed_area_total, 450.0);
        assert_eq!(totals.equivalent_area_total, 434.0);
        assert_eq!(totals.privative_area_total, 400.0);
        assert_eq!(totals.direct_cost, 868000.0);
        assert_eq!(totals.cost_per_unit, 217000.0);
        assert!((totals.cost_per_area - 868000.0 / 450.0).abs() < 1e-9);
        assert!((totals.privative_to_constructed_ratio - 400.0 / 450.0).abs() < 1e-12);
    }

    #[test]
    fn test_privative_area_ignores_exclusion() {
        let r = row(80.0, 2.0, 1.0, AUTONOMOUS_PRIVATIVE_TYPE, true);
        let totals = FeasibilityTotals::from_rows([&r], AUTONOMOUS_PRIVATIVE_TYPE, 1.0, 1);
        assert_eq!(totals.privative_area_total, 160.0);
        assert_eq!(totals.constructed_area_total, 0.0);
        assert_eq!(totals.privative_to_constructed_ratio, 0.0);
    }

    #[test]
    fn test_zero_constructed_area_avoids_division() {
        let totals = FeasibilityTotals::from_rows(&[], AUTONOMOUS_PRIVATIVE_TYPE, 1500.0, 0);
        assert_eq!(totals.cost_per_area, 0.0);
        assert_eq!(totals.privative_to_constructed_ratio, 0.0);
        assert_eq!(totals.num_units, 1);
    }

    #[test]
    fn test_unit_count() {
        assert_eq!(unit_count(0.0), 1);
        assert_eq!(unit_count(0.9), 1);
        assert_eq!(unit_count(-4.0), 1);
        assert_eq!(unit_count(f64::NAN), 1);
        assert_eq!(unit_count(12.7), 12);
    }

    #[test]
    fn test_type_range_clamp_and_lock() {
        let range = TypeRange::new(0.5, 0.75);
        assert_eq!(range.clamp(0.2), 0.5);
        assert_eq!(range.clamp(0.9), 0.75);
        assert_eq!(range.clamp(0.6), 0.6);
        assert!(!range.is_locked());
        assert!(TypeRange::new(0.5, 0.5).is_locked());
        assert!(!TypeRange::new(1.0, 0.5).is_valid());
    }

    #[test]
    fn test_type_range_table_json() {
        let table = TypeRangeTable::from_json(r#"{"Varandas": [0.75, 1.0], "Piscinas": [0.5, 0.75]}"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Varandas"), Some(TypeRange::new(0.75, 1.0)));
        assert_eq!(table.get("Loja"), None);
        assert!(TypeRangeTable::from_json(r#"{"Varandas": [0.75]}"#).is_err());
    }

    #[test]
    fn test_builtin_table() {
        let table = TypeRangeTable::builtin();
        assert_eq!(table.len(), 14);
        assert_eq!(table.get(AUTONOMOUS_PRIVATIVE_TYPE), Some(TypeRange::new(1.0, 1.0)));
        assert!(table.iter().all(|(_, range)| range.is_valid()));
    }
}
