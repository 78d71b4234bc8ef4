// Project-level financial results built on top of the direct cost.
use serde::{Deserialize, Serialize};

use crate::config::{ConstructionStage, FinancialDefaults};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectInputs {
    pub land_area: f64,
    pub land_cost_per_m2: f64,
    /// Sellable private area; the VGV is priced on it.
    pub private_area: f64,
    pub average_sale_price_per_m2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialResults {
    /// Valor Geral de Vendas: total expected sales.
    pub vgv: f64,
    pub direct_cost: f64,
    pub land_cost: f64,
    pub indirect_sales_cost: f64,
    pub site_indirect_cost: f64,
    pub total_expenses: f64,
    pub gross_profit: f64,
    pub margin_percent: f64,
}

pub fn project_financials(inputs: &ProjectInputs, direct_cost: f64, defaults: &FinancialDefaults) -> FinancialResults {
    let vgv = inputs.private_area * inputs.average_sale_price_per_m2;
    let land_cost = inputs.land_area * inputs.land_cost_per_m2;

    let indirect_sales_cost = vgv * defaults.indirect_sales_percent() / 100.0;

    let monthly: f64 = defaults.site_monthly_costs.values().sum();
    let site_indirect_cost = monthly * f64::from(defaults.duration_months);

    let total_expenses = direct_cost + indirect_sales_cost + land_cost + site_indirect_cost;
    let gross_profit = vgv - total_expenses;
    let margin_percent = if vgv > 0.0 { gross_profit / vgv * 100.0 } else { 0.0 };

    tracing::debug!(vgv, total_expenses, gross_profit, margin_percent, "Project financials computed");

    FinancialResults {
        vgv,
        direct_cost,
        land_cost,
        indirect_sales_cost,
        site_indirect_cost,
        total_expenses,
        gross_profit,
        margin_percent,
    }
}

/// Part of the direct cost spent in one construction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageCost {
    pub name: String,
    pub percent: f64,
    pub cost: f64,
}

/// Splits the direct cost across the construction stages by their
/// percentages, keeping the stage order.
pub fn construction_stage_costs(direct_cost: f64, stages: &[ConstructionStage]) -> Vec<StageCost> {
    stages
        .iter()
        .map(|stage| StageCost {
            name: stage.name.clone(),
            percent: stage.percent.default,
            cost: direct_cost * stage.percent.default / 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PercentBand;
    use std::collections::BTreeMap;

    fn defaults() -> FinancialDefaults {
        FinancialDefaults {
            indirect_sales_percentages: BTreeMap::from([
                ("Corretagem".to_string(), PercentBand::new(3.0, 4.0, 5.0)),
                ("Publicidade".to_string(), PercentBand::new(0.5, 1.0, 2.0)),
            ]),
            site_monthly_costs: BTreeMap::from([("Mestre de Obras".to_string(), 8000.0), ("Energia".to_string(), 2000.0)]),
            duration_months: 10,
            construction_stages: Vec::new(),
        }
    }

    #[test]
    fn test_project_financials() {
        let inputs = ProjectInputs {
            land_area: 1000.0,
            land_cost_per_m2: 100.0,
            private_area: 200.0,
            average_sale_price_per_m2: 10000.0,
        };
        let results = project_financials(&inputs, 1_000_000.0, &defaults());
        assert_eq!(results.vgv, 2_000_000.0);
        assert_eq!(results.land_cost, 100_000.0);
        assert_eq!(results.indirect_sales_cost, 100_000.0);
        assert_eq!(results.site_indirect_cost, 100_000.0);
        assert_eq!(results.total_expenses, 1_300_000.0);
        assert_eq!(results.gross_profit, 700_000.0);
        assert_eq!(results.margin_percent, 35.0);
    }

    #[test]
    fn test_zero_vgv_has_zero_margin() {
        let results = project_financials(&ProjectInputs::default(), 50_000.0, &defaults());
        assert_eq!(results.vgv, 0.0);
        assert_eq!(results.gross_profit, -150_000.0);
        assert_eq!(results.margin_percent, 0.0);
    }

    #[test]
    fn test_builtin_defaults() {
        let results = project_financials(&ProjectInputs::default(), 0.0, &FinancialDefaults::default());
        // 34.300/month over 12 months
        assert_eq!(results.site_indirect_cost, 411_600.0);
    }

    #[test]
    fn test_construction_stage_costs() {
        let stages = vec![
            ConstructionStage {
                name: "Estrutura".to_string(),
                percent: PercentBand::new(20.0, 25.0, 30.0),
            },
            ConstructionStage {
                name: "Acabamento".to_string(),
                percent: PercentBand::new(70.0, 75.0, 80.0),
            },
        ];
        let costs = construction_stage_costs(400_000.0, &stages);
        assert_eq!(costs.len(), 2);
        assert_eq!(costs[0].name, "Estrutura");
        assert_eq!(costs[0].cost, 100_000.0);
        assert_eq!(costs[1].percent, 75.0);
        assert_eq!(costs[1].cost, 300_000.0);
    }

    #[test]
    fn test_builtin_stages_split_the_whole_direct_cost() {
        let stages = FinancialDefaults::default().construction_stages;
        let costs = construction_stage_costs(1_000_000.0, &stages);
        let total: f64 = costs.iter().map(|stage| stage.cost).sum();
        assert!((total - 1_000_000.0).abs() < 1e-6);
        assert_eq!(costs[1].name, "Estrutura (Supraestrutura)");
        assert_eq!(costs[1].cost, 160_000.0);
    }
}
