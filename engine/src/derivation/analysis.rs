// Offline reading of the financial results: margin health, cost composition,
// cost per m² of private area and rule-based recommendations.
use serde::Serialize;

use super::financials::FinancialResults;

/// Gross margin investors expect from a development, in percent.
pub const MARGIN_BENCHMARK_PERCENT: f64 = 15.0;
/// Below this margin a project is a concern rather than marginal.
pub const MARGIN_FLOOR_PERCENT: f64 = 5.0;

const LAND_SHARE_ALERT_PERCENT: f64 = 25.0;
const SITE_SHARE_ALERT_PERCENT: f64 = 10.0;
const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginHealth {
    Promising,
    Marginal,
    Concerning,
}

impl MarginHealth {
    pub fn classify(margin_percent: f64) -> Self {
        if margin_percent >= MARGIN_BENCHMARK_PERCENT {
            MarginHealth::Promising
        } else if margin_percent >= MARGIN_FLOOR_PERCENT {
            MarginHealth::Marginal
        } else {
            MarginHealth::Concerning
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarginHealth::Promising => "promissora",
            MarginHealth::Marginal => "marginal",
            MarginHealth::Concerning => "preocupante",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostShare {
    pub label: String,
    pub value: f64,
    /// Share of the summed costs, in percent.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrivateAreaCosts {
    pub direct: f64,
    /// Indirect sales, site overhead and land together.
    pub indirect: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityAnalysis {
    pub health: MarginHealth,
    pub margin_percent: f64,
    pub gross_profit: f64,
    pub below_benchmark: bool,
    pub cost_shares: Vec<CostShare>,
    /// `None` when the private area is zero.
    pub per_private_m2: Option<PrivateAreaCosts>,
    pub recommendations: Vec<String>,
}

pub fn analyze(results: &FinancialResults, private_area: f64) -> FeasibilityAnalysis {
    let components = [
        ("Custo Direto", results.direct_cost),
        ("Custo Indireto de Venda", results.indirect_sales_cost),
        ("Custo Indireto de Obra", results.site_indirect_cost),
        ("Custo do Terreno", results.land_cost),
    ];
    let mut base: f64 = components.iter().map(|(_, value)| value).sum();
    if base <= 0.0 {
        base = if results.total_expenses != 0.0 { results.total_expenses } else { 1.0 };
    }
    let cost_shares: Vec<CostShare> = components
        .iter()
        .map(|(label, value)| CostShare {
            label: label.to_string(),
            value: *value,
            percent: value / base * 100.0,
        })
        .collect();

    let per_private_m2 = (private_area > 0.0).then(|| PrivateAreaCosts {
        direct: results.direct_cost / private_area,
        indirect: (results.indirect_sales_cost + results.site_indirect_cost + results.land_cost) / private_area,
        total: results.total_expenses / private_area,
    });

    let land_share = cost_shares[3].percent;
    let site_share = cost_shares[2].percent;
    let below_benchmark = results.margin_percent < MARGIN_BENCHMARK_PERCENT;

    let mut recommendations = Vec::new();
    if below_benchmark {
        recommendations.push(
            "Rever o preço médio de venda e a segmentação do produto para capturar mais valor por m².",
        );
    }
    recommendations.push(
        "Negociar insumos e custo por m² com fornecedores; avaliar acabamentos alternativos para reduzir o custo direto.",
    );
    if land_share > LAND_SHARE_ALERT_PERCENT {
        recommendations.push(
            "Renegociar o terreno ou ajustar a tipologia e o número de unidades para diluir o custo do terreno.",
        );
    }
    if site_share > SITE_SHARE_ALERT_PERCENT {
        recommendations.push("Encurtar o cronograma da obra para reduzir os custos indiretos de obra.");
    }
    recommendations.push(
        "Revisar corretagem, publicidade e plano comercial para reduzir comissões ou acelerar as vendas.",
    );
    recommendations.truncate(MAX_RECOMMENDATIONS);

    let health = MarginHealth::classify(results.margin_percent);
    tracing::debug!(margin = results.margin_percent, health = health.label(), land_share, site_share, "Feasibility analysed");

    FeasibilityAnalysis {
        health,
        margin_percent: results.margin_percent,
        gross_profit: results.gross_profit,
        below_benchmark,
        cost_shares,
        per_private_m2,
        recommendations: recommendations.into_iter().map(String::from).collect(),
    }
}
