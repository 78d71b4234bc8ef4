// Text and JSON rendering of a recalculated feasibility form.
use chrono::NaiveDateTime;
use serde::Serialize;
use shared::models::{FeasibilityTotals, FloorRow};
use shared::utils::brazilian_format::format_decimal;
use std::fmt;

use crate::config::{ConstructionStage, FeasibilitySettings};
use crate::data::form_store::{fields, FormStore};
use crate::derivation::analysis::MARGIN_BENCHMARK_PERCENT;
use crate::derivation::{
    analyze, construction_stage_costs, read_floor_rows, FeasibilityAnalysis, FinancialResults, StageCost,
};

pub const REPORT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

const CARD_LABELS: [(&str, &str); 8] = [
    (fields::CARD_CONSTRUCTED_AREA, "Área construída (m²)"),
    (fields::CARD_CONSTRUCTED_AREA_2, "Área construída total (m²)"),
    (fields::CARD_EQUIVALENT_AREA, "Área equivalente (m²)"),
    (fields::CARD_PRIVATIVE_AREA, "Área privativa (m²)"),
    (fields::CARD_DIRECT_COST, "Custo direto (R$)"),
    (fields::CARD_COST_PER_AREA, "Custo por m² (R$)"),
    (fields::CARD_COST_PER_UNIT, "Custo por unidade (R$)"),
    (fields::CARD_PRIVATIVE_RATIO, "Relação AP/AC"),
];

/// Totals of a floor list without going through a form.
pub fn summarize_floors(
    floors: &[FloorRow],
    settings: &FeasibilitySettings,
    unit_cost: f64,
    num_units: u32,
) -> FeasibilityTotals {
    FeasibilityTotals::from_rows(floors, &settings.privative_type, unit_cost, num_units)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub id: String,
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorLine {
    #[serde(flatten)]
    pub floor: FloorRow,
    pub equivalent_area: f64,
    pub constructed_area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityReport {
    pub project: String,
    pub generated_at: String,
    pub floors: Vec<FloorLine>,
    pub cards: Vec<SummaryCard>,
    pub totals: FeasibilityTotals,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<StageCost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financials: Option<FinancialResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<FeasibilityAnalysis>,
}

impl FeasibilityReport {
    /// Collects a report from a form that has already been recalculated.
    /// Cards are taken as displayed; cards not rendered are left out.
    pub fn from_store(
        store: &dyn FormStore,
        project: &str,
        generated_at: NaiveDateTime,
        totals: FeasibilityTotals,
    ) -> Self {
        let floors = read_floor_rows(store)
            .into_iter()
            .map(|floor| FloorLine {
                equivalent_area: floor.equivalent_area(),
                constructed_area: floor.counted_constructed_area(),
                floor,
            })
            .collect();

        let cards = CARD_LABELS
            .iter()
            .filter_map(|(id, label)| {
                store.display_text(id).map(|text| SummaryCard {
                    id: id.to_string(),
                    label: label.to_string(),
                    text: text.to_string(),
                })
            })
            .collect();

        FeasibilityReport {
            project: project.to_string(),
            generated_at: generated_at.format(REPORT_DATE_FORMAT).to_string(),
            floors,
            cards,
            totals,
            stages: Vec::new(),
            financials: None,
            analysis: None,
        }
    }

    /// Uses the floor names of `source` where the form has none.
    pub fn with_floor_names(mut self, source: &[FloorRow]) -> Self {
        for line in &mut self.floors {
            if let Some(row) = source.iter().find(|row| row.row_id == line.floor.row_id) {
                line.floor.name = row.name.clone();
            }
        }
        self
    }

    /// Splits the direct cost of the totals across `stages`.
    pub fn with_stage_costs(mut self, stages: &[ConstructionStage]) -> Self {
        self.stages = construction_stage_costs(self.totals.direct_cost, stages);
        self
    }

    /// Adds the financial results and their analysis against `private_area`.
    pub fn with_financials(mut self, financials: FinancialResults, private_area: f64) -> Self {
        self.analysis = Some(analyze(&financials, private_area));
        self.financials = Some(financials);
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }

    fn write_floors(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nPavimentos")?;
        for line in &self.floors {
            let floor = &line.floor;
            writeln!(
                f,
                "  {:>3}  {:<20} {:<38} {:>6} x {:>12} x {:<5} = {:>12} | {:>12}{}",
                floor.row_id,
                floor.name,
                floor.floor_type,
                format_decimal(floor.repetitions),
                format_decimal(floor.area),
                floor.coefficient,
                format_decimal(line.equivalent_area),
                format_decimal(line.constructed_area),
                if floor.excluded { "  (excluído)" } else { "" },
            )?;
        }
        Ok(())
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nResumo ({} unidades)", self.totals.num_units)?;
        for card in &self.cards {
            writeln!(f, "  {:<28} {:>16}", card.label, card.text)?;
        }
        Ok(())
    }

    fn write_stages(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stages.is_empty() {
            return Ok(());
        }
        writeln!(f, "\nEtapas da obra")?;
        for stage in &self.stages {
            writeln!(
                f,
                "  {:<40} {:>6}%  R$ {:>16}",
                stage.name,
                format_decimal(stage.percent),
                format_decimal(stage.cost)
            )?;
        }
        Ok(())
    }

    fn write_financials(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(financials) = &self.financials else {
            return Ok(());
        };
        writeln!(f, "\nResultado financeiro")?;
        let money = [
            ("VGV", financials.vgv),
            ("Custo direto", financials.direct_cost),
            ("Terreno", financials.land_cost),
            ("Custos indiretos de venda", financials.indirect_sales_cost),
            ("Custos indiretos de obra", financials.site_indirect_cost),
            ("Despesas totais", financials.total_expenses),
            ("Lucro bruto", financials.gross_profit),
        ];
        for (label, value) in money {
            writeln!(f, "  {:<28} R$ {:>16}", label, format_decimal(value))?;
        }
        writeln!(f, "  {:<28} {:>17}%", "Margem", format_decimal(financials.margin_percent))
    }

    fn write_analysis(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(analysis) = &self.analysis else {
            return Ok(());
        };
        writeln!(f, "\nAnálise")?;
        writeln!(
            f,
            "  Margem bruta de {}% (R$ {}), considerada {}.",
            format_decimal(analysis.margin_percent),
            format_decimal(analysis.gross_profit),
            analysis.health.label()
        )?;
        if analysis.below_benchmark {
            writeln!(
                f,
                "  Abaixo do benchmark de mercado ({}%): ajustes são necessários para atrair investidores.",
                MARGIN_BENCHMARK_PERCENT
            )?;
        } else {
            writeln!(
                f,
                "  Acima do benchmark de mercado ({}%): validar riscos e sensibilidade a preços.",
                MARGIN_BENCHMARK_PERCENT
            )?;
        }

        writeln!(f, "\n  Composição dos custos")?;
        for share in &analysis.cost_shares {
            writeln!(
                f,
                "    {:<26} R$ {:>16} {:>7}%",
                share.label,
                format_decimal(share.value),
                format_decimal(share.percent)
            )?;
        }

        writeln!(f, "\n  Custos por m² de área privativa")?;
        match &analysis.per_private_m2 {
            Some(per_m2) => {
                writeln!(f, "    {:<26} R$ {:>16}", "Direto", format_decimal(per_m2.direct))?;
                writeln!(f, "    {:<26} R$ {:>16}", "Indireto", format_decimal(per_m2.indirect))?;
                writeln!(f, "    {:<26} R$ {:>16}", "Total", format_decimal(per_m2.total))?;
            }
            None => writeln!(f, "    Área privativa zero, sem indicadores por m².")?,
        }

        writeln!(f, "\n  Recomendações")?;
        for recommendation in &analysis.recommendations {
            writeln!(f, "    - {}", recommendation)?;
        }
        Ok(())
    }
}

impl fmt::Display for FeasibilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Viabilidade: {}", self.project)?;
        writeln!(f, "Gerado em {}", self.generated_at)?;
        self.write_floors(f)?;
        self.write_summary(f)?;
        self.write_stages(f)?;
        self.write_financials(f)?;
        self.write_analysis(f)
    }
}
