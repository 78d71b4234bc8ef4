// Engine settings, loaded from a JSON file or built from defaults.
use serde::{Deserialize, Serialize};
use shared::models::{TypeRangeTable, AUTONOMOUS_PRIVATIVE_TYPE};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::EngineError;

/// Everything the recalculation engine needs to know about the form it
/// drives. Missing keys in a settings file fall back to the defaults below.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FeasibilitySettings {
    /// Coefficient bounds per floor type.
    pub type_ranges: TypeRangeTable,
    /// Floor type whose built area is private area.
    pub privative_type: String,
    /// Project-level fields; while one of them has focus a non-forced pass
    /// is skipped.
    pub project_fields: Vec<String>,
    pub unit_cost_field: String,
    /// Candidate ids of the unit-count field, first present wins.
    pub unit_count_fields: Vec<String>,
    pub financial: FinancialDefaults,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FinancialDefaults {
    /// Indirect costs as a percentage of the VGV.
    pub indirect_sales_percentages: BTreeMap<String, PercentBand>,
    /// Monthly site overhead, multiplied by the construction duration.
    pub site_monthly_costs: BTreeMap<String, f64>,
    pub duration_months: u32,
    /// Share of the direct cost spent in each stage, in execution order.
    pub construction_stages: Vec<ConstructionStage>,
}

/// Adjustable percentage: the value used plus the bounds it may be moved
/// within. Written as `[min, default, max]`, or as a bare number when the
/// value is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PercentBandRepr", into = "[f64; 3]")]
pub struct PercentBand {
    pub min: f64,
    pub default: f64,
    pub max: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PercentBandRepr {
    Fixed(f64),
    Band([f64; 3]),
}

impl PercentBand {
    pub const fn new(min: f64, default: f64, max: f64) -> Self {
        PercentBand { min, default, max }
    }

    pub fn contains(&self, percent: f64) -> bool {
        self.min <= percent && percent <= self.max
    }

    /// Finite, non-negative and ordered `min <= default <= max`.
    pub fn is_valid(&self) -> bool {
        [self.min, self.default, self.max].iter().all(|v| v.is_finite())
            && self.min >= 0.0
            && self.contains(self.default)
    }
}

impl From<PercentBandRepr> for PercentBand {
    fn from(repr: PercentBandRepr) -> Self {
        match repr {
            PercentBandRepr::Fixed(value) => PercentBand::new(value, value, value),
            PercentBandRepr::Band([min, default, max]) => PercentBand::new(min, default, max),
        }
    }
}

impl From<PercentBand> for [f64; 3] {
    fn from(band: PercentBand) -> Self {
        [band.min, band.default, band.max]
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConstructionStage {
    pub name: String,
    pub percent: PercentBand,
}

impl Default for FeasibilitySettings {
    fn default() -> Self {
        FeasibilitySettings {
            type_ranges: TypeRangeTable::builtin(),
            privative_type: AUTONOMOUS_PRIVATIVE_TYPE.to_string(),
            project_fields: [
                "nome",
                "area_terreno",
                "area_privativa",
                "num_unidades",
                "custo_terreno_m2",
                "custo_area_privativa",
                "preco_medio_venda_m2",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            unit_cost_field: "custo_area_privativa".to_string(),
            unit_count_fields: [
                "proj_num_unidades_input",
                "projeto_num_unidades",
                "projeto_num_unidades_hidden",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            financial: FinancialDefaults::default(),
        }
    }
}

impl Default for FinancialDefaults {
    fn default() -> Self {
        let percentages = [
            ("IRPJ/ CS/ PIS/ COFINS", PercentBand::new(3.0, 4.0, 6.0)),
            ("Corretagem", PercentBand::new(3.0, 3.61, 5.0)),
            ("Publicidade", PercentBand::new(0.5, 0.9, 2.0)),
            ("Manutenção", PercentBand::new(0.3, 0.5, 1.0)),
            ("Custo Fixo da Incorporadora", PercentBand::new(3.0, 4.0, 6.0)),
            ("Assessoria Técnica", PercentBand::new(0.5, 0.7, 1.5)),
            ("Projetos", PercentBand::new(0.4, 0.52, 1.5)),
            ("Licenças e Incorporação", PercentBand::new(0.1, 0.2, 0.5)),
            ("Outorga Onerosa", PercentBand::new(0.0, 0.0, 10.0)),
            ("Condomínio", PercentBand::new(0.0, 0.0, 0.5)),
            ("IPTU", PercentBand::new(0.05, 0.07, 0.2)),
            ("Preparação do Terreno", PercentBand::new(0.2, 0.33, 1.0)),
            ("Financiamento Bancário", PercentBand::new(1.0, 1.9, 3.0)),
        ];
        let stages = [
            ("Serviços Preliminares e Fundações", PercentBand::new(7.0, 8.0, 9.0)),
            ("Estrutura (Supraestrutura)", PercentBand::new(14.0, 16.0, 22.0)),
            ("Vedações (Alvenaria)", PercentBand::new(8.0, 10.0, 15.0)),
            ("Cobertura e Impermeabilização", PercentBand::new(4.0, 5.0, 8.0)),
            ("Revestimentos de Fachada", PercentBand::new(5.0, 6.0, 10.0)),
            ("Instalações (Elétrica e Hidráulica)", PercentBand::new(12.0, 15.0, 18.0)),
            ("Esquadrias (Portas e Janelas)", PercentBand::new(6.0, 8.0, 12.0)),
            ("Revestimentos de Piso", PercentBand::new(8.0, 10.0, 15.0)),
            ("Revestimentos de Parede", PercentBand::new(6.0, 8.0, 12.0)),
            ("Revestimentos de Forro", PercentBand::new(3.0, 4.0, 6.0)),
            ("Pintura", PercentBand::new(4.0, 5.0, 8.0)),
            ("Serviços Complementares e Externos", PercentBand::new(3.0, 5.0, 10.0)),
        ];
        let monthly = [
            ("Administração de Obra (Engenheiro/Arquiteto)", 15000.0),
            ("Mestre de Obras e Encarregados", 8000.0),
            ("Aluguel de Equipamentos (andaimes, betoneira, etc.)", 5000.0),
            ("Consumo de Energia", 1000.0),
            ("Consumo de Água", 500.0),
            ("Telefone e Internet", 300.0),
            ("Seguros e Licenças de Canteiro", 1200.0),
            ("Transporte de Materiais e Pessoas", 2500.0),
            ("Despesas de Escritório e Apoio", 800.0),
        ];
        FinancialDefaults {
            indirect_sales_percentages: percentages.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            site_monthly_costs: monthly.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            duration_months: 12,
            construction_stages: stages
                .into_iter()
                .map(|(name, percent)| ConstructionStage {
                    name: name.to_string(),
                    percent,
                })
                .collect(),
        }
    }
}

impl FinancialDefaults {
    /// Sum of the indirect sales percentages in use.
    pub fn indirect_sales_percent(&self) -> f64 {
        self.indirect_sales_percentages.values().map(|band| band.default).sum()
    }

    pub fn stage_percent_total(&self) -> f64 {
        self.construction_stages.iter().map(|stage| stage.percent.default).sum()
    }

    fn validate(&self) -> Result<(), EngineError> {
        let bands = self
            .indirect_sales_percentages
            .iter()
            .map(|(item, band)| ("indirect_sales_percentages", item, band))
            .chain(
                self.construction_stages
                    .iter()
                    .map(|stage| ("construction_stages", &stage.name, &stage.percent)),
            );
        for (table, item, band) in bands {
            if !band.is_valid() {
                return Err(EngineError::ConfigError(format!(
                    "Invalid percentage for '{}' in {}: {} outside [{}, {}]",
                    item, table, band.default, band.min, band.max
                )));
            }
        }
        if let Some((item, value)) = self.site_monthly_costs.iter().find(|(_, v)| !v.is_finite() || **v < 0.0) {
            return Err(EngineError::ConfigError(format!(
                "Invalid value {} for '{}' in site_monthly_costs",
                value, item
            )));
        }

        let stage_total = self.stage_percent_total();
        if !self.construction_stages.is_empty() && (stage_total - 100.0).abs() > 0.01 {
            tracing::warn!(stage_total, "Construction stage percentages do not add up to 100%");
        }
        Ok(())
    }
}

impl FeasibilitySettings {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let settings: FeasibilitySettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            floor_types = settings.type_ranges.len(),
            "Loaded feasibility settings"
        );
        Ok(settings)
    }

    pub fn is_project_field(&self, name: &str) -> bool {
        self.project_fields.iter().any(|field| field == name)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.privative_type.trim().is_empty() {
            return Err(EngineError::ConfigError("privative_type must not be empty".to_string()));
        }
        if let Some((label, range)) = self.type_ranges.iter().find(|(_, range)| !range.is_valid()) {
            return Err(EngineError::ConfigError(format!(
                "Invalid coefficient range for '{}': [{}, {}]",
                label, range.min, range.max
            )));
        }
        self.financial.validate()
    }
}
