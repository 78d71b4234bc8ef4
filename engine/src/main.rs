// Engine main entry point: recalculates a floor table from the command line.
use chrono::Local;
use clap::Parser;
use engine::config::FeasibilitySettings;
use engine::data::form_store::to_field_value;
use engine::data::{FloorCsvParser, FormControl, MemoryFormStore};
use engine::derivation::{project_financials, ProjectInputs};
use engine::report::FeasibilityReport;
use engine::RecalcEngine;
use shared::utils::brazilian_format::try_parse_field_decimal;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pavimentos", about = "Feasibility recalculation of a floor table")]
struct Cli {
    /// Floor table, `;`-delimited: Nome;Tipo;Rep;Coef;Area;Constr
    floors: PathBuf,

    /// JSON settings (type ranges, field names, financial defaults)
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long, default_value = "")]
    project: String,

    /// Direct cost per equivalent m² ("2.150,00" or "2150.5")
    #[arg(long, default_value = "0", value_parser = parse_number)]
    unit_cost: f64,

    #[arg(long, default_value_t = 1)]
    units: u32,

    /// Land area in m²
    #[arg(long, value_parser = parse_number)]
    land_area: Option<f64>,

    /// Land cost per m²
    #[arg(long, value_parser = parse_number)]
    land_cost: Option<f64>,

    /// Sellable private area in m²; defaults to the computed privative area
    #[arg(long, value_parser = parse_number)]
    private_area: Option<f64>,

    /// Average sale price per m². Enables the financial results.
    #[arg(long, value_parser = parse_number)]
    sale_price: Option<f64>,

    /// Construction duration in months
    #[arg(long)]
    duration: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

// Numbers are read like form fields: with a comma the value is pt-BR
// ("1.000,5"), otherwise the dot is the decimal point ("1000.5").
fn parse_number(s: &str) -> Result<f64, String> {
    try_parse_field_decimal(s).map_err(|e| e.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting feasibility recalculation...");

    let mut settings = match &cli.settings {
        Some(path) => FeasibilitySettings::load(path)?,
        None => FeasibilitySettings::default(),
    };
    if let Some(duration) = cli.duration {
        settings.financial.duration_months = duration;
    }

    let floors = FloorCsvParser::load_floors_from_csv(&cli.floors, &settings.type_ranges)?;
    if floors.is_empty() {
        return Err(format!("No floors found in {}", cli.floors.display()).into());
    }

    let mut store = MemoryFormStore::new();
    store.insert_control("nome", FormControl::text(cli.project.clone()));
    store.insert_control(settings.unit_cost_field.clone(), FormControl::number(to_field_value(cli.unit_cost)));
    if let Some(field) = settings.unit_count_fields.first() {
        store.insert_control(field.clone(), FormControl::number(cli.units.to_string()));
    }
    for floor in &floors {
        store.add_floor_row(floor, settings.type_ranges.get(&floor.floor_type));
    }
    store.add_summary_cards();

    let engine = RecalcEngine::new(settings);
    let totals = engine
        .initialize(&mut store)
        .ok_or("Recalculation produced no totals")?;
    info!(
        constructed_area = totals.constructed_area_total,
        direct_cost = totals.direct_cost,
        "Recalculation finished"
    );

    let financial = &engine.settings().financial;
    let mut report = FeasibilityReport::from_store(&store, &cli.project, Local::now().naive_local(), totals)
        .with_floor_names(&floors)
        .with_stage_costs(&financial.construction_stages);

    if let Some(sale_price) = cli.sale_price {
        let inputs = ProjectInputs {
            land_area: cli.land_area.unwrap_or_default(),
            land_cost_per_m2: cli.land_cost.unwrap_or_default(),
            private_area: cli.private_area.unwrap_or(totals.privative_area_total),
            average_sale_price_per_m2: sale_price,
        };
        let results = project_financials(&inputs, totals.direct_cost, financial);
        info!(margin = results.margin_percent, "Financial results computed");
        report = report.with_financials(results, inputs.private_area);
    }

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}
