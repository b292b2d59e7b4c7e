//! # Windload CLI
//!
//! Command-line front end for `windload_core`:
//!
//! - `windload calc` - site wind load for a region, design life and height
//! - `windload classify` - terrain category around a coordinate
//! - `windload tables` - print the loaded wind tables
//!
//! Every command prints a plain-text report, or a JSON document with `--json`.

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use windload_core::calculations::wind::{calculate_with, CoreMaterial, NumericOverride, WindInput};
use windload_core::classifier::{classify_site, ClassifierConfig, TerrainClassification, DEFAULT_OVERPASS_URL};
use windload_core::tables::{CardinalDirection, DesignLife, TerrainCategory, WindTables};

#[derive(Parser, Debug)]
#[command(name = "windload")]
#[command(version, about = "Site wind load calculator (AS/NZS 1170.2 style)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit JSON instead of a text report
    #[arg(long, global = true)]
    json: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Alternate wind tables (TOML); the embedded standard tables otherwise
    #[arg(long, global = true, env = "WINDLOAD_TABLES")]
    tables: Option<PathBuf>,

    /// Overpass interpreter endpoint
    #[arg(long, global = true, env = "OVERPASS_URL", default_value = DEFAULT_OVERPASS_URL)]
    overpass_url: String,

    /// Overpass server-side query limit in seconds (the HTTP client waits a few seconds longer)
    #[arg(long, global = true, env = "OVERPASS_TIMEOUT_SECS", default_value = "15")]
    timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate the design wind pressure for a site
    Calc(CalcArgs),

    /// Classify the terrain category around a coordinate
    Classify {
        /// Latitude (decimal degrees)
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude (decimal degrees)
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Print the wind tables in use
    Tables,
}

#[derive(Args, Debug)]
struct CalcArgs {
    /// Wind region label (e.g., A0, B1, C)
    #[arg(short, long)]
    region: String,

    /// Design working life (temporary, under-6-months, 5-years, 25-years, 50-years, 100-years)
    #[arg(short, long, default_value = "50-years")]
    design_life: String,

    /// Importance level (1-4)
    #[arg(short, long, default_value = "2")]
    importance: u8,

    /// Average roof height (m)
    #[arg(long)]
    height: f64,

    /// Terrain category (TC1, TC2, TC2.5, TC3, TC4); classified from --lat/--lon otherwise
    #[arg(short, long)]
    terrain: Option<String>,

    /// Site latitude, for terrain classification
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Site longitude, for terrain classification
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Cardinal wind direction for a single-direction Md (N, NE, ... NW)
    #[arg(long)]
    direction: Option<String>,

    /// Lateral-load core (steel_mrf, steel_ebf, concrete_mrf, timber_other)
    #[arg(long)]
    core: Option<String>,

    /// Natural frequency (Hz), used when no period can be estimated
    #[arg(long)]
    frequency: Option<f64>,

    /// Direction multiplier Md override
    #[arg(long)]
    md: Option<f64>,

    /// Shielding multiplier Ms override
    #[arg(long)]
    ms: Option<f64>,

    /// Topographic multiplier Mt override
    #[arg(long)]
    mt: Option<f64>,

    /// External pressure coefficient Cpe override
    #[arg(long, allow_hyphen_values = true)]
    cpe: Option<f64>,

    /// Reference width b (m)
    #[arg(long)]
    width: Option<f64>,

    /// Reference level s (m)
    #[arg(long)]
    level: Option<f64>,
}

impl CalcArgs {
    fn to_input(&self) -> Result<WindInput> {
        let mut input = WindInput::new(
            &self.region,
            DesignLife::from_str_flexible(&self.design_life)?,
            self.importance,
            self.height,
        );
        input.terrain_override = self.terrain.as_deref().map(TerrainCategory::from_str_flexible).transpose()?;
        input.wind_direction = self.direction.as_deref().map(CardinalDirection::from_str_flexible).transpose()?;
        input.core_material = self.core.as_deref().map(CoreMaterial::from_str_flexible).transpose()?;
        input.natural_frequency_hz = self.frequency;

        let overrides = &mut input.overrides;
        overrides.direction = NumericOverride::from(self.md);
        overrides.shielding = NumericOverride::from(self.ms);
        overrides.topographic = NumericOverride::from(self.mt);
        overrides.shape_factor.cpe = NumericOverride::from(self.cpe);
        overrides.width_m = NumericOverride::from(self.width);
        overrides.level_m = NumericOverride::from(self.level);
        Ok(input)
    }
}

/// JSON envelope for machine-readable output
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    tool: &'static str,
    version: &'static str,
    generated_at: String,
    command: &'a str,
    #[serde(flatten)]
    body: T,
}

fn print_json<T: Serialize>(command: &str, body: T) -> Result<()> {
    let envelope = Envelope {
        tool: "windload",
        version: env!("CARGO_PKG_VERSION"),
        generated_at: chrono::Utc::now().to_rfc3339(),
        command,
        body,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let builder = fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn classifier_config(cli: &Cli) -> ClassifierConfig {
    ClassifierConfig {
        endpoint: cli.overpass_url.clone(),
        timeout_secs: cli.timeout_secs,
        ..ClassifierConfig::default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let loaded;
    let tables: &WindTables = match &cli.tables {
        Some(path) => {
            loaded = WindTables::load(path).with_context(|| format!("loading wind tables from {}", path.display()))?;
            info!(path = %path.display(), "using alternate wind tables");
            &loaded
        }
        None => WindTables::standard(),
    };

    match &cli.command {
        Commands::Calc(args) => {
            let mut input = args.to_input()?;

            let mut classification: Option<TerrainClassification> = None;
            if input.terrain_override.is_none() {
                if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
                    let result = classify_site(classifier_config(&cli), lat, lon).await;
                    input.terrain_classified = Some(result.category);
                    classification = Some(result);
                }
            }
            debug!(?input, "calculation input");

            let result = calculate_with(tables, &input);

            if cli.json {
                #[derive(Serialize)]
                struct CalcOutput<'a> {
                    input: &'a WindInput,
                    classification: &'a Option<TerrainClassification>,
                    result: &'a windload_core::WindResult,
                }
                print_json(
                    "calc",
                    CalcOutput { input: &input, classification: &classification, result: &result },
                )?;
            } else {
                if let (Some(c), Some(lat), Some(lon)) = (&classification, args.lat, args.lon) {
                    report::print_classification(lat, lon, c);
                }
                report::print_wind_result(&input, &result);
            }
        }
        Commands::Classify { lat, lon } => {
            let classification = classify_site(classifier_config(&cli), *lat, *lon).await;
            if cli.json {
                #[derive(Serialize)]
                struct ClassifyOutput<'a> {
                    lat: f64,
                    lon: f64,
                    classification: &'a TerrainClassification,
                }
                print_json(
                    "classify",
                    ClassifyOutput { lat: *lat, lon: *lon, classification: &classification },
                )?;
            } else {
                report::print_classification(*lat, *lon, &classification);
            }
        }
        Commands::Tables => {
            if cli.json {
                #[derive(Serialize)]
                struct TablesOutput<'a> {
                    tables: &'a WindTables,
                }
                print_json("tables", TablesOutput { tables })?;
            } else {
                report::print_tables(tables);
            }
        }
    }

    Ok(())
}
