//! Plain-text reports for the terminal.

use windload_core::calculations::wind::{clause_ref, MultiplierSource, WindInput, WindResult};
use windload_core::classifier::{ClassificationSource, TerrainClassification};
use windload_core::tables::{CardinalDirection, DesignLife, RecurrenceLabel, Region, TerrainCategory, WindTables};

const RULE: &str = "═══════════════════════════════════════════════════════";

fn banner(title: &str) {
    println!("{}", RULE);
    println!("  {}", title);
    println!("{}", RULE);
    println!();
}

/// Format an optional value, "n/a" when unavailable
fn opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}

fn source_tag(source: MultiplierSource) -> &'static str {
    match source {
        MultiplierSource::Default => "default",
        MultiplierSource::Table => "table",
        MultiplierSource::Directional => "directional",
        MultiplierSource::Override => "override",
    }
}

fn row(label: &str, value: String, reference: &str) {
    println!("  {:<10} = {:<12} {}", label, value, reference);
}

pub fn print_classification(lat: f64, lon: f64, classification: &TerrainClassification) {
    banner("TERRAIN CLASSIFICATION");
    println!("Site:      {:.5}, {:.5}", lat, lon);
    println!("Category:  {} ({})", classification.category, classification.category.display_name());
    println!("Rule:      {}", classification.rule);
    match classification.source {
        ClassificationSource::Classified => println!("Source:    OpenStreetMap features"),
        ClassificationSource::Fallback => println!("Source:    fallback (feature query failed)"),
    }

    if let Some(signals) = &classification.signals {
        println!();
        println!("Signals:");
        println!("  Buildings        {} ({:.2} /ha)", signals.building_count, signals.buildings_per_ha);
        println!("  Urban fraction   {:.3}", signals.urban_fraction);
        println!("  Water fraction   {:.3}", signals.water_fraction);
        println!("  Nearest water    {}", opt(signals.distance_to_water_m, 0) + " m");
    }
    println!();
}

pub fn print_wind_result(input: &WindInput, result: &WindResult) {
    let site = &result.site;
    let dynamic = &result.dynamic;

    banner("SITE WIND LOAD");

    println!("Input:");
    println!(
        "  Region:       {} ({})",
        site.raw_region.as_deref().unwrap_or("none"),
        site.region.map_or("unrecognised".to_string(), |r| {
            if r.is_cyclonic() { format!("{}, cyclonic", r) } else { r.to_string() }
        })
    );
    println!(
        "  Design life:  {}",
        input.design_life.map_or("none", |d| d.display_name())
    );
    println!(
        "  Importance:   {}",
        input.importance_level.map_or("none".to_string(), |i| i.to_string())
    );
    println!("  Height:       {} m", opt(dynamic.height.map(|h| h.0), 1));
    if let Some(core) = input.core_material {
        println!("  Core:         {}", core);
    }
    println!();

    println!("Site wind speed:");
    row(
        "PoE",
        site.annual_poe.map_or("n/a".to_string(), |p| p.to_string()),
        clause_ref::ANNUAL_POE,
    );
    row(
        "V_R",
        format!(
            "{} m/s",
            opt(site.regional_wind_speed.map(|v| v.0), 1)
        ),
        clause_ref::REGIONAL_WIND_SPEED,
    );
    if let Some(recurrence) = site.recurrence {
        println!("  {:<10}   ({})", "", recurrence);
    }
    row("Mc", opt(site.mc, 2), clause_ref::MC);
    row(
        "Md",
        format!("{} [{}]", opt(site.md, 2), source_tag(site.md_source)),
        clause_ref::MD,
    );
    row(
        "Mz,cat",
        format!(
            "{} [{}]",
            opt(site.mzcat, 3),
            site.terrain.unwrap_or(TerrainCategory::Tc2)
        ),
        clause_ref::MZCAT,
    );
    row("Ms", format!("{:.2} [{}]", site.ms, source_tag(site.ms_source)), clause_ref::MS);
    row("Mt", format!("{:.2} [{}]", site.mt, source_tag(site.mt_source)), clause_ref::MT);
    row("Cshp", format!("{:.3}", site.cshp), clause_ref::CSHP);
    row("Vsit", format!("{} m/s", opt(site.v_sit.map(|v| v.0), 2)), clause_ref::VSIT);
    println!();

    println!("Dynamic response:");
    row("T1", format!("{} s", opt(dynamic.period.map(|t| t.0), 3)), clause_ref::PERIOD);
    row(
        "n",
        format!("{} Hz", opt(dynamic.natural_frequency.map(|f| f.0), 3)),
        clause_ref::PERIOD,
    );
    row("gR", opt(dynamic.g_r, 3), clause_ref::GR);
    row("Lh", format!("{} m", opt(dynamic.lh_m, 1)), clause_ref::LH);
    row("Ih", opt(dynamic.ih, 3), clause_ref::IH);
    row("N", opt(dynamic.reduced_frequency, 3), clause_ref::REDUCED_FREQUENCY);
    row("Et", opt(dynamic.et, 4), clause_ref::ET);
    row("b", format!("{} m", opt(dynamic.width_m, 2)), clause_ref::SIZE_REDUCTION);
    row("S", opt(dynamic.size_reduction, 4), clause_ref::SIZE_REDUCTION);
    row("s", format!("{} m", opt(dynamic.level_m, 2)), clause_ref::BS);
    row("Bs", opt(dynamic.bs, 4), clause_ref::BS);
    row("Hs", opt(dynamic.hs, 4), clause_ref::HS);
    row("ζ", format!("{:.3}", dynamic.damping_ratio), "");
    row("Cdyn", opt(dynamic.cdyn, 3), clause_ref::CDYN);
    println!();

    println!("{}", RULE);
    match (result.pressure.pa, result.pressure.kpa) {
        (Some(pa), Some(kpa)) => {
            println!("  DESIGN PRESSURE: {:.1} Pa ({:.3} kPa)   {}", pa.0, kpa.0, clause_ref::PRESSURE)
        }
        _ => println!("  DESIGN PRESSURE: n/a (incomplete input)"),
    }
    println!("{}", RULE);
}

pub fn print_tables(tables: &WindTables) {
    banner("WIND TABLES");

    println!("Regional wind speed V_R (m/s):");
    print!("  {:<8}", "");
    for region in Region::ALL {
        print!("{:>7}", region.code());
    }
    println!();
    for recurrence in RecurrenceLabel::ALL {
        print!("  {:<8}", recurrence.code());
        for region in Region::ALL {
            print!("{:>7}", opt(tables.regional_wind_speed(region, recurrence), 0));
        }
        println!();
    }
    println!();

    println!("Annual probability of exceedance:");
    print!("  {:<18}", "");
    for importance in 1..=4u8 {
        print!("{:>9}", format!("IL{}", importance));
    }
    println!();
    for life in DesignLife::ALL {
        print!("  {:<18}", life.code());
        for importance in 1..=4u8 {
            let cell = tables.annual_poe(life, importance).map_or("-".to_string(), |p| p.to_string());
            print!("{:>9}", cell);
        }
        println!();
    }
    println!();

    println!("Region multipliers:");
    println!("  {:<8}{:>7}{:>7}   directional ({})", "", "Mc", "Md", direction_header());
    for region in Region::ALL {
        let directional: Vec<String> = CardinalDirection::ALL
            .into_iter()
            .map(|d| opt(tables.directional_multiplier(region, d), 2))
            .collect();
        println!(
            "  {:<8}{:>7}{:>7}   {}",
            region.code(),
            opt(tables.climate_change_multiplier(region), 2),
            opt(tables.direction_multiplier(region), 2),
            directional.join(" ")
        );
    }
    println!();

    for (title, table) in [
        ("Terrain/height multiplier Mz,cat:", tables.terrain_height_table()),
        ("Turbulence intensity Ih:", tables.turbulence_table()),
    ] {
        println!("{}", title);
        print!("  {:<8}", "z (m)");
        for terrain in TerrainCategory::ALL {
            print!("{:>8}", terrain.code());
        }
        println!();
        for (i, z) in table.heights().iter().enumerate() {
            print!("  {:<8}", z);
            for terrain in TerrainCategory::ALL {
                print!("{:>8.3}", table.column(terrain)[i]);
            }
            println!();
        }
        println!();
    }
}

fn direction_header() -> String {
    CardinalDirection::ALL
        .iter()
        .map(|d| d.code())
        .collect::<Vec<_>>()
        .join(" ")
}
