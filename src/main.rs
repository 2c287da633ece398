use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use cafegrid::api::PlacesClient;
use cafegrid::config::{self, FileConfig, Overrides, Settings};
use cafegrid::crawl::{collect_places, enrich_places};
use cafegrid::geometry::{GridSpec, Projector, generate_grid};
use cafegrid::logging::init_logger;
use cafegrid::output::write_csv;

/// Crawl every cafe in a city with Google Maps Platform APIs
///
/// Requires the GOOGLE_API_KEY environment variable.
///
/// Examples:
///   # Taichung with default settings
///   cafegrid
///
///   # Taipei in English, smaller search cells
///   cafegrid --city "Taipei" --lang en --region tw --radius 800 --out taipei_cafes.csv
///
///   # Bakeries instead of cafes, denser grid
///   cafegrid --place-type bakery --overlap 0.5
///
///   # Use a config file
///   cafegrid --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "cafegrid")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches cafegrid.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// City name for geocoding [default: 台中市]
    #[arg(short = 'c', long)]
    city: Option<String>,

    /// Nearby Search radius in meters [default: 1500]
    #[arg(short = 'r', long)]
    radius: Option<u32>,

    /// Grid step as a fraction of the radius; below 1 cells overlap [default: 0.6]
    #[arg(long)]
    overlap: Option<f64>,

    /// Language for API responses [default: zh-TW]
    #[arg(short = 'l', long)]
    lang: Option<String>,

    /// Output CSV path [default: taichung_cafes.csv]
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,

    /// Region bias for geocoding, as a ccTLD [default: tw]
    #[arg(long)]
    region: Option<String>,

    /// Place type to search for [default: cafe]
    #[arg(long)]
    place_type: Option<String>,

    /// Maximum width of linked photos in pixels [default: 800]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=1600))]
    photo_max_width: Option<u32>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            city: self.city.clone(),
            radius: self.radius,
            overlap: self.overlap,
            language: self.lang.clone(),
            region: self.region.clone(),
            place_type: self.place_type.clone(),
            output: self.out.clone(),
            photo_max_width: self.photo_max_width,
            verbose: self.verbose,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref path) => Some(FileConfig::from_path(path)?),
        None => FileConfig::load(),
    };
    let settings = Settings::resolve(args.overrides(), file_config);

    let api_key = config::api_key_from_env()?;
    let spec =
        GridSpec::new(settings.radius_m, settings.overlap).context("Invalid grid parameters")?;

    println!("cafegrid - City Cafe Crawler");
    println!("============================");
    println!();

    if settings.verbose {
        println!("Configuration:");
        println!("  City: {}", settings.city);
        println!("  Region: {}", settings.region);
        println!("  Language: {}", settings.language);
        println!("  Place type: {}", settings.place_type);
        println!("  Radius: {}m", settings.radius_m);
        println!("  Overlap: {}", settings.overlap);
        println!("  Photo max width: {}px", settings.photo_max_width);
        println!("  Output: {}", settings.output.display());
        println!(
            "  Pacing: {}ms/cell, {}ms/details, {}ms page token delay, max {} pages",
            settings.pacing.cell_delay_ms,
            settings.pacing.details_delay_ms,
            settings.pacing.page_token_delay_ms,
            settings.pacing.max_pages
        );
        println!();
    }

    let client = PlacesClient::new(api_key, settings.api.clone(), settings.pacing.clone())
        .context("Failed to create Places API client")?
        .with_language(settings.language.as_str())
        .with_place_type(settings.place_type.as_str());
    let photos = client
        .photo_urls(settings.photo_max_width)
        .context("Invalid photo endpoint URL")?;

    let spinner = create_spinner("Geocoding city...");
    let start = Instant::now();
    let city = client
        .geocode_city_bounds(&settings.city, &settings.region)
        .with_context(|| format!("Failed to geocode '{}'", settings.city))?;
    let (ne, sw) = (city.bounds.northeast(), city.bounds.southwest());
    spinner.finish_with_message(format!(
        "Geocoded: {} -> NE ({:.4}, {:.4}) SW ({:.4}, {:.4}) [{:.1}s]",
        settings.city,
        ne.0,
        ne.1,
        sw.0,
        sw.1,
        start.elapsed().as_secs_f32()
    ));

    let grid = generate_grid(&city.bounds, city.center.0, &spec)
        .context("Failed to build search grid")?;
    let projector = Projector::new(city.center);
    println!(
        "Grid: {} x {} = {} cells over {:.1}km x {:.1}km ({:.0}m step)",
        grid.rows,
        grid.columns,
        grid.len(),
        projector.distance_m(sw, (sw.0, ne.1)) / 1000.0,
        projector.distance_m(sw, (ne.0, sw.1)) / 1000.0,
        spec.step_m()
    );

    let progress = create_progress_bar(grid.len(), "Searching");
    let start = Instant::now();
    let collected = collect_places(
        &client,
        &grid.cells,
        settings.pacing.cell_delay(),
        &progress,
    );
    progress.finish_with_message(format!(
        "Found {} unique places in {} results [{:.1}s]",
        collected.places.len(),
        collected.total_results,
        start.elapsed().as_secs_f32()
    ));
    if collected.failed_cells > 0 {
        tracing::warn!(
            "{} of {} cells failed and were skipped",
            collected.failed_cells,
            grid.len()
        );
    }

    let progress = create_progress_bar(collected.places.len(), "Fetching details");
    let start = Instant::now();
    let enriched = enrich_places(
        &client,
        &collected.places,
        &photos,
        settings.pacing.details_delay(),
        &progress,
    );
    progress.finish_with_message(format!(
        "Enriched {} places ({} without details, {} failed) [{:.1}s]",
        enriched.records.len(),
        enriched.without_details,
        enriched.failed,
        start.elapsed().as_secs_f32()
    ));

    println!();
    if enriched.records.is_empty() {
        tracing::warn!("No data to save, {} not written", settings.output.display());
    } else {
        let rows = write_csv(&settings.output, &enriched.records).context("Failed to write CSV file")?;
        println!("Saved: {} ({} rows)", settings.output.display(), rows);
    }

    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn create_progress_bar(len: usize, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
