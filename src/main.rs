// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use doctor_directory::{
    logging, seed_registry, Catalog, DirectoryConfig, ProviderRecord, ProviderRegistry,
    SearchParams, SearchQuery,
};

#[derive(Parser)]
#[command(name = "doctor-directory", version)]
#[command(about = "Search the doctor directory from the terminal")]
struct Cli {
    /// Seed the directory from a CSV file instead of the built-in records
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a directory search and print the results
    Search {
        #[command(flatten)]
        params: SearchParams,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List known locations and specialities
    Catalog,
    /// Interactive terminal browser (default)
    Browse,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = DirectoryConfig::from_env();

    // Quiet by default: stdout is the product here
    logging::init_tracing("warn")?;

    let seed = cli.seed.or(config.seed.providers_csv);
    let registry = seed_registry(seed.as_deref())?;

    match cli.command.unwrap_or(Command::Browse) {
        Command::Search { params, json } => run_search(&registry, &params, json)?,
        Command::Catalog => run_catalog(),
        Command::Browse => run_ui_mode(registry)?,
    }

    Ok(())
}

fn run_search(registry: &ProviderRegistry, params: &SearchParams, json: bool) -> Result<()> {
    let query = SearchQuery::from(params);
    let results = registry.search(&query);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!(
        "🔎 {} of {} doctors (sorted by {} {})",
        results.len(),
        registry.len(),
        query.sort.field.as_str(),
        query.sort.order.as_str()
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    print_table(&results);

    Ok(())
}

fn print_table(records: &[ProviderRecord]) {
    println!(
        "{:<16} {:<18} {:>6} {:>5} {:>7} {:<16} {}",
        "Name", "Speciality", "Rating", "Years", "Fee", "Location", "Available"
    );
    for r in records {
        println!(
            "{:<16} {:<18} {:>6.1} {:>5} {:>7} {:<16} {}",
            r.name,
            r.speciality,
            r.rating,
            r.experience,
            r.consultation_fee,
            r.location,
            if r.available { "yes" } else { "no" }
        );
    }
}

fn run_catalog() {
    let catalog = Catalog::new();

    println!("📍 Locations");
    for entry in catalog.locations() {
        println!("   {}", entry.name);
    }

    println!("\n🩺 Specialities");
    for entry in catalog.specialities() {
        println!("   {}", entry.name);
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(registry: ProviderRegistry) -> Result<()> {
    let mut app = ui::App::new(registry);
    ui::run_ui(&mut app)?;

    println!("✅ Browser closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_registry: ProviderRegistry) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or search directly: doctor-directory search --speciality Cardiology");
    std::process::exit(1);
}
