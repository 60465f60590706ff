use anyhow::Result;
use std::env;
use std::path::Path;

use quote_builder::{excel_available, CategoryFilter, Entry, QuoteCatalog, DEFAULT_CATALOG_FILE};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("seed") => run_seed()?,
        Some("export") => run_export()?,
        _ => run_summary(),
    }

    Ok(())
}

/// Create a starter catalog when no catalog file exists yet.
/// Useful for the first run or for demonstration.
fn run_seed() -> Result<()> {
    if Path::new(DEFAULT_CATALOG_FILE).exists() {
        println!(
            "Catalog file {} already exists. Nothing to seed.",
            DEFAULT_CATALOG_FILE
        );
        return Ok(());
    }

    let mut catalog = QuoteCatalog::open(DEFAULT_CATALOG_FILE);
    catalog.seed_initial(vec![
        Entry::new("Arreglo de mesa", 25000.0, "Decoración"),
        Entry::new("Centro de mesa", 15000.0, "Decoración"),
        Entry::new("Bouquet de novia", 45000.0, "Bouquets"),
        Entry::new("Bouquet de dama", 20000.0, "Bouquets"),
        Entry::new("Corona floral", 35000.0, "Coronas"),
    ])?;

    println!("✅ Starter catalog written to {}", DEFAULT_CATALOG_FILE);
    Ok(())
}

/// Default mode: show the catalog grouped by category
fn run_summary() {
    let catalog = QuoteCatalog::open(DEFAULT_CATALOG_FILE);

    if catalog.base().is_empty() {
        println!("The catalog is empty. Run: quote-builder seed");
        return;
    }

    println!("\n📋 Catalog ({} entries)", catalog.base().len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for category in catalog.categories() {
        println!("\n{}", category);
        for entry in catalog.base().iter().filter(|e| e.category == category) {
            let comment = catalog.comment(&entry.id);
            if comment.is_empty() {
                println!("  {:<40} {:>12.2}", entry.name, entry.price);
            } else {
                println!("  {:<40} {:>12.2}  ({})", entry.name, entry.price, comment);
            }
        }
    }

    println!(
        "\nSpreadsheet export: {}",
        if excel_available() { "available" } else { "not built in" }
    );
}

/// Demonstration export: quote every catalog entry and write the workbook
fn run_export() -> Result<()> {
    let mut catalog = QuoteCatalog::open(DEFAULT_CATALOG_FILE);

    if catalog.base().is_empty() {
        eprintln!("❌ The catalog is empty. Run: quote-builder seed");
        std::process::exit(1);
    }

    // Select everything for the demonstration quote
    catalog.filter_available(&CategoryFilter::All);
    let ids: Vec<_> = catalog.base().iter().map(|e| e.id.clone()).collect();
    for id in ids {
        catalog.select(&id);
    }

    println!("📊 Exporting a quote with {} entries...", catalog.selected_entries().len());
    println!("   Total: {:.2}", catalog.total());

    match catalog.export_excel() {
        Ok(path) => {
            println!("✅ Quote written to {}", path.display());
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {}", err);
            std::process::exit(1);
        }
    }
}
