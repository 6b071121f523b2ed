use clap::Parser;
use std::process;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let scrape = match args.into_scrape() {
        Ok(scrape) => scrape,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if scrape.config().renderer.kind == listing_scraper::RendererKind::Browser {
        println!("Note: Browser rendering requires a WebDriver server (e.g., ChromeDriver).");
        println!(
            "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
        );
    }

    let start_time = std::time::Instant::now();

    let harvest = match scrape.run().await {
        Ok(harvest) => harvest,
        Err(e) => {
            ::log::error!("Scrape failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let stats = harvest.stats();
    println!(
        "\nScraped {} rows x {} columns of {} from {} pages ({} empty, {} failed) in {:.2} seconds",
        harvest.len(),
        harvest.columns().len(),
        harvest.source(),
        stats.visited,
        stats.empty,
        stats.failed,
        start_time.elapsed().as_secs_f64()
    );

    match harvest.write() {
        Ok(rows) => println!("Saved {} rows to {}", rows, harvest.output().display()),
        Err(e) => {
            ::log::error!("Failed to save {} records: {}", harvest.len(), e);
            eprintln!("Error saving CSV: {}", e);
            process::exit(1);
        }
    }
}
