use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use korea_democracy::config::Config;
use korea_democracy::logging;
use korea_democracy::pipeline::{run_coverage, run_integration, CoverageRun, IntegrationRun};
use korea_democracy::storage::FsOutputStore;

#[derive(Parser)]
#[command(name = "korea_democracy")]
#[command(about = "South Korea democracy indicator integration")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults to ./korea_democracy.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding one subdirectory per dataset
    #[arg(long, global = true)]
    dataset_root: Option<PathBuf>,

    /// Directory for generated JSON and reports
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate all datasets into the web timeline
    Integrate,
    /// Report which datasets contain Korea data for which years
    Coverage,
    /// Run coverage analysis followed by integration
    Run,
}

fn print_integration(run: &IntegrationRun) {
    println!("{}", run.summary);
    println!("📁 Output files:");
    for file in &run.output_files {
        println!("   - {}", file);
    }
    println!("⏱️  Finished in {:.2}s", run.duration_secs);
}

fn print_coverage(run: &CoverageRun) {
    println!("{}", run.report_text);
    println!("📁 Output files:");
    for file in &run.output_files {
        println!("   - {}", file);
    }
    println!("⏱️  Finished in {:.2}s", run.duration_secs);
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli_overrides(cli.dataset_root, cli.output_dir);

    let _guard = logging::init_logging(&config.log_dir);
    info!(
        "Dataset root: {}, output directory: {}",
        config.dataset_root.display(),
        config.output_dir.display()
    );

    let store = FsOutputStore::new(&config.output_dir);

    match cli.command {
        Commands::Integrate => {
            println!("🔄 Integrating Korea democracy datasets...");
            let run = run_integration(&config, &store).inspect_err(|e| error!("Integration failed: {}", e))?;
            print_integration(&run);
        }
        Commands::Coverage => {
            println!("🔍 Analyzing Korea data coverage...");
            let run = run_coverage(&config, &store).inspect_err(|e| error!("Coverage analysis failed: {}", e))?;
            print_coverage(&run);
        }
        Commands::Run => {
            println!("🚀 Running full pipeline (coverage + integration)...");

            println!("\n🔍 Step 1: Analyzing coverage...");
            let coverage = run_coverage(&config, &store).context("Coverage analysis failed")?;
            print_coverage(&coverage);

            println!("\n🔄 Step 2: Integrating datasets...");
            let integration = run_integration(&config, &store).context("Integration failed")?;
            print_integration(&integration);

            println!("✅ Full pipeline completed successfully!");
        }
    }
    Ok(())
}
