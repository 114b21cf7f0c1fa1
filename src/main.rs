use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fotix::{
    config::{validate_dimensions, Config},
    imaging::Dimensions,
    pipeline::ProductEngine,
};

#[derive(Parser)]
#[command(
    name = "fotix",
    version,
    about = "Turn product photos into storefront images and marketing copy",
    long_about = "Fotix composites each product photo onto fixed-size site and ERP canvases and asks a hosted model for a title, description and SEO tags."
)]
struct Cli {
    /// Product photos (PNG, JPG, GIF, BMP, WebP)
    #[arg(required_unless_present = "write_config")]
    images: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Free-text product description passed to the model
    #[arg(short, long)]
    description: Option<String>,

    /// Site image size, e.g. 1080x1080
    #[arg(long, value_name = "WxH")]
    site: Option<Dimensions>,

    /// ERP image size, e.g. 400x400
    #[arg(long, value_name = "WxH")]
    erp: Option<Dimensions>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip content generation
    #[arg(long)]
    no_ai: bool,

    /// Also ask for marketing campaign ideas
    #[arg(long)]
    campaign_ideas: bool,

    /// Write the default configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Some(path) = &cli.write_config {
        Config::default().save_to_file(path)?;
        info!("📝 Default configuration written to {:?}", path);
        return Ok(());
    }

    info!("Starting Fotix v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    // Command-line overrides
    if let Some(site) = cli.site {
        validate_dimensions("--site", site)?;
        config.output.site = site;
    }
    if let Some(erp) = cli.erp {
        validate_dimensions("--erp", erp)?;
        config.output.erp = erp;
    }
    if cli.no_ai {
        config.ai.enabled = false;
    }
    if cli.campaign_ideas {
        config.ai.campaign_ideas = true;
    }
    config.validate()?;

    info!("Site: {}  ERP: {}", config.output.site, config.output.erp);
    info!("Output: {:?}", cli.output);

    let engine = match ProductEngine::from_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{}", e.user_message());
            return Err(e.into());
        }
    };

    let results = engine
        .process_batch(&cli.images, cli.description.as_deref())
        .await;

    let total = results.len();
    let mut failed = 0;

    for (path, result) in results {
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                error!("❌ {:?}: {}", path, e.user_message());
                failed += 1;
                continue;
            }
        };

        if let Err(e) = report.write_to(&cli.output).await {
            error!("❌ Could not save results for {:?}: {}", path, e);
            failed += 1;
            continue;
        }

        if let Some(content) = &report.content {
            info!("📝 {}", content.title);
            info!("   {}", content.description);
            info!("   Tags: {}", content.seo_tags.join(", "));
        }
        if let Some(ideas) = &report.campaign_ideas {
            for idea in &ideas.campaign_ideas {
                info!("   💡 {}", idea);
            }
        }
    }

    if failed > 0 {
        warn!("{} of {} product(s) failed", failed, total);
        anyhow::bail!("{} of {} product(s) failed", failed, total);
    }

    info!("🎉 Done! {} product(s) saved to {:?}", total, cli.output);
    Ok(())
}
