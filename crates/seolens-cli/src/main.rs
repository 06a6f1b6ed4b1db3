use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use seolens_core::{Device, Locale};
use seolens_pipeline::{AnalyzeOptions, AppServices, Orchestrator, SerpOptions, SuggestOptions};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "seolens-cli")]
#[command(about = "SEOLens keyword and SERP research from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Args)]
struct LocaleArgs {
    /// Language code, e.g. `en`.
    #[arg(long, default_value = "en")]
    language: String,
    /// Country code, e.g. `us`.
    #[arg(long, default_value = "us")]
    country: String,
}

impl LocaleArgs {
    fn locale(&self) -> Locale {
        Locale::new(&self.language, &self.country)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Keyword suggestions with optional volume enrichment.
    Suggest {
        seed: String,
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..=100))]
        limit: u16,
        #[arg(long)]
        no_volume: bool,
        #[command(flatten)]
        locale: LocaleArgs,
    },
    /// Full analysis: suggestions, volume, intent, SERP, clusters, recommendations.
    Analyze {
        seed: String,
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..=100))]
        limit: u16,
        #[arg(long)]
        no_suggestions: bool,
        #[arg(long)]
        no_volume: bool,
        #[arg(long)]
        no_serp: bool,
        #[arg(long)]
        no_clustering: bool,
        #[command(flatten)]
        locale: LocaleArgs,
    },
    /// SERP results with content-gap insights.
    Serp {
        keyword: String,
        #[arg(long, default_value = "desktop")]
        device: Device,
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=100))]
        num_results: u32,
        #[command(flatten)]
        locale: LocaleArgs,
    },
    /// Domains ranking for a keyword, grouped and ranked.
    Competitors {
        keyword: String,
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=20))]
        top_n: u32,
        #[command(flatten)]
        locale: LocaleArgs,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("seolens-cli: run with --help to list commands");
        return Ok(());
    };

    let config = seolens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let orchestrator = Orchestrator::new(Arc::new(AppServices::from_config(&config)?));

    match command {
        Commands::Suggest {
            seed,
            limit,
            no_volume,
            locale,
        } => {
            let mut options = SuggestOptions::new(seed, locale.locale());
            options.limit = usize::from(limit);
            options.include_volume = !no_volume;
            print_json(&orchestrator.suggest(&options).await)
        }
        Commands::Analyze {
            seed,
            limit,
            no_suggestions,
            no_volume,
            no_serp,
            no_clustering,
            locale,
        } => {
            let mut options = AnalyzeOptions::new(seed, locale.locale());
            options.limit = usize::from(limit);
            options.include_suggestions = !no_suggestions;
            options.include_volume = !no_volume;
            options.include_serp = !no_serp;
            options.include_clustering = !no_clustering;
            print_json(&orchestrator.analyze(&options).await)
        }
        Commands::Serp {
            keyword,
            device,
            num_results,
            locale,
        } => {
            let mut options = SerpOptions::new(keyword, locale.locale());
            options.device = device;
            options.num_results = num_results;
            print_json(&orchestrator.serp_with_insights(&options).await?)
        }
        Commands::Competitors {
            keyword,
            top_n,
            locale,
        } => {
            let mut options = SerpOptions::new(keyword, locale.locale());
            options.num_results = top_n;
            print_json(&orchestrator.competitors(&options).await?)
        }
    }
}
