use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod collect;
mod details;
mod output;
mod plot;

#[derive(Debug, Parser)]
#[command(name = "adreach")]
#[command(about = "Collect TikTok ad library data and chart daily ad reach")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect ad ids matching search terms over a lookback window
    Collect {
        /// Search terms, collected one after another
        #[arg(required = true)]
        terms: Vec<String>,
        /// Two-letter country code (defaults to `ADREACH_COUNTRY`)
        #[arg(long, value_parser = adreach_core::parse_country)]
        country: Option<String>,
        /// Months to look back from yesterday (defaults to `ADREACH_MONTHS_BACK`)
        #[arg(long, value_parser = months_back_parser())]
        months_back: Option<u32>,
        /// Directory for the collection files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Fetch full details for every ad id in a collection file
    Details {
        /// Collection file written by `collect`
        input: PathBuf,
        /// Where to write the detail payloads
        output: PathBuf,
    },
    /// Chart total daily reach from collection or detail files
    Plot {
        /// JSON file of ad payloads
        input: PathBuf,
        /// Where to write the HTML chart
        #[arg(long, default_value = "chart.html")]
        output: PathBuf,
        /// Chart title
        #[arg(long)]
        title: Option<String>,
    },
}

fn months_back_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(..=i64::from(adreach_core::MAX_MONTHS_BACK))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = adreach_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Collect {
            terms,
            country,
            months_back,
            output_dir,
        } => {
            collect::run_collect(
                &config,
                &terms,
                country.as_deref(),
                months_back,
                &output_dir,
            )
            .await
        }
        Commands::Details { input, output } => {
            details::run_details(&config, &input, &output).await
        }
        Commands::Plot {
            input,
            output,
            title,
        } => plot::run_plot(&input, &output, title),
    }
}
