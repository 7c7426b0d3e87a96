use anyhow::bail;
use clap::{Parser, Subcommand};
use diabetes_atlas::types::{Selection, View};
use diabetes_atlas::{config, data, describe, legend, stats};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge state boundaries with the yearly diabetes series
    MergeStates {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Merge county boundaries with the county statistics table
    MergeCounties {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Print the national rate and range for a year and view
    Stats {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(long, value_enum, default_value_t = View::State)]
        view: View,
    },
    /// Print the info panel and data table for a state name or county FIPS code
    Describe {
        region: String,
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(long, value_enum, default_value_t = View::State)]
        view: View,
    },
}

fn print_description(description: &describe::RegionDescription) {
    println!("{}", description.title);
    println!("{}  (shade {})", description.headline, description.color);
    println!("{}", description.caption);
    for row in &description.rows {
        let marker = if row.highlighted { "*" } else { " " };
        println!("{} {:<24} {:<16} {}", marker, row.region, row.label, row.value);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::MergeStates { config } => {
            info!("Merging states with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;
            data::merge_states(&app_config).await?;
            info!("Data processing complete.");
        }
        Commands::MergeCounties { config } => {
            info!("Merging counties with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;
            data::merge_counties(&app_config).await?;
            info!("Data processing complete.");
        }
        Commands::Stats { config, year, view } => {
            let app_config = config::AppConfig::load_from_file(config)?;
            let selection = Selection::new(year.unwrap_or(app_config.display.default_year), *view);

            let national = data::load_national_table(&app_config).await?;
            let counties = match selection.view {
                View::County => Some(data::load_counties(&app_config).await?.0),
                View::State => None,
            };

            let Some(summary) = stats::national_summary(selection, &national, counties.as_ref()) else {
                bail!("No national statistics for {}", selection.year);
            };
            println!("{}", summary.caption);
            println!("Rate:  {}", summary.rate);
            println!("Range: {}", summary.range);
            println!();
            for entry in legend::entries() {
                println!("{:<8} {}", entry.label, entry.color);
            }
        }
        Commands::Describe { region, config, year, view } => {
            let app_config = config::AppConfig::load_from_file(config)?;
            let year = year.unwrap_or(app_config.display.default_year);
            let matching = &app_config.matching;

            match view {
                View::State => {
                    let (states, _) = data::load_states(&app_config).await?;
                    let Some(feature) = describe::find_state(&states, region, &matching.state_name_keys) else {
                        bail!("No state named {:?}", region);
                    };
                    print_description(&describe::describe_state(feature, year, &matching.state_name_keys));
                }
                View::County => {
                    let (counties, _) = data::load_counties(&app_config).await?;
                    let Some(feature) = describe::find_county(&counties, region, &matching.county_id_keys) else {
                        bail!("No county with FIPS code {:?}", region);
                    };
                    match describe::describe_county(feature) {
                        Some(description) => print_description(&description),
                        None => println!("No diabetes statistics for county {}", region),
                    }
                }
            }
        }
    }

    Ok(())
}
