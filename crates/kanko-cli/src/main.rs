use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

mod places;
mod report;
mod warehouse;
mod youtube;

#[derive(Debug, Parser)]
#[command(name = "kanko")]
#[command(about = "Tourism-analytics data pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect windowed video search results for one query.
    Search {
        #[arg(long)]
        query: String,
        /// Budget of paged search API calls for this run.
        #[arg(long, default_value_t = 90)]
        max_requests: u32,
        /// Lower bound on publish date (RFC 3339); defaults to a 10-year
        /// lookback.
        #[arg(long)]
        after: Option<DateTime<Utc>>,
    },
    /// Collect nearby place details around the configured center.
    Places {
        #[arg(long, default_value_t = 4000)]
        search_radius: u32,
        #[arg(long, default_value_t = 3)]
        max_pages: u32,
        #[arg(long, default_value_t = 60)]
        max_results: usize,
        #[arg(long, default_value_t = 0.8)]
        ratio_popularity: f64,
        #[arg(long, default_value_t = 200)]
        min_reviews: u64,
    },
    /// Join collected search results against the details API.
    Enrich {
        #[arg(long, default_value_t = 100)]
        max_requests: usize,
        #[arg(long, default_value_t = 0)]
        batch_idx: usize,
        #[arg(long, default_value_t = 5000)]
        min_views: u64,
    },
    /// Fetch transcripts for the top-viewed enriched videos.
    Captions {
        #[arg(long, default_value_t = 100)]
        max_fetches: usize,
        /// Language preference order for transcript tracks.
        #[arg(long, value_delimiter = ',', default_value = "ja,en")]
        languages: Vec<String>,
    },
    /// Flatten raw place details into the places/reviews tables.
    CleanPlaces {
        #[arg(long, default_value_t = 3.9)]
        rating_threshold: f64,
    },
    /// Generate the video strategy report.
    VideoReport {
        #[arg(long, default_value_t = 20)]
        max_videos: usize,
        #[arg(long, default_value_t = 100_000)]
        max_chars: usize,
    },
    /// Generate the place strategy report.
    PlaceReport {
        #[arg(long, default_value_t = 20)]
        max_places: usize,
    },
    /// Run the warehouse feature-table SQL templates.
    Warehouse {
        #[arg(long, default_value = "./sql")]
        sql_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = kanko_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    match cli.command {
        Commands::Search {
            query,
            max_requests,
            after,
        } => youtube::run_search(&config, &query, max_requests, after).await,
        Commands::Places {
            search_radius,
            max_pages,
            max_results,
            ratio_popularity,
            min_reviews,
        } => {
            places::run_places(
                &config,
                search_radius,
                max_pages,
                max_results,
                ratio_popularity,
                min_reviews,
            )
            .await
        }
        Commands::Enrich {
            max_requests,
            batch_idx,
            min_views,
        } => youtube::run_enrich(&config, max_requests, batch_idx, min_views).await,
        Commands::Captions {
            max_fetches,
            languages,
        } => youtube::run_captions(&config, max_fetches, languages).await,
        Commands::CleanPlaces { rating_threshold } => {
            places::run_clean(&config, rating_threshold)
        }
        Commands::VideoReport {
            max_videos,
            max_chars,
        } => report::run_video_report(&config, max_videos, max_chars).await,
        Commands::PlaceReport { max_places } => {
            report::run_place_report(&config, max_places).await
        }
        Commands::Warehouse { sql_dir } => warehouse::run(&config, &sql_dir).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_defaults_match_the_documented_budget() {
        let cli = Cli::try_parse_from(["kanko", "search", "--query", "川越"]).unwrap();
        match cli.command {
            Commands::Search {
                query,
                max_requests,
                after,
            } => {
                assert_eq!(query, "川越");
                assert_eq!(max_requests, 90);
                assert!(after.is_none());
            }
            other => panic!("expected Search, got {other:?}"),
        }
    }

    #[test]
    fn after_flag_parses_rfc3339() {
        let cli = Cli::try_parse_from([
            "kanko",
            "search",
            "--query",
            "kawagoe",
            "--after",
            "2020-01-01T00:00:00Z",
        ])
        .unwrap();
        match cli.command {
            Commands::Search { after, .. } => {
                assert_eq!(after.unwrap().to_rfc3339(), "2020-01-01T00:00:00+00:00");
            }
            other => panic!("expected Search, got {other:?}"),
        }
    }

    #[test]
    fn captions_languages_split_on_commas() {
        let cli =
            Cli::try_parse_from(["kanko", "captions", "--languages", "en,ja"]).unwrap();
        match cli.command {
            Commands::Captions {
                max_fetches,
                languages,
            } => {
                assert_eq!(max_fetches, 100);
                assert_eq!(languages, vec!["en", "ja"]);
            }
            other => panic!("expected Captions, got {other:?}"),
        }
    }

    #[test]
    fn places_defaults_cover_the_selection_heuristic() {
        let cli = Cli::try_parse_from(["kanko", "places"]).unwrap();
        match cli.command {
            Commands::Places {
                search_radius,
                max_pages,
                max_results,
                ratio_popularity,
                min_reviews,
            } => {
                assert_eq!(search_radius, 4000);
                assert_eq!(max_pages, 3);
                assert_eq!(max_results, 60);
                assert!((ratio_popularity - 0.8).abs() < f64::EPSILON);
                assert_eq!(min_reviews, 200);
            }
            other => panic!("expected Places, got {other:?}"),
        }
    }
}
