use std::path::PathBuf;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use env_logger::Env;
use tubecloud::{configuration::get_configuration, pipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("tubecloud")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scrape video search results, filter them by keyword patterns, export a CSV and render a shaped word cloud")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to the configuration file")
                .default_value("configuration.yaml"),
        )
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .value_name("QUERY")
                .help("Override the configured search query"),
        )
        .arg(
            Arg::new("max-results")
                .short('n')
                .long("max-results")
                .value_name("NUM")
                .help("Override the configured number of matches to collect"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let default_filter = match matches.get_flag("verbose") {
        true => "debug",
        false => "info",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let config_path = PathBuf::from(matches.get_one::<String>("config").unwrap());
    let mut settings = get_configuration(&config_path).expect("Failed to read configuration.");

    if let Some(query) = matches.get_one::<String>("query") {
        settings.search.query = query.clone();
    }
    if let Some(max_results) = matches.get_one::<String>("max-results") {
        settings.search.max_results = max_results
            .parse()
            .context("--max-results must be a number")?;
    }

    log::info!("Starting run for query '{}'", settings.search.query);

    match pipeline::run(settings).await {
        Ok(summary) => {
            log::info!(
                "Run finished: {} matched, csv written: {}, word cloud written: {}",
                summary.matched,
                summary.csv_written,
                summary.wordcloud_written
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Run failed: {:?}", e);
            Err(e)
        }
    }
}
