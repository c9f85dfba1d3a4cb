mod cli;
mod commands;
mod config;
mod logging;

use log::LevelFilter;
use newsfeed_engine::FeedController;
use newsfeed_logging::feed_warn;

use cli::{Cli, Commands};
use commands::FeedIntent;
use config::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path)?;

    logging::initialize(
        cli.log.unwrap_or(config.log_destination),
        newsfeed_logging::level_from_env(LevelFilter::Warn),
    );

    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(AppConfig::default_data_dir);
    let mut bookmarks = commands::open_bookmarks(&data_dir);

    let (intent, args) = match cli.command {
        Commands::Headlines { feed } => (FeedIntent::Headlines, feed),
        Commands::Search { query, feed } => (FeedIntent::Search(query), feed),
        Commands::Category { name, feed } => (FeedIntent::Category(name), feed),
        Commands::Bookmarks => {
            commands::list_bookmarks(&bookmarks);
            return Ok(());
        }
        Commands::Unbookmark { url } => {
            commands::unbookmark(&mut bookmarks, &url);
            return Ok(());
        }
    };

    let settings = config.source_settings(|key| std::env::var(key).ok());
    let mut controller = FeedController::from_settings(settings);
    if controller.source_label() != "live" {
        feed_warn!("No API key configured; showing demo articles");
    }
    commands::show_feed(
        &mut controller,
        &mut bookmarks,
        intent,
        args,
        config.wait_timeout(),
    )
}
