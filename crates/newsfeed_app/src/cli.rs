use std::path::PathBuf;

use clap::{Args, Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use newsfeed_core::CATEGORIES;

use crate::logging::LogDestination;

#[derive(Parser)]
#[command(name = "newsfeed")]
#[command(about = "Browse, search and bookmark news articles", long_about = None)]
pub struct Cli {
    /// Directory holding the bookmark file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to a newsfeed.ron config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum, global = true)]
    pub log: Option<LogDestination>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the default top headlines
    Headlines {
        #[command(flatten)]
        feed: FeedArgs,
    },
    /// Full-text search
    Search {
        /// Search terms
        query: String,
        #[command(flatten)]
        feed: FeedArgs,
    },
    /// Top headlines for one category
    Category {
        name: String,
        #[command(flatten)]
        feed: FeedArgs,
    },
    /// List saved articles, newest first
    Bookmarks,
    /// Remove a saved article by url
    Unbookmark {
        /// URL of the saved article
        url: String,
    },
}

impl Cli {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse_args() -> Self {
        let matches = Self::build_command().get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }

    /// The derived command with the category help filled in from the
    /// known category list.
    pub fn build_command() -> Command {
        let known = CATEGORIES.join(", ");
        Self::command().mut_subcommand("category", |category| {
            category.mut_arg("name", |name| {
                name.help(format!("Category to browse, e.g. {known}"))
            })
        })
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct FeedArgs {
    /// Page to show (1-based)
    #[arg(short, long, default_value_t = 1)]
    pub page: i64,

    /// Save the N-th article of the result (1-based)
    #[arg(short, long)]
    pub bookmark: Option<usize>,
}
