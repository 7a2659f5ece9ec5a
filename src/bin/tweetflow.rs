//! Single-run batch job: fetch a Twitter list's tweets for one month,
//! normalize, snapshot, log summary statistics, and render the charts.
//!
//! ## Usage
//!
//! ```bash
//! tweetflow [--from-snapshot] <bearer-token> <list-id>
//! ```
//!
//! ## Environment Variables
//!
//! - TWEETFLOW_YEAR / TWEETFLOW_MONTH - target month (default: 2021-12)
//! - TWEETFLOW_TZ - IANA timezone for local day/hour (default: Asia/Jerusalem)
//! - TWEETFLOW_SNAPSHOT_PATH - dataset snapshot file (default: tweets.json)
//! - TWEETFLOW_CHARTS_DIR - chart output directory (default: charts)
//! - TWEETFLOW_DROP_PERCENTAGE - trimmed-mean drop percentage (default: 5.0)
//! - RUST_LOG - logging level (optional, default: info)

use std::collections::HashMap;
use std::sync::Arc;
use tweetflow::charts;
use tweetflow::config::Config;
use tweetflow::domain::{Tweet, User};
use tweetflow::normalizer;
use tweetflow::persistence;
use tweetflow::twitter::{MonthWindow, TwitterClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = Config::from_args_and_env()?;

    log::info!("🚀 Starting tweetflow");
    log::info!("   List: {}", config.list_id);
    log::info!(
        "   Window: {}-{:02} in {}",
        config.year,
        config.month,
        config.timezone
    );
    log::info!("   Snapshot: {}", config.snapshot_path.display());
    log::info!("   Charts dir: {}", config.charts_dir.display());

    let tweets = if config.from_snapshot {
        persistence::load_snapshot(&config.snapshot_path)?
    } else {
        let tweets = fetch_all_tweets(&config).await?;
        persistence::save_snapshot(&tweets, &config.snapshot_path)?;
        tweets
    };

    log_summary(&tweets);

    charts::draw_charts(&tweets, &config.charts_dir, config.drop_percentage)?;
    log::info!("✅ Charts written to {}", config.charts_dir.display());
    Ok(())
}

/// Fetch list members, then page through each member's tweets for the
/// target month and normalize; members are independent, concatenated in
/// fetch order (nothing downstream depends on it).
async fn fetch_all_tweets(config: &Config) -> Result<Vec<Tweet>, Box<dyn std::error::Error>> {
    let client = TwitterClient::new(config.bearer_token.clone())?;
    let window = MonthWindow::for_month(config.timezone, config.year, config.month)?;
    log::info!(
        "   Query window: {} .. {}",
        window.start_param(),
        window.end_param()
    );

    let members = client.list_members(&config.list_id).await?;
    log::info!("Fetched {} list members", members.len());

    let mut all_tweets = Vec::new();
    for member in members {
        let user = Arc::new(member);
        let pages = client.tweet_pages(&user.id, &window).await?;
        let tweets = normalizer::normalize(&user, &pages, config.timezone)?;
        log::info!(
            "   @{}: {} pages, {} tweets kept",
            user.user_name,
            pages.len(),
            tweets.len()
        );
        all_tweets.extend(tweets);
    }
    Ok(all_tweets)
}

fn log_summary(tweets: &[Tweet]) {
    log::info!("All tweets count: {}", tweets.len());

    if let Some(user) = tweets
        .iter()
        .map(|tweet| tweet.user.as_ref())
        .max_by_key(|user| user.followers_count)
    {
        log::info!(
            "Most followers: @{} ({})",
            user.user_name,
            user.followers_count
        );
    }

    let mut tweets_per_user: HashMap<&User, usize> = HashMap::new();
    for tweet in tweets {
        *tweets_per_user.entry(tweet.user.as_ref()).or_default() += 1;
    }
    if let Some((user, count)) = tweets_per_user.iter().max_by_key(|(_, count)| **count) {
        log::info!("Most tweets: @{} ({})", user.user_name, count);
    }

    if let Some(tweet) = tweets.iter().max_by_key(|tweet| tweet.like_count) {
        log::info!(
            "Most likes: {} (@{}, tweet {})",
            tweet.like_count,
            tweet.user.user_name,
            tweet.id
        );
    }

    if let Some(tweet) = tweets.iter().max_by_key(|tweet| tweet.thread_length) {
        log::info!(
            "Longest thread: {} tweets (conversation of tweet {})",
            tweet.thread_length,
            tweet.id
        );
    }

    let mut by_likes: Vec<&Tweet> = tweets.iter().collect();
    by_likes.sort_by(|a, b| b.like_count.cmp(&a.like_count));
    for tweet in by_likes.iter().take(3) {
        log::info!(
            "Top tweet ({} likes, @{}): {}",
            tweet.like_count,
            tweet.user.user_name,
            tweet.text
        );
    }
}
