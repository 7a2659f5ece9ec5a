use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;

// Every chart is rendered at the same fixed pixel size
pub const CHART_WIDTH: u32 = 640;
pub const CHART_HEIGHT: u32 = 480;

pub const TOP_HASHTAGS: usize = 20;

/// Run configuration: positional CLI arguments plus environment overrides
#[derive(Debug, Clone)]
pub struct Config {
    pub bearer_token: String,
    pub list_id: String,
    /// Reload the persisted snapshot instead of re-fetching
    pub from_snapshot: bool,
    pub year: i32,
    pub month: u32,
    pub timezone: Tz,
    pub snapshot_path: PathBuf,
    pub charts_dir: PathBuf,
    /// Percentage dropped from each end of a group before averaging
    pub drop_percentage: f64,
}

impl Config {
    /// Build the configuration from `std::env::args` and the environment.
    ///
    /// Usage: `tweetflow [--from-snapshot] <bearer-token> <list-id>`
    pub fn from_args_and_env() -> Result<Self, Box<dyn std::error::Error>> {
        let args: Vec<String> = env::args().collect();
        Self::from_parts(&args[1..])
    }

    pub fn from_parts(args: &[String]) -> Result<Self, Box<dyn std::error::Error>> {
        let from_snapshot = args.iter().any(|arg| arg == "--from-snapshot");
        let mut positional = args.iter().filter(|arg| !arg.starts_with("--"));
        let bearer_token = positional
            .next()
            .cloned()
            .ok_or("usage: tweetflow [--from-snapshot] <bearer-token> <list-id>")?;
        let list_id = positional
            .next()
            .cloned()
            .ok_or("usage: tweetflow [--from-snapshot] <bearer-token> <list-id>")?;

        let timezone: Tz = env::var("TWEETFLOW_TZ")
            .unwrap_or_else(|_| "Asia/Jerusalem".to_string())
            .parse()
            .map_err(|e| format!("bad TWEETFLOW_TZ: {}", e))?;

        Ok(Self {
            bearer_token,
            list_id,
            from_snapshot,
            year: env::var("TWEETFLOW_YEAR")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(2021),
            month: env::var("TWEETFLOW_MONTH")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(12),
            timezone,
            snapshot_path: env::var("TWEETFLOW_SNAPSHOT_PATH")
                .unwrap_or_else(|_| "tweets.json".to_string())
                .into(),
            charts_dir: env::var("TWEETFLOW_CHARTS_DIR")
                .unwrap_or_else(|_| "charts".to_string())
                .into(),
            drop_percentage: env::var("TWEETFLOW_DROP_PERCENTAGE")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(5.0),
        })
    }
}
