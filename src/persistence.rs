use crate::domain::Tweet;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Snapshot of the full normalized dataset for persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetSnapshot {
    pub tweets: Vec<Tweet>,
    pub timestamp: i64,
}

/// Save the dataset to a JSON snapshot file
pub fn save_snapshot(tweets: &[Tweet], file_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = TweetSnapshot {
        tweets: tweets.to_vec(),
        timestamp: chrono::Utc::now().timestamp(),
    };

    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(file_path, json)?;

    log::info!("Saved {} tweets to {}", tweets.len(), file_path.display());
    Ok(())
}

/// Load the dataset back from a JSON snapshot file
pub fn load_snapshot(file_path: &Path) -> Result<Vec<Tweet>, Box<dyn std::error::Error>> {
    if !file_path.exists() {
        log::info!("No existing snapshot file found: {}", file_path.display());
        return Ok(Vec::new());
    }

    let json = fs::read_to_string(file_path)?;
    let snapshot: TweetSnapshot = serde_json::from_str(&json)?;

    log::info!(
        "Loaded {} tweets from {}",
        snapshot.tweets.len(),
        file_path.display()
    );
    Ok(snapshot.tweets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediaType, TimeAndDay, User};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn sample_tweets() -> Vec<Tweet> {
        let user = Arc::new(User {
            id: "10".to_string(),
            name: "Dana".to_string(),
            user_name: "dana_il".to_string(),
            followers_count: 1500,
            tweet_count: 4200,
        });
        vec![
            Tweet {
                user: Arc::clone(&user),
                id: "1".to_string(),
                text: "שלום עולם".to_string(),
                like_count: 12,
                reply_count: 3,
                quote_count: 1,
                retweet_count: 2,
                hashtags: Some(vec!["בוקר".to_string(), "בוקר".to_string()]),
                media_type: MediaType::Image,
                thread_length: 4,
                created_at: Utc.with_ymd_and_hms(2021, 12, 3, 7, 15, 0).unwrap(),
                time_and_day: TimeAndDay {
                    day_of_week: 5,
                    hour_of_day: 9,
                },
            },
            Tweet {
                user,
                id: "2".to_string(),
                text: "no tags".to_string(),
                like_count: 0,
                reply_count: 0,
                quote_count: 0,
                retweet_count: 0,
                hashtags: None,
                media_type: MediaType::None,
                thread_length: 1,
                created_at: Utc.with_ymd_and_hms(2021, 12, 4, 20, 0, 0).unwrap(),
                time_and_day: TimeAndDay {
                    day_of_week: 6,
                    hour_of_day: 22,
                },
            },
        ]
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.json");
        let tweets = sample_tweets();

        save_snapshot(&tweets, &path).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded, tweets);
    }

    #[test]
    fn test_load_missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let loaded = load_snapshot(&path).unwrap();
        assert!(loaded.is_empty());
    }
}
