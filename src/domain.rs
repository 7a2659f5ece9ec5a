//! Domain model: list members, normalized tweets, and derived metrics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A member of the analyzed Twitter list. Identity is the `id`; immutable
/// once built from the users-lookup response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub user_name: String,
    pub followers_count: u64,
    pub tweet_count: u64,
}

/// Media classification for a tweet. Declaration order is the priority
/// ordering (Video wins over Gif wins over Image wins over None) used when
/// several media items attach to one tweet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MediaType {
    Video,
    Gif,
    Image,
    None,
}

impl MediaType {
    pub fn from_server_name(name: &str) -> Self {
        match name {
            "video" => MediaType::Video,
            "animated_gif" => MediaType::Gif,
            "photo" => MediaType::Image,
            _ => MediaType::None,
        }
    }

    /// Chart label for this variant.
    pub fn display_name(&self) -> &'static str {
        match self {
            MediaType::Video => "וידאו",
            MediaType::Gif => "גיף",
            MediaType::Image => "תמונה",
            MediaType::None => "ללא מדיה",
        }
    }

    pub fn all() -> [MediaType; 4] {
        [
            MediaType::Video,
            MediaType::Gif,
            MediaType::Image,
            MediaType::None,
        ]
    }
}

/// Local wall-clock coordinates of a tweet, derived once at normalization
/// time. `day_of_week` is ISO numbering (1 = Monday .. 7 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAndDay {
    pub day_of_week: u32,
    pub hour_of_day: u32,
}

/// A normalized tweet. The owning `User` is shared, not owned; all fields
/// are fixed once the normalizer builds the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub user: Arc<User>,
    pub id: String,
    pub text: String,
    pub like_count: u64,
    pub reply_count: u64,
    pub quote_count: u64,
    pub retweet_count: u64,
    /// Hashtag texts in entity order, duplicates preserved.
    pub hashtags: Option<Vec<String>>,
    pub media_type: MediaType,
    /// Number of raw tweets sharing this tweet's conversation, always >= 1.
    pub thread_length: usize,
    pub created_at: DateTime<Utc>,
    pub time_and_day: TimeAndDay,
}

impl Tweet {
    pub fn total_retweets(&self) -> u64 {
        self.quote_count + self.retweet_count
    }

    /// Weighted interaction count normalized by follower count.
    ///
    /// A zero-follower user yields a non-finite rate; callers see the raw
    /// division result rather than a silently coerced value.
    pub fn engagement_rate(&self) -> f64 {
        (100.0 * self.like_count as f64
            + 500.0 * self.reply_count as f64
            + 1000.0 * self.total_retweets() as f64)
            / self.user.followers_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_user(followers: u64) -> Arc<User> {
        Arc::new(User {
            id: "1".to_string(),
            name: "Test".to_string(),
            user_name: "test".to_string(),
            followers_count: followers,
            tweet_count: 10,
        })
    }

    fn test_tweet(user: Arc<User>, like: u64, reply: u64, quote: u64, retweet: u64) -> Tweet {
        Tweet {
            user,
            id: "100".to_string(),
            text: "hello".to_string(),
            like_count: like,
            reply_count: reply,
            quote_count: quote,
            retweet_count: retweet,
            hashtags: None,
            media_type: MediaType::None,
            thread_length: 1,
            created_at: Utc.with_ymd_and_hms(2021, 12, 1, 12, 0, 0).unwrap(),
            time_and_day: TimeAndDay {
                day_of_week: 3,
                hour_of_day: 14,
            },
        }
    }

    #[test]
    fn test_engagement_rate() {
        let tweet = test_tweet(test_user(100), 10, 2, 1, 1);
        assert_eq!(tweet.total_retweets(), 2);
        assert_eq!(tweet.engagement_rate(), 40.0);
    }

    #[test]
    fn test_engagement_rate_zero_followers_is_non_finite() {
        let tweet = test_tweet(test_user(0), 1, 0, 0, 0);
        assert!(!tweet.engagement_rate().is_finite());
    }

    #[test]
    fn test_media_type_priority_order() {
        assert!(MediaType::Video < MediaType::Gif);
        assert!(MediaType::Gif < MediaType::Image);
        assert!(MediaType::Image < MediaType::None);

        let picked = [MediaType::Image, MediaType::Video].into_iter().min();
        assert_eq!(picked, Some(MediaType::Video));
    }

    #[test]
    fn test_media_type_from_server_name() {
        assert_eq!(MediaType::from_server_name("video"), MediaType::Video);
        assert_eq!(MediaType::from_server_name("animated_gif"), MediaType::Gif);
        assert_eq!(MediaType::from_server_name("photo"), MediaType::Image);
        assert_eq!(MediaType::from_server_name("unknown"), MediaType::None);
    }
}
