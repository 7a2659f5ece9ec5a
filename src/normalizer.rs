//! Cross-references raw tweet pages into filtered domain Tweets
//!
//! Per user: build a media-key lookup from every page's inclusions, count
//! thread lengths over the raw conversation groups, apply the keep-rule,
//! and convert timestamps into the target timezone.

use crate::domain::{MediaType, TimeAndDay, Tweet, User};
use crate::twitter::dto::{TweetDto, TweetsPage};
use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
pub enum NormalizeError {
    BadTimestamp { tweet_id: String, raw: String },
}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeError::BadTimestamp { tweet_id, raw } => {
                write!(f, "Unparseable created_at {:?} on tweet {}", raw, tweet_id)
            }
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Turn the accumulated raw pages for one user into domain Tweets.
///
/// Thread lengths are counted over ALL raw tweets, including ones the
/// keep-rule drops afterwards: a thread's length reflects the raw
/// conversation size, not the post-filter size.
pub fn normalize(
    user: &Arc<User>,
    pages: &[TweetsPage],
    tz: Tz,
) -> Result<Vec<Tweet>, NormalizeError> {
    let media_types = media_type_lookup(pages);
    let thread_lengths = thread_length_lookup(pages);

    let mut tweets = Vec::new();
    for dto in raw_tweets(pages) {
        if !should_keep(dto) {
            continue;
        }
        let created_at = parse_created_at(dto)?;
        tweets.push(Tweet {
            user: Arc::clone(user),
            id: dto.id.clone(),
            text: dto.text.clone(),
            like_count: dto.public_metrics.like_count,
            reply_count: dto.public_metrics.reply_count,
            quote_count: dto.public_metrics.quote_count,
            retweet_count: dto.public_metrics.retweet_count,
            hashtags: dto
                .entities
                .as_ref()
                .and_then(|entities| entities.hashtags.as_ref())
                .map(|tags| tags.iter().map(|hashtag| hashtag.tag.clone()).collect()),
            media_type: resolve_media_type(
                dto.attachments
                    .as_ref()
                    .and_then(|attachments| attachments.media_keys.as_deref()),
                &media_types,
            ),
            // A tweet always counts itself, so the lookup cannot miss
            thread_length: thread_lengths
                .get(dto.conversation_id.as_str())
                .copied()
                .unwrap_or(1),
            created_at,
            time_and_day: time_and_day(created_at, tz),
        });
    }
    Ok(tweets)
}

fn raw_tweets(pages: &[TweetsPage]) -> impl Iterator<Item = &TweetDto> {
    pages.iter().filter_map(|page| page.data.as_ref()).flatten()
}

/// Flatten every page's media inclusions into key -> MediaType. Colliding
/// keys are last-write-wins; keys are globally unique per media object, so
/// the collision policy never matters in practice.
fn media_type_lookup(pages: &[TweetsPage]) -> HashMap<&str, MediaType> {
    pages
        .iter()
        .filter_map(|page| page.includes.as_ref())
        .flat_map(|includes| includes.media.iter())
        .map(|media| {
            (
                media.media_key.as_str(),
                MediaType::from_server_name(&media.kind),
            )
        })
        .collect()
}

fn thread_length_lookup(pages: &[TweetsPage]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for dto in raw_tweets(pages) {
        *counts.entry(dto.conversation_id.as_str()).or_default() += 1;
    }
    counts
}

/// Keep-rule: drop replies unconditionally, drop English-language tweets.
fn should_keep(dto: &TweetDto) -> bool {
    dto.in_reply_to_user_id.is_none() && dto.lang != "en"
}

/// Pick a single representative type: the highest-priority one among the
/// attached keys. Keys missing from the lookup rank lowest.
fn resolve_media_type(keys: Option<&[String]>, lookup: &HashMap<&str, MediaType>) -> MediaType {
    let keys = match keys {
        Some(keys) if !keys.is_empty() => keys,
        _ => return MediaType::None,
    };
    keys.iter()
        .map(|key| lookup.get(key.as_str()).copied().unwrap_or(MediaType::None))
        .min()
        .unwrap_or(MediaType::None)
}

fn parse_created_at(dto: &TweetDto) -> Result<DateTime<Utc>, NormalizeError> {
    DateTime::parse_from_rfc3339(&dto.created_at)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| NormalizeError::BadTimestamp {
            tweet_id: dto.id.clone(),
            raw: dto.created_at.clone(),
        })
}

fn time_and_day(created_at: DateTime<Utc>, tz: Tz) -> TimeAndDay {
    let local = created_at.with_timezone(&tz);
    TimeAndDay {
        day_of_week: local.weekday().number_from_monday(),
        hour_of_day: local.hour(),
    }
}
