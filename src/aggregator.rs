//! Trimmed-mean grouping of tweets for the reporting layer

use crate::domain::{MediaType, Tweet};
use std::collections::HashMap;

/// Post-trim size and trimmed-mean engagement of one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStats {
    pub count: usize,
    pub avg_engagement: f64,
}

impl GroupStats {
    pub const EMPTY: GroupStats = GroupStats {
        count: 0,
        avg_engagement: 0.0,
    };
}

/// The three fixed day groupings used by the per-hour engagement reports.
/// Day numbering is ISO (1 = Monday .. 7 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayBucket {
    Friday,
    Saturday,
    Midweek,
}

impl DayBucket {
    pub fn all() -> [DayBucket; 3] {
        [DayBucket::Friday, DayBucket::Saturday, DayBucket::Midweek]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayBucket::Friday => "ימי שישי",
            DayBucket::Saturday => "ימי שבת",
            DayBucket::Midweek => "ימי ראשון עד חמישי",
        }
    }

    pub fn contains(&self, day_of_week: u32) -> bool {
        match self {
            DayBucket::Friday => day_of_week == 5,
            DayBucket::Saturday => day_of_week == 6,
            DayBucket::Midweek => day_of_week == 7 || (1..=4).contains(&day_of_week),
        }
    }
}

/// Number of elements removed from EACH end of a sorted group: the lowest
/// and highest `drop_percentage` percent are dropped independently.
pub fn drop_count(len: usize, drop_percentage: f64) -> usize {
    (len as f64 * 0.01 * drop_percentage) as usize
}

/// Sort the group by engagement rate ascending and drop `drop_count`
/// elements from each end. Small groups pass through untrimmed.
pub fn drop_ends<'a>(group: &[&'a Tweet], drop_percentage: f64) -> Vec<&'a Tweet> {
    let mut sorted: Vec<&Tweet> = group.to_vec();
    sorted.sort_by(|a, b| a.engagement_rate().total_cmp(&b.engagement_rate()));
    let dropped = drop_count(sorted.len(), drop_percentage);
    if sorted.len() < 2 * dropped {
        return Vec::new();
    }
    sorted[dropped..sorted.len() - dropped].to_vec()
}

/// Trimmed count and trimmed-mean engagement for one group. An empty group
/// reports (0, 0.0).
pub fn trimmed_stats(group: &[&Tweet], drop_percentage: f64) -> GroupStats {
    let trimmed = drop_ends(group, drop_percentage);
    if trimmed.is_empty() {
        return GroupStats::EMPTY;
    }
    let sum: f64 = trimmed.iter().map(|tweet| tweet.engagement_rate()).sum();
    GroupStats {
        count: trimmed.len(),
        avg_engagement: sum / trimmed.len() as f64,
    }
}

/// Per-thread-length stats over tweets with thread length > 2, one row per
/// distinct length, ascending.
pub fn by_thread_length(tweets: &[Tweet], drop_percentage: f64) -> Vec<(usize, GroupStats)> {
    let mut groups: HashMap<usize, Vec<&Tweet>> = HashMap::new();
    for tweet in tweets.iter().filter(|tweet| tweet.thread_length > 2) {
        groups.entry(tweet.thread_length).or_default().push(tweet);
    }
    let mut rows: Vec<(usize, GroupStats)> = groups
        .iter()
        .map(|(length, group)| (*length, trimmed_stats(group, drop_percentage)))
        .collect();
    rows.sort_by_key(|(length, _)| *length);
    rows
}

pub fn bucket_tweets(tweets: &[Tweet], bucket: DayBucket) -> Vec<&Tweet> {
    tweets
        .iter()
        .filter(|tweet| bucket.contains(tweet.time_and_day.day_of_week))
        .collect()
}

/// Per-hour stats for one day bucket. Always exactly 24 entries; hours with
/// no tweets report (0, 0.0) rather than being omitted.
pub fn by_hour(tweets: &[&Tweet], drop_percentage: f64) -> [GroupStats; 24] {
    let mut groups: HashMap<u32, Vec<&Tweet>> = HashMap::new();
    for &tweet in tweets {
        groups
            .entry(tweet.time_and_day.hour_of_day)
            .or_default()
            .push(tweet);
    }
    let mut report = [GroupStats::EMPTY; 24];
    for (hour, slot) in report.iter_mut().enumerate() {
        if let Some(group) = groups.get(&(hour as u32)) {
            *slot = trimmed_stats(group, drop_percentage);
        }
    }
    report
}

/// Tweet counts per media type, in priority order, all four variants.
pub fn media_type_counts(tweets: &[Tweet]) -> Vec<(MediaType, usize)> {
    MediaType::all()
        .iter()
        .map(|media_type| {
            let count = tweets
                .iter()
                .filter(|tweet| tweet.media_type == *media_type)
                .count();
            (*media_type, count)
        })
        .collect()
}

/// Top `limit` hashtags by raw occurrence count, descending; case-sensitive
/// exact text, no trimming. Ties break on tag text for determinism.
pub fn top_hashtags(tweets: &[Tweet], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in tweets
        .iter()
        .filter_map(|tweet| tweet.hashtags.as_ref())
        .flatten()
    {
        *counts.entry(tag.as_str()).or_default() += 1;
    }
    let mut rows: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows.truncate(limit);
    rows
}
