//! Paginated client for the Twitter v2 read endpoints
//!
//! Three operations back the pipeline: list members (cursor-paged), user
//! lookup by id batch, and tweets-by-user (cursor-paged, date-windowed,
//! with media expansions). Every page request carries the bearer token;
//! any transport failure or non-2xx status aborts the run.

pub mod dto;

use crate::domain::User;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use dto::{ListMembersPage, TweetsPage, UsersLookup};
use std::time::Duration;

const API_BASE: &str = "https://api.twitter.com/2";

// Server-imposed batch limit on the users-lookup endpoint
const USER_LOOKUP_CHUNK: usize = 100;
const TWEETS_PAGE_SIZE: u32 = 100;

#[derive(Debug)]
pub enum TwitterError {
    Http(reqwest::Error),
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    InvalidMonth {
        year: i32,
        month: u32,
    },
}

impl From<reqwest::Error> for TwitterError {
    fn from(err: reqwest::Error) -> Self {
        TwitterError::Http(err)
    }
}

impl std::fmt::Display for TwitterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TwitterError::Http(e) => write!(f, "HTTP error: {}", e),
            TwitterError::Status { status, url } => {
                write!(f, "Twitter API error {} for {}", status, url)
            }
            TwitterError::InvalidMonth { year, month } => {
                write!(f, "Invalid target month: {}-{:02}", year, month)
            }
        }
    }
}

impl std::error::Error for TwitterError {}

/// UTC query window covering exactly one calendar month of local wall-clock
/// time: local midnight of day 1 through local midnight of the next month's
/// day 1, both converted through the target timezone. The boundaries are
/// deliberately not plain UTC month boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    pub fn for_month(tz: Tz, year: i32, month: u32) -> Result<Self, TwitterError> {
        let start = local_midnight_utc(tz, year, month)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = local_midnight_utc(tz, next_year, next_month)?;
        Ok(Self { start, end })
    }

    pub fn start_param(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn end_param(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

fn local_midnight_utc(tz: Tz, year: i32, month: u32) -> Result<DateTime<Utc>, TwitterError> {
    let invalid = || TwitterError::InvalidMonth { year, month };
    let midnight = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)?;
    tz.from_local_datetime(&midnight)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(invalid)
}

pub struct TwitterClient {
    http: reqwest::Client,
    bearer_token: String,
    base_url: String,
}

impl TwitterClient {
    pub fn new(bearer_token: impl Into<String>) -> Result<Self, TwitterError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            bearer_token: bearer_token.into(),
            base_url: API_BASE.to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T, TwitterError> {
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TwitterError::Status {
                status: response.status(),
                url,
            });
        }

        Ok(response.json().await?)
    }

    /// Fetch every member of the list: follow the member-page cursor until
    /// exhausted, then look up full profiles in chunks of at most 100 ids.
    pub async fn list_members(&self, list_id: &str) -> Result<Vec<User>, TwitterError> {
        let mut member_ids: Vec<String> = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let page = self.member_page(list_id, next_token.as_deref()).await?;
            member_ids.extend(page.data.into_iter().map(|member| member.id));
            next_token = page.meta.next_token;
            if next_token.is_none() {
                break;
            }
        }
        log::info!("List {}: {} member ids", list_id, member_ids.len());

        let mut users = Vec::with_capacity(member_ids.len());
        for chunk in member_ids.chunks(USER_LOOKUP_CHUNK) {
            let lookup = self.users_by_ids(chunk).await?;
            users.extend(lookup.data.into_iter().map(|dto| User {
                id: dto.id,
                name: dto.name,
                user_name: dto.username,
                followers_count: dto.public_metrics.followers_count,
                tweet_count: dto.public_metrics.tweet_count,
            }));
        }
        Ok(users)
    }

    async fn member_page(
        &self,
        list_id: &str,
        next_token: Option<&str>,
    ) -> Result<ListMembersPage, TwitterError> {
        let url = format!("{}/lists/{}/members", self.base_url, list_id);
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(token) = next_token {
            query.push(("pagination_token", token.to_string()));
        }
        self.get_json(url, &query).await
    }

    async fn users_by_ids(&self, ids: &[String]) -> Result<UsersLookup, TwitterError> {
        let url = format!("{}/users", self.base_url);
        let query = vec![
            ("ids", ids.join(",")),
            ("user.fields", "public_metrics".to_string()),
        ];
        self.get_json(url, &query).await
    }

    /// Fetch every raw tweet page for one user within the month window.
    /// Pages come back unnormalized; the normalizer cross-references them.
    pub async fn tweet_pages(
        &self,
        user_id: &str,
        window: &MonthWindow,
    ) -> Result<Vec<TweetsPage>, TwitterError> {
        let mut pages = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let page = self
                .tweets_page(user_id, window, next_token.as_deref())
                .await?;
            next_token = page.meta.next_token.clone();
            pages.push(page);
            if next_token.is_none() {
                break;
            }
        }
        Ok(pages)
    }

    async fn tweets_page(
        &self,
        user_id: &str,
        window: &MonthWindow,
        next_token: Option<&str>,
    ) -> Result<TweetsPage, TwitterError> {
        let url = format!("{}/users/{}/tweets", self.base_url, user_id);
        let mut query: Vec<(&str, String)> = vec![
            ("max_results", TWEETS_PAGE_SIZE.to_string()),
            ("exclude", "retweets,replies".to_string()),
            ("start_time", window.start_param()),
            ("end_time", window.end_param()),
            ("media.fields", "type".to_string()),
            ("expansions", "attachments.media_keys".to_string()),
            (
                "tweet.fields",
                "public_metrics,in_reply_to_user_id,created_at,entities,attachments,lang,conversation_id"
                    .to_string(),
            ),
        ];
        if let Some(token) = next_token {
            query.push(("pagination_token", token.to_string()));
        }
        self.get_json(url, &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_window_winter() {
        // Jerusalem is UTC+2 in December: local midnight Dec 1 is 22:00 UTC
        // the previous evening.
        let window = MonthWindow::for_month(chrono_tz::Asia::Jerusalem, 2021, 12).unwrap();
        assert_eq!(window.start_param(), "2021-11-30T22:00:00Z");
        assert_eq!(window.end_param(), "2021-12-31T22:00:00Z");
    }

    #[test]
    fn test_month_window_crosses_dst() {
        // Israel switches to UTC+3 in late March, so the April window's two
        // boundaries sit at different UTC offsets.
        let window = MonthWindow::for_month(chrono_tz::Asia::Jerusalem, 2022, 3).unwrap();
        assert_eq!(window.start_param(), "2022-02-28T22:00:00Z");
        assert_eq!(window.end_param(), "2022-03-31T21:00:00Z");
    }

    #[test]
    fn test_month_window_december_rolls_year() {
        let window = MonthWindow::for_month(chrono_tz::UTC, 2021, 12).unwrap();
        assert_eq!(window.end_param(), "2022-01-01T00:00:00Z");
    }

    #[test]
    fn test_month_window_invalid_month() {
        assert!(MonthWindow::for_month(chrono_tz::UTC, 2021, 13).is_err());
        assert!(MonthWindow::for_month(chrono_tz::UTC, 2021, 0).is_err());
    }

    #[tokio::test]
    #[ignore] // Run only with a live bearer token in TWITTER_BEARER_TOKEN
    async fn test_list_members_live() {
        let token = std::env::var("TWITTER_BEARER_TOKEN").unwrap();
        let list_id = std::env::var("TWITTER_LIST_ID").unwrap();

        let client = TwitterClient::new(token).unwrap();
        let members = client.list_members(&list_id).await.unwrap();
        assert!(!members.is_empty());
    }
}
