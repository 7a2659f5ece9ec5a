//! Response shapes for the three Twitter v2 read endpoints

use serde::Deserialize;

/// One page of `GET /2/lists/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct ListMembersPage {
    pub data: Vec<ListMember>,
    pub meta: PageMeta,
}

#[derive(Debug, Deserialize)]
pub struct ListMember {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub next_token: Option<String>,
}

/// Response of `GET /2/users?ids=...`.
#[derive(Debug, Deserialize)]
pub struct UsersLookup {
    pub data: Vec<UserDto>,
}

#[derive(Debug, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub username: String,
    pub public_metrics: UserPublicMetrics,
}

#[derive(Debug, Deserialize)]
pub struct UserPublicMetrics {
    pub followers_count: u64,
    pub tweet_count: u64,
}

/// One page of `GET /2/users/{id}/tweets`. `data` and `includes` are absent
/// on empty result pages.
#[derive(Debug, Deserialize)]
pub struct TweetsPage {
    #[serde(default)]
    pub data: Option<Vec<TweetDto>>,
    pub meta: PageMeta,
    #[serde(default)]
    pub includes: Option<TweetIncludes>,
}

#[derive(Debug, Deserialize)]
pub struct TweetIncludes {
    pub media: Vec<MediaDto>,
}

#[derive(Debug, Deserialize)]
pub struct MediaDto {
    pub media_key: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct TweetDto {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub in_reply_to_user_id: Option<String>,
    pub public_metrics: TweetPublicMetrics,
    pub created_at: String,
    pub lang: String,
    pub conversation_id: String,
    #[serde(default)]
    pub entities: Option<TweetEntities>,
    #[serde(default)]
    pub attachments: Option<TweetAttachments>,
}

#[derive(Debug, Deserialize)]
pub struct TweetPublicMetrics {
    pub like_count: u64,
    pub reply_count: u64,
    pub retweet_count: u64,
    pub quote_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct TweetEntities {
    #[serde(default)]
    pub hashtags: Option<Vec<HashtagDto>>,
}

#[derive(Debug, Deserialize)]
pub struct HashtagDto {
    pub tag: String,
}

#[derive(Debug, Deserialize)]
pub struct TweetAttachments {
    #[serde(default)]
    pub media_keys: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_members_page() {
        let json = r#"{"data":[{"id":"100"},{"id":"200"}],"meta":{"result_count":2,"next_token":"abc"}}"#;

        let page: ListMembersPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].id, "100");
        assert_eq!(page.meta.next_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_members_last_page() {
        let json = r#"{"data":[{"id":"300"}],"meta":{"result_count":1}}"#;

        let page: ListMembersPage = serde_json::from_str(json).unwrap();
        assert!(page.meta.next_token.is_none());
    }

    #[test]
    fn test_parse_users_lookup() {
        let json = r#"{"data":[{"id":"100","name":"Dana","username":"dana_il","public_metrics":{"followers_count":1500,"following_count":10,"tweet_count":4200,"listed_count":3}}]}"#;

        let lookup: UsersLookup = serde_json::from_str(json).unwrap();
        let user = &lookup.data[0];
        assert_eq!(user.username, "dana_il");
        assert_eq!(user.public_metrics.followers_count, 1500);
        assert_eq!(user.public_metrics.tweet_count, 4200);
    }

    #[test]
    fn test_parse_tweets_page_with_includes() {
        let json = r#"{
            "data":[{
                "id":"1","text":"שלום #בוקר","lang":"he","conversation_id":"1",
                "created_at":"2021-12-03T07:15:00.000Z",
                "public_metrics":{"like_count":5,"reply_count":1,"retweet_count":2,"quote_count":0},
                "entities":{"hashtags":[{"start":5,"end":10,"tag":"בוקר"}]},
                "attachments":{"media_keys":["3_111"]}
            }],
            "includes":{"media":[{"media_key":"3_111","type":"photo"}]},
            "meta":{"result_count":1,"next_token":"page2"}
        }"#;

        let page: TweetsPage = serde_json::from_str(json).unwrap();
        let tweet = &page.data.as_ref().unwrap()[0];
        assert_eq!(tweet.lang, "he");
        assert!(tweet.in_reply_to_user_id.is_none());
        assert_eq!(tweet.public_metrics.retweet_count, 2);
        assert_eq!(
            tweet.entities.as_ref().unwrap().hashtags.as_ref().unwrap()[0].tag,
            "בוקר"
        );
        let media = &page.includes.as_ref().unwrap().media[0];
        assert_eq!(media.media_key, "3_111");
        assert_eq!(media.kind, "photo");
    }

    #[test]
    fn test_parse_empty_tweets_page() {
        let json = r#"{"meta":{"result_count":0}}"#;

        let page: TweetsPage = serde_json::from_str(json).unwrap();
        assert!(page.data.is_none());
        assert!(page.includes.is_none());
        assert!(page.meta.next_token.is_none());
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        // public_metrics is part of the contract; a response without it
        // must fail decoding rather than default.
        let json = r#"{"data":[{"id":"1","text":"x","lang":"he","conversation_id":"1","created_at":"2021-12-03T07:15:00.000Z"}],"meta":{"result_count":1}}"#;

        assert!(serde_json::from_str::<TweetsPage>(json).is_err());
    }
}
