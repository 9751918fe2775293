//! Wire shapes of the v1 REST payloads.
//!
//! Required fields are plain struct fields, so a missing or mistyped one
//! fails deserialization. The model types in `crate::model` are built from
//! these through `TryFrom`, which adds the normalization serde can't express.

use crate::model::entity::{AccountSource, Application, Attachment, Emoji, Mention, Tag};
use crate::model::status::Visibility;
use crate::model;
use serde::de::{Deserialize, Deserializer};
use serde_derive::Deserialize;
use serde_json::Value;
use url::Url;

pub type DateTime = chrono::DateTime<chrono::FixedOffset>;
pub type StatusId = String;
pub type AccountId = String;
pub type MentionId = String;
pub type AttachmentId = String;

#[derive(Clone, Debug, Deserialize)]
pub struct Status {
    #[serde(deserialize_with = "id")]
    pub id: StatusId,
    pub uri: String,
    pub url: Url,
    pub account: model::Account,
    #[serde(default, deserialize_with = "optional_id")]
    pub in_reply_to_id: Option<StatusId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub in_reply_to_account_id: Option<AccountId>,
    #[serde(default)]
    pub reblog: Option<Box<model::Status>>,
    pub content: String,
    pub created_at: DateTime,
    pub reblogs_count: Option<u64>,
    pub favourites_count: Option<u64>,
    pub reblogged: Option<bool>,
    pub favourited: Option<bool>,
    pub muted: Option<bool>,
    pub sensitive: Option<bool>,
    pub visibility: Option<Visibility>,
    pub spoiler_text: Option<String>,
    pub application: Option<Application>,
    pub language: Option<String>,
    pub pinned: Option<bool>,
    /// Not part of the API; attached by whoever fetched the record.
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emojis: Vec<Emoji>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media_attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mentions: Vec<Mention>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Account {
    #[serde(deserialize_with = "id")]
    pub id: AccountId,
    pub username: String,
    pub acct: String,
    pub display_name: String,
    pub locked: bool,
    pub created_at: DateTime,
    pub followers_count: u64,
    pub following_count: u64,
    pub statuses_count: u64,
    pub note: String,
    pub url: Url,
    pub avatar: Url,
    pub avatar_static: Url,
    pub header: Url,
    pub header_static: Url,
    #[serde(default)]
    pub moved: Option<Box<model::Account>>,
    #[serde(default)]
    pub source: Option<AccountSource>,
}

/// Response of `GET /api/v1/statuses/:id/context`.
///
/// Records stay raw so they can be tagged with a domain before construction.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Context {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ancestors: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub descendants: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> String {
        match id {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

/// Accepts ids sent either as JSON strings or as integers.
pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|id| id.map(String::from))
}

pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Optional URIs; instances sometimes send `""` where they mean "absent".
pub fn optional_url<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(ref text) if text.is_empty() => Ok(None),
        Some(text) => Url::parse(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::{self, json};

    #[derive(Debug, Deserialize)]
    struct Ids {
        #[serde(deserialize_with = "id")]
        id: String,
        #[serde(default, deserialize_with = "optional_id")]
        parent: Option<String>,
        #[serde(default, deserialize_with = "optional_url")]
        link: Option<Url>,
    }

    #[test]
    fn numeric_and_string_ids() {
        let ids: Ids = serde_json::from_value(json!({"id": 42, "parent": "7"})).unwrap();
        assert_eq!(ids.id, "42");
        assert_eq!(ids.parent, Some("7".to_string()));
        assert_eq!(ids.link, None);
    }

    #[test]
    fn empty_url_is_absent() {
        let ids: Ids = serde_json::from_value(json!({"id": "1", "parent": null, "link": ""})).unwrap();
        assert_eq!(ids.parent, None);
        assert_eq!(ids.link, None);

        let bad = serde_json::from_value::<Ids>(json!({"id": "1", "link": "not a url"}));
        assert!(bad.is_err());
    }

    #[test]
    fn context_tolerates_nulls() {
        let context: Context =
            serde_json::from_value(json!({"ancestors": null, "descendants": [{"id": "1"}]})).unwrap();
        assert!(context.ancestors.is_empty());
        assert_eq!(context.descendants.len(), 1);
    }
}
