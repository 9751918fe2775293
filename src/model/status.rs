use crate::api::v1::{self, AccountId, StatusId};
use crate::api::Fetch;
use crate::deferred::Deferred;
use crate::error::*;
use crate::model::entity::{Application, Attachment, Emoji, Mention, Tag};
use crate::model::{Account, Identifiable, Renderable, Threadable};
use crate::resolver::{self, MessageLookup, QuotedMessage};
use crate::sanitize::sanitize;
use chrono::{DateTime, Local};
use error_chain::bail;
use serde_derive::{Deserialize, Serialize};
use serde_json::{self, Value};
use std::borrow::Cow;
use std::convert::TryFrom;
use std::sync::Arc;
use tracing::debug;
use url::Url;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
    Direct,
    #[serde(other)]
    Unknown,
}

/// A post, possibly a reblog of another post.
///
/// When `reblog` is set, `account` is the account that reblogged it and the
/// content being shown lives on `reblog`; most accessors go through
/// [`Status::actual_status`] for that reason.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "v1::Status")]
pub struct Status {
    pub id: StatusId,
    pub uri: String,
    pub url: Url,
    pub account: Arc<Account>,
    pub in_reply_to_id: Option<StatusId>,
    pub in_reply_to_account_id: Option<AccountId>,
    pub reblog: Option<Arc<Status>>,
    pub content: String,
    pub created_at: DateTime<Local>,
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
    pub domain: Option<String>,
    pub emojis: Vec<Emoji>,
    pub media_attachments: Vec<Attachment>,
    pub mentions: Vec<Mention>,
    pub tags: Vec<Tag>,
}

impl Status {
    pub fn new(record: Value) -> Result<Status> {
        serde_json::from_value(record).map_err(|e| Error::validation("status", e))
    }

    /// Tags `record` with `domain_name` and builds it.
    pub fn with_domain(domain_name: &str, mut record: Value) -> Result<Status> {
        match record {
            Value::Object(ref mut fields) => {
                fields.insert("domain".to_string(), Value::String(domain_name.to_string()));
            }
            ref other => bail!(ErrorKind::Validation("status", format!("expected an object, got {}", other))),
        }
        Status::new(record)
    }

    /// Builds a batch of statuses fetched from `domain_name`, in order.
    ///
    /// `None` and JSON `null` yield an empty list.
    pub fn build(domain_name: &str, json: Option<Value>) -> Result<Vec<Status>> {
        let records = match json {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(records)) => records,
            Some(other) => bail!(ErrorKind::Validation("status list", format!("expected an array, got {}", other))),
        };

        debug!(domain = domain_name, count = records.len(), "building statuses");

        records
            .into_iter()
            .map(|record| Status::with_domain(domain_name, record))
            .collect()
    }

    pub fn actual_status(&self) -> &Status {
        self.reblog.as_deref().unwrap_or(self)
    }

    pub fn created(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn user(&self) -> &Arc<Account> {
        &self.actual_status().account
    }

    pub fn retweet_count(&self) -> Option<u64> {
        self.actual_status().reblogs_count
    }

    pub fn favorite_count(&self) -> Option<u64> {
        self.actual_status().favourites_count
    }

    pub fn is_sensitive(&self) -> bool {
        self.actual_status().sensitive.unwrap_or(false)
    }

    pub fn retweeted_by(&self) -> Vec<Arc<Account>> {
        match self.reblog {
            Some(_) => vec![self.account.clone()],
            None => Vec::new(),
        }
    }

    pub fn retweeted_statuses(&self) -> Vec<&Status> {
        match self.reblog {
            Some(_) => vec![self],
            None => Vec::new(),
        }
    }

    pub fn is_shared(&self) -> bool {
        self.reblogged.unwrap_or(false)
    }

    pub fn is_favorited(&self) -> bool {
        self.favourited.unwrap_or(false)
    }

    pub fn is_muted(&self) -> bool {
        self.muted.unwrap_or(false)
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.unwrap_or(false)
    }

    pub fn can_favorite(&self) -> bool {
        !self.is_favorited()
    }

    pub fn can_share(&self) -> bool {
        !self.is_shared()
    }

    fn spoiler(&self) -> Option<&str> {
        self.spoiler_text.as_deref().filter(|text| !text.is_empty())
    }

    fn inherit_domain(&mut self, domain_name: &str) {
        if self.domain.is_none() {
            self.domain = Some(domain_name.to_string());
        }
        if let Some(ref mut reblog) = self.reblog {
            Arc::make_mut(reblog).inherit_domain(domain_name);
        }
    }

    pub async fn replyto_source(&self, fetch: &dyn Fetch) -> Result<Option<Status>> {
        resolver::replyto_source(self, fetch).await
    }

    pub async fn around(&self, fetch: &dyn Fetch) -> Vec<Status> {
        resolver::around(self, fetch).await
    }

    pub async fn try_around(&self, fetch: &dyn Fetch) -> Result<Vec<Status>> {
        resolver::try_around(self, fetch).await
    }

    pub async fn quoting_messages(
        &self,
        fetch: &dyn Fetch,
        lookup: Option<&dyn MessageLookup>,
    ) -> Vec<QuotedMessage> {
        resolver::quoting_messages(self, fetch, lookup).await
    }

    /// Runs [`Status::replyto_source`] on a background task.
    pub fn replyto_source_d(&self, fetch: Arc<dyn Fetch>) -> Deferred<Option<Status>> {
        let status = self.clone();
        Deferred::spawn(async move { status.replyto_source(fetch.as_ref()).await })
    }

    /// Runs [`Status::try_around`] on a background task.
    pub fn around_d(&self, fetch: Arc<dyn Fetch>) -> Deferred<Vec<Status>> {
        let status = self.clone();
        Deferred::spawn(async move { status.try_around(fetch.as_ref()).await })
    }

    /// Runs [`Status::quoting_messages`] on a background task.
    pub fn quoting_messages_d(
        &self,
        fetch: Arc<dyn Fetch>,
        lookup: Option<Arc<dyn MessageLookup>>,
    ) -> Deferred<Vec<QuotedMessage>> {
        let status = self.clone();
        Deferred::spawn(async move {
            Ok(status.quoting_messages(fetch.as_ref(), lookup.as_deref()).await)
        })
    }
}

impl TryFrom<v1::Status> for Status {
    type Error = Error;

    fn try_from(raw: v1::Status) -> Result<Status> {
        let mut status = Status {
            id: raw.id,
            uri: raw.uri,
            url: raw.url,
            account: Arc::new(raw.account),
            in_reply_to_id: raw.in_reply_to_id,
            in_reply_to_account_id: raw.in_reply_to_account_id,
            reblog: raw.reblog.map(|reblog| Arc::new(*reblog)),
            content: raw.content,
            created_at: raw.created_at.with_timezone(&Local),
            reblogs_count: raw.reblogs_count,
            favourites_count: raw.favourites_count,
            reblogged: raw.reblogged,
            favourited: raw.favourited,
            muted: raw.muted,
            sensitive: raw.sensitive,
            visibility: raw.visibility,
            spoiler_text: raw.spoiler_text,
            application: raw.application,
            language: raw.language,
            pinned: raw.pinned,
            domain: None,
            emojis: raw.emojis,
            media_attachments: raw.media_attachments,
            mentions: raw.mentions,
            tags: raw.tags,
        };

        if let Some(ref domain) = raw.domain {
            status.inherit_domain(domain);
        }

        Ok(status)
    }
}

impl Identifiable for Status {
    fn id(&self) -> &str {
        &self.id
    }

    fn perma_link(&self) -> &Url {
        &self.url
    }
}

impl Renderable for Status {
    /// Content warning if there is one, otherwise the raw HTML content.
    fn title(&self) -> Cow<'_, str> {
        let msg = self.actual_status();
        Cow::Borrowed(msg.spoiler().unwrap_or(&msg.content))
    }

    fn description(&self) -> Cow<'_, str> {
        let msg = self.actual_status();
        let desc = sanitize(&msg.content);

        Cow::Owned(match msg.spoiler() {
            Some(spoiler) => format!("{}\n----\n{}", sanitize(spoiler), desc),
            None => desc,
        })
    }
}

/// Threading follows the reblogged status, not the reblog wrapper.
impl Threadable for Status {
    fn domain(&self) -> Option<&str> {
        self.actual_status().domain.as_deref()
    }

    fn thread_id(&self) -> &str {
        &self.actual_status().id
    }

    fn reply_to_id(&self) -> Option<&str> {
        self.actual_status().in_reply_to_id.as_deref()
    }

    fn body(&self) -> &str {
        &self.actual_status().content
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::fixture;
    use serde_json::json;

    fn reblog_of(inner: Value) -> Value {
        let mut wrapper = fixture::status_with("100", "", json!({
            "reblog": inner,
            "reblogs_count": null,
            "favourites_count": null
        }));
        wrapper["account"] = fixture::account("5", "carol@boost.example");
        wrapper
    }

    #[test]
    fn construction() {
        let status = Status::new(fixture::status("1", "<p>hi</p>")).unwrap();

        assert_eq!(status.id, "1");
        assert_eq!(status.account.acct, "alice@example.social");
        assert_eq!(status.visibility, Some(Visibility::Public));
        assert_eq!(status.created(), status.created_at);
        assert_eq!(status.application.as_ref().unwrap().name, "Web");
        assert!(status.emojis.is_empty());
        assert_eq!(status.domain, None);
    }

    #[test]
    fn collections_default_to_empty() {
        let mut record = fixture::status("1", "hi");
        {
            let fields = record.as_object_mut().unwrap();
            fields.remove("media_attachments");
            fields.remove("tags");
            fields.insert("mentions".into(), Value::Null);
        }

        let status = Status::new(record).unwrap();
        assert!(status.media_attachments.is_empty());
        assert!(status.tags.is_empty());
        assert!(status.mentions.is_empty());
    }

    #[test]
    fn collections_materialized() {
        let status = Status::new(fixture::status_with("1", "hi", json!({
            "emojis": [{
                "shortcode": "blobcat",
                "static_url": "https://example.social/emoji/blobcat.png",
                "url": "https://example.social/emoji/blobcat.gif"
            }],
            "tags": [{"name": "rust", "url": "https://example.social/tags/rust"}],
            "mentions": [{
                "url": "https://other.example/@bob",
                "username": "bob",
                "acct": "bob@other.example",
                "id": 7
            }]
        }))).unwrap();

        assert_eq!(status.emojis[0].shortcode, "blobcat");
        assert_eq!(status.tags[0].name, "rust");
        assert_eq!(status.mentions[0].id, "7");
    }

    #[test]
    fn required_fields() {
        for field in &["id", "uri", "url", "account", "content", "created_at"] {
            let mut record = fixture::status("1", "hi");
            record.as_object_mut().unwrap().remove(*field);

            let err = Status::new(record).unwrap_err();
            assert!(err.is_validation(), "{} should be required", field);
        }
    }

    #[test]
    fn invalid_nested_account() {
        let mut record = fixture::status("1", "hi");
        record["account"]["url"] = json!("not a url");
        assert!(Status::new(record).unwrap_err().is_validation());
    }

    #[test]
    fn tri_state_flags() {
        let mut record = fixture::status("1", "hi");
        record.as_object_mut().unwrap().remove("favourited");

        let status = Status::new(record).unwrap();
        assert_eq!(status.favourited, None);
        assert_eq!(status.reblogged, Some(false));
        assert_eq!(status.muted, None);
        assert!(!status.is_favorited());
        assert!(status.can_favorite());
        assert!(status.can_share());
    }

    #[test]
    fn actual_status_without_reblog() {
        let status = Status::new(fixture::status("1", "hi")).unwrap();

        assert!(std::ptr::eq(status.actual_status(), &status));
        assert!(status.retweeted_by().is_empty());
        assert!(status.retweeted_statuses().is_empty());
        assert_eq!(status.retweet_count(), Some(2));
    }

    #[test]
    fn reblog_delegation() {
        let inner = fixture::status_with("42", "<p>original</p>", json!({"sensitive": true}));
        let status = Status::new(reblog_of(inner)).unwrap();
        let actual = status.actual_status();

        assert_eq!(actual.id, "42");
        assert!(!std::ptr::eq(actual, &status));
        assert_eq!(status.user().acct, "alice@example.social");
        assert_eq!(status.retweeted_by()[0].acct, "carol@boost.example");
        assert_eq!(status.retweeted_statuses().len(), 1);
        assert_eq!(status.retweet_count(), Some(2));
        assert_eq!(status.favorite_count(), Some(5));
        assert!(status.is_sensitive());
        assert_eq!(status.description(), "original");
        assert_eq!(status.thread_id(), "42");
    }

    #[test]
    fn reblog_inherits_domain() {
        let mut record = reblog_of(fixture::status("42", "original"));
        record["domain"] = json!("example.social");

        let status = Status::new(record).unwrap();
        assert_eq!(status.reblog.as_ref().unwrap().domain.as_deref(), Some("example.social"));
    }

    #[test]
    fn description_with_spoiler() {
        let status = Status::new(fixture::status_with("1", "<p>actual text</p>", json!({
            "spoiler_text": "CW: spoilers"
        }))).unwrap();

        assert_eq!(status.description(), "CW: spoilers\n----\nactual text");
        assert_eq!(status.title(), "CW: spoilers");
    }

    #[test]
    fn title_is_raw_content() {
        let status = Status::new(fixture::status("1", "<p>actual text</p>")).unwrap();
        assert_eq!(status.title(), "<p>actual text</p>");
        assert_eq!(status.description(), "actual text");
    }

    #[test]
    fn reply_detection() {
        let status = Status::new(fixture::status_with("2", "hi", json!({
            "in_reply_to_id": "42",
            "in_reply_to_account_id": null
        }))).unwrap();

        assert!(status.has_receive_message());
        assert_eq!(status.in_reply_to_account_id, None);
        assert!(!Status::new(fixture::status("1", "hi")).unwrap().has_receive_message());
    }

    #[test]
    fn build_batches() {
        assert!(Status::build("example.social", None).unwrap().is_empty());
        assert!(Status::build("example.social", Some(Value::Null)).unwrap().is_empty());
        assert!(Status::build("example.social", Some(json!([]))).unwrap().is_empty());

        let built = Status::build(
            "example.social",
            Some(json!([fixture::status("1", "a"), fixture::status("2", "b")])),
        ).unwrap();

        assert_eq!(built.len(), 2);
        assert_eq!(built[0].id, "1");
        assert_eq!(built[1].id, "2");
        assert!(built.iter().all(|s| s.domain.as_deref() == Some("example.social")));
    }

    #[test]
    fn build_rejects_invalid_record() {
        let mut bad = fixture::status("2", "b");
        bad.as_object_mut().unwrap().remove("content");

        let err = Status::build("example.social", Some(json!([fixture::status("1", "a"), bad]))).unwrap_err();
        assert!(err.is_validation());

        assert!(Status::build("example.social", Some(json!({"id": "1"}))).is_err());
    }
}
