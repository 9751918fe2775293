//! Network lookups of the messages around a status: what it replies to, the
//! rest of its thread, and the messages it quotes by permalink.
//!
//! A lookup that finds nothing is `Ok(None)` or an empty list, never an error.

use crate::api::{self, v1, ApiRequest, Fetch};
use crate::error::*;
use crate::model::{Status, Threadable};
use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{self, Value};
use tracing::{debug, warn};

// Quotes are detected from the rendered links, not from a structured field.
// Two shapes count: Mastodon permalinks and legacy Twitter status links.
static QUOTE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a [^>]*href="(https://(?:[^/]+/@[^/]+/\d+|twitter\.com/[^/]+/status/\d+))""#)
        .expect("quote link pattern")
});

static PERMALINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://([^/]+)/@[^/]+/(\d+)$").expect("permalink pattern"));

static LEGACY_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://twitter\.com/[^/]+/status/(\d+)$").expect("legacy link pattern"));

/// A link to another message found in a status body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuoteLink {
    Status { domain: String, id: String },
    Legacy { id: u64 },
}

impl QuoteLink {
    pub fn parse(url: &str) -> Option<QuoteLink> {
        if let Some(caps) = LEGACY_LINK.captures(url) {
            let id = caps[1].parse().ok()?;
            return Some(QuoteLink::Legacy { id });
        }

        let caps = PERMALINK.captures(url)?;
        Some(QuoteLink::Status {
            domain: caps[1].to_string(),
            id: caps[2].to_string(),
        })
    }
}

/// A resolved quote.
#[derive(Clone, Debug, PartialEq)]
pub enum QuotedMessage {
    Status(Status),
    /// A message from the legacy service, as returned by the lookup.
    Legacy { id: u64, message: Value },
}

/// Finds messages of the legacy microblog service by numeric id.
pub trait MessageLookup: Send + Sync {
    fn find_by_id(&self, id: u64) -> BoxFuture<'_, Result<Option<Value>>>;
}

pub fn is_quoting(content: &str) -> bool {
    QUOTE_LINK.is_match(content)
}

/// Every quote link in `content`, in order. Links that match the detection
/// pattern but can't be taken apart are skipped.
pub fn quote_links(content: &str) -> Vec<QuoteLink> {
    QUOTE_LINK
        .captures_iter(content)
        .filter_map(|caps| {
            let url = &caps[1];
            let link = QuoteLink::parse(url);
            if link.is_none() {
                warn!(url, "ignoring malformed quote link");
            }
            link
        })
        .collect()
}

fn require_domain<T>(message: &T) -> Result<&str>
where
    T: Threadable + ?Sized,
{
    message
        .domain()
        .ok_or_else(|| ErrorKind::MissingDomain(message.thread_id().to_string()).into())
}

/// `GET /api/v1/statuses/:id` on `domain`.
pub async fn fetch_status(fetch: &dyn Fetch, domain: &str, id: &str) -> Result<Option<Status>> {
    debug!(domain, id, "fetching status");

    match fetch.call(ApiRequest::get(domain, api::status_path(id))).await? {
        Some(record) => Status::with_domain(domain, record).map(Some),
        None => Ok(None),
    }
}

/// The status `message` replies to, if any.
pub async fn replyto_source<T>(message: &T, fetch: &dyn Fetch) -> Result<Option<Status>>
where
    T: Threadable + ?Sized,
{
    let id = match message.reply_to_id() {
        Some(id) => id,
        None => return Ok(None),
    };

    fetch_status(fetch, require_domain(message)?, id).await
}

/// Ancestors then descendants of `message`.
pub async fn try_around<T>(message: &T, fetch: &dyn Fetch) -> Result<Vec<Status>>
where
    T: Threadable + ?Sized,
{
    let domain = require_domain(message)?;
    let request = ApiRequest::get(domain, api::context_path(message.thread_id()));

    let context: v1::Context = match fetch.call(request).await? {
        Some(json) => serde_json::from_value(json).map_err(|e| Error::validation("context", e))?,
        None => return Ok(Vec::new()),
    };

    let records = context
        .ancestors
        .into_iter()
        .chain(context.descendants)
        .collect();

    Status::build(domain, Some(Value::Array(records)))
}

/// Like [`try_around`], but any failure yields an empty thread.
pub async fn around<T>(message: &T, fetch: &dyn Fetch) -> Vec<Status>
where
    T: Threadable + ?Sized,
{
    try_around(message, fetch).await.unwrap_or_else(|e| {
        warn!(id = message.thread_id(), error = %e, "could not fetch thread");
        Vec::new()
    })
}

/// Resolves every quote link in `message`. Links that can't be resolved are
/// left out; legacy links are only resolved when a `lookup` is given.
pub async fn quoting_messages<T>(
    message: &T,
    fetch: &dyn Fetch,
    lookup: Option<&dyn MessageLookup>,
) -> Vec<QuotedMessage>
where
    T: Threadable + ?Sized,
{
    let mut quoted = Vec::new();

    for link in quote_links(message.body()) {
        let resolved = match link {
            QuoteLink::Status { ref domain, ref id } => fetch_status(fetch, domain, id)
                .await
                .map(|status| status.map(QuotedMessage::Status)),
            QuoteLink::Legacy { id } => match lookup {
                Some(lookup) => lookup
                    .find_by_id(id)
                    .await
                    .map(|message| message.map(|message| QuotedMessage::Legacy { id, message })),
                None => Ok(None),
            },
        };

        match resolved {
            Ok(Some(message)) => quoted.push(message),
            Ok(None) => debug!(?link, "quoted message not found"),
            Err(e) => warn!(?link, error = %e, "dropping unresolvable quote"),
        }
    }

    quoted
}
