use crate::api::v1::{self, AccountId};
use crate::error::*;
use crate::model::entity::{AccountSource, Icon};
use crate::model::{Identifiable, Renderable};
use chrono::{DateTime, Local};
use serde_derive::Deserialize;
use serde_json::{self, Value};
use std::borrow::Cow;
use std::collections::HashSet;
use std::convert::TryFrom;
use std::sync::Arc;
use url::Url;

/// Upper bound on how many `moved` hops a traversal will follow.
pub const MAX_MOVED_DEPTH: usize = 16;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "v1::Account")]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    /// Always `username@domain`.
    pub acct: String,
    pub display_name: String,
    pub locked: bool,
    pub created_at: DateTime<Local>,
    pub followers_count: u64,
    pub following_count: u64,
    pub statuses_count: u64,
    pub note: String,
    pub url: Url,
    pub avatar: Url,
    pub avatar_static: Url,
    pub header: Url,
    pub header_static: Url,
    pub moved: Option<Arc<Account>>,
    pub source: Option<AccountSource>,
}

impl Account {
    pub fn new(record: Value) -> Result<Account> {
        serde_json::from_value(record).map_err(|e| Error::validation("account", e))
    }

    pub fn uri(&self) -> &Url {
        &self.url
    }

    pub fn idname(&self) -> &str {
        &self.acct
    }

    pub fn name(&self) -> &str {
        &self.display_name
    }

    pub fn icon(&self) -> Icon {
        Icon::new(self.avatar.clone())
    }

    /// Accounts this one has moved to, nearest first.
    ///
    /// Stops at the first repeated `acct`, so a chain that loops back on
    /// itself terminates.
    pub fn moved_chain(&self) -> Vec<Arc<Account>> {
        let mut seen = HashSet::new();
        seen.insert(self.acct.clone());

        let mut chain = Vec::new();
        let mut next = self.moved.clone();

        while let Some(account) = next {
            if chain.len() >= MAX_MOVED_DEPTH || !seen.insert(account.acct.clone()) {
                break;
            }
            next = account.moved.clone();
            chain.push(account);
        }

        chain
    }
}

impl TryFrom<v1::Account> for Account {
    type Error = Error;

    fn try_from(raw: v1::Account) -> Result<Account> {
        let acct = normalize_acct(&raw.acct, &raw.url)?;

        Ok(Account {
            id: raw.id,
            username: raw.username,
            acct,
            display_name: raw.display_name,
            locked: raw.locked,
            created_at: raw.created_at.with_timezone(&Local),
            followers_count: raw.followers_count,
            following_count: raw.following_count,
            statuses_count: raw.statuses_count,
            note: raw.note,
            url: raw.url,
            avatar: raw.avatar,
            avatar_static: raw.avatar_static,
            header: raw.header,
            header_static: raw.header_static,
            moved: raw.moved.map(|moved| Arc::new(*moved)),
            source: raw.source,
        })
    }
}

/// Local accounts come back as a bare username; qualify them with the host
/// of their profile URL.
pub fn normalize_acct(acct: &str, url: &Url) -> Result<String> {
    if acct.contains('@') {
        return Ok(acct.to_string());
    }

    match url.host_str() {
        Some(host) => Ok(format!("{}@{}", acct, host)),
        None => Err(Error::validation(
            "account",
            format!("cannot qualify {:?}: {} has no host", acct, url),
        )),
    }
}

impl Identifiable for Account {
    fn id(&self) -> &str {
        &self.id
    }

    fn perma_link(&self) -> &Url {
        &self.url
    }
}

impl Renderable for Account {
    fn title(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{}({})", self.acct, self.display_name))
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.note)
    }
}
