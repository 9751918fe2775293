//! Favorite and share, acting as a logged-in account.
//!
//! Whether an action is offered is up to the caller ([`Status::can_favorite`],
//! [`Status::can_share`]). The flags are those of the fetched snapshot, not of
//! the session asking. A flag is only flipped after the instance confirmed the
//! action; a failed call leaves it untouched. Callers sharing a `Status`
//! between tasks must serialize these calls themselves.

use crate::api::{self, v1, ApiRequest, Fetch};
use crate::error::*;
use crate::model::Status;
use serde_json::Value;
use tracing::debug;

/// An account on one instance. Without a token only public endpoints work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub domain: String,
    pub access_token: Option<String>,
}

impl Session {
    pub fn new<D, T>(domain: D, access_token: T) -> Self
    where
        D: Into<String>,
        T: Into<String>,
    {
        Session {
            domain: domain.into(),
            access_token: Some(access_token.into()),
        }
    }

    pub fn anonymous<D: Into<String>>(domain: D) -> Self {
        Session {
            domain: domain.into(),
            access_token: None,
        }
    }

    pub(crate) fn get<P: Into<String>>(&self, path: P) -> ApiRequest {
        self.authorize(ApiRequest::get(self.domain.clone(), path))
    }

    pub(crate) fn post<P: Into<String>>(&self, path: P) -> ApiRequest {
        self.authorize(ApiRequest::post(self.domain.clone(), path))
    }

    fn authorize(&self, request: ApiRequest) -> ApiRequest {
        match self.access_token {
            Some(ref token) if !token.is_empty() => request.bearer(token.clone()),
            _ => request,
        }
    }
}

/// Id of `status` on the session's instance.
///
/// Statuses fetched from another instance are looked up by `uri` through
/// the session's search endpoint, which federates them in if needed.
pub async fn local_status_id(fetch: &dyn Fetch, session: &Session, status: &Status) -> Result<String> {
    if status.domain.as_deref() == Some(session.domain.as_str()) {
        return Ok(status.id.clone());
    }

    debug!(uri = %status.uri, domain = %session.domain, "resolving remote status");

    let request = session
        .get(api::SEARCH_PATH)
        .param("q", &status.uri)
        .param("resolve", true);

    fetch
        .call(request)
        .await?
        .as_ref()
        .and_then(|found| found.get("statuses"))
        .and_then(|statuses| statuses.get(0))
        .and_then(|first| first.get("id"))
        .and_then(|id| v1::id(id.clone()).ok())
        .ok_or_else(|| ErrorKind::NotResolvable(status.uri.clone()).into())
}

impl Status {
    /// `POST /api/v1/statuses/:id/favourite`, then marks this status favourited.
    pub async fn favorite(&mut self, fetch: &dyn Fetch, session: &Session) -> Result<()> {
        let id = local_status_id(fetch, session, self).await?;
        confirm(fetch, session.post(api::favourite_path(&id))).await?;
        self.favourited = Some(true);
        Ok(())
    }

    /// `POST /api/v1/statuses/:id/reblog`, then marks this status reblogged.
    pub async fn share(&mut self, fetch: &dyn Fetch, session: &Session) -> Result<()> {
        let id = local_status_id(fetch, session, self).await?;
        confirm(fetch, session.post(api::reblog_path(&id))).await?;
        self.reblogged = Some(true);
        Ok(())
    }
}

/// Posts an action; the instance must answer with the updated status.
async fn confirm(fetch: &dyn Fetch, request: ApiRequest) -> Result<Value> {
    debug!(domain = %request.domain, path = %request.path, "posting action");

    let path = request.path.clone();
    match fetch.call(request).await? {
        Some(updated) => Ok(updated),
        None => Err(ErrorKind::NotResolvable(path).into()),
    }
}
