//! The instance-relative REST surface consumed by the model.

pub mod v1;

use crate::error::*;
use futures::future::BoxFuture;
use serde_json::Value;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single call against `https://{domain}{path}`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub domain: String,
    pub path: String,
    pub access_token: Option<String>,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get<D, P>(domain: D, path: P) -> Self
    where
        D: Into<String>,
        P: Into<String>,
    {
        ApiRequest {
            method: Method::Get,
            domain: domain.into(),
            path: path.into(),
            access_token: None,
            query: Vec::new(),
        }
    }

    pub fn post<D, P>(domain: D, path: P) -> Self
    where
        D: Into<String>,
        P: Into<String>,
    {
        ApiRequest {
            method: Method::Post,
            ..ApiRequest::get(domain, path)
        }
    }

    pub fn bearer<S: Into<String>>(mut self, access_token: S) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn param<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn url(&self) -> Result<Url> {
        let base = format!("https://{}{}", self.domain, self.path);
        let mut url = Url::parse(&base).chain_err(|| ErrorKind::InvalidUrl(base.clone()))?;

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        Ok(url)
    }
}

/// Performs API calls on behalf of the model.
///
/// Implementations resolve to `Ok(None)` when the instance has nothing for
/// the request (a 404 on a `GET`, or an empty or `null` body) and to an error
/// for any other transport or API failure, including a 404 on a `POST`.
pub trait Fetch: Send + Sync {
    fn call(&self, request: ApiRequest) -> BoxFuture<'_, Result<Option<Value>>>;
}

pub fn status_path(id: &str) -> String {
    format!("/api/v1/statuses/{}", id)
}

pub fn context_path(id: &str) -> String {
    format!("/api/v1/statuses/{}/context", id)
}

pub fn favourite_path(id: &str) -> String {
    format!("/api/v1/statuses/{}/favourite", id)
}

pub fn reblog_path(id: &str) -> String {
    format!("/api/v1/statuses/{}/reblog", id)
}

pub const SEARCH_PATH: &str = "/api/v2/search";
