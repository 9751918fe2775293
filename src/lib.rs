#![recursion_limit = "1024"]

//! Domain model for Mastodon-style federated timelines: accounts, statuses
//! and the conversation around them.

pub mod error;
pub mod api;
pub mod sanitize;
pub mod model;
pub mod resolver;
pub mod deferred;
pub mod actions;
pub mod timeline;

pub use actions::Session;
pub use api::{ApiRequest, Fetch, Method};
pub use deferred::Deferred;
pub use model::{Account, Identifiable, Renderable, Status, Threadable};
pub use resolver::{MessageLookup, QuotedMessage};
pub use sanitize::sanitize;

use crate::error::*;
use futures::future::BoxFuture;
use hyper::client::connect::Connect;
use hyper::client::HttpConnector;
use hyper::header::{HeaderValue, AUTHORIZATION, USER_AGENT};
use hyper::{Body, StatusCode};
use hyper_tls::HttpsConnector;
use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;

/// HTTPS implementation of [`Fetch`].
#[derive(Clone, Debug)]
pub struct Client<C = HttpsConnector<HttpConnector>> {
    http: hyper::Client<C>,
    user_agent: HeaderValue,
}

impl Client {
    pub fn new<U>(user_agent: U) -> Result<Self>
    where
        U: Into<Cow<'static, str>>,
    {
        let http = hyper::Client::builder().build(HttpsConnector::new());
        Client::from_hyper_client(http, user_agent)
    }
}

impl<C> Client<C> {
    pub fn from_hyper_client<U>(http: hyper::Client<C>, user_agent: U) -> Result<Self>
    where
        U: Into<Cow<'static, str>>,
    {
        let user_agent: Cow<'static, str> = user_agent.into();
        let user_agent = HeaderValue::from_str(&user_agent)
            .chain_err(|| ErrorKind::ClientInitialization)?;

        Ok(Client { http, user_agent })
    }
}

impl<C> Client<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    async fn request(&self, request: ApiRequest) -> Result<Option<Value>> {
        let url = request.url()?;
        let uri: hyper::Uri = url.as_str()
            .parse()
            .chain_err(|| ErrorKind::InvalidUrl(url.to_string()))?;

        let method = match request.method {
            Method::Get => hyper::Method::GET,
            Method::Post => hyper::Method::POST,
        };

        let mut builder = hyper::Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_AGENT, self.user_agent.clone());
        if let Some(ref token) = request.access_token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = builder.body(Body::empty()).chain_err(|| ErrorKind::Http)?;

        debug!(method = ?request.method, %url, "calling API");

        let resp = self.http.request(req).await.chain_err(|| ErrorKind::Http)?;
        let status = resp.status();
        let bytes = hyper::body::to_bytes(resp.into_body())
            .await
            .chain_err(|| ErrorKind::Http)?;

        // A missing record is an answer to a lookup, not a failure
        if status == StatusCode::NOT_FOUND && request.method == Method::Get {
            return Ok(None);
        }

        // If we receive a non-2XX error code, return the body as the error
        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            return Err(ErrorKind::Api(status.as_u16(), body).into());
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let value: Value = serde_json::from_slice(&bytes).chain_err(|| {
            let invalid_json = String::from_utf8_lossy(&bytes);
            ErrorKind::JsonDecode(invalid_json.into())
        })?;

        Ok(if value.is_null() { None } else { Some(value) })
    }
}

impl<C> Fetch for Client<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    fn call(&self, request: ApiRequest) -> BoxFuture<'_, Result<Option<Value>>> {
        Box::pin(self.request(request))
    }
}
