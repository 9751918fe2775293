use crate::actions::Session;
use crate::api::Fetch;
use crate::error::*;
use crate::model::Status;
use tracing::debug;

/// Records requested per timeline fetch.
pub const DEFAULT_LIMIT: u32 = 40;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Home,
    Public,
    PublicLocal,
    List(String),
}

impl Endpoint {
    pub fn as_path(&self) -> String {
        match *self {
            Endpoint::Home => "/api/v1/timelines/home".to_string(),
            Endpoint::Public | Endpoint::PublicLocal => "/api/v1/timelines/public".to_string(),
            Endpoint::List(ref id) => format!("/api/v1/timelines/list/{}", id),
        }
    }
}

/// The most recent statuses of `endpoint`, tagged with the session's domain.
pub async fn fetch(fetch: &dyn Fetch, session: &Session, endpoint: &Endpoint) -> Result<Vec<Status>> {
    let mut request = session.get(endpoint.as_path()).param("limit", DEFAULT_LIMIT);
    if *endpoint == Endpoint::PublicLocal {
        request = request.param("local", 1);
    }

    debug!(domain = %session.domain, ?endpoint, "fetching timeline");

    let records = fetch.call(request).await?;
    Status::build(&session.domain, records)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::mock::MockFetch;
    use crate::model::fixture;
    use serde_json::json;

    #[test]
    fn paths() {
        assert_eq!(Endpoint::Home.as_path(), "/api/v1/timelines/home");
        assert_eq!(Endpoint::PublicLocal.as_path(), "/api/v1/timelines/public");
        assert_eq!(Endpoint::List("12".into()).as_path(), "/api/v1/timelines/list/12");
    }

    #[tokio::test]
    async fn local_timeline() {
        let fetch = MockFetch::new().json(
            "example.social",
            "/api/v1/timelines/public",
            json!([fixture::status("2", "b"), fixture::status("1", "a")]),
        );
        let session = Session::new("example.social", "token");

        let statuses = super::fetch(&fetch, &session, &Endpoint::PublicLocal).await.unwrap();

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].id, "2");
        assert_eq!(statuses[1].domain.as_deref(), Some("example.social"));

        let calls = fetch.calls();
        assert_eq!(
            calls[0].query,
            vec![("limit".to_string(), "40".to_string()), ("local".to_string(), "1".to_string())]
        );
    }

    #[tokio::test]
    async fn missing_list_is_empty() {
        let fetch = MockFetch::new();
        let session = Session::new("example.social", "token");

        let statuses = super::fetch(&fetch, &session, &Endpoint::List("404".into())).await.unwrap();
        assert!(statuses.is_empty());
    }
}
