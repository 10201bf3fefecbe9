use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Credentials;
use crate::error::{BambooError, Result};

pub(super) const API_PREFIX: &str = "rest/api/latest/";

/// Query string pairs, kept in the order they are sent.
pub type Query = Vec<(String, String)>;

/// HTTP transport for a single Bamboo server.
///
/// Every request carries the configured basic-auth credentials. Connectivity
/// failures and non-2xx statuses are both reported as
/// [`BambooError::UnreachableEndpoint`]; the client never retries.
pub struct BambooClient {
    client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl BambooClient {
    pub fn new(
        base_url: &str,
        credentials: Option<Credentials>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            "bamboolens/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BambooError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Bamboo often lives under a context path (https://host/bamboo), which
        // `Url::join` only keeps when the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| BambooError::Config(format!("Invalid base URL: {e}")))?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Helper to build authenticated requests
    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(credentials) = &self.credentials {
            request.basic_auth(credentials.username(), Some(credentials.password()))
        } else {
            request
        }
    }

    /// Absolute URL for `path` (relative to the base URL) with `query` appended.
    pub(super) fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| BambooError::Config(format!("Invalid request path {path}: {e}")))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// GET `path` and return the body of a successful response.
    pub async fn get_text(&self, path: &str, query: &[(String, String)]) -> Result<String> {
        let url = self.url(path, query)?;
        debug!("GET {url}");

        let unreachable = |reason: String| BambooError::UnreachableEndpoint {
            url: url.to_string(),
            reason,
        };

        let response = self
            .auth_request(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|e| unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unreachable(format!("HTTP {status}")));
        }

        response.text().await.map_err(|e| unreachable(e.to_string()))
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T>(&self, path: &str, query: &[(String, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = self.get_text(path, query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Parses a raw query string such as `?expand=results&max-results=50`.
pub fn parse_query(raw: Option<&str>) -> Query {
    let Some(raw) = raw else {
        return Vec::new();
    };

    url::form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_keeps_context_path() {
        let client = BambooClient::new("https://ci.example.com/bamboo", None, None).unwrap();
        let url = client.url("rest/api/latest/plan.json", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ci.example.com/bamboo/rest/api/latest/plan.json"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = BambooClient::new("not a url", None, None);
        assert!(matches!(result, Err(BambooError::Config(_))));
    }

    #[test]
    fn test_query_is_appended_in_order() {
        let client = BambooClient::new("http://example.com", None, None).unwrap();
        let query = vec![
            ("expand".to_string(), "results".to_string()),
            ("start-index".to_string(), "2".to_string()),
        ];
        let url = client.url("rest/api/latest/plan.json", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "http://example.com/rest/api/latest/plan.json?expand=results&start-index=2"
        );
    }

    #[test]
    fn test_parse_query_accepts_leading_question_mark() {
        assert_eq!(
            parse_query(Some("?expand=results&includeAllStates=true")),
            vec![
                ("expand".to_string(), "results".to_string()),
                ("includeAllStates".to_string(), "true".to_string()),
            ]
        );
        assert!(parse_query(None).is_empty());
        assert!(parse_query(Some("")).is_empty());
    }

    #[tokio::test]
    async fn test_not_found_is_unreachable_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/latest/plan.json")
            .with_status(404)
            .create_async()
            .await;

        let client = BambooClient::new(&server.url(), None, None).unwrap();
        let result = client.get_text("rest/api/latest/plan.json", &[]).await;

        mock.assert_async().await;
        match result {
            Err(BambooError::UnreachableEndpoint { reason, .. }) => {
                assert!(reason.contains("404"));
            }
            other => panic!("expected unreachable endpoint, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable_endpoint() {
        // Port 9 (discard) is not expected to accept HTTP connections locally.
        let client = BambooClient::new("http://127.0.0.1:9", None, None).unwrap();
        let result = client.get_text("rest/api/latest/plan.json", &[]).await;
        assert!(matches!(
            result,
            Err(BambooError::UnreachableEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_is_json_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/latest/plan.json")
            .with_status(200)
            .with_body("<html>login</html>")
            .create_async()
            .await;

        let client = BambooClient::new(&server.url(), None, None).unwrap();
        let result: Result<serde_json::Value> =
            client.get_json("rest/api/latest/plan.json", &[]).await;

        assert!(matches!(result, Err(BambooError::Json(_))));
    }
}
