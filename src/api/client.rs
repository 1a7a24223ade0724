//! Weather API client.
//!
//! A thin wrapper around `reqwest::Client` that builds the forecast
//! request URL from the resolved credentials, performs a single GET, and
//! maps failures onto the `WeatherError` taxonomy. The client never
//! retries; the sync engine decides how to recover.

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::config::ApiCredentials;
use crate::models::Coordinate;

use super::WeatherError;

/// Client for the forecast endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    credentials: Option<ApiCredentials>,
}

impl WeatherClient {
    /// Create a new client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            credentials: None,
        })
    }

    /// Pin credentials instead of resolving them per fetch.
    pub fn with_credentials(mut self, credentials: ApiCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn credentials(&self) -> Result<ApiCredentials, WeatherError> {
        match &self.credentials {
            Some(credentials) => Ok(credentials.clone()),
            None => ApiCredentials::resolve(),
        }
    }

    /// Fetch the raw forecast payload, optionally scoped to a coordinate.
    pub async fn fetch(&self, coordinate: Option<Coordinate>) -> Result<Value, WeatherError> {
        let credentials = self.credentials()?;
        let url = build_request_url(&credentials.base_url, &credentials.api_key, coordinate)?;
        debug!(host = ?url.host_str(), path = url.path(), "requesting weather forecast");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(WeatherError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::from_status(status, &body));
        }

        response
            .json::<Value>()
            .await
            .map_err(|_| WeatherError::Request("invalid JSON response from weather API".into()))
    }
}

/// Build the request URL from the configured base endpoint. `appid` is
/// always set to the API key; when a coordinate is given it overwrites any
/// `lat`/`lon` already present in the base query. Other query parameters
/// are preserved.
pub fn build_request_url(
    base: &str,
    api_key: &str,
    coordinate: Option<Coordinate>,
) -> Result<Url, WeatherError> {
    let mut url = Url::parse(base)
        .map_err(|e| WeatherError::Request(format!("invalid endpoint URL: {}", e)))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "appid" && !(coordinate.is_some() && (key == "lat" || key == "lon")))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("appid", api_key);
        if let Some(coordinate) = coordinate {
            pairs.append_pair("lat", &coordinate.lat.to_string());
            pairs.append_pair("lon", &coordinate.lon.to_string());
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn coordinate() -> Coordinate {
        Coordinate::new(52.52, 13.4).expect("valid coordinate")
    }

    fn client_for(server_url: &str) -> WeatherClient {
        WeatherClient::new(Duration::from_secs(2))
            .expect("client builds")
            .with_credentials(ApiCredentials {
                base_url: format!("{}/data/2.5/forecast", server_url),
                api_key: "test-key".into(),
            })
    }

    #[test]
    fn test_build_url_sets_appid_and_coordinates() {
        let url = build_request_url(
            "https://api.openweathermap.org/data/2.5/forecast",
            "secret",
            Some(coordinate()),
        )
        .expect("builds");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("appid".into(), "secret".into())));
        assert!(pairs.contains(&("lat".into(), "52.52".into())));
        assert!(pairs.contains(&("lon".into(), "13.4".into())));
    }

    #[test]
    fn test_build_url_overwrites_existing_coordinates() {
        let url = build_request_url(
            "https://api.openweathermap.org/data/2.5/forecast?lat=1.0&lon=2.0&units=metric&appid=old",
            "secret",
            Some(coordinate()),
        )
        .expect("builds");

        let query = url.query().expect("has query");
        assert!(!query.contains("lat=1.0"));
        assert!(!query.contains("lon=2.0"));
        assert!(!query.contains("appid=old"));
        assert!(query.contains("units=metric"));
        assert!(query.contains("lat=52.52"));
        assert!(query.contains("lon=13.4"));
        assert!(query.contains("appid=secret"));
    }

    #[test]
    fn test_build_url_keeps_base_coordinates_without_override() {
        let url = build_request_url(
            "https://api.openweathermap.org/data/2.5/forecast?lat=1.0&lon=2.0",
            "secret",
            None,
        )
        .expect("builds");

        let query = url.query().expect("has query");
        assert!(query.contains("lat=1.0"));
        assert!(query.contains("lon=2.0"));
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        let err = build_request_url("not a url", "secret", None).expect_err("must fail");
        assert!(matches!(err, WeatherError::Request(_)));
    }

    #[tokio::test]
    async fn test_fetch_returns_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("appid", "test-key"))
            .and(query_param("lat", "52.52"))
            .and(query_param("lon", "13.4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": {"name": "Berlin", "country": "DE"},
                "list": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payload = client_for(&server.uri())
            .fetch(Some(coordinate()))
            .await
            .expect("fetch succeeds");
        assert_eq!(payload["city"]["name"], "Berlin");
    }

    #[tokio::test]
    async fn test_fetch_maps_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server.uri())
            .fetch(Some(coordinate()))
            .await
            .expect_err("must fail");
        assert!(matches!(err, WeatherError::AuthExpired));
    }

    #[tokio::test]
    async fn test_fetch_maps_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server.uri())
            .fetch(Some(coordinate()))
            .await
            .expect_err("must fail");
        assert!(matches!(err, WeatherError::ServiceUnavailable(503)));
    }

    #[tokio::test]
    async fn test_fetch_maps_other_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = client_for(&server.uri())
            .fetch(Some(coordinate()))
            .await
            .expect_err("must fail");
        assert!(matches!(err, WeatherError::Request(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server.uri())
            .fetch(Some(coordinate()))
            .await
            .expect_err("must fail");
        assert!(matches!(err, WeatherError::Request(_)));
    }

    #[tokio::test]
    async fn test_fetch_maps_connection_failures() {
        // Nothing listens on this port.
        let err = client_for("http://127.0.0.1:9")
            .fetch(Some(coordinate()))
            .await
            .expect_err("must fail");
        assert!(matches!(err, WeatherError::Network(_)));
    }
}
