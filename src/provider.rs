use crate::credential::Credential;
use crate::error::FetchError;
use crate::query::LossQuery;
use anyhow::Result;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

pub trait LossApi {
    /// Sends the one GET for `query`. Only transport failures are errors; any status the
    /// server answers with comes back as an `ApiResponse`.
    async fn get_loss(self: &Self, query: &LossQuery, credential: &Credential) -> Result<ApiResponse>;
}

pub struct GlobalForestWatch {
    client: Client,
    endpoint: Url,
}

impl GlobalForestWatch {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn from_query(query: &LossQuery) -> Result<Self> {
        let endpoint = Url::parse(&query.endpoint)
            .map_err(|e| FetchError::InvalidEndpoint(query.endpoint.clone(), e))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(query.timeout_secs))
            .build()?;
        Ok(Self { client, endpoint })
    }
}

impl LossApi for GlobalForestWatch {
    async fn get_loss(self: &Self, query: &LossQuery, credential: &Credential) -> Result<ApiResponse> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&query.params())
            .header(AUTHORIZATION, credential.bearer())
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!(url = %response.url(), status, "received response");
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn query_for(server: &MockServer) -> LossQuery {
        LossQuery {
            endpoint: format!("{}/v1/loss", server.uri()),
            ..LossQuery::default()
        }
    }

    #[tokio::test]
    async fn test_sends_params_and_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/loss"))
            .and(query_param("bbox", "68.0,6.5,97.0,37.0"))
            .and(query_param("start_date", "2000-01-01"))
            .and(query_param("end_date", "2023-01-01"))
            .and(header("Authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"features":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let query = query_for(&server);
        let api = GlobalForestWatch::from_query(&query).unwrap();
        let response = api
            .get_loss(&query, &Credential::new("token-123"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"features":[]}"#);
    }

    #[tokio::test]
    async fn test_unusual_params_arrive_unmodified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("bbox", "-10.125, -5,10.000,5"))
            .and(query_param("start_date", "2019-07-04"))
            .and(query_param("end_date", "2020-02-29"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let query = LossQuery {
            bbox: "-10.125, -5,10.000,5".to_string(),
            start_date: "2019-07-04".to_string(),
            end_date: "2020-02-29".to_string(),
            ..query_for(&server)
        };
        let api = GlobalForestWatch::from_query(&query).unwrap();
        let response = api.get_loss(&query, &Credential::new("t")).await.unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_error_status_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let query = query_for(&server);
        let api = GlobalForestWatch::from_query(&query).unwrap();
        let response = api.get_loss(&query, &Credential::new("t")).await.unwrap();

        assert_eq!(
            response,
            ApiResponse {
                status: 404,
                body: "Not Found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let query = LossQuery {
            timeout_secs: 1,
            ..query_for(&server)
        };
        let api = GlobalForestWatch::from_query(&query).unwrap();
        let err = api.get_loss(&query, &Credential::new("t")).await.unwrap_err();

        let transport = err.downcast_ref::<reqwest::Error>().unwrap();
        assert!(transport.is_timeout());
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        let query = LossQuery {
            endpoint: "http://127.0.0.1:1/v1/loss".to_string(),
            ..LossQuery::default()
        };
        let api = GlobalForestWatch::from_query(&query).unwrap();
        assert!(api.get_loss(&query, &Credential::new("t")).await.is_err());
    }
}
