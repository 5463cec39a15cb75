use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{DashboardError, Result};

/// Every dashboard endpoint lives under this prefix.
const API_PREFIX: &str = "/management";

/// The `{ success, data, message }` wrapper every endpoint responds with.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T = Value> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, turning `success: false` into [`DashboardError::Rejected`].
    pub fn into_data(self) -> Result<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(DashboardError::Rejected {
                message: self.message.unwrap_or_default(),
            })
        }
    }
}

impl Envelope<Value> {
    /// Re-decode the payload into a typed value.
    pub fn decode<T: DeserializeOwned>(self, path: &str) -> Result<Envelope<T>> {
        let data = match self.data {
            None | Some(Value::Null) => None,
            Some(v) => Some(serde_json::from_value(v).map_err(|source| {
                DashboardError::Decode {
                    path: path.to_string(),
                    source,
                }
            })?),
        };
        Ok(Envelope {
            success: self.success,
            data,
            message: self.message,
        })
    }
}

/// Thin HTTP layer: one attempt per call, bounded by the configured timeout.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| DashboardError::Config(format!("could not build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, API_PREFIX, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Envelope> {
        self.send(Method::GET, path, query).await
    }

    pub async fn patch(&self, path: &str, query: &[(&str, &str)]) -> Result<Envelope> {
        self.send(Method::PATCH, path, query).await
    }

    async fn send(&self, method: Method, path: &str, query: &[(&str, &str)]) -> Result<Envelope> {
        let result = self.send_inner(method.clone(), path, query).await;
        if let Err(ref err) = result {
            tracing::error!(%method, path, error = %err, "API call failed");
        }
        result
    }

    async fn send_inner(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Envelope> {
        let url = self.url(path);
        tracing::debug!(%method, %url, ?query, "sending request");

        let mut req = self.client.request(method, &url);
        if !query.is_empty() {
            req = req.query(query);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| DashboardError::from_reqwest(path, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DashboardError::from_reqwest(path, e))?;

        if !status.is_success() {
            // Rejections often still arrive as an envelope with a message.
            if let Ok(envelope) = serde_json::from_str::<Envelope>(&body) {
                if !envelope.success && envelope.message.is_some() {
                    return Ok(envelope);
                }
            }
            return Err(DashboardError::Status {
                path: path.to_string(),
                status,
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| DashboardError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_joins_prefix_and_path() {
        let config = Config::default().with_api_url("http://backend:8081/");
        let gateway = Gateway::new(&config).unwrap();
        assert_eq!(
            gateway.url("/users/allergy"),
            "http://backend:8081/management/users/allergy"
        );
        assert_eq!(gateway.url("reports"), "http://backend:8081/management/reports");
    }

    #[test]
    fn rejected_envelope_carries_message() {
        let env: Envelope = serde_json::from_value(json!({
            "success": false,
            "message": "이미 처리된 신고입니다."
        }))
        .unwrap();
        match env.into_data() {
            Err(DashboardError::Rejected { message }) => {
                assert_eq!(message, "이미 처리된 신고입니다.")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_success_flag_counts_as_failure() {
        let env: Envelope = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert!(env.into_data().is_err());
    }

    #[test]
    fn decode_null_data_is_none() {
        let env: Envelope = serde_json::from_value(json!({ "success": true, "data": null })).unwrap();
        let typed: Envelope<Vec<u32>> = env.decode("x").unwrap();
        assert!(typed.data.is_none());
    }
}
