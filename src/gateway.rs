use crate::config::REQUEST_TIMEOUT;
use crate::errors::{ApiError, body_snippet};
use serde_json::{Map, Value, json};
use tracing::debug;

/// Single fixed-endpoint JSON gateway.
///
/// Every remote operation is one POST carrying `{action, initData, ...params}`;
/// the response envelope carries `ok` plus action-specific fields. Calls are
/// never retried here.
pub struct Gateway {
    http: reqwest::Client,
    endpoint: String,
    init_data: String,
}

impl Gateway {
    pub fn new(endpoint: impl Into<String>, init_data: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::transport(err.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            init_data: init_data.into(),
        })
    }

    pub async fn call(&self, action: &str, params: Value) -> Result<Value, ApiError> {
        let body = self.build_body(action, params);
        debug!(action, "gateway call");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(ApiError::transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body_snippet(&text)
            )));
        }

        let data: Value = serde_json::from_str(&text).map_err(|_| {
            ApiError::transport(format!("server returned non-JSON: {}", body_snippet(&text)))
        })?;

        if data.get("ok").and_then(Value::as_bool) != Some(true) {
            let message = data
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("API error");
            return Err(ApiError::api(message));
        }

        Ok(data)
    }

    fn build_body(&self, action: &str, params: Value) -> Value {
        let mut body = match params {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("payload".to_string(), other);
                map
            }
        };
        body.insert("action".to_string(), json!(action));
        body.insert("initData".to_string(), json!(self.init_data));
        Value::Object(body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::transport(err.to_string())
    }
}
