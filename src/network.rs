use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

pub const EXPLAIN_PATH: &str = "/api/explain/code";
pub const NO_EXPLANATION: &str = "⚠ No explanation returned";
pub const REQUEST_FAILED: &str = "⚠ Error: Failed to get AI response";

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server answered {status}")]
    Status { status: reqwest::StatusCode },
    #[error("response body is not a JSON document: {0}")]
    MalformedBody(#[source] reqwest::Error),
}

#[derive(Serialize)]
struct ExplainRequest<'a> {
    code: &'a str,
}

/// Client for the remote explanation service.
#[derive(Clone)]
pub struct ExplainClient {
    base_url: String,
    http: reqwest::Client,
}

impl ExplainClient {
    /// An empty base URL is accepted; requests then fail with a transport error.
    pub fn new(base_url: Option<&str>) -> Self {
        Self {
            base_url: base_url.unwrap_or_default().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, EXPLAIN_PATH)
    }

    /// Sends the code and returns the explanation text, or the placeholder
    /// when the response carries neither `output` nor `explanation`.
    pub async fn explain(&self, code: &str) -> Result<String, ExplainError> {
        let url = self.endpoint();
        debug!(%url, bytes = code.len(), "sending explain request");

        // `.json()` sets `Content-Type: application/json`.
        let response = self
            .http
            .post(&url)
            .json(&ExplainRequest { code })
            .send()
            .await
            .map_err(|source| ExplainError::Transport { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplainError::Status { status });
        }

        let body: Value = response.json().await.map_err(ExplainError::MalformedBody)?;
        let text = extract_explanation(&body).unwrap_or(NO_EXPLANATION).to_string();
        info!(%status, chars = text.chars().count(), "explanation received");
        Ok(text)
    }
}

/// `output` wins over `explanation`; empty or non-string fields count as absent.
pub fn extract_explanation(body: &Value) -> Option<&str> {
    ["output", "explanation"]
        .iter()
        .filter_map(|field| body.get(field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
}


#[cfg(test)]
mod tests {
    use super::test_support::spawn_server;
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn output_field_wins() {
        let body = json!({"output": "from output", "explanation": "from explanation"});
        assert_eq!(extract_explanation(&body), Some("from output"));
    }

    #[test]
    fn explanation_field_is_fallback() {
        assert_eq!(extract_explanation(&json!({"explanation": "fallback"})), Some("fallback"));
        assert_eq!(extract_explanation(&json!({"output": "", "explanation": "fallback"})), Some("fallback"));
        assert_eq!(extract_explanation(&json!({"output": 3, "explanation": "fallback"})), Some("fallback"));
    }

    #[test]
    fn missing_fields_yield_nothing() {
        assert_eq!(extract_explanation(&json!({"message": "hi"})), None);
        assert_eq!(extract_explanation(&json!(["output"])), None);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ExplainClient::new(Some("http://localhost:8080/"));
        assert_eq!(client.endpoint(), "http://localhost:8080/api/explain/code");
        assert_eq!(ExplainClient::new(None).endpoint(), "/api/explain/code");
    }

    #[tokio::test]
    async fn posts_code_as_json() {
        let (base, captured) = spawn_server(StatusCode::OK, json!({"output": "Logs the number 1."})).await;
        let client = ExplainClient::new(Some(&base));

        let text = client.explain("console.log(1)").await.unwrap();

        assert_eq!(text, "Logs the number 1.");
        let seen = captured.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("application/json"));
        assert_eq!(seen[0].1, json!({"code": "console.log(1)"}));
    }

    #[tokio::test]
    async fn placeholder_when_no_field() {
        let (base, _) = spawn_server(StatusCode::OK, json!({"status": "ok"})).await;
        let text = ExplainClient::new(Some(&base)).explain("x = 1").await.unwrap();
        assert_eq!(text, NO_EXPLANATION);
    }

    #[tokio::test]
    async fn server_error_is_status_variant() {
        let (base, _) = spawn_server(StatusCode::INTERNAL_SERVER_ERROR, json!({"output": "nope"})).await;
        let err = ExplainClient::new(Some(&base)).explain("x = 1").await.unwrap_err();
        assert!(matches!(err, ExplainError::Status { status } if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn missing_base_url_is_transport_error() {
        let err = ExplainClient::new(None).explain("x = 1").await.unwrap_err();
        assert!(matches!(err, ExplainError::Transport { .. }));
    }
}
