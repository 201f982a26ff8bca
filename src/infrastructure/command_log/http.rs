//! HTTP command persistence adapter
//!
//! Posts each completed command/response pair as JSON to a configured
//! endpoint. The orchestrator fires these off in the background, so a
//! slow or dead endpoint never stalls a turn.

use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::{CommandLog, CommandRecord, PersistenceError};

/// Command log backed by an HTTP endpoint
pub struct HttpCommandLog {
    endpoint: String,
    client: Client,
}

impl HttpCommandLog {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CommandLog for HttpCommandLog {
    async fn record(&self, record: &CommandRecord) -> Result<(), PersistenceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| PersistenceError::RecordFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PersistenceError::Rejected(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::InputMode;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_record_as_json() {
        let server = MockServer::start().await;
        let record = CommandRecord::new("lights on", "Done, sir.", InputMode::Voice);

        Mock::given(method("POST"))
            .and(path("/commands"))
            .and(body_json(&record))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let log = HttpCommandLog::new(format!("{}/commands", server.uri()));
        assert!(log.record(&record).await.is_ok());
    }

    #[tokio::test]
    async fn rejection_status_becomes_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let log = HttpCommandLog::new(server.uri());
        let record = CommandRecord::new("lights on", "Done, sir.", InputMode::Text);
        let err = log.record(&record).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Rejected(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_becomes_error() {
        let log = HttpCommandLog::new("http://127.0.0.1:1/commands");
        let record = CommandRecord::new("lights on", "Done, sir.", InputMode::Text);
        let err = log.record(&record).await.unwrap_err();
        assert!(matches!(err, PersistenceError::RecordFailed(_)));
    }
}
