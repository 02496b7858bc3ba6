use crate::{config::AppConfig, log_util, quiz::CompletionRecord};
use color_eyre::eyre::{Context, Result, eyre};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{
    sync::mpsc::{self, Receiver},
    thread,
};
use tokio::runtime::Runtime;

/// Body posted to `<api>/save` when a quiz finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPayload {
    pub user_id: String,
    pub quiz: String,
    pub score: usize,
    pub total: usize,
    pub time: i64,
}

impl ResultPayload {
    pub fn from_completion(user_id: &str, quiz: &str, record: &CompletionRecord) -> Self {
        Self {
            user_id: user_id.to_string(),
            quiz: quiz.to_string(),
            score: record.score,
            total: record.total,
            time: record.elapsed_seconds(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug)]
pub enum SaveMessage {
    Saved(String),
    Skipped(String),
    Failed(String),
}

/// Posts finished quiz results to the configured results API.
#[derive(Debug, Clone)]
pub struct ResultsClient {
    client: Client,
    api_base: String,
    user_id: String,
    user_name: String,
}

impl ResultsClient {
    pub fn new(api_base: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            user_id: user_id.into(),
            user_name: String::new(),
        }
    }

    /// Build a client from configuration. Returns `None` when no user is configured, which is
    /// how an anonymous learner's results are skipped.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        if !config.has_user() {
            return None;
        }
        let mut client = Self::new(config.results_api_url.clone(), config.user_id.trim());
        client.user_name = config.user_name.clone();
        Some(client)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub async fn save(&self, payload: &ResultPayload) -> Result<String> {
        let endpoint = format!("{}/save", self.api_base);
        log_util::log_debug(&format!(
            "ResultsClient: saving {}/{} for quiz {} to {}",
            payload.score, payload.total, payload.quiz, endpoint
        ));
        let response = self
            .client
            .post(&endpoint)
            .json(payload)
            .send()
            .await
            .wrap_err("failed to reach the results API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .wrap_err("failed to read results API response body")?;
        log_util::log_debug(&format!("ResultsClient: results API status {}", status));

        if !status.is_success() {
            return Err(eyre!(format!(
                "results API returned {} with body: {}",
                status, body
            )));
        }
        interpret_response(&body)?;

        let who = if self.user_name.is_empty() {
            self.user_id.as_str()
        } else {
            self.user_name.as_str()
        };
        Ok(format!(
            "Saved {}/{} on {} for {} ({}s)",
            payload.score, payload.total, payload.quiz, who, payload.time
        ))
    }
}

fn interpret_response(body: &str) -> Result<()> {
    let parsed: SaveResponse =
        serde_json::from_str(body).wrap_err("results API response was not valid JSON")?;
    if parsed.success {
        Ok(())
    } else {
        Err(eyre!(
            "results API rejected the result: {}",
            parsed.message.as_deref().unwrap_or("no message")
        ))
    }
}

/// Save on a background thread with its own runtime. The caller polls the receiver and never
/// waits for the request.
pub fn spawn_save(
    client: Option<ResultsClient>,
    quiz_name: String,
    record: CompletionRecord,
) -> Receiver<SaveMessage> {
    let (sender, receiver) = mpsc::channel();

    let Some(client) = client else {
        log_util::log_debug("ResultsClient: no user configured; skipping result save");
        let _ = sender.send(SaveMessage::Skipped(
            "No user configured; result not saved.".to_string(),
        ));
        return receiver;
    };

    let payload = ResultPayload::from_completion(client.user_id(), &quiz_name, &record);
    thread::spawn(move || {
        let runtime = match Runtime::new() {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = sender.send(SaveMessage::Failed(format!(
                    "Failed to build Tokio runtime: {}",
                    err
                )));
                return;
            }
        };

        let result = runtime.block_on(client.save(&payload));
        drop(runtime);

        let message = match result {
            Ok(summary) => SaveMessage::Saved(summary),
            Err(err) => {
                log_util::log_debug(&format!("ResultsClient: save failed: {:#}", err));
                SaveMessage::Failed(format!("{:#}", err))
            }
        };
        let _ = sender.send(message);
    });

    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record() -> CompletionRecord {
        CompletionRecord {
            score: 18,
            total: 20,
            elapsed: Duration::seconds(180),
        }
    }

    #[test]
    fn payload_carries_score_directly() {
        let payload = ResultPayload::from_completion("42", "1A", &record());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "user_id": "42",
                "quiz": "1A",
                "score": 18,
                "total": 20,
                "time": 180
            })
        );
    }

    #[test]
    fn api_rejection_is_an_error() {
        assert!(interpret_response(r#"{"success": true}"#).is_ok());
        let err = interpret_response(r#"{"success": false, "message": "bad quiz"}"#).unwrap_err();
        assert!(err.to_string().contains("bad quiz"));
        assert!(interpret_response("<html>").is_err());
    }

    #[test]
    fn anonymous_learner_is_skipped_without_a_request() {
        let config = AppConfig::default();
        assert!(ResultsClient::from_config(&config).is_none());

        let receiver = spawn_save(None, "1A".to_string(), record());
        assert!(matches!(receiver.recv(), Ok(SaveMessage::Skipped(_))));
    }
}
