//! A2A client: delegates stock analysis to a remote agent
//!
//! One call submits a `message/send` request, polls `tasks/get` until the
//! task reaches a terminal state, and extracts the structured report from
//! the completed task.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use stocklab_core::{A2aSettings, StockReport, current_date};

use crate::error::{A2aError, Result};
use crate::extract::{DEFAULT_EXTRACTORS, extract_payload};
use crate::poll::{Observation, PollState};
use crate::protocol::*;

/// A schema the extracted payload is validated against
pub trait ReportSchema: DeserializeOwned {
    /// Checks beyond what deserialization enforces
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

impl ReportSchema for StockReport {
    fn validate(&self) -> std::result::Result<(), String> {
        StockReport::validate(self).map_err(|e| e.to_string())
    }
}

impl ReportSchema for Value {}

/// Timeouts and polling budget for an [`A2aClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub submit_timeout: Duration,
    pub max_poll_attempts: u32,
    pub poll_interval: Duration,
    /// Remediation shown when the server cannot be reached
    pub start_hint: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::from(&A2aSettings::default())
    }
}

impl From<&A2aSettings> for ClientOptions {
    fn from(settings: &A2aSettings) -> Self {
        Self {
            submit_timeout: settings.submit_timeout(),
            max_poll_attempts: settings.max_poll_attempts,
            poll_interval: settings.poll_interval(),
            start_hint: settings.start_hint.clone(),
        }
    }
}

/// A2A client for communicating with a remote analysis agent
#[derive(Clone)]
pub struct A2aClient {
    http: Client,
    options: ClientOptions,
}

impl Default for A2aClient {
    fn default() -> Self {
        Self::new(ClientOptions::default())
    }
}

/// Outcome of a single poll attempt
enum Poll {
    Skipped,
    Task(Task),
}

impl A2aClient {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            http: Client::builder()
                .timeout(options.submit_timeout)
                .build()
                .expect("failed to build HTTP client"),
            options,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Request a stock report for `symbol`, dated today
    pub async fn request_analysis(&self, base_url: &str, symbol: &str) -> Result<StockReport> {
        self.request_report(base_url, symbol, &current_date()).await
    }

    /// Request a report for `symbol` as of `reference_date` and decode it as `R`
    pub async fn request_report<R: ReportSchema>(
        &self,
        base_url: &str,
        symbol: &str,
        reference_date: &str,
    ) -> Result<R> {
        info!("A2A: preparing stock analysis request for {}", symbol);
        let request = TaskRequest::new(analysis_instruction(symbol, reference_date))?;
        let task_id = self.submit(base_url, &request).await?;
        let task = self.wait_for_completion(base_url, &task_id).await?;
        decode_report(&task_id, &task)
    }

    /// Send `message/send` and return the server-assigned task id
    pub async fn submit(&self, base_url: &str, request: &TaskRequest) -> Result<String> {
        let url = endpoint(base_url);
        info!(
            message_id = %request.message_id,
            request_id = %request.request_id,
            "A2A: sending task to {}",
            url
        );

        let resp = self
            .http
            .post(&url)
            .timeout(self.options.submit_timeout)
            .json(&request.to_envelope())
            .send()
            .await
            .map_err(|e| self.transport_error(base_url, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| self.transport_error(base_url, e))?;
        if !status.is_success() {
            warn!("A2A server returned status {}: {}", status, body);
            return Err(A2aError::protocol(format!(
                "A2A server returned status {}: {}",
                status, body
            )));
        }

        let result = parse_envelope(&body)?.into_result(&request.request_id)?;
        let task_id = result
            .get("id")
            .and_then(|v| v.as_str())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| A2aError::protocol("submit response carried no task id"))?
            .to_string();

        info!(task_id = %task_id, "A2A: task created, polling for completion");
        Ok(task_id)
    }

    /// Poll `tasks/get` until the task is terminal or the attempt budget runs out.
    ///
    /// Returns the completed task; failed and canceled tasks become errors.
    pub async fn wait_for_completion(&self, base_url: &str, task_id: &str) -> Result<Task> {
        let max_attempts = self.options.max_poll_attempts;
        if max_attempts == 0 {
            warn!(task_id = %task_id, "A2A: no polling attempts configured");
            return Err(A2aError::PollingTimeout {
                task_id: task_id.to_string(),
                attempts: 0,
            });
        }
        let mut attempt = 0;

        loop {
            attempt += 1;
            tokio::time::sleep(self.options.poll_interval).await;

            let poll = self.poll_once(base_url, task_id).await?;
            let observation = match &poll {
                Poll::Skipped => Observation::Unavailable,
                Poll::Task(task) => Observation::Reported(task.status.state),
            };
            if let Observation::Reported(state) = observation {
                debug!(
                    task_id = %task_id,
                    "A2A: task state {} (attempt {}/{})",
                    state,
                    attempt,
                    max_attempts
                );
            }

            match (PollState::after(attempt, max_attempts, observation), poll) {
                (PollState::Polling, _) => continue,
                (PollState::Completed, Poll::Task(task)) => {
                    info!(task_id = %task_id, "A2A: task completed after {} polls", attempt);
                    return Ok(task);
                }
                (PollState::Failed, Poll::Task(task)) => {
                    let message = task.failure_message();
                    warn!(task_id = %task_id, "A2A: task failed: {}", message);
                    return Err(A2aError::TaskFailed {
                        task_id: task_id.to_string(),
                        message,
                    });
                }
                (PollState::Canceled, _) => {
                    warn!(task_id = %task_id, "A2A: task was canceled");
                    return Err(A2aError::TaskCanceled {
                        task_id: task_id.to_string(),
                    });
                }
                (PollState::TimedOut, _) => {
                    warn!(
                        task_id = %task_id,
                        "A2A: task did not complete within {} attempts",
                        max_attempts
                    );
                    return Err(A2aError::PollingTimeout {
                        task_id: task_id.to_string(),
                        attempts: max_attempts,
                    });
                }
                (state, Poll::Skipped) => {
                    // Only reported states reach Completed/Failed
                    return Err(A2aError::protocol(format!(
                        "poll state {:?} without a task",
                        state
                    )));
                }
            }
        }
    }

    /// One `tasks/get` round trip. Transport failures and non-success
    /// statuses are skipped; RPC errors and malformed tasks are fatal.
    async fn poll_once(&self, base_url: &str, task_id: &str) -> Result<Poll> {
        let query = task_query(task_id);

        let resp = match self.http.post(endpoint(base_url)).json(&query).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(task_id = %task_id, "A2A: failed to get task status: {}", e);
                return Ok(Poll::Skipped);
            }
        };

        let status = resp.status();
        if !status.is_success() {
            warn!(task_id = %task_id, "A2A: failed to get task status: HTTP {}", status);
            return Ok(Poll::Skipped);
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(task_id = %task_id, "A2A: failed to read task status: {}", e);
                return Ok(Poll::Skipped);
            }
        };

        let result = parse_envelope(&body)?
            .into_result(&query.id)
            .map_err(|e| match e {
                A2aError::Protocol(msg) => A2aError::protocol(format!("task status error: {}", msg)),
                other => other,
            })?;

        let task: Task = serde_json::from_value(result)
            .map_err(|e| A2aError::protocol(format!("malformed task in status response: {}", e)))?;

        if let Some(id) = &task.id
            && id != task_id
        {
            return Err(A2aError::protocol(format!(
                "status response for task {} while polling {}",
                id, task_id
            )));
        }

        Ok(Poll::Task(task))
    }

    /// Fetch the remote agent's capability card
    pub async fn fetch_agent_card(&self, base_url: &str) -> Result<AgentCard> {
        let url = format!("{}/.well-known/agent.json", base_url.trim_end_matches('/'));
        debug!("Fetching agent card from {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(base_url, e))?;

        if !resp.status().is_success() {
            return Err(A2aError::protocol(format!(
                "agent card request failed: HTTP {}",
                resp.status()
            )));
        }

        let card: AgentCard = resp
            .json()
            .await
            .map_err(|e| A2aError::protocol(format!("failed to parse agent card: {}", e)))?;

        info!("Fetched agent card: {} ({} skills)", card.name, card.skills.len());
        Ok(card)
    }

    fn transport_error(&self, base_url: &str, err: reqwest::Error) -> A2aError {
        if err.is_connect() {
            warn!("A2A: cannot connect to {}: {}", base_url, err);
            A2aError::Connection {
                endpoint: base_url.to_string(),
                hint: self.options.start_hint.clone(),
            }
        } else if err.is_timeout() {
            warn!("A2A: request to {} timed out", base_url);
            A2aError::Timeout {
                endpoint: base_url.to_string(),
                timeout: self.options.submit_timeout,
            }
        } else {
            A2aError::protocol(format!("request to {} failed: {}", base_url, err))
        }
    }
}

/// Instruction text sent to the analysis agent
pub fn analysis_instruction(symbol: &str, reference_date: &str) -> String {
    format!(
        "Please analyze the stock {} and provide a comprehensive report.\n\n\
         The analysis date should be: {}",
        symbol, reference_date
    )
}

fn endpoint(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

fn parse_envelope(body: &str) -> Result<JsonRpcResponse> {
    serde_json::from_str(body)
        .map_err(|e| A2aError::protocol(format!("invalid JSON-RPC response: {}", e)))
}

/// Extract the payload of a completed task and validate it as `R`
pub fn decode_report<R: ReportSchema>(task_id: &str, task: &Task) -> Result<R> {
    let (source, payload) = extract_payload(task, &DEFAULT_EXTRACTORS).ok_or_else(|| {
        A2aError::protocol(format!("task {} completed but no result found", task_id))
    })?;
    debug!(task_id = %task_id, "A2A: extracted result from {}", source);

    let report: R =
        serde_json::from_value(payload).map_err(|e| A2aError::Validation(e.to_string()))?;
    report.validate().map_err(A2aError::Validation)?;
    Ok(report)
}
