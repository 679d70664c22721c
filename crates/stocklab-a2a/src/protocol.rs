//! A2A (Agent-to-Agent) protocol types
//!
//! JSON-RPC 2.0 envelopes and the message/task shapes exchanged with a
//! remote A2A agent. Only the fields the client reads or sends are modeled;
//! unknown fields are ignored on receipt.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{A2aError, Result};

/// JSON-RPC method names
pub mod methods {
    pub const MESSAGE_SEND: &str = "message/send";
    pub const TASKS_GET: &str = "tasks/get";
}

/// The only output mode the client negotiates
pub const JSON_OUTPUT_MODE: &str = "application/json";

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An analysis instruction plus its freshly generated correlation ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    pub instruction: String,
    pub message_id: String,
    pub request_id: String,
}

impl TaskRequest {
    pub fn new(instruction: impl Into<String>) -> Result<Self> {
        let instruction = instruction.into();
        if instruction.trim().is_empty() {
            return Err(A2aError::InvalidRequest(
                "instruction must not be empty".to_string(),
            ));
        }
        Ok(Self {
            instruction,
            message_id: Uuid::new_v4().to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }

    /// Wrap the instruction in a `message/send` envelope
    pub fn to_envelope(&self) -> JsonRpcRequest<MessageSendParams> {
        JsonRpcRequest::new(
            methods::MESSAGE_SEND,
            self.request_id.clone(),
            MessageSendParams {
                message: Message::user_text(&self.instruction, &self.message_id),
                configuration: MessageSendConfiguration {
                    accepted_output_modes: vec![JSON_OUTPUT_MODE.to_string()],
                },
            },
        )
    }
}

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<P> {
    pub jsonrpc: String,
    pub method: String,
    pub params: P,
    pub id: String,
}

impl<P: Serialize> JsonRpcRequest<P> {
    pub fn new(method: &str, id: String, params: P) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id,
        }
    }
}

/// Build a `tasks/get` envelope with a fresh request id
pub fn task_query(task_id: &str) -> JsonRpcRequest<TaskQueryParams> {
    JsonRpcRequest::new(
        methods::TASKS_GET,
        Uuid::new_v4().to_string(),
        TaskQueryParams {
            id: task_id.to_string(),
        },
    )
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default = "unknown_error")]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

fn unknown_error() -> String {
    "Unknown error".to_string()
}

impl JsonRpcResponse {
    /// Check the error object and request correlation, then return `result`.
    ///
    /// A present, non-null `id` must echo `expected_id`.
    pub fn into_result(self, expected_id: &str) -> Result<Value> {
        if let Some(error) = self.error {
            return Err(A2aError::protocol(match error.code {
                Some(code) => format!("A2A RPC error {}: {}", code, error.message),
                None => format!("A2A RPC error: {}", error.message),
            }));
        }

        match &self.id {
            None | Some(Value::Null) => {}
            Some(Value::String(id)) if id == expected_id => {}
            Some(other) => {
                return Err(A2aError::protocol(format!(
                    "response id {} does not match request id {}",
                    other, expected_id
                )));
            }
        }

        self.result
            .ok_or_else(|| A2aError::protocol("response carried neither result nor error"))
    }
}

/// `message/send` params
#[derive(Debug, Clone, Serialize)]
pub struct MessageSendParams {
    pub message: Message,
    pub configuration: MessageSendConfiguration,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageSendConfiguration {
    #[serde(rename = "acceptedOutputModes")]
    pub accepted_output_modes: Vec<String>,
}

/// `tasks/get` params
#[derive(Debug, Clone, Serialize)]
pub struct TaskQueryParams {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    #[serde(other)]
    Other,
}

/// A conversation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<Part>,
    #[serde(default = "message_kind")]
    pub kind: String,
    #[serde(rename = "messageId", default)]
    pub message_id: String,
}

fn message_kind() -> String {
    "message".to_string()
}

impl Message {
    pub fn user_text(text: &str, message_id: &str) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text {
                text: text.to_string(),
            }],
            kind: message_kind(),
            message_id: message_id.to_string(),
        }
    }

    /// Concatenated text of all text parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A message or artifact part, discriminated by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text { text: String },
    Data { data: Value },
    #[serde(other)]
    Other,
}

/// Task output artifact
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    #[serde(rename = "artifactId", default)]
    pub artifact_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<Part>,
}

/// A remote task as returned by `tasks/get`
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "contextId", default)]
    pub context_id: Option<String>,
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<Message>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifacts: Vec<Artifact>,
}

impl Task {
    /// Best description of why the task failed
    pub fn failure_message(&self) -> String {
        match &self.status.error {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Null) | None => {}
            Some(Value::Object(obj)) => {
                if let Some(msg) = obj.get("message").and_then(|m| m.as_str()) {
                    return msg.to_string();
                }
                return Value::Object(obj.clone()).to_string();
            }
            Some(other) => return other.to_string(),
        }

        self.status
            .message
            .as_ref()
            .map(Message::text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(unknown_error)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Task lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    Completed,
    Failed,
    #[serde(alias = "cancelled")]
    Canceled,
    #[serde(other)]
    Unknown,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submitted => write!(f, "submitted"),
            Self::Working => write!(f, "working"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Canceled => write!(f, "canceled"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Agent Card: advertises the remote agent at /.well-known/agent.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<AgentSkill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
