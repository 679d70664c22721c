//! Locating the structured result in a completed task
//!
//! Extractors are tried in order until one yields a payload: the most recent
//! agent message in `history`, then the `artifacts`. A data object of the
//! form `{"result": {...}}` is unwrapped.

use serde_json::Value;

use crate::protocol::{Part, Role, Task};

pub trait Extractor: Send + Sync {
    /// Where the payload was found, for logging
    fn source(&self) -> &'static str;
    fn extract(&self, task: &Task) -> Option<Value>;
}

/// Data parts of agent messages, newest message first
pub struct HistoryExtractor;

impl Extractor for HistoryExtractor {
    fn source(&self) -> &'static str {
        "history"
    }

    fn extract(&self, task: &Task) -> Option<Value> {
        task.history
            .iter()
            .rev()
            .filter(|msg| msg.role == Role::Agent)
            .find_map(|msg| first_data(&msg.parts))
    }
}

/// Data parts of artifacts, in order
pub struct ArtifactExtractor;

impl Extractor for ArtifactExtractor {
    fn source(&self) -> &'static str {
        "artifacts"
    }

    fn extract(&self, task: &Task) -> Option<Value> {
        task.artifacts
            .iter()
            .find_map(|artifact| first_data(&artifact.parts))
    }
}

pub static DEFAULT_EXTRACTORS: [&dyn Extractor; 2] = [&HistoryExtractor, &ArtifactExtractor];

/// Run `extractors` in order; returns the payload and the source it came from
pub fn extract_payload(
    task: &Task,
    extractors: &[&dyn Extractor],
) -> Option<(&'static str, Value)> {
    extractors
        .iter()
        .find_map(|e| e.extract(task).map(|payload| (e.source(), payload)))
}

fn first_data(parts: &[Part]) -> Option<Value> {
    parts.iter().find_map(|part| match part {
        Part::Data { data } => unwrap_result(data),
        _ => None,
    })
}

/// `{"result": x}` yields `x`; any other object is used as is
pub fn unwrap_result(data: &Value) -> Option<Value> {
    let obj = data.as_object()?;
    match obj.get("result") {
        Some(inner) => Some(inner.clone()),
        None => Some(data.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(body: Value) -> Task {
        let mut value = json!({"id": "t-1", "status": {"state": "completed"}});
        for (k, v) in body.as_object().unwrap() {
            value[k] = v.clone();
        }
        serde_json::from_value(value).unwrap()
    }

    fn agent_data(data: Value) -> Value {
        json!({"role": "agent", "parts": [{"kind": "data", "data": data}]})
    }

    #[test]
    fn test_unwrap_result() {
        assert_eq!(unwrap_result(&json!({"result": {"a": 1}})), Some(json!({"a": 1})));
        assert_eq!(unwrap_result(&json!({"a": 1})), Some(json!({"a": 1})));
        assert_eq!(unwrap_result(&json!("text")), None);
        assert_eq!(unwrap_result(&json!([1, 2])), None);
    }

    #[test]
    fn test_history_first() {
        let t = task(json!({
            "history": [agent_data(json!({"result": {"from": "history"}}))],
            "artifacts": [{"parts": [{"kind": "data", "data": {"from": "artifacts"}}]}]
        }));
        let (source, payload) = extract_payload(&t, &DEFAULT_EXTRACTORS).unwrap();
        assert_eq!(source, "history");
        assert_eq!(payload, json!({"from": "history"}));
    }

    #[test]
    fn test_artifacts_fallback() {
        let t = task(json!({
            "history": [],
            "artifacts": [
                {"parts": [{"kind": "text", "text": "summary"}]},
                {"parts": [{"kind": "data", "data": {"result": {"from": "artifacts"}}}]}
            ]
        }));
        let (source, payload) = extract_payload(&t, &DEFAULT_EXTRACTORS).unwrap();
        assert_eq!(source, "artifacts");
        assert_eq!(payload, json!({"from": "artifacts"}));
    }

    #[test]
    fn test_latest_agent_message_wins() {
        let t = task(json!({
            "history": [
                agent_data(json!({"n": 1})),
                {"role": "user", "parts": [{"kind": "data", "data": {"n": "user"}}]},
                agent_data(json!({"n": 2})),
                {"role": "agent", "parts": [{"kind": "text", "text": "done"}]}
            ]
        }));
        assert_eq!(HistoryExtractor.extract(&t), Some(json!({"n": 2})));
    }

    #[test]
    fn test_user_data_ignored() {
        let t = task(json!({
            "history": [{"role": "user", "parts": [{"kind": "data", "data": {"n": 1}}]}]
        }));
        assert_eq!(HistoryExtractor.extract(&t), None);
    }

    #[test]
    fn test_nothing_found() {
        let t = task(json!({
            "history": [{"role": "agent", "parts": [{"kind": "text", "text": "no data"}]}],
            "artifacts": [{"parts": [{"kind": "data", "data": "scalar"}]}]
        }));
        assert!(extract_payload(&t, &DEFAULT_EXTRACTORS).is_none());
    }
}
