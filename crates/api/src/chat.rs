use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body for `POST /api/chat`. Omitting `conversation_id` starts a new
/// conversation server-side.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, conversation_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id,
        }
    }
}

/// Assistant reply. `task_updated` signals that the assistant mutated the
/// task collection server-side, so the client must refetch rather than
/// guess at the effect.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
    pub task_updated: bool,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_absent_conversation_id() {
        let fresh = serde_json::to_value(ChatRequest::new("add a task", None)).unwrap();
        assert_eq!(fresh, serde_json::json!({ "message": "add a task" }));

        let continued =
            serde_json::to_value(ChatRequest::new("thanks", Some("conv-7".into()))).unwrap();
        assert_eq!(continued["conversation_id"], "conv-7");
    }

    #[test]
    fn response_deserializes_wire_shape() {
        let raw = r#"{
            "response": "Done — I marked it complete.",
            "conversation_id": "conv-7",
            "task_updated": true,
            "timestamp": "2025-06-01T12:00:00Z"
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.task_updated);
        assert_eq!(parsed.conversation_id, "conv-7");
    }
}
