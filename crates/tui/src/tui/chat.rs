use chrono::{DateTime, Utc};

use taskdeck_api::ChatResponse;

use super::buffer::TextBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub(crate) struct ChatMessage {
    pub(crate) role: ChatRole,
    pub(crate) content: String,
    pub(crate) timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn user(content: String) -> Self {
        Self {
            role: ChatRole::User,
            content,
            timestamp: Utc::now(),
        }
    }

    fn assistant(content: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content,
            timestamp,
        }
    }
}

/// Sidebar conversation with the task assistant.
///
/// Sends are optimistic: the user line is appended and the input cleared
/// before the request goes out. On failure the input text comes back so
/// nothing typed is lost.
#[derive(Debug, Default)]
pub(crate) struct ChatPanel {
    pub(crate) open: bool,
    pub(crate) input: TextBuffer,
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) sending: bool,
}

impl ChatPanel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start a send if there is something to send and none in flight.
    /// Returns the message text the caller must put on the wire.
    pub(crate) fn begin_send(&mut self) -> Option<String> {
        if self.sending {
            return None;
        }
        let message = self.input.as_str().trim().to_string();
        if message.is_empty() {
            return None;
        }
        self.input.clear();
        self.sending = true;
        self.messages.push(ChatMessage::user(message.clone()));
        Some(message)
    }

    pub(crate) fn complete(&mut self, response: &ChatResponse) {
        self.sending = false;
        self.messages.push(ChatMessage::assistant(
            response.response.clone(),
            response.timestamp,
        ));
    }

    /// Failed send: keep the optimistic user line, surface the error as an
    /// assistant message, and restore the typed text.
    pub(crate) fn fail(&mut self, original: String, detail: String) {
        self.sending = false;
        self.messages.push(ChatMessage::assistant(
            format!("Sorry, something went wrong: {detail}"),
            Utc::now(),
        ));
        self.input.set(original);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn response(text: &str) -> ChatResponse {
        serde_json::from_value(serde_json::json!({
            "response": text,
            "conversation_id": "conv-1",
            "task_updated": false,
            "timestamp": "2025-06-01T09:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn begin_send_appends_user_line_and_clears_input() {
        let mut panel = ChatPanel::new();
        panel.input.set("  add a P1 task  ");
        let message = panel.begin_send().unwrap();
        assert_eq!(message, "add a P1 task");
        assert!(panel.input.is_empty());
        assert!(panel.sending);
        assert_eq!(panel.messages.len(), 1);
        assert_eq!(panel.messages[0].role, ChatRole::User);
    }

    #[test]
    fn blank_or_inflight_input_does_not_send() {
        let mut panel = ChatPanel::new();
        panel.input.set("   ");
        assert_eq!(panel.begin_send(), None);

        panel.input.set("hello");
        panel.begin_send().unwrap();
        panel.input.set("again");
        assert_eq!(panel.begin_send(), None);
    }

    #[test]
    fn complete_appends_the_assistant_reply() {
        let mut panel = ChatPanel::new();
        panel.input.set("hello");
        panel.begin_send().unwrap();
        panel.complete(&response("Done, created it."));
        assert!(!panel.sending);
        assert_eq!(panel.messages.len(), 2);
        assert_eq!(panel.messages[1].role, ChatRole::Assistant);
        assert_eq!(panel.messages[1].content, "Done, created it.");
    }

    #[test]
    fn fail_restores_the_typed_text() {
        let mut panel = ChatPanel::new();
        panel.input.set("add a task");
        let message = panel.begin_send().unwrap();
        panel.fail(message, "connection refused".into());
        assert!(!panel.sending);
        assert_eq!(panel.input.as_str(), "add a task");
        assert_eq!(panel.messages.len(), 2);
        assert!(panel.messages[1].content.contains("connection refused"));
    }
}
