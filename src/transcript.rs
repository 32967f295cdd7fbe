//! Conversation transcript types
//!
//! The transcript is the in-memory record of the conversation, owned by the
//! application state and projected into the terminal by the renderer. It is
//! append-only except for the single transient "thinking" placeholder, which
//! is shown while a reply is pending and resolved in place when the reply
//! (or an error) arrives.

/// A single entry in the conversation
#[derive(Debug, Clone)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    /// True only for the transient placeholder shown while a reply is pending
    pub thinking: bool,
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn push_user(&mut self, content: &str) {
        self.messages.push(Message {
            sender: Sender::User,
            content: content.to_string(),
            thinking: false,
        });
    }

    pub fn push_bot(&mut self, content: &str) {
        self.messages.push(Message {
            sender: Sender::Bot,
            content: content.to_string(),
            thinking: false,
        });
    }

    /// Append the pending-reply placeholder. Any previous placeholder is
    /// removed first so there is never more than one.
    pub fn push_thinking(&mut self) {
        self.messages.retain(|m| !m.thinking);
        self.messages.push(Message {
            sender: Sender::Bot,
            content: String::new(),
            thinking: true,
        });
    }

    pub fn has_thinking(&self) -> bool {
        self.messages.iter().any(|m| m.thinking)
    }

    /// Turn the placeholder into a real bot message. If no placeholder is
    /// present the content is appended as a new bot message instead.
    pub fn resolve_thinking(&mut self, content: &str) {
        match self.messages.iter_mut().find(|m| m.thinking) {
            Some(message) => {
                message.content = content.to_string();
                message.thinking = false;
            }
            None => self.push_bot(content),
        }
    }
}
