//! Chat conversation models.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// A single entry in the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// Path a chat turn took through the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "snake_case")]
pub enum ChatRoute {
    /// A capitalized phrase was found and looked up as a city
    CityLookup,
    /// No candidate city; the message went to the text generator
    FreeForm,
}

impl ChatRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRoute::CityLookup => "city_lookup",
            ChatRoute::FreeForm => "free_form",
        }
    }
}

/// Append-only conversation for one session
///
/// Messages are only ever added in user/assistant pairs; there is no way to
/// remove or clear them. The log is dropped together with its session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one exchange: the user's message followed by the reply
    pub fn record_turn(&mut self, user_text: impl Into<String>, reply: impl Into<String>) {
        self.messages.push(ChatMessage::user(user_text));
        self.messages.push(ChatMessage::assistant(reply));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
