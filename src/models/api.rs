//! Request and response models for the HTTP endpoints.

use crate::models::{ChatMessage, ChatRoute};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
    /// Sessions currently holding a conversation
    pub active_sessions: usize,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// Query parameters for the weather endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherQuery {
    /// City name (e.g., "Paris")
    pub city: Option<String>,
}

/// Query parameters for the dashboard page
#[derive(Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct DashboardQuery {
    pub city: Option<String>,
    /// "forecast" (default) or "chat"
    pub view: Option<String>,
}

/// JSON body for a chat turn
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ChatRequest {
    pub message: String,
}

/// Form body posted by the dashboard's chat box
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ChatForm {
    pub message: String,
}

/// Response model for a chat turn
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ChatResponse {
    pub route: ChatRoute,
    pub candidate_city: Option<String>,
    pub reply: String,
    /// The session's full conversation after this turn
    pub conversation: Vec<ChatMessage>,
}

/// Response model for the chat history endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ChatHistoryResponse {
    pub conversation: Vec<ChatMessage>,
}
