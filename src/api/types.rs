//! API request and response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transcript::Message;

/// Request to open a new session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Groq API key for this session (falls back to the server default)
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Response after opening a session.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    /// Unique session identifier
    pub id: Uuid,

    /// The assistant greeting seeded into the transcript
    pub greeting: String,
}

/// Request to ask a question within a session.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    /// The user's question
    pub question: String,
}

/// Response for a completed turn.
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    /// The final answer text
    pub answer: String,

    /// Ordered record of what the turn did
    pub log: Vec<TurnLogEntry>,
}

/// Full transcript of a session.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptResponse {
    /// Session identifier
    pub id: Uuid,

    /// Ordered messages, greeting first
    pub messages: Vec<Message>,
}

/// A single entry in the turn execution log.
#[derive(Debug, Clone, Serialize)]
pub struct TurnLogEntry {
    /// Timestamp (RFC 3339)
    pub timestamp: String,

    /// Entry type
    pub entry_type: TurnLogEntryType,

    /// Content of the entry
    pub content: String,
}

/// Types of turn log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnLogEntryType {
    /// Tool is being called
    ToolCall,
    /// Tool returned a result
    ToolResult,
    /// The turn produced its final answer
    Response,
    /// An error occurred
    Error,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
