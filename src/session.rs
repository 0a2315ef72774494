//! Per-session context and the in-memory session store.
//!
//! A session owns exactly one transcript, one configured model client, and
//! one tool registry; nothing is shared between sessions. The store wraps
//! each session in a mutex so at most one turn is in flight per session.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::agent::{Dispatcher, TurnOutcome};
use crate::api::types::TurnLogEntry;
use crate::config::Config;
use crate::error::TurnError;
use crate::llm::{GroqClient, LlmClient};
use crate::tools::{Calculator, KnowledgeLookup, Reasoning, ToolRegistry};
use crate::transcript::{Message, Transcript, GREETING};

/// Everything a session needs to run turns. Absent when the session was
/// created without a credential.
struct SessionRuntime {
    dispatcher: Dispatcher,
    tools: ToolRegistry,
}

/// One user's conversation: transcript, model client, and tool catalog.
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub transcript: Transcript,
    runtime: Option<SessionRuntime>,
}

impl Session {
    /// Create a session, building its model client and tool registry from
    /// the supplied API key (or the server default from `config`).
    pub fn new(api_key: Option<String>, config: &Config) -> Self {
        let key = api_key.or_else(|| config.api_key.clone());
        let runtime = key.map(|key| {
            let llm: Arc<dyn LlmClient> = Arc::new(GroqClient::new(key));
            Self::build_runtime(llm, config)
        });

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            transcript: Transcript::new(),
            runtime,
        }
    }

    /// Create a session around an injected model client (tests).
    pub fn with_client(llm: Arc<dyn LlmClient>, config: &Config) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            transcript: Transcript::new(),
            runtime: Some(Self::build_runtime(llm, config)),
        }
    }

    fn build_runtime(llm: Arc<dyn LlmClient>, config: &Config) -> SessionRuntime {
        // Registered once here; the catalog is immutable for the session's
        // lifetime. The three names are fixed and distinct, so registration
        // cannot collide.
        let mut tools = ToolRegistry::new();
        tools
            .register(Arc::new(KnowledgeLookup::new()))
            .expect("static tool set");
        tools.register(Arc::new(Calculator)).expect("static tool set");
        tools
            .register(Arc::new(Reasoning::new(
                llm.clone(),
                config.default_model.clone(),
            )))
            .expect("static tool set");

        SessionRuntime {
            dispatcher: Dispatcher::new(
                llm,
                config.default_model.clone(),
                config.max_steps,
                config.parse_retries,
            ),
            tools,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.runtime.is_some()
    }

    /// Run one question/answer turn.
    ///
    /// On success the question and the answer are both appended to the
    /// transcript. On failure the question remains recorded (unless it was
    /// empty or the session has no credential, which halt before any work)
    /// and no assistant message is appended.
    pub async fn ask(&mut self, question: &str) -> Result<(String, Vec<TurnLogEntry>), TurnError> {
        let runtime = self.runtime.as_ref().ok_or(TurnError::MissingCredential)?;

        let question = question.trim();
        if question.is_empty() {
            return Err(TurnError::EmptyQuestion);
        }

        self.transcript.append(Message::user(question));

        let TurnOutcome { answer, log } =
            runtime.dispatcher.run_turn(question, &runtime.tools).await?;

        self.transcript.append(Message::assistant(answer.clone()));
        Ok((answer, log))
    }
}

/// In-memory session store (non-persistent).
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create and register a new session, returning its id and greeting.
    pub async fn create(&self, api_key: Option<String>, config: &Config) -> (Uuid, String) {
        let session = Session::new(api_key, config);
        let id = session.id;
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        (id, GREETING.to_string())
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(&id).cloned()
    }
}
