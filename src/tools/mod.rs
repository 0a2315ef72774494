//! Tool catalog exposed to the dispatch loop.
//!
//! Each tool is a named, described capability the model may choose to invoke
//! mid-turn. Tools take a single text input and return text; failures bubble
//! up as `Err` and are folded into the turn scratchpad, never panics.

mod calculator;
mod reasoning;
mod wikipedia;

pub use calculator::{Calculator, EvaluationError};
pub use reasoning::Reasoning;
pub use wikipedia::{KnowledgeLookup, LookupError};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// A capability the model can invoke during a turn.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique identifier used in model directives.
    fn name(&self) -> &str;

    /// Natural-language description shown to the model for tool selection.
    fn description(&self) -> &str;

    /// Run the tool on a free-text input.
    async fn invoke(&self, input: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("A tool named '{0}' is already registered")]
    DuplicateName(String),
}

/// Fixed catalog of tools, registered once per session and immutable after.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool. Names must be unique within the registry.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        if self.tools.iter().any(|t| t.name() == tool.name()) {
            return Err(RegistryError::DuplicateName(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by its directive name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// (name, description) pairs for prompt building, in registration order.
    pub fn catalog(&self) -> Vec<(&str, &str)> {
        self.tools
            .iter()
            .map(|t| (t.name(), t.description()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
