//! # Math Assistant
//!
//! A session-based assistant that routes natural-language questions to one of
//! three capabilities — Wikipedia lookup, arithmetic evaluation, or
//! step-by-step reasoning — with a hosted model (Groq) both picking the tool
//! and narrating the final answer.
//!
//! ## Architecture
//!
//! Each turn runs an explicit dispatch loop:
//! 1. Present the question, the scratchpad of prior tool calls, and the tool
//!    catalog to the model
//! 2. Parse the reply as a JSON directive: call a tool, or finish
//! 3. Execute the tool, fold the observation back in, and repeat
//!
//! Sessions are isolated: one transcript, one model client, and one tool
//! registry each, held in an in-memory store behind the HTTP API.
//!
//! ## Example
//!
//! ```rust,ignore
//! use math_assistant::{api, config::Config};
//!
//! let config = Config::from_env()?;
//! api::serve(config).await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod tools;
pub mod transcript;

pub use config::Config;
