//! The turn-level dispatch loop.
//!
//! One invocation takes a raw question to a final answer string by
//! alternating between model-directed tool selection and tool execution:
//!
//! 1. Present the question, the scratchpad of prior tool calls, and the
//!    tool catalog to the model
//! 2. Parse the reply as a directive: call a tool, or finish
//! 3. Tool directive: invoke it, fold the result (or failure) into the
//!    scratchpad, go back to 1
//! 4. Final directive: return the answer
//!
//! Unparseable replies are retried within a bounded budget; tool failures
//! never abort the turn.

use std::sync::Arc;

use chrono::Utc;

use crate::api::types::{TurnLogEntry, TurnLogEntryType};
use crate::error::TurnError;
use crate::llm::{ChatMessage, LlmClient};
use crate::tools::ToolRegistry;

use super::directive::{parse_directive, Directive};
use super::prompt::build_system_prompt;

const NUDGE: &str = "Your last reply was not a valid directive. Reply with exactly one JSON \
object: {\"action\": \"tool\", \"tool\": ..., \"input\": ...} or {\"action\": \"final\", \
\"answer\": ...}.";

/// One tool invocation observed during a turn.
#[derive(Debug, Clone)]
pub struct ScratchpadEntry {
    pub tool: String,
    pub input: String,
    /// Tool output, or an "Error: ..." rendering of its failure.
    pub result: String,
}

/// Outcome of a successful turn.
#[derive(Debug)]
pub struct TurnOutcome {
    pub answer: String,
    pub log: Vec<TurnLogEntry>,
}

/// Runs single question/answer turns against a model and a tool catalog.
pub struct Dispatcher {
    llm: Arc<dyn LlmClient>,
    model: String,
    max_steps: usize,
    parse_retries: usize,
}

impl Dispatcher {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        model: String,
        max_steps: usize,
        parse_retries: usize,
    ) -> Self {
        Self {
            llm,
            model,
            max_steps,
            parse_retries,
        }
    }

    /// Run one turn. Produces exactly one answer or exactly one error.
    ///
    /// The question must be non-empty; empty input is rejected before any
    /// model call is made.
    pub async fn run_turn(
        &self,
        question: &str,
        tools: &ToolRegistry,
    ) -> Result<TurnOutcome, TurnError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(TurnError::EmptyQuestion);
        }

        let system_prompt = build_system_prompt(tools);
        let mut scratchpad: Vec<ScratchpadEntry> = Vec::new();
        let mut log: Vec<TurnLogEntry> = Vec::new();
        let mut parse_failures = 0usize;
        let mut nudge = false;

        for step in 0..self.max_steps {
            tracing::debug!(step = step + 1, "Dispatch selection");

            let messages = build_messages(&system_prompt, question, &scratchpad, nudge);
            let reply = self.llm.chat(&self.model, &messages).await?;

            let directive = match parse_directive(&reply) {
                Some(d) => d,
                None => {
                    parse_failures += 1;
                    tracing::warn!(
                        parse_failures,
                        budget = self.parse_retries,
                        "Model reply was not a directive"
                    );
                    if parse_failures > self.parse_retries {
                        log.push(log_entry(
                            TurnLogEntryType::Error,
                            format!("Unparseable model reply after {} attempts", parse_failures),
                        ));
                        return Err(TurnError::ModelParse {
                            attempts: parse_failures,
                        });
                    }
                    nudge = true;
                    continue;
                }
            };
            nudge = false;

            match directive {
                Directive::Final { answer } => {
                    log.push(log_entry(
                        TurnLogEntryType::Response,
                        truncate_for_log(&answer, 2000),
                    ));
                    return Ok(TurnOutcome { answer, log });
                }
                Directive::Tool { tool, input } => {
                    log.push(log_entry(
                        TurnLogEntryType::ToolCall,
                        format!("Calling tool: {} with input: {}", tool, input),
                    ));

                    let result = match tools.get(&tool) {
                        Some(t) => match t.invoke(&input).await {
                            Ok(output) => output,
                            Err(e) => format!("Error: {}", e),
                        },
                        None => format!("Error: no tool named '{}' is available", tool),
                    };

                    log.push(log_entry(
                        TurnLogEntryType::ToolResult,
                        truncate_for_log(&result, 1000),
                    ));
                    scratchpad.push(ScratchpadEntry {
                        tool,
                        input,
                        result,
                    });
                }
            }
        }

        Err(TurnError::StepLimit(self.max_steps))
    }
}

/// Render the selection context: system prompt, question, scratchpad, and an
/// optional corrective nudge after an unparseable reply.
fn build_messages(
    system_prompt: &str,
    question: &str,
    scratchpad: &[ScratchpadEntry],
    nudge: bool,
) -> Vec<ChatMessage> {
    let mut messages = vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(question),
    ];

    for entry in scratchpad {
        messages.push(ChatMessage::assistant(format!(
            r#"{{"action": "tool", "tool": "{}", "input": "{}"}}"#,
            entry.tool, entry.input
        )));
        messages.push(ChatMessage::user(format!("Observation: {}", entry.result)));
    }

    if nudge {
        messages.push(ChatMessage::user(NUDGE));
    }

    messages
}

fn log_entry(entry_type: TurnLogEntryType, content: String) -> TurnLogEntry {
    TurnLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        entry_type,
        content,
    }
}

/// Truncate a string for logging purposes, at a char boundary.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut idx = max_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    format!("{}... [truncated]", &s[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::tools::{Calculator, Tool};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a fixed script of replies and counts calls.
    struct ScriptedLlm {
        replies: Vec<String>,
        calls: AtomicUsize,
    }

    impl ScriptedLlm {
        fn new(replies: Vec<&str>) -> Arc<Self> {
            Arc::new(Self {
                replies: replies.into_iter().map(String::from).collect(),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn chat(
            &self,
            _model: &str,
            _messages: &[ChatMessage],
        ) -> Result<String, LlmError> {
            let i = self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self
                .replies
                .get(i)
                .cloned()
                .unwrap_or_else(|| "out of script".to_string());
            Ok(reply)
        }
    }

    /// Records invocations; used to prove a tool was never touched.
    struct RecordingTool {
        name: &'static str,
        inputs: Mutex<Vec<String>>,
    }

    impl RecordingTool {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                inputs: Mutex::new(Vec::new()),
            })
        }

        fn invocations(&self) -> Vec<String> {
            self.inputs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Tool for RecordingTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "Recording stub"
        }

        async fn invoke(&self, input: &str) -> anyhow::Result<String> {
            self.inputs.lock().unwrap().push(input.to_string());
            Ok(format!("recorded: {}", input))
        }
    }

    fn registry_with_calculator() -> (ToolRegistry, Arc<RecordingTool>) {
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(Calculator)).unwrap();
        let lookup = RecordingTool::new("wikipedia");
        tools.register(lookup.clone()).unwrap();
        (tools, lookup)
    }

    #[tokio::test]
    async fn calculator_turn_produces_final_answer() {
        let llm = ScriptedLlm::new(vec![
            r#"{"action": "tool", "tool": "calculator", "input": "5 * 6"}"#,
            r#"{"action": "final", "answer": "5 * 6 is 30."}"#,
        ]);
        let (tools, lookup) = registry_with_calculator();
        let dispatcher = Dispatcher::new(llm.clone(), "test-model".into(), 10, 3);

        let outcome = dispatcher.run_turn("What is 5 * 6?", &tools).await.unwrap();

        assert!(outcome.answer.contains("30"));
        assert_eq!(llm.call_count(), 2);
        // The calculator saw both operands; the lookup tool was never touched.
        let call = outcome
            .log
            .iter()
            .find(|e| e.entry_type == TurnLogEntryType::ToolCall)
            .unwrap();
        assert!(call.content.contains('5') && call.content.contains('6'));
        let result = outcome
            .log
            .iter()
            .find(|e| e.entry_type == TurnLogEntryType::ToolResult)
            .unwrap();
        assert_eq!(result.content, "30");
        assert!(lookup.invocations().is_empty());
    }

    #[tokio::test]
    async fn empty_question_is_rejected_before_any_model_call() {
        let llm = ScriptedLlm::new(vec![]);
        let (tools, lookup) = registry_with_calculator();
        let dispatcher = Dispatcher::new(llm.clone(), "test-model".into(), 10, 3);

        let err = dispatcher.run_turn("   \n\t ", &tools).await.unwrap_err();
        assert!(matches!(err, TurnError::EmptyQuestion));
        assert_eq!(llm.call_count(), 0);
        assert!(lookup.invocations().is_empty());
    }

    #[tokio::test]
    async fn unparseable_replies_exhaust_the_retry_budget() {
        let llm = ScriptedLlm::new(vec![
            "I would love to help!",
            "still not a directive",
            "nope",
        ]);
        let (tools, lookup) = registry_with_calculator();
        let dispatcher = Dispatcher::new(llm.clone(), "test-model".into(), 10, 2);

        let err = dispatcher.run_turn("What is 2+2?", &tools).await.unwrap_err();

        // One initial attempt plus exactly two retries, zero tool calls.
        assert!(matches!(err, TurnError::ModelParse { attempts: 3 }));
        assert_eq!(llm.call_count(), 3);
        assert!(lookup.invocations().is_empty());
    }

    #[tokio::test]
    async fn tool_failure_is_folded_into_an_observation() {
        let llm = ScriptedLlm::new(vec![
            r#"{"action": "tool", "tool": "calculator", "input": "banana"}"#,
            r#"{"action": "final", "answer": "That is not arithmetic."}"#,
        ]);
        let (tools, _) = registry_with_calculator();
        let dispatcher = Dispatcher::new(llm.clone(), "test-model".into(), 10, 3);

        let outcome = dispatcher.run_turn("calculate banana", &tools).await.unwrap();

        // The failure became a scratchpad observation; the turn still finished.
        let result = outcome
            .log
            .iter()
            .find(|e| e.entry_type == TurnLogEntryType::ToolResult)
            .unwrap();
        assert!(result.content.starts_with("Error:"));
        assert_eq!(outcome.answer, "That is not arithmetic.");
    }

    #[tokio::test]
    async fn unknown_tool_name_does_not_abort_the_turn() {
        let llm = ScriptedLlm::new(vec![
            r#"{"action": "tool", "tool": "crystal_ball", "input": "the future"}"#,
            r#"{"action": "final", "answer": "No such tool, sorry."}"#,
        ]);
        let (tools, _) = registry_with_calculator();
        let dispatcher = Dispatcher::new(llm.clone(), "test-model".into(), 10, 3);

        let outcome = dispatcher.run_turn("scry", &tools).await.unwrap();
        let result = outcome
            .log
            .iter()
            .find(|e| e.entry_type == TurnLogEntryType::ToolResult)
            .unwrap();
        assert!(result.content.contains("crystal_ball"));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn step_limit_bounds_a_tool_happy_model() {
        let llm = ScriptedLlm::new(vec![
            r#"{"action": "tool", "tool": "wikipedia", "input": "a"}"#,
            r#"{"action": "tool", "tool": "wikipedia", "input": "b"}"#,
            r#"{"action": "tool", "tool": "wikipedia", "input": "c"}"#,
        ]);
        let (tools, _) = registry_with_calculator();
        let dispatcher = Dispatcher::new(llm.clone(), "test-model".into(), 3, 3);

        let err = dispatcher.run_turn("loop forever", &tools).await.unwrap_err();
        assert!(matches!(err, TurnError::StepLimit(3)));
        assert_eq!(llm.call_count(), 3);
    }

    #[test]
    fn scratchpad_is_rendered_into_the_selection_context() {
        let scratchpad = vec![ScratchpadEntry {
            tool: "calculator".into(),
            input: "2+2".into(),
            result: "4".into(),
        }];
        let messages = build_messages("system", "question", &scratchpad, false);

        assert_eq!(messages.len(), 4);
        assert!(messages[2].content.contains("calculator"));
        assert_eq!(messages[3].content, "Observation: 4");
    }
}
