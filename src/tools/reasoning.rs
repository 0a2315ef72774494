//! Step-by-step reasoning tool.
//!
//! Wraps the question in a fixed instruction template and asks the session's
//! model to work through it pointwise. No tool-selection machinery is
//! involved; this is a single plain completion.

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm::{ChatMessage, LlmClient};

use super::Tool;

const TEMPLATE: &str = "You are an agent tasked with solving the user's logic and reasoning \
questions. Logically arrive at the solution, and provide a detailed explanation displayed \
pointwise, for the question below.\nQuestion: {question}\nAnswer:";

pub struct Reasoning {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl Reasoning {
    pub fn new(llm: Arc<dyn LlmClient>, model: String) -> Self {
        Self { llm, model }
    }

    fn render_prompt(question: &str) -> String {
        TEMPLATE.replace("{question}", question)
    }
}

#[async_trait]
impl Tool for Reasoning {
    fn name(&self) -> &str {
        "reasoning"
    }

    fn description(&self) -> &str {
        "Answers logic-based and reasoning questions with a step-by-step, pointwise explanation. Input is the question to reason about."
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        let prompt = Self::render_prompt(input.trim());
        let reply = self
            .llm
            .chat(&self.model, &[ChatMessage::user(prompt)])
            .await?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use std::sync::Mutex;

    struct Recording {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmClient for Recording {
        async fn chat(
            &self,
            _model: &str,
            messages: &[ChatMessage],
        ) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push(messages[0].content.clone());
            Ok("1. First point.\n2. Second point.".to_string())
        }
    }

    #[tokio::test]
    async fn wraps_question_in_the_instruction_template() {
        let llm = Arc::new(Recording {
            prompts: Mutex::new(Vec::new()),
        });
        let tool = Reasoning::new(llm.clone(), "gemma2-9b-it".to_string());

        let answer = tool.invoke("Why is the sky blue?").await.unwrap();
        assert!(answer.contains("First point"));

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Question: Why is the sky blue?"));
        assert!(prompts[0].contains("pointwise"));
    }
}
