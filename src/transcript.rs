//! Session transcript: the ordered, append-only conversation record.

use serde::{Deserialize, Serialize};

/// Greeting shown as the first transcript entry of every session.
pub const GREETING: &str = "Hi, I am a math chatbot who can answer all your maths problems.";

/// Who produced a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// A single conversation message. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Speaker,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only conversation record, alive for the duration of one session.
///
/// Seeded with an assistant greeting so the transcript is never empty. There
/// is no size cap and no deduplication; ordering is chronological.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The full ordered sequence, greeting first.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_starts_with_greeting() {
        let transcript = Transcript::new();
        let all = transcript.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].role, Speaker::Assistant);
        assert_eq!(all[0].content, GREETING);
    }

    #[test]
    fn append_preserves_order_and_length() {
        let mut transcript = Transcript::new();
        for i in 0..5 {
            transcript.append(Message::user(format!("question {}", i)));
            transcript.append(Message::assistant(format!("answer {}", i)));
        }

        let all = transcript.all();
        assert_eq!(all.len(), 11); // greeting + 5 pairs
        assert_eq!(all[1].content, "question 0");
        assert_eq!(all[2].content, "answer 0");
        assert_eq!(all[9].content, "question 4");
        assert_eq!(all[10].content, "answer 4");
    }

    #[test]
    fn all_is_idempotent_between_appends() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("what is 2+2?"));

        let first: Vec<String> = transcript.all().iter().map(|m| m.content.clone()).collect();
        let second: Vec<String> = transcript.all().iter().map(|m| m.content.clone()).collect();
        assert_eq!(first, second);
    }
}
