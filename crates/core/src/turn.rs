//! Conversation turn domain types.
//!
//! A `ConversationTurn` is the value object that flows through the
//! reasoning loop: the user's input, the agent's thoughts and actions,
//! and the observations fed back from tools. Turns are immutable once
//! created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a turn's author in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant (thoughts, actions, final answers)
    Assistant,
    /// Loop-injected context (observations)
    System,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        write!(f, "{s}")
    }
}

/// A single exchange in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who authored this turn
    pub role: Role,

    /// The text content
    pub text: String,

    /// When the turn was created
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a new assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Create a new system turn.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// Render as a `role: text` line for prompt assembly.
    pub fn render(&self) -> String {
        format!("{}: {}", self.role, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_turn() {
        let turn = ConversationTurn::user("Hello, agent!");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.text, "Hello, agent!");
    }

    #[test]
    fn render_uses_lowercase_role() {
        let turn = ConversationTurn::assistant("Thought: hmm");
        assert_eq!(turn.render(), "assistant: Thought: hmm");
    }

    #[test]
    fn turn_serialization_roundtrip() {
        let turn = ConversationTurn::system("Observation: 4");
        let json = serde_json::to_string(&turn).unwrap();
        let back: ConversationTurn = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text, "Observation: 4");
        assert_eq!(back.role, Role::System);
    }
}
