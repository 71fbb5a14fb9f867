//! Conversation history for multi-turn chat.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of turns kept: five question/answer pairs.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// A capped, chronologically ordered window of turns owned by one session.
///
/// Turns are only ever appended as user/assistant pairs, so with an even
/// limit the window always starts on a user turn.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: VecDeque<Turn>,
    limit: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl ConversationHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(limit + 2),
            limit,
        }
    }

    /// Append a question and its answer, then drop the oldest turns beyond the limit.
    pub fn record_turn(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push_back(Turn {
            role: Role::User,
            content: question.into(),
        });
        self.turns.push_back(Turn {
            role: Role::Assistant,
            content: answer.into(),
        });

        while self.turns.len() > self.limit {
            self.turns.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Render as `role: content` lines, oldest first.
    pub fn to_prompt_text(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
