//! Bounded conversation log with a fixed system preamble.
//!
//! `ConversationStore` keeps one system message plus at most `max_history`
//! user/assistant turns. Appending past capacity evicts the oldest turn, so
//! the window handed to a responder never grows without bound.

use std::collections::VecDeque;

use aide_types::message::{Message, MessageRole};

/// Ordered, FIFO-bounded message log.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    system: Message,
    history: VecDeque<Message>,
    max_history: usize,
}

impl ConversationStore {
    pub fn new(system_prompt: impl Into<String>, max_history: usize) -> Self {
        Self {
            system: Message::system(system_prompt),
            history: VecDeque::with_capacity(max_history.saturating_add(1)),
            max_history,
        }
    }

    /// Append a turn, evicting the oldest ones once capacity is exceeded.
    ///
    /// The system preamble is replaced through [`ConversationStore::reset`],
    /// not appended; any role passed here is stored as a regular turn.
    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) {
        self.history.push_back(Message::new(role, content));
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    /// The full window: system message first, then retained turns in order.
    ///
    /// Returns an owned copy; callers cannot reach the internal log.
    pub fn snapshot(&self) -> Vec<Message> {
        let mut window = Vec::with_capacity(self.history.len() + 1);
        window.push(self.system.clone());
        window.extend(self.history.iter().cloned());
        window
    }

    /// Replace the system preamble and drop all turns.
    pub fn reset(&mut self, system_prompt: impl Into<String>) {
        self.system = Message::system(system_prompt);
        self.history.clear();
    }

    pub fn system(&self) -> &Message {
        &self.system
    }

    /// Retained turns, oldest first (system message excluded).
    pub fn history(&self) -> impl Iterator<Item = &Message> {
        self.history.iter()
    }

    /// Number of retained turns (system message excluded).
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }
}
