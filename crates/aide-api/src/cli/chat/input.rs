//! Async line input for the chat loop.
//!
//! Wraps `rustyline_async::Readline`. Output written through the returned
//! [`SharedWriter`] is printed above the prompt, so proactive messages can
//! arrive while the user is typing.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

#[derive(Debug)]
pub enum InputEvent {
    /// User submitted a line (trimmed).
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt (Ctrl+C).
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    /// Read one line. Dropping the future keeps the partially typed line.
    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    self.rl.add_history_entry(line.clone());
                }
                InputEvent::Message(line)
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }

    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal before exit.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
