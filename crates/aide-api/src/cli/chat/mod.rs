//! Interactive chat: slash commands, markdown rendering and proactive
//! messages printed above the prompt. Entry point:
//! [`loop_runner::run_chat_loop`].

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
pub mod views;
