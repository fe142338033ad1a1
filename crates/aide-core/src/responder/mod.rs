//! Responder port: turns a message window into reply text.

pub mod box_responder;
pub mod port;

pub use box_responder::BoxResponder;
pub use port::Responder;
