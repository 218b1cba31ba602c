//! Debate messages

pub mod entities;

pub use entities::{Message, MessageKind};
