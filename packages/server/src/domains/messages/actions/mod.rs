//! Messaging actions

mod conversations;
mod send_message;

pub use conversations::{get_conversation, list_conversations};
pub use send_message::{send_message, validate_content, MAX_MESSAGE_CHARS};
