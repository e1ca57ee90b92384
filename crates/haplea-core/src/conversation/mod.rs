//! Conversation domain module.
//!
//! - `message`: message and payload types
//! - `log`: append-only, newest-first message store
//! - `renderer`: pure name-to-reply-widget lookup

mod log;
mod message;
mod renderer;

pub use log::ConversationLog;
pub use message::{ConversationMessage, MessageData};
pub use renderer::{RendererTag, select_renderer};
