//! Command handling module.
//!
//! Parses inbound messages and builds the replies the bot sends back.

mod handler;
mod types;

pub use handler::{CommandDispatcher, ReplySender};
pub use types::{BotCommand, IncomingMessage, OutgoingReply, OutlinkButton};
