//! Host shell boundary: message formats, the outbound bridge and user dialogs.

pub mod bridge;
pub mod message;
pub mod prompt;

pub use bridge::{ChannelBridge, HostBridge};
pub use message::{HostRequest, HostUpdate, Inbound};
pub use prompt::{LinePrompt, Prompt};
