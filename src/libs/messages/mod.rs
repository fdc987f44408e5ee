//! User-facing messages.
//!
//! Commands never build output strings inline: they pick a [`Message`]
//! variant and hand it to one of the `msg_*` macros.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
