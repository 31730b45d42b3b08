//! Chat domain types.

mod types;

pub use types::{Message, Sender, Session};
