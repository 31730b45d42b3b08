//! Storage abstraction for chat sessions and messages.
//!
//! Backends implement [`SessionRepository`] and [`MessageRepository`];
//! every operation is stateless and maps to one or two store requests.

mod error;
mod traits;

pub use error::{RepositoryError, Result};
pub use traits::{MessageRepository, SessionRepository};
