//! Error types for the replysmith protocol layer.

mod provider;
mod store;

pub use provider::*;
pub use store::*;
