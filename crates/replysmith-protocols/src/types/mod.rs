//! Common types shared across the replysmith pipeline.

mod analysis;
mod message;
mod post;
mod result;
mod settings;
mod style;

pub use analysis::*;
pub use message::*;
pub use post::*;
pub use result::*;
pub use settings::*;
pub use style::*;
