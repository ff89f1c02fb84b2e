//! Core types shared between the graph-assembly API and the runtime: logical
//! time and the generational keys used to address reactor components.

pub mod keys;
pub mod time;

pub use keys::{ActionKey, PortKey, ReactionKey, ReactorKey};
pub use time::{Tag, Timestamp};
