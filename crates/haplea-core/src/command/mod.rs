//! Command domain module.
//!
//! Turns the external classifier's entity bundles into the closed set of
//! executable commands.
//!
//! - `entities`: tolerant wire types for the classifier response
//! - `model`: the `Command` enum and its routing/query descriptors
//! - `resolver`: the total mapping from bundle to command

mod entities;
mod model;
mod resolver;

pub use entities::{DatetimeEntity, DurationEntity, EntityBundle, IntentCandidate};
pub use model::{Command, EntryFilter, RouteDescriptor};
pub use resolver::resolve;
