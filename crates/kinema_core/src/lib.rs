//! Kinema Core
//!
//! Foundational types shared by every Kinema crate:
//!
//! - [`NodeHandle`]: generational key identifying a node in a transform store
//! - [`errors`]: the [`KinemaError`] type and [`Result`] alias
//! - [`time`]: frame timing built on a monotonic clock

pub mod errors;
pub mod time;

pub use errors::{KinemaError, Result};
pub use time::{Instant, Timer};

use slotmap::new_key_type;

new_key_type! {
    /// Handle of a node (entity) in a hierarchical transform store.
    pub struct NodeHandle;
}
