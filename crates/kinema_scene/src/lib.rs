//! Kinema Scene
//!
//! A hierarchical transform store implementing
//! [`TransformStore`](kinema_animation::TransformStore):
//!
//! - [`Node`]: name, hierarchy links, transform and morph weights
//! - [`Transform`]: TRS with cached matrices and dirty checking
//! - [`Scene`]: node storage behind a `parking_lot` lock with atomic commits
//! - [`transform_system`]: world-matrix propagation

pub mod node;
pub mod transform;
pub mod transform_system;
pub mod scene;

pub use node::Node;
pub use transform::Transform;
pub use scene::{Scene, SceneGraph};
