//! Navigable tree over a scan result

pub mod model;
pub mod state;

pub use model::{NodeId, TreeModel, TreeNode};
pub use state::{StateKey, TreeState};
