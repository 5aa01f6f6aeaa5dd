//! Collapsible tree widget
//!
//! - [`node`] - arena of expandable, selectable nodes
//! - [`layout`] - depth-first row layout and content extent
//! - [`hit_test`] - point lookup against the last layout
//! - [`treeview`] - the widget: drawing, scrolling and touch dispatch

pub mod layout;
pub mod node;
pub mod treeview;

pub use layout::{FontMetrics, RowMetrics, TreeLayout, VisibleRow};
pub use node::{NodeId, NodeTree, TreeNode};
pub use treeview::Treeview;
