// src/ui/mod.rs
//! Slate UI - retained-mode widgets for small touchscreens
//!
//! This module provides:
//! - Geometry kernel ([`Rect`], [`Extent`]) shared by every widget
//! - Core traits for drawable and touchable elements
//! - A collapsible tree widget with drag scrolling
//! - A scroll panel that hosts heterogeneous child widgets
//! - Styled leaf components (buttons, labels)
//! - Dirty tracking and observer-based events

pub mod components;
pub mod core;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod layouts;
pub mod scroll;
pub mod styling;
pub mod tree;

// Re-export commonly used items
pub use components::{Button, Label, TextSize};
pub use self::core::{
    Action, ButtonId, Drawable, TouchEvent, TouchPoint, TouchResult, Touchable,
    Widget,
};
pub use error::{UiError, UiResult};
pub use events::{Observers, SubscriptionId, TreeEvent};
pub use geometry::{Extent, Rect};
pub use layouts::{ChildId, ScrollPanel};
pub use scroll::{ScrollDirection, ScrollState};
pub use styling::{BorderRadius, ButtonVariant, ColorPalette, Padding, Style, Theme};
pub use tree::{NodeId, NodeTree, TreeNode, Treeview};
