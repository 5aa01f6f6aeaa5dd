//! Styling system for widgets
//!
//! - [`colors`] - Color constants and palette management
//! - [`layout`] - Padding and border radius
//! - [`style`] - Style configuration and button variants
//! - [`theme`] - Theme combining palette and radii

pub mod colors;
pub mod layout;
pub mod style;
pub mod theme;

pub use colors::ColorPalette;
pub use layout::{BorderRadius, Padding};
pub use style::{ButtonVariant, Style};
pub use theme::Theme;
