//! Global theme management
//!
//! Bundles the palette and corner radii that widgets read when drawing.

use super::colors::ColorPalette;
use super::layout::BorderRadius;

/// Global theme configuration
///
/// # Examples
///
/// ```ignore
/// let tree = Treeview::new(bounds, &FONT_6X10).with_theme(Theme::light());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Theme {
    /// The active color palette (dark or light)
    pub palette: ColorPalette,

    /// Border radius options for rounded corners
    pub border_radius: BorderRadius,
}

impl Theme {
    /// Dark palette, standard radii (the default)
    pub fn dark() -> Self {
        Self {
            palette: ColorPalette::dark(),
            border_radius: BorderRadius::default(),
        }
    }

    /// Light palette, standard radii
    pub fn light() -> Self {
        Self {
            palette: ColorPalette::light(),
            border_radius: BorderRadius::default(),
        }
    }
}
