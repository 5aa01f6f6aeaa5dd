//! Style configuration for UI elements
//!
//! Provides the core `Style` struct and builder methods for defining the
//! visual appearance of widgets (colors, borders, padding).

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder};

use super::colors::{ColorPalette, WHITE};
use super::layout::Padding;

// ============================================================================
// Style
// ============================================================================

/// Visual style configuration for a UI element
///
/// # Examples
///
/// ```ignore
/// let frame = Style::new()
///     .with_background(palette.window)
///     .with_border(palette.border, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Background fill color (if any)
    pub background_color: Option<Rgb565>,

    /// Foreground/text color (if any)
    pub foreground_color: Option<Rgb565>,

    /// Border color (if any)
    pub border_color: Option<Rgb565>,

    /// Border width in pixels (0 = no border)
    pub border_width: u32,

    /// Internal padding around content
    pub padding: Padding,
}

impl Default for Style {
    /// White text, no background, no border
    fn default() -> Self {
        Self {
            background_color: None,
            foreground_color: Some(WHITE),
            border_color: None,
            border_width: 0,
            padding: Padding::default(),
        }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outline of a list widget: selection color while focused, border
    /// color otherwise, over the window fill.
    pub fn frame(palette: &ColorPalette, focused: bool) -> Self {
        let border = if focused {
            palette.selection
        } else {
            palette.border
        };
        Self::new()
            .with_background(palette.window)
            .with_border(border, 1)
    }

    pub fn with_background(mut self, color: Rgb565) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_foreground(mut self, color: Rgb565) -> Self {
        self.foreground_color = Some(color);
        self
    }

    /// Sets the border color and width. A width of 0 disables the border.
    pub fn with_border(mut self, color: Rgb565, width: u32) -> Self {
        self.border_color = Some(color);
        self.border_width = width;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// True when drawing this style would put pixels on screen
    pub fn is_visible(&self) -> bool {
        self.background_color.is_some() || (self.border_color.is_some() && self.border_width > 0)
    }

    /// Converts this style to a `PrimitiveStyle` for embedded-graphics drawing
    pub fn to_primitive_style(&self) -> PrimitiveStyle<Rgb565> {
        let mut builder = PrimitiveStyleBuilder::new();

        if let Some(bg) = self.background_color {
            builder = builder.fill_color(bg);
        }

        if let Some(border) = self.border_color
            && self.border_width > 0
        {
            builder = builder.stroke_color(border).stroke_width(self.border_width);
        }

        builder.build()
    }
}

// ============================================================================
// Button Variants
// ============================================================================

/// Predefined button looks derived from the active palette
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonVariant {
    /// Filled with the primary accent
    Primary,

    /// Filled with the secondary accent
    Secondary,

    /// Surface fill with a border
    Outline,
}

impl ButtonVariant {
    pub fn to_style(&self, palette: &ColorPalette) -> Style {
        match self {
            ButtonVariant::Primary => Style::new()
                .with_background(palette.primary)
                .with_foreground(WHITE)
                .with_padding(Padding::symmetric(8, 16)),

            ButtonVariant::Secondary => Style::new()
                .with_background(palette.secondary)
                .with_foreground(WHITE)
                .with_padding(Padding::symmetric(8, 16)),

            ButtonVariant::Outline => Style::new()
                .with_background(palette.surface)
                .with_foreground(palette.text_primary)
                .with_border(palette.border, 2)
                .with_padding(Padding::symmetric(8, 16)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_border_follows_focus() {
        let palette = ColorPalette::dark();
        assert_eq!(Style::frame(&palette, true).border_color, Some(palette.selection));
        assert_eq!(Style::frame(&palette, false).border_color, Some(palette.border));
    }

    #[test]
    fn test_zero_width_border_is_invisible() {
        let style = Style::new().with_border(WHITE, 0);
        assert!(!style.is_visible());
        assert!(Style::new().with_background(WHITE).is_visible());
    }
}
