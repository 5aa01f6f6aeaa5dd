//! Color definitions and palette management
//!
//! This module provides a comprehensive color system based on RGB565 format,
//! optimized for embedded displays with 16-bit color depth.
//!
//! # RGB565 Format
//! - Red: 5 bits (0-31)
//! - Green: 6 bits (0-63)
//! - Blue: 5 bits (0-31)
//!
//! To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;

// ============================================================================
// Base Colors
// ============================================================================

/// Primary background color - very dark gray-blue
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::new(18 >> 3, 23 >> 2, 24 >> 3);

/// Secondary background/surface color - slightly lighter than background
pub const COLOR_FOREGROUND: Rgb565 = Rgb565::new(26 >> 3, 32 >> 2, 33 >> 3);

/// Border/stroke color - medium gray
pub const COLOR_STROKE: Rgb565 = Rgb565::new(43 >> 3, 55 >> 2, 57 >> 3);

/// Accent used for the focused border and selected rows - bright teal-green
pub const COLOR_ACCENT: Rgb565 = Rgb565::new(95 >> 3, 185 >> 2, 141 >> 3);

/// Secondary accent - moderate green
pub const COLOR_ACCENT_MUTED: Rgb565 = Rgb565::new(76 >> 3, 154 >> 2, 113 >> 3);

/// Error color - muted red
pub const COLOR_ERROR: Rgb565 = Rgb565::new(190 >> 3, 95 >> 2, 95 >> 3);

// ============================================================================
// Text Colors
// ============================================================================

/// Pure white - maximum brightness in RGB565
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Light gray - for secondary text and icon fills
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// Medium gray - for scrollbars and disabled text
pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);

/// Dark gray - for subtle text and icon glyphs
pub const DARK_GRAY: Rgb565 = Rgb565::new(10, 20, 10);

// ============================================================================
// Color Palette
// ============================================================================

/// A cohesive color palette for consistent UI theming.
///
/// Widgets only read from the palette; nothing branches on specific values
/// beyond focused vs. not focused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPalette {
    /// Primary accent color - used for key interactive elements
    pub primary: Rgb565,

    /// Secondary accent color - used for less prominent actions
    pub secondary: Rgb565,

    /// Main background color
    pub background: Rgb565,

    /// Surface color for panels and elevated elements
    pub surface: Rgb565,

    /// Inner fill of list-like widgets (tree rows)
    pub window: Rgb565,

    /// Error and alert color
    pub error: Rgb565,

    /// Primary text color - high contrast
    pub text_primary: Rgb565,

    /// Secondary text color - lower contrast for less important information
    pub text_secondary: Rgb565,

    /// Border color for unfocused outlines
    pub border: Rgb565,

    /// Border of focused widgets and text of selected rows
    pub selection: Rgb565,

    /// Fill of the expand/collapse icon box
    pub icon_fill: Rgb565,

    /// The `+`/`-` glyph inside the icon box
    pub icon_glyph: Rgb565,

    /// Scrollbar thumb
    pub scrollbar: Rgb565,
}

impl Default for ColorPalette {
    /// Returns the default dark theme palette
    fn default() -> Self {
        Self::dark()
    }
}

impl ColorPalette {
    /// Creates a dark theme palette (default)
    pub fn dark() -> Self {
        Self {
            primary: COLOR_ACCENT,
            secondary: COLOR_ACCENT_MUTED,
            background: COLOR_BACKGROUND,
            surface: COLOR_FOREGROUND,
            window: COLOR_BACKGROUND,
            error: COLOR_ERROR,
            text_primary: WHITE,
            text_secondary: LIGHT_GRAY,
            border: COLOR_STROKE,
            selection: COLOR_ACCENT,
            icon_fill: LIGHT_GRAY,
            icon_glyph: DARK_GRAY,
            scrollbar: GRAY,
        }
    }

    /// Creates a light theme palette
    pub fn light() -> Self {
        Self {
            primary: COLOR_ACCENT,
            secondary: COLOR_ACCENT_MUTED,
            background: WHITE,
            surface: LIGHT_GRAY,
            window: WHITE,
            error: COLOR_ERROR,
            text_primary: COLOR_BACKGROUND,
            text_secondary: DARK_GRAY,
            border: COLOR_STROKE,
            selection: COLOR_ACCENT_MUTED,
            icon_fill: LIGHT_GRAY,
            icon_glyph: COLOR_BACKGROUND,
            scrollbar: GRAY,
        }
    }
}
