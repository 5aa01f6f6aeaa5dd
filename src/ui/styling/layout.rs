//! Layout primitives for consistent spacing and dimensions

// ============================================================================
// Border Radius
// ============================================================================

/// Border radius options for rounded corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderRadius {
    /// No rounding (0px) - sharp corners
    pub none: u32,

    /// Small rounding (4px) - subtle softening
    pub small: u32,

    /// Medium rounding (8px) - standard rounded corners
    pub medium: u32,
}

impl Default for BorderRadius {
    fn default() -> Self {
        Self {
            none: 0,
            small: 4,
            medium: 8,
        }
    }
}

// ============================================================================
// Padding
// ============================================================================

/// Padding around an element (top, right, bottom, left)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Padding {
    /// Creates equal padding on all sides
    pub fn all(value: u32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Creates symmetric padding (vertical and horizontal)
    pub fn symmetric(vertical: u32, horizontal: u32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Returns total horizontal padding (left + right)
    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }
}
