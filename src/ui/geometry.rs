//! Integer geometry kernel shared by layout, hit-testing and scrolling
//!
//! `Point` is re-used from embedded-graphics. [`Rect`] and [`Extent`] carry
//! signed dimensions so they can be combined with scroll offsets freely, but a
//! negative width or height is a caller bug and panics on assignment.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use super::error::{UiError, UiResult};

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Rect {
    /// Create a rectangle.
    ///
    /// # Panics
    /// Panics if `width` or `height` is negative.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        assert!(width >= 0, "rect width cannot be negative ({width})");
        assert!(height >= 0, "rect height cannot be negative ({height})");
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Fallible constructor for dimensions that come from outside the crate.
    pub fn try_new(x: i32, y: i32, width: i32, height: i32) -> UiResult<Self> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// The all-zero rectangle, used for "never rendered" / "no overlap".
    pub const fn zero() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }
    }

    pub fn from_origin(origin: Point, extent: Extent) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: extent.width,
            height: extent.height,
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn set_x(&mut self, x: i32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    /// # Panics
    /// Panics if `width` is negative.
    pub fn set_width(&mut self, width: i32) {
        assert!(width >= 0, "rect width cannot be negative ({width})");
        self.width = width;
    }

    /// # Panics
    /// Panics if `height` is negative.
    pub fn set_height(&mut self, height: i32) {
        assert!(height >= 0, "rect height cannot be negative ({height})");
        self.height = height;
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn extent(&self) -> Extent {
        Extent {
            width: self.width,
            height: self.height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// True when the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Same size, moved by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }

    /// Smallest rectangle covering both operands.
    ///
    /// A zero-width operand counts as empty and is replaced outright by the
    /// other one, so accumulation can start from [`Rect::zero`].
    pub fn combine(&self, other: &Rect) -> Rect {
        if self.width == 0 {
            return *other;
        }
        if other.width == 0 {
            return *self;
        }

        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());

        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Strict overlap test. Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.x >= self.right()
            || other.right() <= self.x
            || other.y >= self.bottom()
            || other.bottom() <= self.y)
    }

    /// Overlapping area, or [`Rect::zero`] when the operands do not intersect.
    pub fn intersect(&self, other: &Rect) -> Rect {
        if !self.intersects(other) {
            return Rect::zero();
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let width = self.right().min(other.right()) - x;
        let height = self.bottom().min(other.bottom()) - y;

        Rect::new(x, y, width, height)
    }

    /// Inclusive containment: points on the right and bottom edge are inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle::new(
            self.top_left(),
            Size::new(self.width as u32, self.height as u32),
        )
    }
}

impl From<Rectangle> for Rect {
    fn from(rectangle: Rectangle) -> Self {
        Self::new(
            rectangle.top_left.x,
            rectangle.top_left.y,
            rectangle.size.width as i32,
            rectangle.size.height as i32,
        )
    }
}

impl core::fmt::Display for Rect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{{{}, {}, {}, {}}}", self.x, self.y, self.width, self.height)
    }
}

/// Width and height of an area, never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Extent {
    width: i32,
    height: i32,
}

impl Extent {
    /// # Panics
    /// Panics if `width` or `height` is negative.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width >= 0, "extent width cannot be negative ({width})");
        assert!(height >= 0, "extent height cannot be negative ({height})");
        Self { width, height }
    }

    pub fn try_new(width: i32, height: i32) -> UiResult<Self> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        Ok(Self { width, height })
    }

    pub const fn zero() -> Self {
        Self {
            width: 0,
            height: 0,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// # Panics
    /// Panics if the result would be negative.
    pub fn grow(&mut self, add_width: i32, add_height: i32) {
        *self = Self::new(self.width + add_width, self.height + add_height);
    }

    /// Reduce both dimensions, stopping at zero.
    pub fn shrink(&mut self, sub_width: i32, sub_height: i32) {
        self.width = (self.width - sub_width).max(0);
        self.height = (self.height - sub_height).max(0);
    }

    pub fn to_size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl From<Size> for Extent {
    fn from(size: Size) -> Self {
        Self::new(size.width as i32, size.height as i32)
    }
}

fn check_dimension(axis: &'static str, value: i32) -> UiResult<()> {
    if value < 0 {
        Err(UiError::NegativeDimension { axis, value })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive_on_far_edges() {
        let rect = Rect::new(10, 20, 30, 40);
        assert!(rect.contains(Point::new(10, 20)), "top-left corner is inside");
        assert!(rect.contains(Point::new(40, 60)), "bottom-right corner is inside");
        assert!(!rect.contains(Point::new(41, 60)), "one pixel right is outside");
        assert!(!rect.contains(Point::new(9, 20)), "one pixel left is outside");
    }

    #[test]
    fn test_edge_sharing_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        let c = Rect::new(0, 10, 10, 10);
        assert!(!a.intersects(&b), "touching on the right edge");
        assert!(!a.intersects(&c), "touching on the bottom edge");
        assert!(a.contains(b.top_left()), "containment still accepts the shared edge");
    }

    #[test]
    fn test_intersect_overlap_and_disjoint() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Rect::new(5, 5, 5, 5));

        let far = Rect::new(50, 50, 5, 5);
        assert_eq!(a.intersect(&far), Rect::zero());
        assert!(a.intersect(&far).is_empty());
    }

    #[test]
    fn test_combine_replaces_zero_width_seed() {
        let seed = Rect::new(100, 100, 0, 50);
        let row = Rect::new(0, 0, 20, 10);
        assert_eq!(seed.combine(&row), row, "zero-width seed must not stretch bounds");
        assert_eq!(row.combine(&seed), row);

        let other = Rect::new(30, -5, 10, 10);
        assert_eq!(row.combine(&other), Rect::new(0, -5, 40, 15));
    }

    #[test]
    fn test_translate_keeps_size() {
        let rect = Rect::new(1, 2, 3, 4).translate(Point::new(-5, 10));
        assert_eq!(rect, Rect::new(-4, 12, 3, 4));
    }

    #[test]
    #[should_panic(expected = "width cannot be negative")]
    fn test_negative_width_panics() {
        let _ = Rect::new(0, 0, -1, 5);
    }

    #[test]
    #[should_panic(expected = "height cannot be negative")]
    fn test_negative_height_setter_panics() {
        let mut rect = Rect::new(0, 0, 1, 1);
        rect.set_height(-3);
    }

    #[test]
    fn test_try_new_reports_axis() {
        assert_eq!(
            Rect::try_new(0, 0, 4, -2),
            Err(UiError::NegativeDimension {
                axis: "height",
                value: -2
            })
        );
        assert!(Extent::try_new(3, 3).is_ok());
    }

    #[test]
    fn test_extent_shrink_saturates() {
        let mut extent = Extent::new(10, 4);
        extent.shrink(3, 9);
        assert_eq!(extent, Extent::new(7, 0));
        extent.grow(1, 2);
        assert_eq!(extent, Extent::new(8, 2));
    }

    #[test]
    fn test_rectangle_conversion() {
        let rect = Rect::new(-3, 4, 12, 8);
        assert_eq!(Rect::from(rect.to_rectangle()), rect);
    }
}
