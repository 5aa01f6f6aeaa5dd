// src/ui/scroll.rs
//! Scroll offset bookkeeping shared by scrollable widgets
//!
//! Tracks the viewport, the total content extent and the current offset, and
//! keeps `offset ∈ [0, max(0, content - viewport)]` on both axes.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle};
use log::debug;

use super::geometry::{Extent, Rect};

/// Direction that can be scrolled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Vertical,
    Horizontal,
    Both,
}

/// Scroll offset, content extent and viewport size of one container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    offset: Point,
    content: Extent,
    viewport: Extent,
    direction: ScrollDirection,
}

impl ScrollState {
    pub fn new(viewport: Extent, direction: ScrollDirection) -> Self {
        Self {
            offset: Point::zero(),
            content: Extent::zero(),
            viewport,
            direction,
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn content_extent(&self) -> Extent {
        self.content
    }

    pub fn viewport(&self) -> Extent {
        self.viewport
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    /// Resize the viewport. Returns the offset correction applied by clamping.
    pub fn set_viewport(&mut self, viewport: Extent) -> Point {
        self.viewport = viewport;
        self.constrain()
    }

    /// Publish a new content extent. Returns the offset correction applied by
    /// clamping (non-zero when content shrank under the current offset).
    pub fn set_content_extent(&mut self, content: Extent) -> Point {
        if self.content != content {
            debug!(
                "Content extent {}x{} -> {}x{}",
                self.content.width(),
                self.content.height(),
                content.width(),
                content.height()
            );
            self.content = content;
        }
        self.constrain()
    }

    /// Largest offset allowed on each axis
    pub fn max_scroll(&self) -> Point {
        let x = if self.scrolls_horizontally() {
            (self.content.width() - self.viewport.width()).max(0)
        } else {
            0
        };
        let y = if self.scrolls_vertically() {
            (self.content.height() - self.viewport.height()).max(0)
        } else {
            0
        };
        Point::new(x, y)
    }

    /// Scroll by a requested delta and return the delta actually applied.
    ///
    /// Each axis is clamped independently to the remaining scroll room.
    pub fn scroll_by(&mut self, delta: Point) -> Point {
        let max = self.max_scroll();
        let previous = self.offset;
        self.offset = Point::new(
            (previous.x + delta.x).clamp(0, max.x),
            (previous.y + delta.y).clamp(0, max.y),
        );
        self.offset - previous
    }

    /// Scroll to an absolute offset, clamped. Returns the applied delta.
    pub fn scroll_to(&mut self, offset: Point) -> Point {
        self.scroll_by(offset - self.offset)
    }

    fn constrain(&mut self) -> Point {
        self.scroll_by(Point::zero())
    }

    fn scrolls_vertically(&self) -> bool {
        matches!(self.direction, ScrollDirection::Vertical | ScrollDirection::Both)
    }

    fn scrolls_horizontally(&self) -> bool {
        matches!(self.direction, ScrollDirection::Horizontal | ScrollDirection::Both)
    }

    /// Check if content can scroll vertically
    pub fn can_scroll_vertical(&self) -> bool {
        self.scrolls_vertically() && self.content.height() > self.viewport.height()
    }

    pub fn can_scroll_horizontal(&self) -> bool {
        self.scrolls_horizontally() && self.content.width() > self.viewport.width()
    }

    /// True when the content overflows the viewport on any scrollable axis
    pub fn overflows(&self) -> bool {
        self.can_scroll_vertical() || self.can_scroll_horizontal()
    }

    /// Draw scrollbar indicators along the right and bottom edge of `area`
    pub fn draw_scrollbars<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        area: Rect,
        bar_width: u32,
        min_length: u32,
        color: Rgb565,
    ) -> Result<(), D::Error> {
        let max = self.max_scroll();
        let style = PrimitiveStyleBuilder::new().fill_color(color).build();

        if self.can_scroll_vertical() {
            let viewport_height = self.viewport.height() as u32;
            let content_height = self.content.height() as u32;
            let bar_height = ((viewport_height * viewport_height) / content_height)
                .max(min_length)
                .min(viewport_height);
            let travel = (viewport_height - bar_height) as i32;
            let bar_y = area.y() + travel * self.offset.y / max.y.max(1);

            Rectangle::new(
                Point::new(area.right() - bar_width as i32, bar_y),
                Size::new(bar_width, bar_height),
            )
            .into_styled(style)
            .draw(display)?;
        }

        if self.can_scroll_horizontal() {
            let viewport_width = self.viewport.width() as u32;
            let content_width = self.content.width() as u32;
            let bar_length = ((viewport_width * viewport_width) / content_width)
                .max(min_length)
                .min(viewport_width);
            let travel = (viewport_width - bar_length) as i32;
            let bar_x = area.x() + travel * self.offset.x / max.x.max(1);

            Rectangle::new(
                Point::new(bar_x, area.bottom() - bar_width as i32),
                Size::new(bar_length, bar_width),
            )
            .into_styled(style)
            .draw(display)?;
        }

        Ok(())
    }
}
