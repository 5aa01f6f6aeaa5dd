// src/ui/core.rs
//! Core UI traits and types shared by every widget

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use super::error::UiResult;
use super::geometry::Rect;

/// Represents a 2D touch point on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

impl TouchPoint {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }
}

/// Touch events delivered by the outer event pump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    /// Pen went down at a point
    Press(TouchPoint),
    /// Pen moved while down
    Drag(TouchPoint),
    /// Pen lifted at a point
    Release(TouchPoint),
}

impl TouchEvent {
    pub fn point(&self) -> TouchPoint {
        match self {
            TouchEvent::Press(p) | TouchEvent::Drag(p) | TouchEvent::Release(p) => *p,
        }
    }
}

/// Result from handling a touch event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchResult {
    /// Event was handled by this element
    Handled,
    /// Event was not handled, pass to next element
    NotHandled,
    /// Event triggered an action
    Action(Action),
}

/// Actions that UI elements can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A button with the given id was activated
    Activate(u16),
}

/// Identifier of a hardware button routed through the widget tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonId(pub u8);

/// Trait for any UI element that can be drawn
pub trait Drawable {
    /// Draw the element to the display within the given bounds
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error>;

    /// Get the bounds of this drawable element
    fn bounds(&self) -> Rect;

    /// Check if this element needs to be redrawn
    fn is_dirty(&self) -> bool;

    /// Mark this element as clean (already drawn)
    fn mark_clean(&mut self);

    /// Mark this element as dirty (needs redraw)
    fn mark_dirty(&mut self);
}

/// Trait for UI elements that respond to touch events
pub trait Touchable {
    /// Check if a point is within this element's bounds
    fn contains_point(&self, point: TouchPoint) -> bool;

    /// Handle a touch event.
    ///
    /// An `Err` is a fault inside the element; containers log and drop it
    /// so delivery to siblings continues.
    fn handle_touch(&mut self, event: TouchEvent) -> UiResult<TouchResult>;

    /// True while the element owns an in-progress gesture
    fn is_touching(&self) -> bool {
        false
    }
}

/// A child that can live inside a scrollable container.
///
/// Unlike [`Drawable`] this trait is object safe for a fixed draw target, so
/// containers can hold heterogeneous children as `Box<dyn Widget<D>>`.
pub trait Widget<D>: Touchable
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Lay out if needed, then draw
    fn render(&mut self, display: &mut D) -> Result<(), D::Error>;

    /// Absolute, scroll-adjusted bounds on screen
    fn screen_bounds(&self) -> Rect;

    /// Bounds relative to the parent container's content origin
    fn local_bounds(&self) -> Rect;

    /// Recompute screen position as `local position + offset`.
    ///
    /// Repeated calls with the same offset must leave the widget unchanged.
    fn update_offsets(&mut self, offset: Point);

    fn is_visible(&self) -> bool {
        true
    }

    fn needs_redraw(&self) -> bool;

    fn invalidate(&mut self);

    fn focus(&mut self) {}

    fn blur(&mut self) {}

    fn handle_button(&mut self, _button: ButtonId, _pressed: bool) -> TouchResult {
        TouchResult::NotHandled
    }

    fn handle_key(&mut self, _key: char, _pressed: bool) -> TouchResult {
        TouchResult::NotHandled
    }
}
