//! Pen gesture tracking: tells a tap apart from a drag-scroll

use embedded_graphics::prelude::Point;

/// Where a pen gesture currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    /// No pen on the surface
    #[default]
    Idle,
    /// Pen is down and has not committed to a gesture yet
    PenDown { origin: Point, last: Point },
    /// Pen movement is scrolling content
    DragScroll { last: Point },
}

impl Gesture {
    /// Start a new gesture, discarding whatever was in flight
    pub fn press(&mut self, point: Point) {
        *self = Gesture::PenDown {
            origin: point,
            last: point,
        };
    }

    /// Feed a move sample.
    ///
    /// Returns the finger movement since the previous sample once the gesture
    /// is a drag-scroll. A pen-down only turns into a drag when `can_scroll`
    /// holds and the pen travelled further than `threshold` on either axis.
    pub fn drag(&mut self, point: Point, threshold: u32, can_scroll: bool) -> Option<Point> {
        match *self {
            Gesture::Idle => None,
            Gesture::PenDown { origin, last } => {
                let travel = point - origin;
                let moved_far = travel.x.unsigned_abs() > threshold
                    || travel.y.unsigned_abs() > threshold;

                if can_scroll && moved_far {
                    *self = Gesture::DragScroll { last: point };
                    Some(point - last)
                } else {
                    *self = Gesture::PenDown {
                        origin,
                        last: point,
                    };
                    None
                }
            }
            Gesture::DragScroll { last } => {
                *self = Gesture::DragScroll { last: point };
                Some(point - last)
            }
        }
    }

    /// Finish the gesture and return the state it ended in
    pub fn release(&mut self) -> Gesture {
        core::mem::take(self)
    }

    pub fn is_pen_down(&self) -> bool {
        !matches!(self, Gesture::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Gesture::DragScroll { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_jitter_stays_a_tap() {
        let mut gesture = Gesture::default();
        gesture.press(Point::new(10, 10));
        assert_eq!(gesture.drag(Point::new(12, 13), 4, true), None);
        assert!(!gesture.is_dragging());
        assert!(matches!(gesture.release(), Gesture::PenDown { .. }));
        assert_eq!(gesture, Gesture::Idle);
    }

    #[test]
    fn test_long_move_becomes_drag() {
        let mut gesture = Gesture::default();
        gesture.press(Point::new(10, 10));
        assert_eq!(gesture.drag(Point::new(10, 12), 4, true), None);
        assert_eq!(gesture.drag(Point::new(10, 20), 4, true), Some(Point::new(0, 8)));
        assert_eq!(gesture.drag(Point::new(10, 15), 4, true), Some(Point::new(0, -5)));
        assert!(gesture.release().is_dragging());
    }

    #[test]
    fn test_no_drag_without_overflow() {
        let mut gesture = Gesture::default();
        gesture.press(Point::zero());
        assert_eq!(gesture.drag(Point::new(50, 50), 4, false), None);
        assert!(gesture.is_pen_down());
    }

    #[test]
    fn test_moves_without_press_are_ignored() {
        let mut gesture = Gesture::default();
        assert_eq!(gesture.drag(Point::new(50, 50), 0, true), None);
        assert!(!gesture.is_pen_down());
    }
}
