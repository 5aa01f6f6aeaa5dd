// src/ui/layouts/panel.rs
//! Scrollable container of heterogeneous child widgets

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::RefCell;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::{debug, trace, warn};

use crate::config::UiConfig;
use crate::ui::core::{ButtonId, TouchEvent, TouchPoint, TouchResult, Touchable, Widget};
use crate::ui::error::UiResult;
use crate::ui::geometry::{Extent, Rect};
use crate::ui::gesture::Gesture;
use crate::ui::scroll::{ScrollDirection, ScrollState};
use crate::ui::styling::{Style, Theme};
use crate::ui::tree::hit_test::topmost;

/// Stable handle to a panel child. Never reused within one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildId(u32);

struct PanelChild<D: DrawTarget<Color = Rgb565>> {
    id: ChildId,
    widget: Box<dyn Widget<D>>,
}

/// Container that scrolls its children on two axes
///
/// Children are placed by their local bounds, relative to the panel's content
/// origin. Content may extend to negative local coordinates; the content
/// extent spans from the most negative child origin to the furthest child
/// edge, and scrolling is clamped to it.
///
/// # Touch Routing
/// - Pen-down on a child makes it the active child and forwards the press
/// - Pen-down on empty space blurs the active child
/// - Moves go to a child that holds the pen, otherwise scroll the content
///   once past the drag threshold
/// - Pen-up ends a drag, or goes to the topmost child under the pen and then
///   to every other child still holding the pen, hidden or not
///
/// A child's touch fault is logged and dropped; delivery carries on with the
/// remaining children.
///
/// # Examples
/// ```ignore
/// let mut panel = ScrollPanel::new(Rect::new(0, 0, 320, 240), ScrollDirection::Both);
/// panel.add_child(Label::new(Rect::new(8, 8, 200, 12), "Files", TextSize::Medium));
/// panel.add_child(Treeview::new(Rect::new(8, 24, 300, 400), &FONT_6X10));
/// panel.render(&mut framebuffer)?;
/// ```
pub struct ScrollPanel<D: DrawTarget<Color = Rgb565>> {
    bounds: Rect,
    local: Rect,
    /// Held only while enumerating; dispatch goes through `get_mut`.
    children: Mutex<NoopRawMutex, RefCell<Vec<PanelChild<D>>>>,
    next_id: u32,
    active: Option<ChildId>,
    scroll: ScrollState,
    /// Most negative child origin, never positive
    content_origin: Point,
    gesture: Gesture,
    last_pointer: Option<Point>,
    config: UiConfig,
    theme: Theme,
    style: Style,
    focused: bool,
    visible: bool,
    dirty: bool,
}

impl<D: DrawTarget<Color = Rgb565>> ScrollPanel<D> {
    pub fn new(bounds: Rect, direction: ScrollDirection) -> Self {
        let theme = Theme::default();
        Self {
            bounds,
            local: bounds,
            children: Mutex::new(RefCell::new(Vec::new())),
            next_id: 0,
            active: None,
            scroll: ScrollState::new(bounds.extent(), direction),
            content_origin: Point::zero(),
            gesture: Gesture::Idle,
            last_pointer: None,
            config: UiConfig::default(),
            theme,
            style: Style::new().with_background(theme.palette.background),
            focused: false,
            visible: true,
            dirty: true,
        }
    }

    pub fn with_config(mut self, config: UiConfig) -> Self {
        self.config = config;
        self
    }

    /// Apply a theme and reset the background style to match it
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self.style = Style::new().with_background(theme.palette.background);
        self.dirty = true;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self.dirty = true;
        self
    }

    /// Add a child and position it for the current scroll offset
    pub fn add_child(&mut self, widget: impl Widget<D> + 'static) -> ChildId {
        let id = ChildId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.children_mut().push(PanelChild {
            id,
            widget: Box::new(widget),
        });
        trace!("Panel child {:?} added", id);
        self.update_extent();
        id
    }

    /// Remove a child. Clears the active child if it was the one removed.
    pub fn remove_child(&mut self, id: ChildId) -> Option<Box<dyn Widget<D>>> {
        let children = self.children_mut();
        let index = children.iter().position(|child| child.id == id)?;
        let removed = children.remove(index);
        if self.active == Some(id) {
            self.active = None;
        }
        self.update_extent();
        Some(removed.widget)
    }

    pub fn clear(&mut self) {
        self.children_mut().clear();
        self.active = None;
        self.update_extent();
    }

    pub fn len(&self) -> usize {
        self.children.lock(|children| children.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` against a child, returning `None` if the id is unknown
    pub fn child<R>(&self, id: ChildId, f: impl FnOnce(&dyn Widget<D>) -> R) -> Option<R> {
        self.children.lock(|children| {
            let children = children.borrow();
            children
                .iter()
                .find(|child| child.id == id)
                .map(|child| f(child.widget.as_ref()))
        })
    }

    pub fn child_mut(&mut self, id: ChildId) -> Option<&mut (dyn Widget<D> + 'static)> {
        self.children_mut()
            .iter_mut()
            .find(|child| child.id == id)
            .map(|child| child.widget.as_mut())
    }

    pub fn active_child(&self) -> Option<ChildId> {
        self.active
    }

    /// Change the active child, blurring the old one and focusing the new one
    pub fn set_active_child(&mut self, id: Option<ChildId>) {
        if self.active == id {
            return;
        }
        if let Some(previous) = self.active
            && let Some(widget) = self.child_mut(previous)
        {
            widget.blur();
        }
        self.active = id;
        if let Some(next) = id
            && let Some(widget) = self.child_mut(next)
        {
            widget.focus();
        }
        self.dirty = true;
    }

    pub fn scroll_offset(&self) -> Point {
        self.scroll.offset()
    }

    pub fn content_extent(&self) -> Extent {
        self.scroll.content_extent()
    }

    /// Scroll by `delta`, clamped to the content. Returns the applied delta.
    pub fn scroll_by(&mut self, delta: Point) -> Point {
        let applied = self.scroll.scroll_by(delta);
        if applied != Point::zero() {
            debug!("Panel scrolled to {:?}", self.scroll.offset());
            self.broadcast_offsets();
            self.dirty = true;
        }
        applied
    }

    pub fn scroll_to(&mut self, offset: Point) -> Point {
        self.scroll_by(offset - self.scroll.offset())
    }

    /// Rescan the children for the content extent and reposition them.
    ///
    /// Runs on every render; call it directly after moving children around.
    pub fn update_extent(&mut self) {
        let (min, max) = self.children.lock(|children| {
            children
                .borrow()
                .iter()
                .filter(|child| child.widget.is_visible())
                .map(|child| child.widget.local_bounds())
                .fold((Point::zero(), Point::zero()), |(min, max), b| {
                    (
                        Point::new(min.x.min(b.x()), min.y.min(b.y())),
                        Point::new(max.x.max(b.right()), max.y.max(b.bottom())),
                    )
                })
        });

        let extent = Extent::new(max.x - min.x, max.y - min.y);
        let moved = min != self.content_origin;
        self.content_origin = min;
        let correction = self.scroll.set_content_extent(extent);
        if moved || correction != Point::zero() {
            debug!(
                "Panel content {}x{} from {:?}",
                extent.width(),
                extent.height(),
                min
            );
            self.dirty = true;
        }
        self.broadcast_offsets();
    }

    /// Absolute offset every child adds to its local position
    fn child_offset(&self) -> Point {
        self.bounds.top_left() - self.content_origin - self.scroll.offset()
    }

    fn broadcast_offsets(&mut self) {
        let offset = self.child_offset();
        for child in self.children_mut() {
            child.widget.update_offsets(offset);
        }
    }

    fn children_mut(&mut self) -> &mut Vec<PanelChild<D>> {
        self.children.get_mut().get_mut()
    }

    /// Ids of children matching `pred`, topmost first, hidden ones included
    fn enumerate(&self, pred: impl Fn(&dyn Widget<D>) -> bool) -> Vec<ChildId> {
        self.children.lock(|children| {
            children
                .borrow()
                .iter()
                .rev()
                .filter(|child| pred(child.widget.as_ref()))
                .map(|child| child.id)
                .collect()
        })
    }

    /// Topmost visible child under `point`
    fn hit(&self, point: Point) -> Option<ChildId> {
        self.children.lock(|children| {
            let children = children.borrow();
            topmost(children.as_slice(), point, |child| {
                child
                    .widget
                    .is_visible()
                    .then(|| child.widget.screen_bounds())
            })
            .map(|index| children[index].id)
        })
    }

    /// Hand one event to one child, containing any fault it raises
    fn deliver(&mut self, id: ChildId, event: TouchEvent) -> Option<TouchResult> {
        let widget = self.child_mut(id)?;
        match widget.handle_touch(event) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Panel child {:?} failed on {:?}: {}", id, event, e);
                None
            }
        }
    }

    fn child_is_touching(&self, id: ChildId) -> bool {
        self.child(id, |widget| widget.is_touching())
            .unwrap_or(false)
    }

    fn press(&mut self, point: TouchPoint) -> TouchResult {
        let p = point.to_point();
        self.gesture.press(p);

        match self.hit(p) {
            Some(id) => {
                trace!("Pen down on panel child {:?}", id);
                self.set_active_child(Some(id));
                self.deliver(id, TouchEvent::Press(point));
            }
            None => self.set_active_child(None),
        }
        TouchResult::Handled
    }

    fn drag(&mut self, point: TouchPoint) -> TouchResult {
        let p = point.to_point();
        let event = TouchEvent::Drag(point);

        if !self.gesture.is_dragging()
            && let Some(id) = self.active
            && self.child_is_touching(id)
        {
            self.deliver(id, event);
            return TouchResult::Handled;
        }

        let threshold = self.config.drag_threshold as u32;
        if let Some(movement) = self.gesture.drag(p, threshold, self.scroll.overflows()) {
            // Content follows the finger.
            self.scroll_by(Point::zero() - movement);
            return TouchResult::Handled;
        }

        for id in self.enumerate(|widget| {
            widget.is_touching() || (widget.is_visible() && widget.screen_bounds().contains(p))
        }) {
            self.deliver(id, event);
        }
        TouchResult::Handled
    }

    fn release(&mut self, point: TouchPoint, ended: Gesture) -> TouchResult {
        if ended.is_dragging() {
            self.dirty = true;
            return TouchResult::Handled;
        }

        // Collect every target before delivering; a release drops the pen.
        let hit = self.hit(point.to_point());
        let mut targets: Vec<ChildId> = hit.into_iter().collect();
        targets.extend(
            self.enumerate(|widget| widget.is_touching())
                .into_iter()
                .filter(|id| Some(*id) != hit),
        );

        let mut outcome = TouchResult::Handled;
        for id in targets {
            if let Some(TouchResult::Action(action)) = self.deliver(id, TouchEvent::Release(point)) {
                outcome = TouchResult::Action(action);
            }
        }
        outcome
    }
}

impl<D: DrawTarget<Color = Rgb565>> Touchable for ScrollPanel<D> {
    fn contains_point(&self, point: TouchPoint) -> bool {
        self.visible && self.bounds.contains(point.to_point())
    }

    fn handle_touch(&mut self, event: TouchEvent) -> UiResult<TouchResult> {
        let point = event.point();
        let result = match event {
            TouchEvent::Press(_) if self.contains_point(point) => {
                self.last_pointer = Some(point.to_point());
                self.press(point)
            }
            TouchEvent::Press(_) => TouchResult::NotHandled,
            TouchEvent::Drag(_) if self.gesture.is_pen_down() => {
                self.last_pointer = Some(point.to_point());
                self.drag(point)
            }
            TouchEvent::Drag(_) => TouchResult::NotHandled,
            TouchEvent::Release(_) => {
                let ended = self.gesture.release();
                if ended.is_pen_down() || self.contains_point(point) {
                    self.last_pointer = Some(point.to_point());
                    self.release(point, ended)
                } else {
                    TouchResult::NotHandled
                }
            }
        };
        Ok(result)
    }

    fn is_touching(&self) -> bool {
        self.gesture.is_pen_down()
    }
}

impl<D: DrawTarget<Color = Rgb565>> Widget<D> for ScrollPanel<D> {
    fn render(&mut self, display: &mut D) -> Result<(), D::Error> {
        self.update_extent();
        if !self.visible {
            return Ok(());
        }

        let viewport = self.bounds;
        if self.style.is_visible() {
            viewport
                .to_rectangle()
                .into_styled(self.style.to_primitive_style())
                .draw(display)?;
        }

        // Children draw straight to the target; only those crossing the
        // viewport are rendered.
        for child in self.children_mut() {
            let widget = &mut child.widget;
            if widget.is_visible() && widget.screen_bounds().intersects(&viewport) {
                widget.render(display)?;
            }
        }

        self.scroll.draw_scrollbars(
            display,
            viewport,
            self.config.scrollbar_width as u32,
            self.config.min_scrollbar_length as u32,
            self.theme.palette.scrollbar,
        )?;
        self.dirty = false;
        Ok(())
    }

    fn screen_bounds(&self) -> Rect {
        self.bounds
    }

    fn local_bounds(&self) -> Rect {
        self.local
    }

    /// Move the panel, then pass the new absolute offset down to the children
    fn update_offsets(&mut self, offset: Point) {
        let moved = self.local.translate(offset);
        if moved != self.bounds {
            self.bounds = moved;
            self.dirty = true;
        }
        self.broadcast_offsets();
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
            || self.children.lock(|children| {
                children
                    .borrow()
                    .iter()
                    .any(|child| child.widget.needs_redraw())
            })
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
        self.set_active_child(None);
    }

    /// Active child first, else the topmost child under the last pointer
    fn handle_button(&mut self, button: ButtonId, pressed: bool) -> TouchResult {
        let target = self
            .active
            .or_else(|| self.last_pointer.and_then(|p| self.hit(p)));
        let Some(id) = target else {
            return TouchResult::NotHandled;
        };
        match self.child_mut(id) {
            Some(widget) => widget.handle_button(button, pressed),
            None => TouchResult::NotHandled,
        }
    }

    fn handle_key(&mut self, key: char, pressed: bool) -> TouchResult {
        let Some(id) = self.active else {
            return TouchResult::NotHandled;
        };
        match self.child_mut(id) {
            Some(widget) => widget.handle_key(key, pressed),
            None => TouchResult::NotHandled,
        }
    }
}

impl<D: DrawTarget<Color = Rgb565>> ScrollPanel<D> {
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty = true;
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::ui::components::Button;
    use crate::ui::core::Action;
    use crate::ui::error::UiError;
    use alloc::rc::Rc;

    type Panel = ScrollPanel<FrameBuffer>;

    #[derive(Default)]
    struct SpyLog {
        touches: Vec<(u8, TouchEvent)>,
        renders: Vec<u8>,
        focus: Vec<(u8, bool)>,
        keys: Vec<(u8, char)>,
        buttons: Vec<(u8, ButtonId)>,
    }

    /// Child widget that records what reaches it
    struct Spy {
        tag: u8,
        local: Rect,
        bounds: Rect,
        captures: bool,
        fails: bool,
        touching: bool,
        hides_on_press: bool,
        visible: bool,
        log: Rc<RefCell<SpyLog>>,
    }

    impl Spy {
        fn new(tag: u8, local: Rect, log: &Rc<RefCell<SpyLog>>) -> Self {
            Self {
                tag,
                local,
                bounds: local,
                captures: true,
                fails: false,
                touching: false,
                hides_on_press: false,
                visible: true,
                log: Rc::clone(log),
            }
        }

        fn passive(mut self) -> Self {
            self.captures = false;
            self
        }

        fn failing(mut self) -> Self {
            self.fails = true;
            self
        }

        /// Goes invisible as soon as the pen lands on it, like a popup
        fn hiding(mut self) -> Self {
            self.hides_on_press = true;
            self
        }
    }

    impl Touchable for Spy {
        fn contains_point(&self, point: TouchPoint) -> bool {
            self.bounds.contains(point.to_point())
        }

        fn handle_touch(&mut self, event: TouchEvent) -> UiResult<TouchResult> {
            self.log.borrow_mut().touches.push((self.tag, event));
            match event {
                TouchEvent::Press(_) => {
                    self.touching = self.captures;
                    self.visible = !self.hides_on_press;
                }
                TouchEvent::Release(_) => self.touching = false,
                TouchEvent::Drag(_) => {}
            }
            if self.fails {
                return Err(UiError::ChildFault("spy"));
            }
            Ok(TouchResult::Handled)
        }

        fn is_touching(&self) -> bool {
            self.touching
        }
    }

    impl Widget<FrameBuffer> for Spy {
        fn render(&mut self, display: &mut FrameBuffer) -> Result<(), <FrameBuffer as DrawTarget>::Error> {
            self.log.borrow_mut().renders.push(self.tag);
            display.fill_solid(&self.bounds.to_rectangle(), Rgb565::RED)
        }

        fn screen_bounds(&self) -> Rect {
            self.bounds
        }

        fn local_bounds(&self) -> Rect {
            self.local
        }

        fn update_offsets(&mut self, offset: Point) {
            self.bounds = self.local.translate(offset);
        }

        fn is_visible(&self) -> bool {
            self.visible
        }

        fn needs_redraw(&self) -> bool {
            false
        }

        fn invalidate(&mut self) {}

        fn focus(&mut self) {
            self.log.borrow_mut().focus.push((self.tag, true));
        }

        fn blur(&mut self) {
            self.log.borrow_mut().focus.push((self.tag, false));
        }

        fn handle_button(&mut self, button: ButtonId, _pressed: bool) -> TouchResult {
            self.log.borrow_mut().buttons.push((self.tag, button));
            TouchResult::Handled
        }

        fn handle_key(&mut self, key: char, _pressed: bool) -> TouchResult {
            self.log.borrow_mut().keys.push((self.tag, key));
            TouchResult::Handled
        }
    }

    fn at(x: i32, y: i32) -> TouchPoint {
        TouchPoint::new(x as u16, y as u16)
    }

    fn screen(panel: &Panel, id: ChildId) -> Rect {
        panel.child(id, |widget| widget.screen_bounds()).unwrap()
    }

    /// 100x100 panel at (10, 10) with a tall column of two spies
    fn column() -> (Panel, ChildId, ChildId, Rc<RefCell<SpyLog>>) {
        let log = Rc::new(RefCell::new(SpyLog::default()));
        let mut panel = Panel::new(Rect::new(10, 10, 100, 100), ScrollDirection::Vertical);
        let top = panel.add_child(Spy::new(1, Rect::new(0, 0, 80, 40), &log));
        let bottom = panel.add_child(Spy::new(2, Rect::new(0, 150, 80, 40), &log));
        (panel, top, bottom, log)
    }

    #[test]
    fn test_children_placed_relative_to_panel() {
        let (panel, top, bottom, _) = column();
        assert_eq!(screen(&panel, top), Rect::new(10, 10, 80, 40));
        assert_eq!(screen(&panel, bottom), Rect::new(10, 160, 80, 40));
        assert_eq!(panel.content_extent(), Extent::new(80, 190));
    }

    #[test]
    fn test_scroll_moves_children_and_clamps() {
        let (mut panel, _, bottom, _) = column();
        assert_eq!(panel.scroll_by(Point::new(0, 50)), Point::new(0, 50));
        assert_eq!(screen(&panel, bottom), Rect::new(10, 110, 80, 40));

        assert_eq!(panel.scroll_by(Point::new(0, 500)), Point::new(0, 40));
        assert_eq!(panel.scroll_offset(), Point::new(0, 90));
        assert_eq!(panel.scroll_by(Point::new(0, -500)), Point::new(0, -90));
        assert_eq!(panel.scroll_offset(), Point::zero());
    }

    #[test]
    fn test_negative_child_origin_extends_content() {
        let log = Rc::new(RefCell::new(SpyLog::default()));
        let mut panel = Panel::new(Rect::new(0, 0, 50, 50), ScrollDirection::Both);
        let left = panel.add_child(Spy::new(1, Rect::new(-20, -30, 40, 40), &log));
        panel.add_child(Spy::new(2, Rect::new(10, 10, 40, 40), &log));

        assert_eq!(panel.content_extent(), Extent::new(70, 80));
        assert_eq!(screen(&panel, left), Rect::new(0, 0, 40, 40));
    }

    #[test]
    fn test_update_offsets_is_idempotent() {
        let (mut panel, top, _, _) = column();
        panel.update_offsets(Point::new(5, 5));
        let once = screen(&panel, top);
        panel.update_offsets(Point::new(5, 5));
        panel.update_extent();
        assert_eq!(screen(&panel, top), once);
        assert_eq!(once, Rect::new(15, 15, 80, 40));
    }

    #[test]
    fn test_nested_panel_forwards_offsets() {
        let log = Rc::new(RefCell::new(SpyLog::default()));
        let mut inner = Panel::new(Rect::new(20, 20, 60, 60), ScrollDirection::Both);
        inner.add_child(Spy::new(1, Rect::new(5, 5, 10, 10), &log));

        let mut outer = Panel::new(Rect::new(100, 100, 200, 200), ScrollDirection::Both);
        outer.add_child(Spy::new(2, Rect::new(0, 0, 10, 10), &log));
        let inner_id = outer.add_child(inner);

        assert_eq!(screen(&outer, inner_id), Rect::new(120, 120, 60, 60));
        outer
            .handle_touch(TouchEvent::Press(at(126, 126)))
            .unwrap();
        assert_eq!(log.borrow().touches, [(1, TouchEvent::Press(at(126, 126)))]);
    }

    #[test]
    fn test_press_activates_hit_child() {
        let (mut panel, top, _, log) = column();
        let result = panel.handle_touch(TouchEvent::Press(at(20, 20)));
        assert_eq!(result, Ok(TouchResult::Handled));
        assert_eq!(panel.active_child(), Some(top));
        assert_eq!(log.borrow().focus, [(1, true)]);
        assert_eq!(log.borrow().touches, [(1, TouchEvent::Press(at(20, 20)))]);
    }

    #[test]
    fn test_press_on_empty_space_blurs_active_child() {
        let (mut panel, _, _, log) = column();
        panel.handle_touch(TouchEvent::Press(at(20, 20))).unwrap();
        panel.handle_touch(TouchEvent::Release(at(20, 20))).unwrap();
        panel.handle_touch(TouchEvent::Press(at(100, 80))).unwrap();

        assert_eq!(panel.active_child(), None);
        assert_eq!(log.borrow().focus, [(1, true), (1, false)]);
    }

    #[test]
    fn test_press_outside_panel_is_not_handled() {
        let (mut panel, _, _, log) = column();
        let result = panel.handle_touch(TouchEvent::Press(at(300, 20)));
        assert_eq!(result, Ok(TouchResult::NotHandled));
        assert!(log.borrow().touches.is_empty());
    }

    #[test]
    fn test_drag_scrolls_when_no_child_holds_the_pen() {
        crate::init_test_logging();
        let log = Rc::new(RefCell::new(SpyLog::default()));
        let mut panel = Panel::new(Rect::new(0, 0, 100, 100), ScrollDirection::Vertical);
        panel.add_child(Spy::new(1, Rect::new(0, 0, 100, 300), &log).passive());

        panel.handle_touch(TouchEvent::Press(at(50, 80))).unwrap();
        panel.handle_touch(TouchEvent::Drag(at(50, 60))).unwrap();
        panel.handle_touch(TouchEvent::Drag(at(50, 40))).unwrap();
        panel.handle_touch(TouchEvent::Release(at(50, 40))).unwrap();

        assert_eq!(panel.scroll_offset(), Point::new(0, 40));
        assert_eq!(
            log.borrow().touches,
            [(1, TouchEvent::Press(at(50, 80)))],
            "a drag-scroll swallows the moves and the pen-up"
        );
    }

    #[test]
    fn test_capturing_child_receives_moves() {
        let log = Rc::new(RefCell::new(SpyLog::default()));
        let mut panel = Panel::new(Rect::new(0, 0, 100, 100), ScrollDirection::Vertical);
        panel.add_child(Spy::new(1, Rect::new(0, 0, 100, 300), &log));

        panel.handle_touch(TouchEvent::Press(at(50, 80))).unwrap();
        panel.handle_touch(TouchEvent::Drag(at(50, 20))).unwrap();
        panel.handle_touch(TouchEvent::Release(at(50, 20))).unwrap();

        assert_eq!(panel.scroll_offset(), Point::zero());
        assert_eq!(
            log.borrow().touches,
            [
                (1, TouchEvent::Press(at(50, 80))),
                (1, TouchEvent::Drag(at(50, 20))),
                (1, TouchEvent::Release(at(50, 20))),
            ]
        );
    }

    #[test]
    fn test_moves_without_overflow_go_to_hit_children() {
        let log = Rc::new(RefCell::new(SpyLog::default()));
        let mut panel = Panel::new(Rect::new(10, 10, 100, 100), ScrollDirection::Both);
        panel.add_child(Spy::new(1, Rect::new(0, 0, 80, 40), &log));

        // Pen-down on empty space, then slide onto the child.
        panel.handle_touch(TouchEvent::Press(at(100, 30))).unwrap();
        panel.handle_touch(TouchEvent::Drag(at(30, 30))).unwrap();
        assert_eq!(log.borrow().touches, [(1, TouchEvent::Drag(at(30, 30)))]);
    }

    #[test]
    fn test_child_fault_does_not_stop_delivery() {
        crate::init_test_logging();
        let log = Rc::new(RefCell::new(SpyLog::default()));
        let mut panel = Panel::new(Rect::new(0, 0, 100, 100), ScrollDirection::Both);
        panel.add_child(Spy::new(1, Rect::new(0, 0, 50, 50), &log));
        panel.add_child(Spy::new(2, Rect::new(60, 0, 30, 30), &log).failing());

        // Pen goes down on 1 and comes up over the faulty 2.
        let press = panel.handle_touch(TouchEvent::Press(at(10, 10)));
        assert_eq!(press, Ok(TouchResult::Handled));
        let release = panel.handle_touch(TouchEvent::Release(at(70, 10)));
        assert_eq!(release, Ok(TouchResult::Handled));

        assert_eq!(
            log.borrow().touches,
            [
                (1, TouchEvent::Press(at(10, 10))),
                (2, TouchEvent::Release(at(70, 10))),
                (1, TouchEvent::Release(at(70, 10))),
            ],
            "child under the pen first, then the one holding it"
        );
    }

    #[test]
    fn test_release_skips_covered_children() {
        let log = Rc::new(RefCell::new(SpyLog::default()));
        let mut panel = Panel::new(Rect::new(0, 0, 100, 100), ScrollDirection::Both);
        panel.add_child(Spy::new(1, Rect::new(0, 0, 50, 50), &log).passive());
        panel.add_child(Spy::new(2, Rect::new(0, 0, 50, 50), &log).passive());

        panel.handle_touch(TouchEvent::Press(at(10, 10))).unwrap();
        panel.handle_touch(TouchEvent::Release(at(10, 10))).unwrap();

        assert_eq!(
            log.borrow().touches,
            [
                (2, TouchEvent::Press(at(10, 10))),
                (2, TouchEvent::Release(at(10, 10))),
            ]
        );
    }

    #[test]
    fn test_hidden_child_holding_the_pen_gets_release() {
        let log = Rc::new(RefCell::new(SpyLog::default()));
        let mut panel = Panel::new(Rect::new(0, 0, 100, 100), ScrollDirection::Both);
        let popup = panel.add_child(Spy::new(1, Rect::new(0, 0, 50, 50), &log).hiding());

        panel.handle_touch(TouchEvent::Press(at(10, 10))).unwrap();
        assert!(!panel.child(popup, |widget| widget.is_visible()).unwrap());
        panel.handle_touch(TouchEvent::Release(at(10, 10))).unwrap();

        assert_eq!(
            log.borrow().touches,
            [
                (1, TouchEvent::Press(at(10, 10))),
                (1, TouchEvent::Release(at(10, 10))),
            ]
        );
        assert!(!panel.child(popup, |widget| widget.is_touching()).unwrap());
    }

    #[test]
    fn test_button_action_bubbles_out() {
        let mut panel = Panel::new(Rect::new(0, 0, 100, 100), ScrollDirection::Both);
        panel.add_child(Button::new(Rect::new(10, 10, 50, 20), "Go", Action::Activate(7)));

        panel.handle_touch(TouchEvent::Press(at(20, 15))).unwrap();
        let result = panel.handle_touch(TouchEvent::Release(at(20, 15)));
        assert_eq!(result, Ok(TouchResult::Action(Action::Activate(7))));
    }

    #[test]
    fn test_button_slid_off_gets_cancel_release() {
        let mut panel = Panel::new(Rect::new(0, 0, 100, 100), ScrollDirection::Both);
        panel.add_child(Button::new(Rect::new(10, 10, 50, 20), "Go", Action::Activate(7)));

        panel.handle_touch(TouchEvent::Press(at(20, 15))).unwrap();
        panel.handle_touch(TouchEvent::Drag(at(90, 90))).unwrap();
        let result = panel.handle_touch(TouchEvent::Release(at(90, 90)));
        assert_eq!(result, Ok(TouchResult::Handled));
    }

    #[test]
    fn test_keys_go_to_active_child_only() {
        let (mut panel, top, _, log) = column();
        assert_eq!(panel.handle_key('a', true), TouchResult::NotHandled);

        panel.set_active_child(Some(top));
        assert_eq!(panel.handle_key('a', true), TouchResult::Handled);
        assert_eq!(log.borrow().keys, [(1, 'a')]);
    }

    #[test]
    fn test_buttons_fall_back_to_child_under_pointer() {
        let (mut panel, _, _, log) = column();
        panel.scroll_to(Point::new(0, 90));
        // Pen-down and up on empty space leave no active child.
        panel.handle_touch(TouchEvent::Press(at(100, 90))).unwrap();
        panel.handle_touch(TouchEvent::Release(at(20, 90))).unwrap();
        assert_eq!(panel.active_child(), None);

        assert_eq!(panel.handle_button(ButtonId(3), true), TouchResult::Handled);
        assert_eq!(log.borrow().buttons, [(2, ButtonId(3))]);
    }

    #[test]
    fn test_remove_active_child_clears_it() {
        let (mut panel, top, bottom, _) = column();
        panel.set_active_child(Some(top));
        assert!(panel.remove_child(top).is_some());
        assert_eq!(panel.active_child(), None);
        assert!(panel.remove_child(top).is_none());
        assert_eq!(panel.len(), 1);
        assert_eq!(panel.content_extent(), Extent::new(80, 190));

        panel.remove_child(bottom);
        assert!(panel.is_empty());
        assert_eq!(panel.content_extent(), Extent::zero());
    }

    #[test]
    fn test_render_skips_children_outside_viewport() {
        let (mut panel, _, _, log) = column();
        let mut fb = FrameBuffer::new(Size::new(200, 200));
        panel.render(&mut fb).unwrap();

        assert_eq!(log.borrow().renders, [1]);
        assert_eq!(fb.pixel(Point::new(20, 20)), Some(Rgb565::RED));
        assert!(!panel.needs_redraw());

        panel.scroll_to(Point::new(0, 90));
        panel.render(&mut fb).unwrap();
        assert_eq!(log.borrow().renders, [1, 2]);
    }
}
