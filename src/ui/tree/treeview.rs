// src/ui/tree/treeview.rs
//! Tree widget with expand/collapse rows, selection and drag scrolling

use alloc::vec::Vec;
use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::PrimitiveStyleBuilder;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use log::{debug, trace};

use super::hit_test::{icon_region, node_at};
use super::layout::{FontMetrics, RowMetrics, VisibleRow, fit_label, layout_tree};
use super::node::{NodeId, NodeTree};
use crate::config::UiConfig;
use crate::ui::core::{Drawable, TouchEvent, TouchPoint, TouchResult, Touchable, Widget};
use crate::ui::error::UiResult;
use crate::ui::events::{Observers, SubscriptionId, TreeEvent};
use crate::ui::geometry::{Extent, Rect};
use crate::ui::gesture::Gesture;
use crate::ui::scroll::{ScrollDirection, ScrollState};
use crate::ui::styling::{Style, Theme};

/// Scrollable tree of labelled, expandable rows
///
/// Rows are laid out on [`Treeview::layout`] (or [`Widget::render`]); touch
/// handling reads the bounds from the most recent layout.
///
/// # Touch Behavior
/// - Pen-down marks the row under the pen
/// - Pen-up on the leading icon of the same row toggles expansion, leaf or not
/// - Pen-up elsewhere on a marked, unselected row selects it
/// - Every pen-up on a row notifies `NodeTapped`, except icon toggles
/// - Dragging past the threshold scrolls instead, and the pen-up is ignored
///
/// # Examples
/// ```ignore
/// let mut view = Treeview::new(Rect::new(0, 0, 240, 200), &FONT_6X10);
/// let docs = view.nodes_mut().add_root("Documents");
/// view.nodes_mut().add_child(docs, "notes.txt")?;
/// view.subscribe(|event| log::info!("{:?}", event));
/// ```
pub struct Treeview {
    bounds: Rect,
    local: Rect,
    tree: NodeTree,
    font: &'static MonoFont<'static>,
    metrics: RowMetrics,
    config: UiConfig,
    theme: Theme,
    text_color: Rgb565,
    selected_text_color: Rgb565,
    scroll: ScrollState,
    rows: Vec<VisibleRow>,
    gesture: Gesture,
    observers: Observers<TreeEvent>,
    focused: bool,
    visible: bool,
    dirty: bool,
}

impl Treeview {
    pub fn new(bounds: Rect, font: &'static MonoFont<'static>) -> Self {
        let config = UiConfig::default();
        let theme = Theme::default();
        let mut view = Self {
            bounds,
            local: bounds,
            tree: NodeTree::new(),
            font,
            metrics: RowMetrics::new(font.line_height(), &config),
            config,
            theme,
            text_color: theme.palette.text_primary,
            selected_text_color: theme.palette.selection,
            scroll: ScrollState::new(Extent::zero(), ScrollDirection::Both),
            rows: Vec::new(),
            gesture: Gesture::Idle,
            observers: Observers::new(),
            focused: false,
            visible: true,
            dirty: true,
        };
        view.scroll.set_viewport(view.inner().extent());
        view
    }

    pub fn with_nodes(mut self, tree: NodeTree) -> Self {
        self.tree = tree;
        self.tree.mark_dirty();
        self
    }

    pub fn with_config(mut self, config: UiConfig) -> Self {
        self.config = config;
        self.metrics = RowMetrics::new(self.font.line_height(), &config);
        self.dirty = true;
        self
    }

    /// Apply a theme, resetting both text colors to the theme's defaults
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self.text_color = theme.palette.text_primary;
        self.selected_text_color = theme.palette.selection;
        self.dirty = true;
        self
    }

    pub fn nodes(&self) -> &NodeTree {
        &self.tree
    }

    /// Structural access to the nodes. Every mutation invalidates the widget.
    pub fn nodes_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.tree.selected()
    }

    pub fn set_selected_node(&mut self, node: Option<NodeId>) -> UiResult<()> {
        self.tree.set_selected(node)
    }

    pub fn metrics(&self) -> RowMetrics {
        self.metrics
    }

    pub fn text_color(&self) -> Rgb565 {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: Rgb565) {
        if self.text_color != color {
            self.text_color = color;
            self.dirty = true;
        }
    }

    pub fn selected_text_color(&self) -> Rgb565 {
        self.selected_text_color
    }

    pub fn set_selected_text_color(&mut self, color: Rgb565) {
        if self.selected_text_color != color {
            self.selected_text_color = color;
            self.dirty = true;
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.dirty = true;
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty = true;
        }
    }

    /// Move or resize the widget. The next layout recomputes row bounds.
    pub fn set_bounds(&mut self, bounds: Rect) {
        let offset = self.bounds.top_left() - self.local.top_left();
        self.local = bounds;
        self.bounds = bounds.translate(offset);
        self.scroll.set_viewport(self.inner().extent());
        self.dirty = true;
    }

    /// Register a callback for tap / expand / collapse notifications
    pub fn subscribe(&mut self, callback: impl FnMut(&TreeEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn scroll_offset(&self) -> Point {
        self.scroll.offset()
    }

    /// Content size published by the last layout
    pub fn content_extent(&self) -> Extent {
        self.scroll.content_extent()
    }

    /// Scroll by `delta`, clamped to the content. Returns the applied delta.
    ///
    /// Cached row bounds move with the content so hit-testing stays correct
    /// without a relayout.
    pub fn scroll_by(&mut self, delta: Point) -> Point {
        let applied = self.scroll.scroll_by(delta);
        if applied != Point::zero() {
            self.shift_rows(Point::zero() - applied);
            debug!("Tree scrolled to {:?}", self.scroll.offset());
        }
        applied
    }

    pub fn scroll_to(&mut self, offset: Point) -> Point {
        self.scroll_by(offset - self.scroll.offset())
    }

    /// Node under a screen point, from the last layout
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        if !self.inner().contains(point) {
            return None;
        }
        node_at(&self.tree, point)
    }

    /// Recompute every row's bounds and the content extent
    pub fn layout(&mut self) {
        let inner = self.inner();
        let mut pass = layout_tree(
            &mut self.tree,
            self.font,
            &self.metrics,
            inner,
            self.scroll.offset(),
        );

        // Content shrank under the current offset: lay out again clamped.
        if self.scroll.set_content_extent(pass.content) != Point::zero() {
            pass = layout_tree(
                &mut self.tree,
                self.font,
                &self.metrics,
                inner,
                self.scroll.offset(),
            );
        }

        debug!(
            "Tree layout: {} visible rows, content {}x{}",
            pass.rows.len(),
            pass.content.width(),
            pass.content.height()
        );
        self.rows = pass.rows;
    }

    /// Area inside the one-pixel frame
    fn inner(&self) -> Rect {
        Rect::new(
            self.bounds.x() + 1,
            self.bounds.y() + 1,
            (self.bounds.width() - 2).max(0),
            (self.bounds.height() - 2).max(0),
        )
    }

    fn shift_rows(&mut self, delta: Point) {
        self.tree.shift_bounds(delta);
        for row in &mut self.rows {
            row.bounds = row.bounds.translate(delta);
        }
        self.dirty = true;
    }

    /// Resolve a pen-up that was not a drag
    fn release_at(&mut self, point: Point) -> UiResult<()> {
        let Some(id) = self.node_at(point) else {
            trace!("Pen up at {:?} hit no row", point);
            return Ok(());
        };
        let Some(node) = self.tree.node(id) else {
            return Ok(());
        };

        let toggle = icon_region(node.bounds(), self.font.line_height());
        if node.is_pen_down() && toggle.contains(point) {
            let expanded = self.tree.toggle_expanded(id)?;
            self.dirty = true;
            let event = if expanded {
                TreeEvent::NodeExpanded(id)
            } else {
                TreeEvent::NodeCollapsed(id)
            };
            trace!("Toggled {:?}: {:?}", id, event);
            self.observers.notify(&event);
            return Ok(());
        }

        // Re-tapping the selected row skips the reset; the pen flags are
        // cleared by the caller either way.
        if !node.is_selected() && node.is_pen_down() {
            self.tree.reset_selection_and_pen();
            self.tree.set_selected(Some(id))?;
            self.dirty = true;
        }
        self.observers
            .notify(&TreeEvent::NodeTapped { node: id, point });
        Ok(())
    }

    fn draw_row<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        row: &VisibleRow,
        right_edge: i32,
    ) -> Result<(), D::Error> {
        let Some(node) = self.tree.node(row.node) else {
            return Ok(());
        };
        let palette = &self.theme.palette;
        let icon = self.metrics.icon_size;
        let origin = row.bounds.top_left();

        if node.has_children() {
            let icon_box = Rect::new(origin.x + 2, origin.y + 2, icon - 4, icon - 4);
            icon_box
                .to_rectangle()
                .into_styled(
                    PrimitiveStyleBuilder::new()
                        .fill_color(palette.icon_fill)
                        .stroke_color(palette.border)
                        .stroke_width(1)
                        .build(),
                )
                .draw(display)?;

            let glyph = if node.is_expanded() { "-" } else { "+" };
            let centered = TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Middle)
                .build();
            Text::with_text_style(
                glyph,
                origin + Point::new(icon / 2, icon / 2),
                MonoTextStyle::new(self.font, palette.icon_glyph),
                centered,
            )
            .draw(display)?;
        }

        let text_x = origin.x + self.metrics.text_offset();
        let label = fit_label(node.label(), right_edge - text_x, self.font);
        if !label.is_empty() {
            let color = if node.is_selected() {
                self.selected_text_color
            } else {
                self.text_color
            };
            let text_y = origin.y + (icon - self.font.line_height()) / 2;
            Text::with_baseline(
                &label,
                Point::new(text_x, text_y),
                MonoTextStyle::new(self.font, color),
                Baseline::Top,
            )
            .draw(display)?;
        }

        Ok(())
    }
}

impl Drawable for Treeview {
    /// Draw the frame, the rows from the last layout and the scrollbars
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        if !self.visible {
            return Ok(());
        }

        let palette = &self.theme.palette;
        self.bounds
            .to_rectangle()
            .into_styled(Style::frame(palette, self.focused).to_primitive_style())
            .draw(display)?;

        let inner = self.inner();
        {
            let mut clipped = display.clipped(&inner.to_rectangle());
            for row in &self.rows {
                self.draw_row(&mut clipped, row, inner.right())?;
            }
        }

        self.scroll.draw_scrollbars(
            display,
            inner,
            self.config.scrollbar_width as u32,
            self.config.min_scrollbar_length as u32,
            palette.scrollbar,
        )
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty || self.tree.is_dirty()
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
        self.tree.mark_clean();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Touchable for Treeview {
    fn contains_point(&self, point: TouchPoint) -> bool {
        self.visible && self.bounds.contains(point.to_point())
    }

    fn handle_touch(&mut self, event: TouchEvent) -> UiResult<TouchResult> {
        match event {
            TouchEvent::Press(point) => {
                if !self.contains_point(point) {
                    return Ok(TouchResult::NotHandled);
                }
                let point = point.to_point();
                self.gesture.press(point);
                if let Some(id) = self.node_at(point) {
                    trace!("Pen down on {:?}", id);
                    self.tree.set_pen_down(id);
                }
                Ok(TouchResult::Handled)
            }
            TouchEvent::Drag(point) => {
                if !self.gesture.is_pen_down() {
                    return Ok(TouchResult::NotHandled);
                }
                let movement = self.gesture.drag(
                    point.to_point(),
                    self.config.drag_threshold as u32,
                    self.scroll.overflows(),
                );
                if let Some(movement) = movement {
                    // Content follows the finger.
                    self.scroll_by(Point::zero() - movement);
                }
                Ok(TouchResult::Handled)
            }
            TouchEvent::Release(point) => {
                if !self.gesture.is_pen_down() {
                    return Ok(TouchResult::NotHandled);
                }
                let ended = self.gesture.release();
                let outcome = if ended.is_dragging() {
                    Ok(())
                } else {
                    self.release_at(point.to_point())
                };
                self.tree.clear_pen();
                outcome.map(|()| TouchResult::Handled)
            }
        }
    }

    fn is_touching(&self) -> bool {
        self.gesture.is_pen_down()
    }
}

impl<D: DrawTarget<Color = Rgb565>> Widget<D> for Treeview {
    fn render(&mut self, display: &mut D) -> Result<(), D::Error> {
        self.layout();
        self.draw(display)?;
        self.mark_clean();
        Ok(())
    }

    fn screen_bounds(&self) -> Rect {
        self.bounds
    }

    fn local_bounds(&self) -> Rect {
        self.local
    }

    fn update_offsets(&mut self, offset: Point) {
        let moved = self.local.translate(offset);
        if moved != self.bounds {
            let delta = moved.top_left() - self.bounds.top_left();
            self.bounds = moved;
            self.shift_rows(delta);
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn needs_redraw(&self) -> bool {
        self.is_dirty()
    }

    fn invalidate(&mut self) {
        self.mark_dirty();
    }

    fn focus(&mut self) {
        self.set_focused(true);
    }

    fn blur(&mut self) {
        self.set_focused(false);
    }
}
