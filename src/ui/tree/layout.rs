//! Row layout for the tree widget
//!
//! Walks the expanded path depth-first, assigns every visible-path node its
//! screen bounds and reports the content extent. Bounds are computed for
//! every row on the expanded path; only rows crossing the viewport are handed
//! back for drawing.

use alloc::vec::Vec;
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::prelude::Point;

use super::node::{NodeId, NodeTree};
use crate::config::UiConfig;
use crate::ui::geometry::{Extent, Rect};

/// Maximum number of bytes of a label drawn on one row
pub const LABEL_DRAW_CAPACITY: usize = 64;

const ELLIPSIS: &str = "...";

/// Text measurement used by layout
pub trait FontMetrics {
    /// Pixel size of `text` on a single line
    fn measure(&self, text: &str) -> Extent;

    /// Height of one line of text
    fn line_height(&self) -> i32;
}

impl FontMetrics for MonoFont<'_> {
    fn measure(&self, text: &str) -> Extent {
        let chars = text.chars().count() as i32;
        let width = if chars == 0 {
            0
        } else {
            chars * self.character_size.width as i32
                + (chars - 1) * self.character_spacing as i32
        };
        Extent::new(width, self.line_height())
    }

    fn line_height(&self) -> i32 {
        self.character_size.height as i32
    }
}

/// Fixed row geometry derived from the font height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMetrics {
    /// Side of the square expand/collapse icon, also the row's hit height
    pub icon_size: i32,
    /// Vertical advance from one row to the next
    pub row_height: i32,
    /// Gap between the icon and the label
    pub text_gap: i32,
}

impl RowMetrics {
    pub fn new(line_height: i32, config: &UiConfig) -> Self {
        let icon_size = line_height + config.icon_padding as i32;
        Self {
            icon_size,
            row_height: icon_size + config.row_gap as i32,
            text_gap: config.text_gap as i32,
        }
    }

    /// Horizontal distance from a row's left edge to its label
    pub fn text_offset(&self) -> i32 {
        self.icon_size + self.text_gap
    }
}

/// A row that crosses the viewport and must be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub node: NodeId,
    pub bounds: Rect,
    pub text_width: i32,
}

/// Outcome of one layout pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    /// Size of all laid-out content, measured from the unscrolled origin
    pub content: Extent,
    /// Rows to draw, in display order
    pub rows: Vec<VisibleRow>,
}

/// Lay out every node on the expanded path.
///
/// `viewport` is the on-screen content area and `scroll` the current scroll
/// offset; the first row starts at `viewport.top_left() - scroll`.
pub fn layout_tree<F: FontMetrics + ?Sized>(
    tree: &mut NodeTree,
    font: &F,
    metrics: &RowMetrics,
    viewport: Rect,
    scroll: Point,
) -> TreeLayout {
    let origin = viewport.top_left() - scroll;
    let mut rows = Vec::new();
    let end = layout_level(tree, font, metrics, viewport, None, origin, &mut rows);

    TreeLayout {
        content: Extent::new(end.x - origin.x, end.y - origin.y),
        rows,
    }
}

/// Lay out one collection starting at `cursor`. Returns the running
/// `(max_x, y)` after the last row of the collection and its expanded
/// descendants.
fn layout_level<F: FontMetrics + ?Sized>(
    tree: &mut NodeTree,
    font: &F,
    metrics: &RowMetrics,
    viewport: Rect,
    parent: Option<NodeId>,
    cursor: Point,
    rows: &mut Vec<VisibleRow>,
) -> Point {
    let mut max_x = cursor.x;
    let mut y = cursor.y;

    for index in 0..tree.children(parent).len() {
        let id = tree.children(parent)[index];
        let Some(node) = tree.node(id) else {
            continue;
        };

        let text_width = font.measure(node.label()).width();
        let recurse = node.is_expanded() && node.has_children();

        let row_width = (viewport.right() - cursor.x).max(0);
        let bounds = Rect::new(cursor.x, y, row_width, metrics.icon_size);
        tree.set_bounds(id, bounds);

        let text_end = cursor.x + metrics.text_offset() + text_width + metrics.text_gap;
        max_x = max_x.max(text_end);

        if y < viewport.bottom() && y + metrics.icon_size > viewport.y() {
            rows.push(VisibleRow {
                node: id,
                bounds,
                text_width,
            });
        }

        y += metrics.row_height;

        if recurse {
            let child_cursor = Point::new(cursor.x + metrics.icon_size, y);
            let end = layout_level(tree, font, metrics, viewport, Some(id), child_cursor, rows);
            y = end.y;
            max_x = max_x.max(end.x);
        }
    }

    Point::new(max_x, y)
}

/// Cut `label` so it fits in `max_width` pixels, appending an ellipsis when
/// anything was dropped.
pub fn fit_label<F: FontMetrics + ?Sized>(
    label: &str,
    max_width: i32,
    font: &F,
) -> heapless::String<LABEL_DRAW_CAPACITY> {
    let mut fitted = heapless::String::new();
    if max_width <= 0 {
        return fitted;
    }

    if font.measure(label).width() <= max_width && label.len() <= LABEL_DRAW_CAPACITY {
        fitted.push_str(label).ok();
        return fitted;
    }

    let budget = max_width - font.measure(ELLIPSIS).width();
    if budget < 0 {
        return fitted;
    }

    let mut end = 0;
    for (index, ch) in label.char_indices() {
        let next = index + ch.len_utf8();
        if next + ELLIPSIS.len() > LABEL_DRAW_CAPACITY
            || font.measure(&label[..next]).width() > budget
        {
            break;
        }
        end = next;
    }

    fitted.push_str(&label[..end]).ok();
    fitted.push_str(ELLIPSIS).ok();
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mono_font::ascii::FONT_6X10;

    fn metrics() -> RowMetrics {
        RowMetrics::new(FONT_6X10.line_height(), &UiConfig::default())
    }

    fn viewport() -> Rect {
        Rect::new(0, 0, 200, 400)
    }

    #[test]
    fn test_mono_font_measure() {
        assert_eq!(FONT_6X10.measure("abc"), Extent::new(18, 10));
        assert_eq!(FONT_6X10.measure(""), Extent::new(0, 10));
    }

    #[test]
    fn test_row_metrics_from_font() {
        let metrics = metrics();
        assert_eq!(metrics.icon_size, 18);
        assert_eq!(metrics.row_height, 22);
    }

    #[test]
    fn test_collapsed_roots_stack_by_row_height() {
        let mut tree = NodeTree::new();
        for label in ["one", "two", "three", "four", "five"] {
            tree.add_root(label);
        }

        let metrics = metrics();
        let layout = layout_tree(&mut tree, &FONT_6X10, &metrics, viewport(), Point::zero());
        assert_eq!(layout.content.height(), 5 * metrics.row_height);
        assert_eq!(layout.rows.len(), 5);

        let third = tree.roots()[2];
        assert_eq!(
            tree.node(third).unwrap().bounds(),
            Rect::new(0, 2 * metrics.row_height, 200, metrics.icon_size)
        );
    }

    #[test]
    fn test_expanded_children_are_indented() {
        let mut tree = NodeTree::new();
        let a = tree.add_root("A");
        let a1 = tree.add_child(a, "A1").unwrap();
        let b = tree.add_root("B");
        let b1 = tree.add_child(b, "B1").unwrap();
        tree.set_expanded(a, true).unwrap();

        let metrics = metrics();
        let layout = layout_tree(&mut tree, &FONT_6X10, &metrics, viewport(), Point::zero());

        let a1_bounds = tree.node(a1).unwrap().bounds();
        assert_eq!(a1_bounds.x(), metrics.icon_size);
        assert_eq!(a1_bounds.y(), metrics.row_height);
        assert_eq!(tree.node(b).unwrap().bounds().y(), 2 * metrics.row_height);
        assert_eq!(tree.node(b1).unwrap().bounds(), Rect::zero());
        assert_eq!(layout.content.height(), 3 * metrics.row_height);

        // Widest row is the indented "A1": indent + icon + gap + text + gap.
        let expected = metrics.icon_size + metrics.text_offset() + 12 + metrics.text_gap;
        assert_eq!(layout.content.width(), expected);
    }

    #[test]
    fn test_scrolled_rows_keep_bounds_but_skip_drawing() {
        let mut tree = NodeTree::new();
        for _ in 0..10 {
            tree.add_root("row");
        }
        let metrics = metrics();
        let small = Rect::new(0, 0, 200, 50);
        let scroll = Point::new(0, 3 * metrics.row_height);
        let layout = layout_tree(&mut tree, &FONT_6X10, &metrics, small, scroll);

        let first = tree.roots()[0];
        assert_eq!(
            tree.node(first).unwrap().bounds().y(),
            -3 * metrics.row_height,
            "off-screen rows still get bounds"
        );
        assert!(layout.rows.iter().all(|row| row.node != first));
        assert_eq!(layout.rows.first().map(|row| row.node), Some(tree.roots()[3]));
        assert_eq!(layout.content.height(), 10 * metrics.row_height);
    }

    #[test]
    fn test_empty_tree_has_zero_extent() {
        let mut tree = NodeTree::new();
        let layout = layout_tree(&mut tree, &FONT_6X10, &metrics(), viewport(), Point::zero());
        assert_eq!(layout.content, Extent::zero());
        assert!(layout.rows.is_empty());
    }

    #[test]
    fn test_fit_label_truncates_with_ellipsis() {
        assert_eq!(fit_label("short", 100, &FONT_6X10).as_str(), "short");
        assert_eq!(fit_label("truncated", 36, &FONT_6X10).as_str(), "tru...");
        assert_eq!(fit_label("abc", 10, &FONT_6X10).as_str(), "");
        assert_eq!(fit_label("abc", 0, &FONT_6X10).as_str(), "");
    }
}
