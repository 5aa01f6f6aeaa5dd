//! Node storage for the tree widget
//!
//! Nodes live in a generational arena and refer to each other by [`NodeId`].
//! The parent link is a lookup relation only; ownership flows from the root
//! list down through each node's ordered child list.

use alloc::string::String;
use alloc::vec::Vec;
use embedded_graphics::prelude::Point;
use slotmap::{SlotMap, new_key_type};

use crate::ui::error::{UiError, UiResult};
use crate::ui::geometry::Rect;

new_key_type! {
    /// Stable handle of a node inside a [`NodeTree`]
    pub struct NodeId;
}

/// One row of the tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    label: String,
    expanded: bool,
    selected: bool,
    pen_down: bool,
    bounds: Rect,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl TreeNode {
    fn new(label: &str, parent: Option<NodeId>) -> Self {
        Self {
            label: String::from(label),
            expanded: false,
            selected: false,
            pen_down: false,
            bounds: Rect::zero(),
            children: Vec::new(),
            parent,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// True between a pen-down on this row and the next pen-up anywhere
    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    /// Screen bounds from the last layout pass; zero when never laid out or
    /// hidden under a collapsed ancestor.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena-backed tree of expandable, selectable nodes.
///
/// Collections are addressed by `Option<NodeId>`: `None` is the root list,
/// `Some(id)` the children of `id`.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: SlotMap<NodeId, TreeNode>,
    roots: Vec<NodeId>,
    selected: Option<NodeId>,
    dirty: bool,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of live nodes, at any depth
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Ordered ids of a collection. Unknown parents yield an empty slice.
    pub fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            None => &self.roots,
            Some(id) => self.nodes.get(id).map_or(&[], |node| &node.children),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Number of ancestors above `id` (roots are at depth 0)
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        let mut node = self.nodes.get(id)?;
        let mut depth = 0;
        while let Some(parent) = node.parent {
            depth += 1;
            node = &self.nodes[parent];
        }
        Some(depth)
    }

    /// True when `ancestor` appears on the parent chain of `id`
    pub fn is_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    pub fn add_root(&mut self, label: &str) -> NodeId {
        let id = self.nodes.insert(TreeNode::new(label, None));
        self.roots.push(id);
        self.dirty = true;
        id
    }

    pub fn add_child(&mut self, parent: NodeId, label: &str) -> UiResult<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(UiError::NodeNotFound);
        }
        let id = self.nodes.insert(TreeNode::new(label, Some(parent)));
        self.nodes[parent].children.push(id);
        self.dirty = true;
        Ok(id)
    }

    /// Move an existing node (with its subtree) to the end of another
    /// collection.
    ///
    /// Rejects targets that are the node itself or one of its descendants, so
    /// the tree stays acyclic.
    pub fn attach(&mut self, parent: Option<NodeId>, id: NodeId) -> UiResult<()> {
        if !self.nodes.contains_key(id) {
            return Err(UiError::NodeNotFound);
        }
        if let Some(target) = parent {
            if !self.nodes.contains_key(target) {
                return Err(UiError::NodeNotFound);
            }
            if target == id || self.is_descendant(target, id) {
                return Err(UiError::CyclicAttach);
            }
        }

        let old_parent = self.nodes[id].parent;
        self.unlink(old_parent, id);
        match parent {
            None => self.roots.push(id),
            Some(target) => self.nodes[target].children.push(id),
        }
        self.nodes[id].parent = parent;
        self.nodes[id].bounds = Rect::zero();
        self.reset_descendant_bounds(id);
        self.dirty = true;
        Ok(())
    }

    /// Remove the node at `index` of a collection together with its subtree.
    ///
    /// Returns false for an unknown parent or an out-of-range index.
    pub fn remove_at(&mut self, parent: Option<NodeId>, index: usize) -> bool {
        let Some(&id) = self.children(parent).get(index) else {
            return false;
        };
        self.remove(id)
    }

    /// Remove a node by identity together with its subtree
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let parent = node.parent;
        self.unlink(parent, id);

        let mut pending = Vec::from([id]);
        while let Some(next) = pending.pop() {
            if let Some(removed) = self.nodes.remove(next) {
                pending.extend(removed.children);
            }
        }

        if self.selected.is_some_and(|sel| !self.nodes.contains_key(sel)) {
            self.selected = None;
        }
        self.dirty = true;
        true
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots = Vec::new();
        self.selected = None;
        self.dirty = true;
    }

    /// Drop every child of `id`, keeping `id` itself
    pub fn clear_children(&mut self, id: NodeId) -> UiResult<()> {
        let children = self
            .nodes
            .get(id)
            .ok_or(UiError::NodeNotFound)?
            .children
            .clone();
        for child in children {
            self.remove(child);
        }
        Ok(())
    }

    pub fn set_label(&mut self, id: NodeId, label: &str) -> UiResult<()> {
        let node = self.nodes.get_mut(id).ok_or(UiError::NodeNotFound)?;
        if node.label != label {
            node.label = String::from(label);
            self.dirty = true;
        }
        Ok(())
    }

    /// Expand or collapse a node. Collapsing zeroes every descendant's bounds
    /// in the same step. Returns whether the state changed.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> UiResult<bool> {
        let node = self.nodes.get_mut(id).ok_or(UiError::NodeNotFound)?;
        if node.expanded == expanded {
            return Ok(false);
        }
        node.expanded = expanded;
        if !expanded {
            self.reset_descendant_bounds(id);
        }
        self.dirty = true;
        Ok(true)
    }

    /// Flip the expanded flag and return the new state
    pub fn toggle_expanded(&mut self, id: NodeId) -> UiResult<bool> {
        let expanded = !self.nodes.get(id).ok_or(UiError::NodeNotFound)?.expanded;
        self.set_expanded(id, expanded)?;
        Ok(expanded)
    }

    pub fn expand_all(&mut self) {
        for node in self.nodes.values_mut() {
            if node.has_children() {
                node.expanded = true;
            }
        }
        self.dirty = true;
    }

    pub fn collapse_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.expanded = false;
            if node.parent.is_some() {
                node.bounds = Rect::zero();
            }
        }
        self.dirty = true;
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Select a node, deselecting the previous selection first.
    ///
    /// Selecting the current selection again is a no-op.
    pub fn set_selected(&mut self, id: Option<NodeId>) -> UiResult<()> {
        if self.selected == id {
            return Ok(());
        }
        if let Some(new) = id
            && !self.nodes.contains_key(new)
        {
            return Err(UiError::NodeNotFound);
        }

        if let Some(previous) = self.selected.and_then(|prev| self.nodes.get_mut(prev)) {
            previous.selected = false;
        }
        self.selected = id;
        if let Some(new) = id {
            self.nodes[new].selected = true;
        }
        self.dirty = true;
        Ok(())
    }

    /// Clear the selected and pen-down flags on every node in the tree
    pub(crate) fn reset_selection_and_pen(&mut self) {
        for node in self.nodes.values_mut() {
            node.selected = false;
            node.pen_down = false;
        }
        self.selected = None;
        self.dirty = true;
    }

    pub(crate) fn clear_pen(&mut self) {
        for node in self.nodes.values_mut() {
            node.pen_down = false;
        }
    }

    pub(crate) fn set_pen_down(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.pen_down = true;
        }
    }

    pub(crate) fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.bounds = bounds;
        }
    }

    /// Zero the bounds of every node below `id`
    pub(crate) fn reset_descendant_bounds(&mut self, id: NodeId) {
        let mut pending: Vec<NodeId> = self.children(Some(id)).to_vec();
        while let Some(next) = pending.pop() {
            let node = &mut self.nodes[next];
            node.bounds = Rect::zero();
            pending.extend_from_slice(&node.children);
        }
    }

    /// Move every laid-out bound by `delta` (scrolling without relayout)
    pub(crate) fn shift_bounds(&mut self, delta: Point) {
        for node in self.nodes.values_mut() {
            if !node.bounds.is_empty() {
                node.bounds = node.bounds.translate(delta);
            }
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn unlink(&mut self, parent: Option<NodeId>, id: NodeId) {
        let list = match parent {
            None => &mut self.roots,
            Some(parent) => match self.nodes.get_mut(parent) {
                Some(node) => &mut node.children,
                None => return,
            },
        };
        list.retain(|&child| child != id);
        if list.is_empty() {
            *list = Vec::new();
        }
    }
}
