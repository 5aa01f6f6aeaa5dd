//! Outward notifications and the observer registry that delivers them

use alloc::boxed::Box;
use alloc::vec::Vec;
use embedded_graphics::prelude::Point;

use super::tree::NodeId;

/// Notifications raised by a [`Treeview`](super::tree::Treeview) while
/// resolving a pen-up. State is already committed when observers run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// A row was tapped outside its expand icon
    NodeTapped { node: NodeId, point: Point },
    /// The expand icon opened a node
    NodeExpanded(NodeId),
    /// The expand icon closed a node
    NodeCollapsed(NodeId),
}

/// Handle returned by [`Observers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

/// Ordered list of callbacks invoked synchronously in registration order
pub struct Observers<E> {
    next_id: u32,
    callbacks: Vec<(SubscriptionId, Box<dyn FnMut(&E)>)>,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns false when the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub fn notify(&mut self, event: &E) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E> core::fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}
