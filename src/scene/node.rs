use std::fmt;

use crate::renderer::stats::RenderInfo;
use crate::resources::id::{ContextId, NodeId};

/// Render lifecycle notification emitted by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    /// Emitted before a node issues any graphics-context call.
    BeforeRender { node: NodeId, context: ContextId },
    /// Emitted after all of a node's draw calls were submitted.
    AfterRender {
        node: NodeId,
        context: ContextId,
        info: RenderInfo,
    },
}

impl RenderEvent {
    #[must_use]
    pub fn node(&self) -> NodeId {
        match self {
            Self::BeforeRender { node, .. } | Self::AfterRender { node, .. } => *node,
        }
    }
}

/// Handle returned by [`Node::on_render`], used to unregister the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

type RenderObserver = Box<dyn FnMut(&RenderEvent) + Send>;

/// A minimal scene node: identity, name and render observers.
///
/// Transform hierarchy lives in the scene graph proper; the render path only
/// needs a stable identity to key per-node data by and a way to tell
/// observers that the node is being drawn.
pub struct Node {
    id: NodeId,
    pub name: String,
    observers: Vec<(ObserverId, RenderObserver)>,
    next_observer: u32,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: NodeId::next(),
            name: name.to_string(),
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Registers a callback invoked for every render event of this node.
    pub fn on_render<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&RenderEvent) + Send + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer = self.next_observer.wrapping_add(1);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Unregisters an observer. Returns `false` if it was not registered.
    pub fn off(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer, _)| *observer != id);
        self.observers.len() != before
    }

    #[inline]
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Delivers `event` to the observers in registration order.
    pub fn emit(&mut self, event: &RenderEvent) {
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn observers_can_be_removed() {
        let mut node = Node::new("n");
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        let id = node.on_render(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let event = RenderEvent::BeforeRender {
            node: node.id(),
            context: ContextId::next(),
        };
        node.emit(&event);
        assert!(node.off(id));
        assert!(!node.off(id));
        node.emit(&event);

        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }
}
