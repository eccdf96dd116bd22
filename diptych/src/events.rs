// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host input and the sources that deliver it.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::RefCell;

use diptych_geo::RegionId;
use diptych_view::{Half, LogicalView};
use kurbo::{Point, Size};

/// An input the controller reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    /// The container was resized to a new pixel size.
    Resize(Size),
    /// A pointer click at a position in container coordinates.
    Click(Point),
    /// A click the host already resolved to a region in one half.
    ClickRegion {
        /// The clicked region.
        id: RegionId,
        /// Half the click landed in.
        half: Half,
    },
    /// The surrounding UI selected a logical view.
    SetView(LogicalView),
    /// The user asked to retry a failed load.
    Retry,
}

/// A subscribable stream of [`HostEvent`]s.
///
/// The controller subscribes when a source is attached and unsubscribes when
/// it is detached or dropped. Sources deliver nothing while unsubscribed.
pub trait EventSource {
    /// Starts delivering events.
    fn subscribe(&mut self);

    /// Stops delivering events and forgets undelivered ones.
    fn unsubscribe(&mut self);

    /// Moves pending events, oldest first, into `out`.
    fn drain_into(&mut self, out: &mut Vec<HostEvent>);
}

#[derive(Debug, Default)]
struct QueueInner {
    subscribers: usize,
    pending: VecDeque<HostEvent>,
}

/// A shared, single-threaded event queue.
///
/// Clones share the same queue: the host keeps one handle to
/// [`push`](EventQueue::push) events and attaches another to the controller.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    inner: Rc<RefCell<QueueInner>>,
}

impl EventQueue {
    /// Creates an empty queue with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `event`. Returns `false`, dropping it, if nobody is subscribed.
    pub fn push(&self, event: HostEvent) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.subscribers == 0 {
            return false;
        }
        inner.pending.push_back(event);
        true
    }

    /// Returns `true` while at least one consumer is subscribed.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.inner.borrow().subscribers > 0
    }

    /// Number of undelivered events.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }
}

impl EventSource for EventQueue {
    fn subscribe(&mut self) {
        self.inner.borrow_mut().subscribers += 1;
    }

    fn unsubscribe(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.subscribers = inner.subscribers.saturating_sub(1);
        if inner.subscribers == 0 {
            inner.pending.clear();
        }
    }

    fn drain_into(&mut self, out: &mut Vec<HostEvent>) {
        out.extend(self.inner.borrow_mut().pending.drain(..));
    }
}

/// Identifies an attached [`EventSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub(crate) u64);

/// The sources attached to a controller, in attachment order.
///
/// Dropping the set unsubscribes every source.
pub(crate) struct Attached {
    next: u64,
    sources: Vec<(SourceId, Box<dyn EventSource>)>,
}

impl core::fmt::Debug for Attached {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Attached")
            .field("next", &self.next)
            .field(
                "sources",
                &self.sources.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Attached {
    pub(crate) fn new() -> Self {
        Self {
            next: 0,
            sources: Vec::new(),
        }
    }

    pub(crate) fn attach(&mut self, mut source: Box<dyn EventSource>) -> SourceId {
        source.subscribe();
        let id = SourceId(self.next);
        self.next += 1;
        self.sources.push((id, source));
        id
    }

    pub(crate) fn detach(&mut self, id: SourceId) -> bool {
        let Some(index) = self.sources.iter().position(|(s, _)| *s == id) else {
            return false;
        };
        let (_, mut source) = self.sources.remove(index);
        source.unsubscribe();
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.sources.len()
    }

    pub(crate) fn drain(&mut self) -> Vec<HostEvent> {
        let mut events = Vec::new();
        for (_, source) in &mut self.sources {
            source.drain_into(&mut events);
        }
        events
    }
}

impl Drop for Attached {
    fn drop(&mut self) {
        for (_, source) in &mut self.sources {
            source.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drops_events_without_subscribers() {
        let queue = EventQueue::new();
        assert!(!queue.push(HostEvent::Retry));
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn attached_sources_follow_their_lifecycle() {
        let host = EventQueue::new();
        let mut attached = Attached::new();
        let id = attached.attach(Box::new(host.clone()));
        assert!(host.is_subscribed());

        assert!(host.push(HostEvent::SetView(LogicalView::Left)));
        assert!(host.push(HostEvent::Retry));
        assert_eq!(
            attached.drain(),
            [HostEvent::SetView(LogicalView::Left), HostEvent::Retry]
        );
        assert_eq!(host.pending(), 0);

        host.push(HostEvent::Retry);
        assert!(attached.detach(id));
        assert!(!attached.detach(id));
        assert!(!host.is_subscribed());
        assert_eq!(host.pending(), 0);
    }

    #[test]
    fn dropping_unsubscribes() {
        let host = EventQueue::new();
        {
            let mut attached = Attached::new();
            attached.attach(Box::new(host.clone()));
            attached.attach(Box::new(host.clone()));
            assert_eq!(attached.len(), 2);
        }
        assert!(!host.is_subscribed());
    }
}
