//! Thread-safe prioritized queue for placement requests.

use kombiner_api::PlacementRequest;
use parking_lot::Mutex;

use super::priority::{Prioritized, PriorityQueue};

type PushHandler = Box<dyn Fn() + Send + Sync>;

/// Wraps a PlacementRequest so the priority queue can order it. The priority
/// is the creation timestamp in nanoseconds, so older requests are served
/// first. A request without a creation timestamp sorts before everything
/// else.
struct PrioritizedPlacementRequest {
    request: PlacementRequest,
}

impl Prioritized for PrioritizedPlacementRequest {
    fn priority(&self) -> i64 {
        self.request
            .metadata
            .creation_timestamp
            .as_ref()
            .and_then(|t| t.0.timestamp_nanos_opt())
            .unwrap_or(0)
    }
}

/// A prioritized queue for PlacementRequest objects. Callers push requests
/// as they are admitted and pop the earliest-created request for dispatch.
///
/// Push handlers registered on the queue are invoked synchronously after
/// each successful push, still under the queue lock; handlers must be
/// non-blocking.
pub struct PlacementRequestQueue {
    inner: Mutex<Inner>,
}

struct Inner {
    queue: PriorityQueue<PrioritizedPlacementRequest>,
    push_handlers: Vec<PushHandler>,
}

impl PlacementRequestQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                queue: PriorityQueue::new(),
                push_handlers: Vec::new(),
            }),
        }
    }

    /// Adds a PlacementRequest to the queue and invokes the registered push
    /// handlers.
    pub fn push(&self, request: PlacementRequest) {
        let mut inner = self.inner.lock();
        inner.queue.push(PrioritizedPlacementRequest { request });
        for handler in &inner.push_handlers {
            handler();
        }
    }

    /// Removes and returns the earliest-created PlacementRequest, or `None`
    /// when the queue is empty.
    pub fn pop(&self) -> Option<PlacementRequest> {
        self.inner.lock().queue.pop().map(|item| item.request)
    }

    /// Number of PlacementRequests awaiting in the queue.
    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a handler invoked every time a PlacementRequest is added
    /// to this queue. Handlers run in registration order.
    pub fn add_push_handler(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.inner.lock().push_handlers.push(Box::new(handler));
    }
}

impl Default for PlacementRequestQueue {
    fn default() -> Self {
        Self::new()
    }
}
