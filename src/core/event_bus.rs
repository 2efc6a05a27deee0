//! Pub/Sub Event Bus for decoupled component communication.
//!
//! Architecture:
//! - Components subscribe to event types with callbacks (immediate invocation)
//! - emit() invokes callbacks immediately AND queues for deferred processing
//! - poll() returns queued events for batch processing in the host loop
//!
//! Callback order: FIFO (first-subscribed, first-called) within same event type.
//!
//! # Non-reentrant delivery
//!
//! Handlers never nest. If a callback emits while another callback is still
//! running, the new event is parked and delivered right after the running
//! dispatch returns, in emission order. Single logical thread is assumed; the
//! Arc/Mutex plumbing only makes handles cheap to clone into callbacks.

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

use log::warn;

/// Maximum events in queue before oldest are evicted
const MAX_QUEUE_SIZE: usize = 1000;

/// Marker trait for events. Events must be Send + Sync + 'static.
pub trait Event: Any + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
}

// Blanket impl for all qualifying types
impl<T: Any + Send + Sync + 'static> Event for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Type-erased callback
type Callback = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// Boxed event for queue storage
pub type BoxedEvent = Box<dyn Event>;

#[derive(Default)]
struct DispatchState {
    active: bool,
    pending: VecDeque<BoxedEvent>,
}

#[derive(Default)]
struct BusInner {
    subscribers: RwLock<HashMap<TypeId, Vec<Callback>>>,
    queue: Mutex<Vec<BoxedEvent>>,
    dispatch: Mutex<DispatchState>,
}

/// Releases the dispatch slot if a callback panics mid-delivery
struct DispatchGuard<'a> {
    state: &'a Mutex<DispatchState>,
    armed: bool,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.active = false;
            state.pending.clear();
        }
    }
}

impl BusInner {
    fn callbacks_for(&self, type_id: TypeId) -> Vec<Callback> {
        // Clone out so callbacks may subscribe/emit without holding the lock
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&type_id)
            .cloned()
            .unwrap_or_default()
    }

    fn enqueue(&self, event: BoxedEvent) {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if queue.len() >= MAX_QUEUE_SIZE {
            let evict_count = queue.len() / 2;
            warn!("EventBus queue full ({} events), evicting oldest {}", queue.len(), evict_count);
            queue.drain(0..evict_count);
        }
        queue.push(event);
    }

    fn deliver(&self, event: &dyn Event) {
        // Call through the dyn Event vtable so the concrete TypeId is used
        let any = event.as_any();
        for cb in self.callbacks_for(any.type_id()) {
            cb(any);
        }
    }

    /// Deliver now, or park if a dispatch is already running
    fn dispatch(&self, event: BoxedEvent) {
        {
            let mut state = self.dispatch.lock().unwrap_or_else(|e| e.into_inner());
            if state.active {
                state.pending.push_back(event);
                return;
            }
            state.active = true;
        }

        let mut guard = DispatchGuard { state: &self.dispatch, armed: true };
        let mut next = Some(event);
        while let Some(event) = next {
            self.deliver(&*event);
            let mut state = self.dispatch.lock().unwrap_or_else(|e| e.into_inner());
            next = state.pending.pop_front();
            if next.is_none() {
                state.active = false;
                guard.armed = false;
            }
        }
    }

    fn emit<E: Event + Clone>(&self, event: E) {
        self.enqueue(Box::new(event.clone()));
        self.dispatch(Box::new(event));
    }
}

/// Pub/Sub Event Bus with deferred processing support.
///
/// Two modes of operation:
/// 1. Immediate: subscribe() + emit() triggers callbacks synchronously
/// 2. Deferred: emit() also queues events for poll() in the host loop
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Pub/Sub (immediate) ==========

    /// Subscribe to events of type E.
    ///
    /// Callback is invoked when emit() is called.
    /// Use Arc<Mutex<State>> in the callback for state mutations.
    ///
    /// # Example
    /// ```ignore
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// bus.subscribe::<ColorChangedEvent, _>(move |e| sink.lock().unwrap().push(e.0));
    /// ```
    pub fn subscribe<E, F>(&self, callback: F)
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<E>();
        let wrapped: Callback = Arc::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                callback(event);
            }
        });
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(type_id)
            .or_default()
            .push(wrapped);
    }

    /// Emit event: invoke callbacks AND queue for deferred processing.
    pub fn emit<E: Event + Clone>(&self, event: E) {
        self.inner.emit(event);
    }

    // ========== Deferred Processing ==========

    /// Poll all queued events for batch processing.
    ///
    /// Returns all events emitted since last poll. Use in host loop:
    /// ```ignore
    /// for event in event_bus.poll() {
    ///     handle_app_event(&event, &mut editor);
    /// }
    /// ```
    pub fn poll(&self) -> Vec<BoxedEvent> {
        std::mem::take(&mut *self.inner.queue.lock().unwrap_or_else(|e| e.into_inner()))
    }

    // ========== Handle & Utilities ==========

    /// Get an emitter handle for passing to components.
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Clear subscribers for type E
    pub fn unsubscribe_all<E: Event>(&self) {
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&TypeId::of::<E>());
    }

    /// Check if there are subscribers for event type E
    pub fn has_subscribers<E: Event>(&self) -> bool {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&TypeId::of::<E>())
            .map(|v| !v.is_empty())
            .unwrap_or(false)
    }

    /// Check queue length
    pub fn queue_len(&self) -> usize {
        self.inner.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Lightweight emitter handle for components.
#[derive(Clone)]
pub struct EventEmitter {
    inner: Arc<BusInner>,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("subscriber_types", &self.inner.subscribers.read().map(|s| s.len()).unwrap_or(0))
            .field("queue_len", &self.inner.queue.lock().map(|q| q.len()).unwrap_or(0))
            .finish()
    }
}

impl EventEmitter {
    /// Emit event: invoke callbacks and queue for deferred processing
    pub fn emit<E: Event + Clone>(&self, event: E) {
        self.inner.emit(event);
    }
}

/// Component-side emitter (wraps Option<EventEmitter>)
///
/// Components are constructible without a bus (tests, headless tools);
/// emitting through a dummy is a no-op.
#[derive(Clone, Default, Debug)]
pub struct EditorEmitter {
    inner: Option<EventEmitter>,
}

impl EditorEmitter {
    /// Create a no-op emitter
    pub fn dummy() -> Self {
        Self { inner: None }
    }

    pub fn from_emitter(emitter: EventEmitter) -> Self {
        Self { inner: Some(emitter) }
    }

    /// Emit event (no-op if dummy)
    pub fn emit<E: Event + Clone>(&self, event: E) {
        if let Some(ref emitter) = self.inner {
            emitter.emit(event);
        }
    }
}

/// Helper: downcast BoxedEvent to concrete type
///
/// Must explicitly deref to `dyn Event` before calling `as_any()`: the blanket
/// impl also covers `Box<dyn Event>`, which would report the Box's TypeId.
#[inline]
pub fn downcast_event<E: Event>(event: &BoxedEvent) -> Option<&E> {
    (**event).as_any().downcast_ref::<E>()
}
