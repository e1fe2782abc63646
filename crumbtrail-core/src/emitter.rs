// SPDX-License-Identifier: LGPL-3.0-only
//! # Event Emitter
//!
//! A typed publish/subscribe primitive. Events are plain values implementing
//! [`Event`]; listeners are registered per [`Event::Kind`] and invoked in
//! ascending priority order (registration order breaks ties).
//!
//! Dispatch always runs over a snapshot of the listener list, so subscribing or
//! unsubscribing from inside a handler only affects later emissions. Handler
//! errors and panics are caught per listener and routed to the configured error
//! sink; they never reach the caller of [`EventEmitter::emit`].
//!
//! The emitter is single-threaded. Clones share the same listener registry, the
//! same way cloned signals share their value.

use crate::error::{HandlerError, HandlerPanic, HandlerResult};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

/// An event value that can be dispatched through an [`EventEmitter`].
pub trait Event: Clone + 'static {
    /// The discriminant listeners subscribe to.
    type Kind: Copy + Eq + Hash + fmt::Debug + fmt::Display + 'static;

    /// Returns the kind of this event.
    fn kind(&self) -> Self::Kind;
}

/// Callback receiving handler failures: `(event name, error)`.
pub type ErrorSink = Rc<dyn Fn(&str, &HandlerError)>;

/// Callback receiving non-fatal warnings.
pub type WarningSink = Rc<dyn Fn(&str)>;

type SyncHandler<E> = Rc<dyn Fn(&E) -> HandlerResult>;
type AsyncHandler<E> = Rc<dyn Fn(E) -> LocalBoxFuture<'static, HandlerResult>>;

/// Identifier of a single listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Emitter configuration.
#[derive(Clone)]
pub struct EmitterOptions {
    /// Registering more listeners than this for one event kind logs a warning.
    /// `0` disables the check.
    pub max_listeners: usize,
    /// Keep dispatching to the remaining listeners after one fails.
    pub continue_on_error: bool,
    /// Receives handler failures. Defaults to `log::error!`.
    pub on_error: Option<ErrorSink>,
    /// Receives warnings such as listener overflow. Defaults to `log::warn!`.
    pub on_warning: Option<WarningSink>,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            max_listeners: 10,
            continue_on_error: true,
            on_error: None,
            on_warning: None,
        }
    }
}

impl fmt::Debug for EmitterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitterOptions")
            .field("max_listeners", &self.max_listeners)
            .field("continue_on_error", &self.continue_on_error)
            .field("on_error", &self.on_error.is_some())
            .field("on_warning", &self.on_warning.is_some())
            .finish()
    }
}

impl EmitterOptions {
    /// Set the listener count that triggers a warning.
    pub fn with_max_listeners(mut self, max_listeners: usize) -> Self {
        self.max_listeners = max_listeners;
        self
    }

    /// Set whether dispatch continues after a failing handler.
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Set the error sink.
    pub fn with_on_error<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str, &HandlerError) + 'static,
    {
        self.on_error = Some(Rc::new(sink));
        self
    }

    /// Set the warning sink.
    pub fn with_on_warning<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        self.on_warning = Some(Rc::new(sink));
        self
    }
}

enum Handler<E> {
    Sync(SyncHandler<E>),
    Async(AsyncHandler<E>),
}

impl<E> Clone for Handler<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Sync(h) => Self::Sync(h.clone()),
            Self::Async(h) => Self::Async(h.clone()),
        }
    }
}

struct Listener<E> {
    id: ListenerId,
    priority: i32,
    once: bool,
    handler: Handler<E>,
}

impl<E> Clone for Listener<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            priority: self.priority,
            once: self.once,
            handler: self.handler.clone(),
        }
    }
}

struct Registry<E: Event> {
    listeners: IndexMap<E::Kind, Vec<Listener<E>>>,
    next_id: u64,
}

impl<E: Event> Registry<E> {
    fn new() -> Self {
        Self {
            listeners: IndexMap::new(),
            next_id: 0,
        }
    }

    /// Insert after every listener with a lower or equal priority.
    fn insert(&mut self, kind: E::Kind, priority: i32, once: bool, handler: Handler<E>) -> (ListenerId, usize) {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let list = self.listeners.entry(kind).or_default();
        let position = list
            .iter()
            .position(|l| l.priority > priority)
            .unwrap_or(list.len());
        list.insert(
            position,
            Listener {
                id,
                priority,
                once,
                handler,
            },
        );

        (id, list.len())
    }

    fn remove(&mut self, kind: E::Kind, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.shift_remove(&kind);
        }
        removed
    }

    fn snapshot(&self, kind: E::Kind) -> Vec<Listener<E>> {
        self.listeners.get(&kind).cloned().unwrap_or_default()
    }
}

/// Handle to a listener registration.
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription<E: Event> {
    kind: E::Kind,
    id: ListenerId,
    registry: Weak<RefCell<Registry<E>>>,
}

impl<E: Event> Subscription<E> {
    /// The id of the registration, usable with [`EventEmitter::off`].
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// The event kind this registration listens to.
    pub fn kind(&self) -> E::Kind {
        self.kind
    }

    /// Remove the registration. Returns `false` if it was already gone
    /// (fired as a one-shot, removed via `off`, or the emitter was dropped).
    pub fn unsubscribe(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.borrow_mut().remove(self.kind, self.id),
            None => false,
        }
    }
}

impl<E: Event> fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

/// Typed, priority-ordered event emitter.
pub struct EventEmitter<E: Event> {
    registry: Rc<RefCell<Registry<E>>>,
    options: EmitterOptions,
}

impl<E: Event> Clone for EventEmitter<E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            options: self.options.clone(),
        }
    }
}

impl<E: Event> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new(EmitterOptions::default())
    }
}

impl<E: Event> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        let counts: Vec<(String, usize)> = registry
            .listeners
            .iter()
            .map(|(kind, list)| (kind.to_string(), list.len()))
            .collect();
        f.debug_struct("EventEmitter")
            .field("listeners", &counts)
            .field("options", &self.options)
            .finish()
    }
}

impl<E: Event> EventEmitter<E> {
    /// Create a new emitter with the given options.
    pub fn new(options: EmitterOptions) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::new())),
            options,
        }
    }

    /// The options this emitter was created with.
    pub fn options(&self) -> &EmitterOptions {
        &self.options
    }

    /// Register a handler with priority `0`.
    pub fn on<F>(&self, kind: E::Kind, handler: F) -> Subscription<E>
    where
        F: Fn(&E) -> HandlerResult + 'static,
    {
        self.on_with_priority(kind, 0, handler)
    }

    /// Register a handler. Lower priorities run first.
    pub fn on_with_priority<F>(&self, kind: E::Kind, priority: i32, handler: F) -> Subscription<E>
    where
        F: Fn(&E) -> HandlerResult + 'static,
    {
        self.register(kind, priority, false, Handler::Sync(Rc::new(handler)))
    }

    /// Register a handler that removes itself after its first invocation.
    pub fn once<F>(&self, kind: E::Kind, handler: F) -> Subscription<E>
    where
        F: Fn(&E) -> HandlerResult + 'static,
    {
        self.once_with_priority(kind, 0, handler)
    }

    /// Register a one-shot handler with an explicit priority.
    pub fn once_with_priority<F>(&self, kind: E::Kind, priority: i32, handler: F) -> Subscription<E>
    where
        F: Fn(&E) -> HandlerResult + 'static,
    {
        self.register(kind, priority, true, Handler::Sync(Rc::new(handler)))
    }

    /// Register an async handler with priority `0`.
    ///
    /// Async handlers only run through [`EventEmitter::emit_async`]; a
    /// synchronous [`EventEmitter::emit`] skips them.
    pub fn on_async<F, Fut>(&self, kind: E::Kind, handler: F) -> Subscription<E>
    where
        F: Fn(E) -> Fut + 'static,
        Fut: Future<Output = HandlerResult> + 'static,
    {
        self.on_async_with_priority(kind, 0, handler)
    }

    /// Register an async handler with an explicit priority.
    pub fn on_async_with_priority<F, Fut>(&self, kind: E::Kind, priority: i32, handler: F) -> Subscription<E>
    where
        F: Fn(E) -> Fut + 'static,
        Fut: Future<Output = HandlerResult> + 'static,
    {
        let handler: AsyncHandler<E> = Rc::new(move |event| handler(event).boxed_local());
        self.register(kind, priority, false, Handler::Async(handler))
    }

    /// Register a one-shot async handler.
    pub fn once_async<F, Fut>(&self, kind: E::Kind, handler: F) -> Subscription<E>
    where
        F: Fn(E) -> Fut + 'static,
        Fut: Future<Output = HandlerResult> + 'static,
    {
        let handler: AsyncHandler<E> = Rc::new(move |event| handler(event).boxed_local());
        self.register(kind, 0, true, Handler::Async(handler))
    }

    fn register(&self, kind: E::Kind, priority: i32, once: bool, handler: Handler<E>) -> Subscription<E> {
        let (id, count) = self.registry.borrow_mut().insert(kind, priority, once, handler);

        let max = self.options.max_listeners;
        if max > 0 && count > max {
            self.warn(&format!(
                "Possible listener leak: {} listeners registered for '{}' (max {})",
                count, kind, max
            ));
        }

        Subscription {
            kind,
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Remove a single registration. Returns whether it existed.
    pub fn off(&self, kind: E::Kind, id: ListenerId) -> bool {
        self.registry.borrow_mut().remove(kind, id)
    }

    /// Remove every registration for `kind`. Returns how many were removed.
    pub fn off_all(&self, kind: E::Kind) -> usize {
        self.registry
            .borrow_mut()
            .listeners
            .shift_remove(&kind)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Remove every registration for every kind.
    pub fn clear(&self) {
        self.registry.borrow_mut().listeners.clear();
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.registry
            .borrow()
            .listeners
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Whether any listener is registered for `kind`.
    pub fn has_listeners(&self, kind: E::Kind) -> bool {
        self.listener_count(kind) > 0
    }

    /// Dispatch `event` synchronously.
    ///
    /// Returns `true` if at least one listener was registered for the event's kind.
    pub fn emit(&self, event: &E) -> bool {
        let kind = event.kind();
        let listeners = self.registry.borrow().snapshot(kind);
        if listeners.is_empty() {
            return false;
        }

        for listener in &listeners {
            let handler = match &listener.handler {
                Handler::Sync(handler) => handler,
                Handler::Async(_) => {
                    log::debug!("Skipping async listener {:?} for '{}' in sync emit", listener.id, kind);
                    continue;
                },
            };

            if listener.once {
                self.off(kind, listener.id);
            }

            let result = match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(result) => result,
                Err(payload) => Err(HandlerPanic::from_payload(kind.to_string(), payload.as_ref()).into()),
            };

            if let Err(err) = result {
                self.report(kind, &err);
                if !self.options.continue_on_error {
                    break;
                }
            }
        }

        true
    }

    /// Dispatch `event`, awaiting each listener in turn.
    ///
    /// Listeners never run concurrently: each one completes (or fails) before the
    /// next starts. Returns `true` if at least one listener was registered.
    pub async fn emit_async(&self, event: E) -> bool {
        let kind = event.kind();
        let listeners = self.registry.borrow().snapshot(kind);
        if listeners.is_empty() {
            return false;
        }

        for listener in &listeners {
            if listener.once {
                self.off(kind, listener.id);
            }

            let result = match &listener.handler {
                Handler::Sync(handler) => {
                    match panic::catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                        Ok(result) => result,
                        Err(payload) => Err(HandlerPanic::from_payload(kind.to_string(), payload.as_ref()).into()),
                    }
                },
                Handler::Async(handler) => {
                    match panic::catch_unwind(AssertUnwindSafe(|| handler(event.clone()))) {
                        Ok(future) => match AssertUnwindSafe(future).catch_unwind().await {
                            Ok(result) => result,
                            Err(payload) => Err(HandlerPanic::from_payload(kind.to_string(), payload.as_ref()).into()),
                        },
                        Err(payload) => Err(HandlerPanic::from_payload(kind.to_string(), payload.as_ref()).into()),
                    }
                },
            };

            if let Err(err) = result {
                self.report(kind, &err);
                if !self.options.continue_on_error {
                    break;
                }
            }
        }

        true
    }

    fn report(&self, kind: E::Kind, err: &HandlerError) {
        let name = kind.to_string();
        match &self.options.on_error {
            Some(sink) => sink(&name, err),
            None => log::error!("Error in '{}' event handler: {:#}", name, err),
        }
    }

    fn warn(&self, message: &str) {
        match &self.options.on_warning {
            Some(sink) => sink(message),
            None => log::warn!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Clone, Debug, PartialEq)]
    enum Ping {
        A(u32),
        B,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum PingKind {
        A,
        B,
    }

    impl fmt::Display for PingKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::A => write!(f, "a"),
                Self::B => write!(f, "b"),
            }
        }
    }

    impl Event for Ping {
        type Kind = PingKind;

        fn kind(&self) -> PingKind {
            match self {
                Self::A(_) => PingKind::A,
                Self::B => PingKind::B,
            }
        }
    }

    #[test]
    fn test_emit_without_listeners_returns_false() {
        let emitter = EventEmitter::<Ping>::default();
        assert!(!emitter.emit(&Ping::B));
    }

    #[test]
    fn test_handler_receives_payload() {
        let emitter = EventEmitter::<Ping>::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        emitter.on(PingKind::A, move |event| {
            sink.borrow_mut().push(event.clone());
            Ok(())
        });

        assert!(emitter.emit(&Ping::A(7)));
        assert!(!emitter.emit(&Ping::B));
        assert_eq!(*seen.borrow(), vec![Ping::A(7)]);
    }

    #[test]
    fn test_priority_order_is_stable() {
        let emitter = EventEmitter::<Ping>::default();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (label, priority) in [("late", 5), ("first", -1), ("mid-a", 0), ("mid-b", 0)] {
            let order = order.clone();
            emitter.on_with_priority(PingKind::B, priority, move |_| {
                order.borrow_mut().push(label);
                Ok(())
            });
        }

        emitter.emit(&Ping::B);
        assert_eq!(*order.borrow(), vec!["first", "mid-a", "mid-b", "late"]);
    }

    #[test]
    fn test_once_fires_a_single_time() {
        let emitter = EventEmitter::<Ping>::default();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        emitter.once(PingKind::B, move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        assert!(emitter.emit(&Ping::B));
        assert!(!emitter.emit(&Ping::B));
        assert_eq!(hits.get(), 1);
        assert_eq!(emitter.listener_count(PingKind::B), 0);
    }

    #[test]
    fn test_unsubscribe_and_off() {
        let emitter = EventEmitter::<Ping>::default();
        let sub = emitter.on(PingKind::A, |_| Ok(()));
        let other = emitter.on(PingKind::A, |_| Ok(()));
        assert_eq!(emitter.listener_count(PingKind::A), 2);

        assert!(sub.unsubscribe());
        assert!(emitter.off(PingKind::A, other.id()));
        assert!(!emitter.off(PingKind::A, other.id()));
        assert!(!emitter.has_listeners(PingKind::A));
    }

    #[test]
    fn test_off_all_only_touches_one_kind() {
        let emitter = EventEmitter::<Ping>::default();
        emitter.on(PingKind::A, |_| Ok(()));
        emitter.on(PingKind::A, |_| Ok(()));
        emitter.on(PingKind::B, |_| Ok(()));

        assert_eq!(emitter.off_all(PingKind::A), 2);
        assert_eq!(emitter.listener_count(PingKind::B), 1);

        emitter.clear();
        assert_eq!(emitter.listener_count(PingKind::B), 0);
    }

    #[test]
    fn test_registration_during_emit_does_not_join_dispatch() {
        let emitter = EventEmitter::<Ping>::default();
        let hits = Rc::new(Cell::new(0));

        let inner = emitter.clone();
        let counter = hits.clone();
        emitter.on(PingKind::B, move |_| {
            let counter = counter.clone();
            inner.on(PingKind::B, move |_| {
                counter.set(counter.get() + 1);
                Ok(())
            });
            Ok(())
        });

        emitter.emit(&Ping::B);
        assert_eq!(hits.get(), 0);
        emitter.emit(&Ping::B);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_removal_during_emit_does_not_skip_dispatch() {
        let emitter = EventEmitter::<Ping>::default();
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        let later = emitter.on_with_priority(PingKind::B, 1, move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        let later_id = later.id();
        let inner = emitter.clone();
        emitter.on_with_priority(PingKind::B, 0, move |_| {
            inner.off(PingKind::B, later_id);
            Ok(())
        });

        emitter.emit(&Ping::B);
        assert_eq!(hits.get(), 1);
        assert_eq!(emitter.listener_count(PingKind::B), 1);
        emitter.emit(&Ping::B);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_errors_are_isolated() {
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = errors.clone();
        let emitter = EventEmitter::<Ping>::new(
            EmitterOptions::default().with_on_error(move |name, err| sink.borrow_mut().push(format!("{name}: {err}"))),
        );
        let reached = Rc::new(Cell::new(false));
        let flag = reached.clone();

        emitter.on(PingKind::B, |_| Err(anyhow::anyhow!("boom")));
        emitter.on(PingKind::B, move |_| {
            flag.set(true);
            Ok(())
        });

        assert!(emitter.emit(&Ping::B));
        assert!(reached.get());
        assert_eq!(*errors.borrow(), vec!["b: boom".to_string()]);
    }

    #[test]
    fn test_stop_on_error() {
        let emitter = EventEmitter::<Ping>::new(
            EmitterOptions::default()
                .with_continue_on_error(false)
                .with_on_error(|_, _| {}),
        );
        let reached = Rc::new(Cell::new(false));
        let flag = reached.clone();

        emitter.on(PingKind::B, |_| Err(anyhow::anyhow!("boom")));
        emitter.on(PingKind::B, move |_| {
            flag.set(true);
            Ok(())
        });

        emitter.emit(&Ping::B);
        assert!(!reached.get());
    }

    #[test]
    fn test_panicking_handler_is_reported() {
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = errors.clone();
        let emitter = EventEmitter::<Ping>::new(EmitterOptions::default().with_on_error(move |_, err| {
            sink.borrow_mut().push(err.downcast_ref::<HandlerPanic>().cloned());
        }));

        emitter.on(PingKind::B, |_| panic!("handler exploded"));
        assert!(emitter.emit(&Ping::B));

        let errors = errors.borrow();
        assert_eq!(errors.len(), 1);
        let panic = errors[0].as_ref().expect("panic should be reported as HandlerPanic");
        assert_eq!(panic.message, "handler exploded");
        assert_eq!(panic.event, "b");
    }

    #[test]
    fn test_max_listeners_warns() {
        let warnings = Rc::new(RefCell::new(Vec::new()));
        let sink = warnings.clone();
        let emitter = EventEmitter::<Ping>::new(
            EmitterOptions::default()
                .with_max_listeners(1)
                .with_on_warning(move |msg| sink.borrow_mut().push(msg.to_string())),
        );

        emitter.on(PingKind::A, |_| Ok(()));
        assert!(warnings.borrow().is_empty());
        emitter.on(PingKind::A, |_| Ok(()));
        assert_eq!(warnings.borrow().len(), 1);
        assert_eq!(emitter.listener_count(PingKind::A), 2);
    }

    #[test]
    fn test_sync_emit_skips_async_listeners() {
        let emitter = EventEmitter::<Ping>::default();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        emitter.on_async(PingKind::B, move |_| {
            let counter = counter.clone();
            async move {
                counter.set(counter.get() + 1);
                Ok(())
            }
        });

        assert!(emitter.emit(&Ping::B));
        assert_eq!(hits.get(), 0);

        assert!(smol::block_on(emitter.emit_async(Ping::B)));
        assert_eq!(hits.get(), 1);
    }
}
