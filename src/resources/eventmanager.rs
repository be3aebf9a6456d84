//! Type-keyed listener registry.
//!
//! The [`EventManager`] maps each event kind to the ordered list of
//! listeners subscribed to it. Triggering a kind calls every listener in
//! subscription order with its own clone of the payload.
//!
//! # Rules
//!
//! - A kind has an entry iff it has at least one listener. The entry is
//!   dropped when its last listener is unsubscribed.
//! - Subscribing the same handle twice registers it twice; unsubscribing
//!   removes the first matching handle only.
//! - Unsubscribing or clearing something that is not registered is a no-op.
//! - A null (`None`) listener is never registered.
//! - A panicking listener is reported and skipped; the others still run and
//!   the panic never reaches the caller of [`EventManager::trigger_event`].
//!
//! # Example
//!
//! ```
//! use eventmanager::events::listener::Listener;
//! use eventmanager::resources::eventmanager::EventManager;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI32, Ordering};
//!
//! #[derive(Debug, Clone, Copy)]
//! struct ScoreChanged {
//!     points: i32,
//! }
//!
//! let score = Arc::new(AtomicI32::new(0));
//! let seen = score.clone();
//! let listener = Listener::new(move |e: ScoreChanged| {
//!     seen.store(e.points, Ordering::SeqCst);
//! });
//!
//! let events = EventManager::new();
//! events.subscribe(listener.clone());
//! events.trigger_event(ScoreChanged { points: 10 });
//! assert_eq!(score.load(Ordering::SeqCst), 10);
//!
//! events.unsubscribe(&listener);
//! events.trigger_event(ScoreChanged { points: 20 });
//! assert_eq!(score.load(Ordering::SeqCst), 10);
//! ```

use crate::events::event::Event;
use crate::events::kind::EventKind;
use crate::events::listener::Listener;
use crate::resources::diagnostics::{ChannelSink, Diagnostic, DiagnosticSink, LogSink, NoopSink};
use crate::resources::eventconfig::{EventManagerConfig, SinkKind};
#[cfg(feature = "bevy")]
use bevy_ecs::prelude::Resource;
use crossbeam_channel::Receiver;
use log::{debug, error, trace};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::any::{Any, TypeId};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Ordered listeners of one kind. Most kinds have only a few.
type ListenerList<T> = SmallVec<[Listener<T>; 4]>;

/// Object-safe view of a `ListenerList<T>` for some `T`.
trait ErasedListeners: Send + Sync {
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Event> ErasedListeners for ListenerList<T> {
    fn len(&self) -> usize {
        SmallVec::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Registry entry for one kind.
///
/// `listeners` always holds a `ListenerList<T>` for the `T` that `kind`
/// was built from; entries are only created by the typed methods below.
struct Entry {
    kind: EventKind,
    listeners: Box<dyn ErasedListeners>,
}

impl Entry {
    fn new<T: Event>(listener: Listener<T>) -> Self {
        let mut list: ListenerList<T> = SmallVec::new();
        list.push(listener);
        Self {
            kind: EventKind::of::<T>(),
            listeners: Box::new(list),
        }
    }

    fn typed<T: Event>(&self) -> Option<&ListenerList<T>> {
        self.listeners.as_any().downcast_ref::<ListenerList<T>>()
    }

    fn typed_mut<T: Event>(&mut self) -> Option<&mut ListenerList<T>> {
        self.listeners.as_any_mut().downcast_mut::<ListenerList<T>>()
    }
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Central event registry.
///
/// Listeners are keyed by the payload type. Every operation takes `&self`:
/// the kind map sits behind a `RwLock` that is never held while a listener
/// or the diagnostics sink runs. A listener holding an `Arc<EventManager>`
/// (or a `Weak`) can therefore subscribe, unsubscribe or trigger from inside
/// its own callback.
///
/// [`trigger_event`](Self::trigger_event) calls the listeners that were
/// subscribed when it started. Listeners added during the dispatch wait for
/// the next trigger; listeners removed during the dispatch still run once.
///
/// With the `bevy` feature the manager is an ECS [`Resource`]: insert it
/// into the `World` and trigger from systems through `Res<EventManager>`.
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct EventManager {
    entries: RwLock<FxHashMap<TypeId, Entry>>,
    sink: Box<dyn DiagnosticSink>,
    diagnostics: bool,
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field(
                "entries",
                &self
                    .entries
                    .read()
                    .values()
                    .map(|e| (e.kind.name(), e.listeners.len()))
                    .collect::<Vec<_>>(),
            )
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

impl EventManager {
    /// Create an empty registry reporting through [`LogSink`].
    ///
    /// Diagnostics are enabled in debug builds only.
    pub fn new() -> Self {
        Self::with_sink(LogSink)
    }

    /// Create an empty registry reporting to `sink`.
    pub fn with_sink(sink: impl DiagnosticSink + 'static) -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
            sink: Box::new(sink),
            diagnostics: cfg!(debug_assertions),
        }
    }

    /// Create an empty registry from a configuration.
    ///
    /// Returns the receiving end of the report channel when the configured
    /// sink is [`SinkKind::Channel`].
    pub fn from_config(config: &EventManagerConfig) -> (Self, Option<Receiver<Diagnostic>>) {
        let (manager, rx) = match config.sink {
            SinkKind::Log => (Self::with_sink(LogSink), None),
            SinkKind::None => (Self::with_sink(NoopSink), None),
            SinkKind::Channel => {
                let (sink, rx) = ChannelSink::new();
                (Self::with_sink(sink), Some(rx))
            }
        };
        (manager.with_diagnostics(config.diagnostics), rx)
    }

    /// Builder method to turn diagnostics on or off.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Turn diagnostics on or off.
    pub fn set_diagnostics(&mut self, enabled: bool) {
        self.diagnostics = enabled;
    }

    /// Whether null subscriptions and listener panics are reported.
    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    /// Hand `diagnostic` to the sink. A panicking sink is contained and the
    /// report falls back to the log.
    fn report(&self, diagnostic: Diagnostic) {
        if !self.diagnostics {
            return;
        }
        let fallback = diagnostic.clone();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.sink.report(diagnostic)));
        if let Err(panic_err) = result {
            error!(
                "Diagnostics sink panicked ({}); dropped report: {}",
                panic_message(&*panic_err),
                fallback
            );
        }
    }

    /// Subscribe a listener to the event kind `T`.
    ///
    /// The listener is appended after any listeners already subscribed to
    /// `T`. Passing `None` registers nothing and reports a
    /// [`Diagnostic::NullListener`].
    pub fn subscribe<T: Event>(&self, listener: impl Into<Option<Listener<T>>>) {
        let kind = EventKind::of::<T>();
        let Some(listener) = listener.into() else {
            self.report(Diagnostic::NullListener { kind });
            return;
        };

        let mut entries = self.entries.write();
        match entries.get_mut(&kind.type_id()) {
            Some(entry) => {
                if let Some(list) = entry.typed_mut::<T>() {
                    list.push(listener);
                }
            }
            None => {
                entries.insert(kind.type_id(), Entry::new(listener));
            }
        }
        debug!("Subscribed listener to {}", kind);
    }

    /// Wrap `callback` in a [`Listener`], subscribe it to `T` and return the
    /// handle so it can be unsubscribed later.
    pub fn listen<T, F>(&self, callback: F) -> Listener<T>
    where
        T: Event,
        F: Fn(T) + Send + Sync + 'static,
    {
        let listener = Listener::new(callback);
        self.subscribe(listener.clone());
        listener
    }

    /// Unsubscribe the first occurrence of `listener` from `T`.
    ///
    /// Removes the kind's entry when no listeners remain. Unknown kinds and
    /// listeners are ignored.
    pub fn unsubscribe<T: Event>(&self, listener: &Listener<T>) {
        let key = TypeId::of::<T>();
        let mut entries = self.entries.write();
        let Some(entry) = entries.get_mut(&key) else {
            return;
        };
        let kind = entry.kind;
        let Some(list) = entry.typed_mut::<T>() else {
            return;
        };

        if let Some(pos) = list.iter().position(|l| l.ptr_eq(listener)) {
            list.remove(pos);
            debug!("Unsubscribed listener from {}", kind);
        }
        if list.is_empty() {
            entries.remove(&key);
        }
    }

    /// Trigger the event kind `T`, calling every subscribed listener in
    /// subscription order with a clone of `event`.
    ///
    /// The listener list is copied before the first call, so changes made
    /// by the listeners themselves apply from the next trigger on. A
    /// listener that panics is reported as [`Diagnostic::ListenerPanicked`]
    /// and the remaining listeners still run. Nothing happens if `T` has no
    /// listeners.
    pub fn trigger_event<T: Event>(&self, event: T) {
        let (kind, snapshot) = {
            let entries = self.entries.read();
            let Some(entry) = entries.get(&TypeId::of::<T>()) else {
                return;
            };
            let Some(list) = entry.typed::<T>() else {
                return;
            };
            (entry.kind, list.clone())
        };

        trace!("Triggering {} for {} listener(s)", kind, snapshot.len());
        for listener in snapshot.iter() {
            let payload = event.clone();
            let result = panic::catch_unwind(AssertUnwindSafe(|| listener.call(payload)));
            if let Err(panic_err) = result {
                self.report(Diagnostic::ListenerPanicked {
                    kind,
                    message: panic_message(&*panic_err),
                });
            }
        }
    }

    /// Remove every listener of every kind.
    pub fn clear_all_events(&self) {
        self.entries.write().clear();
        debug!("Cleared all events");
    }

    /// Remove every listener of the kind `T`.
    pub fn clear_event<T: Event>(&self) {
        if self.entries.write().remove(&TypeId::of::<T>()).is_some() {
            debug!("Cleared event {}", EventKind::of::<T>());
        }
    }

    /// Returns `true` if `T` has at least one listener.
    pub fn has_listeners<T: Event>(&self) -> bool {
        self.entries.read().contains_key(&TypeId::of::<T>())
    }

    /// Number of listeners subscribed to `T`, counting duplicates.
    pub fn listener_count<T: Event>(&self) -> usize {
        self.entries
            .read()
            .get(&TypeId::of::<T>())
            .map_or(0, |e| e.listeners.len())
    }

    /// Number of kinds with at least one listener.
    pub fn kind_count(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no kind has listeners.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// The kinds that currently have listeners, in no particular order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.entries.read().values().map(|e| e.kind).collect()
    }
}
