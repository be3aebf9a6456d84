//! Typed event manager.
//!
//! Callers subscribe listeners to an event kind, identified by a plain data
//! type, and later trigger that kind with a value of the type. Every listener
//! subscribed to the kind is called synchronously, in subscription order, on
//! the caller's thread.
//!
//! - [`events`] – event identity and listener handles
//! - [`resources`] – the [`EventManager`] registry, its diagnostics and config

pub mod events;
pub mod resources;

pub use events::event::Event;
pub use events::kind::EventKind;
pub use events::listener::Listener;
pub use resources::diagnostics::{ChannelSink, Diagnostic, DiagnosticSink, LogSink, NoopSink};
pub use resources::eventconfig::{EventManagerConfig, SinkKind};
pub use resources::eventmanager::EventManager;
