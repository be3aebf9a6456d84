//! Event identity and listener types.
//!
//! An event is any plain data type. Its Rust type is both the identity of
//! the event kind and the payload handed to listeners when the kind is
//! triggered, so listeners for `ScoreChanged` always receive a
//! `ScoreChanged` value.
//!
//! Submodules:
//! - [`event`] – the [`Event`](event::Event) marker trait for payload types
//! - [`kind`] – [`EventKind`](kind::EventKind), the type tag keying the registry
//! - [`listener`] – [`Listener`](listener::Listener), the shared callback handle
//!
//! The registry that stores listeners lives in
//! [`crate::resources::eventmanager`].
pub mod event;
pub mod kind;
pub mod listener;
