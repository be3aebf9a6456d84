//! Long-lived state owned by the host: the event registry and its support.
//!
//! Overview
//! - `diagnostics` – reports for null subscriptions and panicking listeners
//! - `eventconfig` – INI-backed settings for diagnostics
//! - `eventmanager` – the type-keyed listener registry
pub mod diagnostics;
pub mod eventconfig;
pub mod eventmanager;
