//! Reporting hook for registry anomalies.
//!
//! The [`EventManager`](crate::resources::eventmanager::EventManager) never
//! fails its caller. The two conditions worth telling someone about are sent
//! to a [`DiagnosticSink`] instead:
//!
//! - a null listener was passed to `subscribe`
//! - a listener panicked while an event was being triggered
//!
//! The default sink writes through the `log` facade. [`ChannelSink`] hands
//! reports to another thread over a `crossbeam_channel`, in the same way the
//! engine's audio thread talks back to the main loop.

use crate::events::kind::EventKind;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::fmt;

/// A condition reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `subscribe` was called without a listener. Nothing was registered.
    NullListener { kind: EventKind },
    /// A listener panicked. The remaining listeners still ran.
    ListenerPanicked { kind: EventKind, message: String },
}

impl Diagnostic {
    /// The event kind the report is about.
    pub fn kind(&self) -> EventKind {
        match self {
            Diagnostic::NullListener { kind } => *kind,
            Diagnostic::ListenerPanicked { kind, .. } => *kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NullListener { kind } => {
                write!(f, "Subscription attempt to {kind} event had null listener.")
            }
            Diagnostic::ListenerPanicked { kind, message } => {
                write!(
                    f,
                    "Panic caught when triggering {kind} event listener: {message}"
                )
            }
        }
    }
}

/// Destination for [`Diagnostic`] reports.
///
/// Any `Fn(Diagnostic) + Send + Sync` closure is a sink.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Writes every report as an error through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        log::error!("{}", diagnostic);
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Forwards reports over a channel.
///
/// Create one with [`ChannelSink::new`] and keep the returned receiver on
/// whatever thread displays or records the reports. If the receiver was
/// dropped, reports are silently discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<Diagnostic>,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its unbounded channel.
    pub fn new() -> (Self, Receiver<Diagnostic>) {
        let (tx, rx) = unbounded::<Diagnostic>();
        (Self { tx }, rx)
    }

    /// Wrap an existing sender.
    pub fn from_sender(tx: Sender<Diagnostic>) -> Self {
        Self { tx }
    }
}

impl DiagnosticSink for ChannelSink {
    fn report(&self, diagnostic: Diagnostic) {
        let _ = self.tx.send(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct Explosion;

    #[test]
    fn display_null_listener() {
        let d = Diagnostic::NullListener {
            kind: EventKind::of::<Explosion>(),
        };
        let text = d.to_string();
        assert!(text.starts_with("Subscription attempt to "));
        assert!(text.contains("Explosion"));
        assert!(text.ends_with(" event had null listener."));
    }

    #[test]
    fn display_listener_panicked() {
        let d = Diagnostic::ListenerPanicked {
            kind: EventKind::of::<Explosion>(),
            message: "boom".into(),
        };
        let text = d.to_string();
        assert!(text.starts_with("Panic caught when triggering "));
        assert!(text.ends_with("Explosion event listener: boom"));
        assert_eq!(d.kind(), EventKind::of::<Explosion>());
    }

    #[test]
    fn channel_sink_delivers_in_order() {
        let (sink, rx) = ChannelSink::new();
        let kind = EventKind::of::<Explosion>();
        sink.report(Diagnostic::NullListener { kind });
        sink.report(Diagnostic::ListenerPanicked {
            kind,
            message: "x".into(),
        });

        let got: Vec<Diagnostic> = rx.try_iter().collect();
        assert_eq!(got.len(), 2);
        assert!(matches!(got[0], Diagnostic::NullListener { .. }));
        assert!(matches!(got[1], Diagnostic::ListenerPanicked { .. }));
    }

    #[test]
    fn channel_sink_from_existing_sender() {
        let (tx, rx) = unbounded::<Diagnostic>();
        let sink = ChannelSink::from_sender(tx.clone());
        let kind = EventKind::of::<Explosion>();

        tx.send(Diagnostic::NullListener { kind }).unwrap();
        sink.report(Diagnostic::ListenerPanicked {
            kind,
            message: "late".into(),
        });

        let got: Vec<Diagnostic> = rx.try_iter().collect();
        assert_eq!(got.len(), 2);
        assert_eq!(
            got[1],
            Diagnostic::ListenerPanicked {
                kind,
                message: "late".into()
            }
        );
    }

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.report(Diagnostic::NullListener {
            kind: EventKind::of::<Explosion>(),
        });
    }

    #[test]
    fn closure_is_a_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store = seen.clone();
        let sink = move |d: Diagnostic| store.lock().unwrap().push(d);
        sink.report(Diagnostic::NullListener {
            kind: EventKind::of::<Explosion>(),
        });
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
