//! Type tag identifying an event kind.

use crate::events::event::Event;
use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Static identity of an event kind.
///
/// Two kinds are equal iff they were built from the same payload type. The
/// type name is carried only for diagnostics and logs.
#[derive(Debug, Clone, Copy)]
pub struct EventKind {
    id: TypeId,
    name: &'static str,
}

impl EventKind {
    /// Kind of the payload type `T`.
    pub fn of<T: Event>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The `TypeId` used as registry key.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified name of the payload type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventKind {}

impl Hash for EventKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
