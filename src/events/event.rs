//! Marker trait for event payloads.

/// A value that can be triggered through the
/// [`EventManager`](crate::resources::eventmanager::EventManager).
///
/// Payloads are plain data: they are cloned once per listener, so a listener
/// never observes changes another listener makes to its own copy. The trait
/// is implemented for every type meeting the bounds, which lets foreign types
/// (a math vector, a tuple) act as event kinds too.
///
/// # Example
///
/// ```
/// use eventmanager::events::event::Event;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct ScoreChanged {
///     points: i32,
/// }
///
/// fn assert_event<T: Event>() {}
/// assert_event::<ScoreChanged>();
/// assert_event::<(f32, f32)>();
/// ```
pub trait Event: Clone + Send + Sync + 'static {}

impl<T> Event for T where T: Clone + Send + Sync + 'static {}
