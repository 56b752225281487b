//! Base trait for intents (user/system actions) in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (editing a view, changing the row limit)
/// - Completion events of asynchronous operations (API responses)
/// - Events owned by neighbouring feature slices
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
