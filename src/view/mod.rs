//! The "View" feature slice: SQL view definitions, source metadata mirrors
//! and SQL validation state.

pub mod decode;
pub mod event;
pub mod reconcile;
mod reducer;
mod state;
pub mod types;

pub use decode::{DecodeError, EncodedField};
pub use event::{Envelope, EventError, ResponseHeader, SqlResponse, ViewEvent};
pub use reducer::ViewReducer;
pub use state::ViewState;
