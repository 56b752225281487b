//! State slice for SQL view definitions of an analytics dashboard.
//!
//! [`view::ViewReducer`] maps `(snapshot, event)` to a new snapshot;
//! [`store::ViewStore`] owns the current snapshot and applies events in
//! order; [`replay`] drives a store from a recorded event log.

pub mod config;
pub mod logging;
pub mod mvi;
pub mod replay;
pub mod store;
pub mod view;
