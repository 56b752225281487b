//! Model-View-Intent (MVI) architecture primitives.
//!
//! This module provides base traits for implementing unidirectional
//! data flow between event producers and state consumers.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ Selectors / Rendering
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot of a feature slice
//! - **Intent**: User actions or completion events from async operations
//! - **Reducer**: Pure function that transforms state based on intents

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
