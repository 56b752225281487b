//! Base trait for feature state in MVI architecture.

/// Marker trait for state snapshots.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (all data a selector needs)
/// - Comparable (PartialEq for detecting changes)
/// - Defaultable (the default is the initial snapshot)
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
