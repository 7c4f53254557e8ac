#![warn(clippy::missing_docs_in_private_items)]

mod event;
mod state;
mod state_change;

pub use self::{
	event::*,
	state::*,
	state_change::*,
};

/// Marker for application states.
///
/// Notes:
/// - State values may be nested, but the same data must not live in two
///   places; use identifiers instead.
/// - State types carry no logic.
/// - Each transition operates on a fresh copy of the state, treating the
///   old value as immutable; `Clone` is what makes the frozen snapshot
///   possible.
pub trait State: Clone + std::fmt::Debug {}
