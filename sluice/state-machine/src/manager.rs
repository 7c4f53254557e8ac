#![warn(clippy::missing_docs_in_private_items)]

use tracing::debug;

use crate::{
	errors::StateTransitionError,
	types::{
		Event,
		State,
		StateChange,
	},
};

/// Convenience result alias for state transitions.
pub type Result<T> = std::result::Result<T, StateTransitionError>;

/// The result of applying a single state change.
///
/// A sub-task signals its completion by returning `new_state: None`; the
/// parent machine is then responsible for dropping its reference to the
/// task. The top-level application state never transitions to `None`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransitionResult<S> {
	pub new_state: Option<S>,
	pub events: Vec<Event>,
}

/// A pure state-transition function.
///
/// This is a plain function pointer on purpose: a transition must not
/// capture an environment, read the clock or draw randomness. Replaying a
/// write-ahead log after a crash re-executes the recorded state changes
/// and has to reproduce the pre-crash state bit for bit.
///
/// A transition must not fail on untrusted input; a state change it does
/// not expect yields the unchanged state and no events. Handlers must also
/// be idempotent, since the transport may redeliver and a recovering
/// partner may resend.
pub type TransitionFunction<S> = fn(Option<S>, StateChange) -> Result<TransitionResult<S>>;

/// The mutable storage for the application state. State transitions are
/// done by applying `StateChange`s to the current state, one at a time;
/// concurrent dispatch would break replay determinism.
pub struct StateManager<S: State> {
	pub current_state: Option<S>,
	transition: TransitionFunction<S>,
}

impl<S: State> StateManager<S> {
	pub fn new(transition: TransitionFunction<S>, current_state: Option<S>) -> Self {
		Self { current_state, transition }
	}

	/// Apply `state_change` and return the state before the change along
	/// with the events the transition produced, in emission order. Deciding
	/// what to do with the events is the caller's business.
	///
	/// The transition runs on its own copy of the state; the returned
	/// previous state stays frozen no matter what later dispatches do.
	pub fn dispatch(&mut self, state_change: StateChange) -> Result<(Option<S>, Vec<Event>)> {
		let previous_state = self.current_state.clone();

		let result = (self.transition)(previous_state.clone(), state_change)?;

		self.current_state = result.new_state;
		Ok((previous_state, result.events))
	}
}

/// Rebuild a manager by folding recorded state changes onto a snapshot.
/// Used on crash recovery: the last snapshot plus the write-ahead log
/// yield a state identical to the one before the crash.
pub fn replay<S: State>(
	transition: TransitionFunction<S>,
	snapshot: Option<S>,
	state_changes: impl IntoIterator<Item = StateChange>,
) -> Result<(StateManager<S>, Vec<Event>)> {
	let mut state_manager = StateManager::new(transition, snapshot);

	let mut events = vec![];
	let mut count: u64 = 0;
	for state_change in state_changes {
		debug!(state_change = state_change.type_name(), "Replaying state change");
		let (_previous, mut state_change_events) = state_manager.dispatch(state_change)?;
		events.append(&mut state_change_events);
		count += 1;
	}
	debug!(count, "Replay complete");

	Ok((state_manager, events))
}
