#![warn(clippy::missing_docs_in_private_items)]

//! The deterministic state-machine substrate: state, state-change and event
//! types plus the manager which applies state changes and collects the
//! resulting events.
//!
//! Failure recovery relies on a write-ahead log of state changes. After a
//! restart the latest snapshot is loaded and the pending state changes are
//! reapplied, which is only sound if the transition function is
//! deterministic and every state-change handler is idempotent. Transition
//! functions therefore never read the clock, the environment or any source
//! of randomness, and inputs and outputs are kept in separate sealed
//! hierarchies (`StateChange` in, `Event` out) so that a transition result
//! is self contained and serializable.

/// State machine errors.
pub mod errors;
/// The state manager.
pub mod manager;
#[cfg(test)]
mod tests;
/// State machine types.
pub mod types;
