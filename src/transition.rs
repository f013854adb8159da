//! Transition records for a symbolic automaton, keyed by source state.
//!
//! Guards and updates are opaque to this crate; the automaton that owns the
//! table decides what a symbolic expression is.

use crate::multi_map::{MultiMap, Values};

/// Identifier of an automaton state.
pub type StateId = i32;

/// One outgoing edge: the target state plus its guard and update expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<G, U> {
    target: StateId,
    guard: G,
    update: U,
}

impl<G, U> Transition<G, U> {
    pub fn new(target: StateId, guard: G, update: U) -> Self {
        Self {
            target,
            guard,
            update,
        }
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    pub fn guard(&self) -> &G {
        &self.guard
    }

    pub fn update(&self) -> &U {
        &self.update
    }
}

/// Outgoing transitions of every state, stored flat in a `MultiMap`.
#[derive(Debug, Clone)]
pub struct TransitionTable<G, U> {
    transitions: MultiMap<Transition<G, U>>,
}

impl<G, U> TransitionTable<G, U> {
    pub fn new() -> Self {
        Self {
            transitions: MultiMap::new(),
        }
    }

    pub fn add(&mut self, source: StateId, transition: Transition<G, U>) {
        self.transitions.insert(source, transition);
    }

    /// Transitions leaving `source`, in unspecified order.
    pub fn from_state(&self, source: StateId) -> Values<'_, Transition<G, U>> {
        self.transitions.get(source)
    }

    /// Drops every transition leaving `source`; returns how many were dropped.
    pub fn remove_state(&mut self, source: StateId) -> usize {
        self.transitions.remove(source)
    }

    /// Total number of transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl<G, U> Default for TransitionTable<G, U> {
    fn default() -> Self {
        Self::new()
    }
}
