//! Defines [`TermError`], the unified error type for term operations.
//!
//! Every variant is a contract violation: something the grammar compiler or
//! the runtime promised not to do.  Grammar-level mismatches are never
//! reported through this type.

use crate::{ArenaID, Slice, Term};
use smartstring::alias::String;
use thiserror::Error;

/// Represents all possible errors that can occur while building, rendering,
/// interning or matching terms.
///
/// [`TermError`] provides a single error surface for the term store.  Callers
/// higher up wrap it with `#[from]` so that `?` works without explicit
/// mapping.
#[derive(Debug, Clone, Error)]
pub enum TermError {
    #[error("Invalid term {0:?}")]
    InvalidTerm(Term),

    #[error("Type mismatch: expected {expected}, found {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: &'static str,
    },

    /// A variable appeared where only ground terms are allowed.
    #[error("Variable {0:?} in a term that must be ground")]
    NonGround(Term),

    #[error("Variable slot {slot} out of range (limit {limit})")]
    SlotOutOfRange { slot: usize, limit: usize },

    /// The interning table is write-once per key.
    #[error("Atom {0:?} is already interned")]
    AlreadyInterned(String),
}

/// Internal errors that may occur when resolving handles against an arena.
#[derive(Debug, Clone, Error)]
pub(crate) enum InternalTermError {
    /// The handle was allocated by another arena.
    #[error("foreign arena: {0:?}")]
    ForeignArena(ArenaID),

    /// Invalid slice.
    #[error("invalid term slice: {0:?}")]
    InvalidSlice(Slice),
}
