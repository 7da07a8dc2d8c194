//! # Runtime Error Type
//!
//! This module defines [`RuntimeError`], the error enum for fatal conditions
//! raised while a compiled grammar runs.  It aggregates failures from:
//!
//! - **Term operations** (foreign handles, kind mismatches, non-ground
//!   matching, re-storing an interned key),
//! - **Primitive contracts** (bad hex digits, empty atoms),
//! - **Output** to the runtime's sink.
//!
//! A production that merely does not match its input is not an error; it
//! returns [`Outcome::Failure`](crate::Outcome::Failure) instead.

use smartstring::alias::String;
use tamsin_terms::TermError;
use thiserror::Error;

/// Represents all fatal errors that can occur while running a grammar.
///
/// [`RuntimeError`] provides a single error surface for primitives and
/// productions.  Conversions from the underlying error types are derived
/// with `#[from]`, so `?` works at call sites without explicit mapping.
///
/// ```rust
/// # use tamsin_runtime::RuntimeError;
/// # use tamsin_terms::{Arena, Term};
/// # fn demo(arena: &mut Arena, a: &Term, b: &Term) -> Result<Term, RuntimeError> {
/// let joined = arena.concat(a, b)?; // TermError -> RuntimeError via #[from]
/// # Ok(joined) }
/// ```
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Term error.
    #[error("term error: {0}")]
    Term(#[from] TermError),

    /// `hexbyte` was given something other than a single hex digit.
    #[error("{0:?} is not a hex digit")]
    BadHexDigit(String),

    /// A primitive that needs at least one byte was given an empty atom.
    #[error("{0} of an empty atom")]
    EmptyAtom(&'static str),

    /// Writing to the runtime's output sink failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("runtime error: {0}")]
    Other(String),
}

/// Return a `RuntimeError::Other` with a formatted message.
///
/// # Example
/// ```rust, ignore
/// bail!("engine stack unbalanced after {}", name);
/// ```
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::RuntimeError::Other(::std::format!($($arg)*).into()))
    };
}
