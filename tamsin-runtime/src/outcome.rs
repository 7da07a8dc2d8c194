//! The value every primitive and production returns.

use tamsin_terms::Term;

/// Result of running a recognizer.
///
/// `Success` carries the produced term; `Failure` carries an atom describing
/// the mismatch.  A failing recognizer has already rolled the scanner back
/// to its last commit, so alternatives can be tried directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success(Term),
    Failure(Term),
}

impl Outcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// The produced term or the failure message.
    #[inline]
    pub fn term(&self) -> Term {
        match self {
            Outcome::Success(t) | Outcome::Failure(t) => *t,
        }
    }

    /// The produced term, if successful.
    #[inline]
    pub fn success(self) -> Option<Term> {
        match self {
            Outcome::Success(t) => Some(t),
            Outcome::Failure(_) => None,
        }
    }

    /// Converts into a `Result`, with the failure message as the error.
    #[inline]
    pub fn into_result(self) -> Result<Term, Term> {
        match self {
            Outcome::Success(t) => Ok(t),
            Outcome::Failure(t) => Err(t),
        }
    }
}

/// Evaluates a production call and yields its term, returning the failure
/// from the enclosing production otherwise.  This is the sequencing `&` of a
/// compiled grammar.
///
/// # Example
/// ```rust
/// # use tamsin_runtime::{Outcome, Runtime, RuntimeError, primitives, succeed};
/// # use tamsin_terms::Term;
/// fn two_zeroes(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
///     let zero = Term::byte(b'0');
///     succeed!(primitives::expect(rt, &zero));
///     succeed!(primitives::expect(rt, &zero));
///     Ok(Outcome::Success(Term::NIL))
/// }
/// let mut rt = Runtime::new("00");
/// assert!(two_zeroes(&mut rt).unwrap().is_success());
/// ```
#[macro_export]
macro_rules! succeed {
    ($call:expr) => {
        match $call? {
            $crate::Outcome::Success(term) => term,
            failure => return Ok(failure),
        }
    };
}
