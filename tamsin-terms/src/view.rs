//! Defines [`View`], a borrowed read-only representation of a [`Term`].
//!
//! Provides lightweight accessors for inspecting terms without allocation.

use crate::{Arena, Handle, Term, TermError};
use core::fmt;

impl fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            View::Atom(a) => f
                .debug_tuple("Atom")
                .field(&String::from_utf8_lossy(a))
                .finish(),
            View::Var(name, slot) => f
                .debug_tuple("Var")
                .field(&String::from_utf8_lossy(name))
                .field(slot)
                .finish(),
            View::Constructor(a, tag, ts) => f
                .debug_tuple("Constructor")
                .field(&a.arena_id)
                .field(&tag.view(a))
                .field(&ts.iter().map(|t| t.view(a)).collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// A borrowed view into the contents of a [`Term`].
///
/// Use [`Term::view`] to obtain a view.  No allocations are performed when
/// constructing a `View`; references into the handle or the arena are
/// returned directly.  The lifetime `'a` binds the returned references to
/// both the borrowed `Term` and the supplied `Arena`.
#[derive(Clone, Copy)]
pub enum View<'a> {
    /// Atom bytes borrowed from the term or arena.
    Atom(&'a [u8]),
    /// A constructor: its tag atom and the slice of subterm handles, both
    /// owned by the arena.
    Constructor(&'a Arena, &'a Term, &'a [Term]),
    /// A variable's name and binding slot.
    Var(&'a [u8], usize),
}

impl Term {
    /// Produce a [`View`] of this term that borrows from the given
    /// [`Arena`].  Fails if the handle was not allocated by `arena`.
    #[inline]
    pub fn view<'a>(&'a self, arena: &'a Arena) -> Result<View<'a>, TermError> {
        match &self.0 {
            Handle::Atom(a) => Ok(View::Atom(a.as_slice())),
            Handle::AtomRef(ar) => Ok(View::Atom(
                arena
                    .byte_slice(ar)
                    .map_err(|_| TermError::InvalidTerm(*self))?,
            )),
            Handle::ConsRef(cr) => {
                let slice = arena
                    .term_slice(cr)
                    .map_err(|_| TermError::InvalidTerm(*self))?;
                // Tag is the first element of the slice
                Ok(View::Constructor(arena, &slice[0], &slice[1..]))
            }
            Handle::Var(v) => {
                let name = arena
                    .var_name(v)
                    .map_err(|_| TermError::InvalidTerm(*self))?;
                match name.view(arena)? {
                    View::Atom(bytes) => Ok(View::Var(bytes, v.slot as usize)),
                    _ => Err(TermError::InvalidTerm(*self)),
                }
            }
        }
    }
}

impl Arena {
    /// Produce a [`View`] of the given `term` that borrows from
    /// this [`Arena`].  See [`View`] for details.
    #[inline]
    pub fn view<'a>(&'a self, term: &'a Term) -> Result<View<'a>, TermError> {
        term.view(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_of_long_atom() {
        let mut arena = Arena::new();
        let x = arena.atom("Hello, hello, quite long long atom, world! X");
        match arena.view(&x).unwrap() {
            View::Atom(bytes) => assert_eq!(bytes, b"Hello, hello, quite long long atom, world! X"),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn debug_of_nested_view() {
        let mut arena = Arena::new();
        let x = arena.atom("x");
        let v = arena.var("V", 1).unwrap();
        let t = arena.constructor("f", [x, v]);
        let s = format!("{:?}", t.view(&arena).unwrap());
        assert!(s.contains("\"f\""), "s={s}");
        assert!(s.contains("Var(\"V\", 1)"), "s={s}");
    }
}
