//! Defines the [`Arena`] type, which owns the storage behind [`Term`]
//! handles.
//!
//! Provides constructors, basic allocation methods, and accessors for
//! working with terms stored in the arena.

use crate::term::VarSlot;
use crate::{Handle, InternalTermError, IntoTerm, Slice, Term, TermError, View};

/// The arena stores long atoms, constructors and variable names.
///
/// An `Arena` owns all memory for the terms of one run.  Terms store only
/// indices into this arena and remain valid as long as the arena lives.
/// Nothing is ever freed or overwritten: terms are persistent, and a
/// constructor's subterms are fixed when it is built.
///
/// Every handle records the randomly generated id of the arena that
/// allocated it, so resolving a handle against a different arena is
/// reported as [`TermError::InvalidTerm`] instead of returning unrelated
/// data.
///
/// ```
/// # use tamsin_terms::Arena;
/// let mut arena = Arena::with_capacity(4096, 1024);
/// let tag = arena.atom("point");
/// let x = arena.atom("x");
/// let y = arena.atom("y");
/// let p = arena.constructor("point", [x, y]);
/// assert_eq!(p.arity(), 2);
/// assert!(arena.equals_atom(&p, &tag).unwrap());
/// ```
#[derive(Default, Clone, Debug)]
pub struct Arena {
    /// Randomly generated Arena ID.
    pub(crate) arena_id: ArenaID,

    /// Storage for atoms too long to be inlined in a handle.
    /// Data are appended sequentially.
    pub(crate) bytes: Vec<u8>,

    /// Storage for constructors.  Each constructor is a contiguous slice
    /// `[tag_atom, sub1, sub2, ...]`; the handle encodes the slice's
    /// starting index and length.
    pub(crate) terms: Vec<Term>,

    /// Name atoms of variables, indexed by [`VarSlot::name`].
    pub(crate) var_names: Vec<Term>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaID(pub(crate) u32); // Random Arena ID

#[derive(Debug, Clone, Copy)]
pub struct ArenaStats {
    pub arena_id: ArenaID,
    pub bytes_len: usize,
    pub terms_len: usize,
    pub vars_len: usize,
}

impl Arena {
    /// Create a new, empty arena with given capacities.
    pub fn with_capacity(bytes_capacity: usize, terms_capacity: usize) -> Self {
        Self {
            arena_id: ArenaID(rand::random()),
            bytes: Vec::with_capacity(bytes_capacity),
            terms: Vec::with_capacity(terms_capacity),
            var_names: Vec::new(),
        }
    }

    /// Create a new, empty arena with default capacities.
    pub fn new() -> Self {
        Self::with_capacity(4096, 1024)
    }

    /// Returns stats.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            arena_id: self.arena_id,
            bytes_len: self.bytes.len(),
            terms_len: self.terms.len(),
            vars_len: self.var_names.len(),
        }
    }

    #[inline]
    fn verify_arena(&self, arena_id: ArenaID) -> Result<(), InternalTermError> {
        if arena_id != self.arena_id {
            return Err(InternalTermError::ForeignArena(arena_id));
        }
        Ok(())
    }

    /// Returns an error if the slice was allocated by another arena or
    /// reaches past the end of the byte storage.
    #[inline]
    fn verify_byte_slice(&self, slice: &Slice) -> Result<(), InternalTermError> {
        self.verify_arena(slice.arena_id)?;
        if (slice.index as usize) + (slice.len as usize) > self.bytes.len() {
            return Err(InternalTermError::InvalidSlice(*slice));
        }
        Ok(())
    }

    /// Returns an error if the slice was allocated by another arena or
    /// reaches past the end of the term storage.
    #[inline]
    fn verify_term_slice(&self, slice: &Slice) -> Result<(), InternalTermError> {
        self.verify_arena(slice.arena_id)?;
        if slice.len == 0 || (slice.index as usize) + (slice.len as usize) > self.terms.len() {
            return Err(InternalTermError::InvalidSlice(*slice));
        }
        Ok(())
    }

    /// Convert a `value` into `Term`.
    #[inline]
    pub fn term<T: IntoTerm>(&mut self, value: T) -> Term {
        value.into_term(self)
    }

    /// Construct an atom holding a copy of `bytes`.  Atoms of up to 14 bytes
    /// (and in particular the 256 single-byte atoms) are inline handles and
    /// never allocate.
    #[inline]
    pub fn atom(&mut self, bytes: impl AsRef<[u8]>) -> Term {
        Term::atom(self, bytes)
    }

    /// Construct a constructor term tagged `tag` over existing subterms.
    #[inline]
    pub fn constructor(
        &mut self,
        tag: impl AsRef<[u8]>,
        subterms: impl IntoIterator<Item = impl IntoTerm>,
    ) -> Term {
        Term::constructor(self, tag, subterms)
    }

    /// Construct a variable term.  The name is used for diagnostics only;
    /// `slot` addresses the caller's bindings array during unification.
    #[inline]
    pub fn var(&mut self, name: impl AsRef<[u8]>, slot: usize) -> Result<Term, TermError> {
        Term::var(self, name, slot)
    }

    /// Concatenate the bytes of two atoms into a new atom.
    ///
    /// Constructors have no flat byte form to concatenate, so passing one
    /// (or a variable) is an error; use [`Arena::flatten`] first.
    pub fn concat(&mut self, lhs: &Term, rhs: &Term) -> Result<Term, TermError> {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(self.atom_bytes(lhs)?);
        buf.extend_from_slice(self.atom_bytes(rhs)?);
        Ok(self.atom(buf))
    }

    /// Returns the bytes if `term` is an atom, otherwise an error.
    #[inline]
    pub fn atom_bytes<'a>(&'a self, term: &'a Term) -> Result<&'a [u8], TermError> {
        match self.view(term)? {
            View::Atom(bytes) => Ok(bytes),
            _ => Err(TermError::UnexpectedKind {
                expected: "atom",
                found: term.kind_name(),
            }),
        }
    }

    /// Returns the atom portion of any term: an atom's bytes, a
    /// constructor's tag, or a variable's name.
    #[inline]
    pub fn name<'a>(&'a self, term: &'a Term) -> Result<&'a [u8], TermError> {
        match self.view(term)? {
            View::Atom(bytes) | View::Var(bytes, _) => Ok(bytes),
            View::Constructor(ar, tag, _) => ar.atom_bytes(tag),
        }
    }

    /// Returns the tag and subterms if `term` is a constructor, otherwise an
    /// error.
    #[inline]
    pub fn unpack_constructor<'a>(
        &'a self,
        term: &'a Term,
    ) -> Result<(&'a Term, &'a [Term]), TermError> {
        match self.view(term)? {
            View::Constructor(_, tag, subterms) => Ok((tag, subterms)),
            _ => Err(TermError::UnexpectedKind {
                expected: "constructor",
                found: term.kind_name(),
            }),
        }
    }

    /// Returns the name and slot if `term` is a variable, otherwise an error.
    #[inline]
    pub fn unpack_var<'a>(&'a self, term: &'a Term) -> Result<(&'a [u8], usize), TermError> {
        match self.view(term)? {
            View::Var(name, slot) => Ok((name, slot)),
            _ => Err(TermError::UnexpectedKind {
                expected: "var",
                found: term.kind_name(),
            }),
        }
    }

    /// Compares the atom portion of `term` with `bytes`, ignoring arity and
    /// subterms.  Used for tag dispatch, e.g. "is this a `list` node".
    #[inline]
    pub fn equals_atom_bytes(&self, term: &Term, bytes: impl AsRef<[u8]>) -> Result<bool, TermError> {
        Ok(self.name(term)? == bytes.as_ref())
    }

    /// Compares the atom portions of two terms, ignoring arity and subterms.
    #[inline]
    pub fn equals_atom(&self, lhs: &Term, rhs: &Term) -> Result<bool, TermError> {
        if lhs == rhs {
            return Ok(true);
        }
        Ok(self.name(lhs)? == self.name(rhs)?)
    }

    /// Copy a byte string into the arena and return its slice descriptor.
    #[inline]
    pub(crate) fn intern_bytes(&mut self, bytes: &[u8]) -> Slice {
        let index = self.bytes.len();
        self.bytes.extend_from_slice(bytes);
        Slice {
            arena_id: self.arena_id,
            index: index as u32,
            len: bytes.len() as u32,
        }
    }

    /// Append a constructor slice (tag + subterms) to the term storage.
    #[inline]
    pub(crate) fn intern_constructor(
        &mut self,
        tag: Term,
        subterms: impl IntoIterator<Item = impl IntoTerm>,
    ) -> Slice {
        // Subterms may themselves allocate constructors, so collect them
        // before claiming the contiguous slice.
        let subterms: Vec<Term> = subterms.into_iter().map(|x| x.into_term(self)).collect();
        let index = self.terms.len();
        self.terms.push(tag);
        self.terms.extend(subterms);
        let len = self.terms.len() - index;
        Slice {
            arena_id: self.arena_id,
            index: index as u32,
            len: len as u32,
        }
    }

    /// Record a variable name and return the variable's payload.
    #[inline]
    pub(crate) fn intern_var(&mut self, name: Term, slot: u32) -> VarSlot {
        let index = self.var_names.len();
        self.var_names.push(name);
        VarSlot {
            arena_id: self.arena_id,
            name: index as u32,
            slot,
        }
    }

    /// Borrow a slice of bytes stored in the arena.
    /// Users should go through [`Term::view`] instead.
    #[inline]
    pub(crate) fn byte_slice<'a>(&'a self, slice: &Slice) -> Result<&'a [u8], InternalTermError> {
        self.verify_byte_slice(slice)?;
        Ok(&self.bytes[(slice.index as usize)..((slice.index + slice.len) as usize)])
    }

    /// Borrow the slice of terms comprising a constructor.
    #[inline]
    pub(crate) fn term_slice<'a>(&'a self, slice: &Slice) -> Result<&'a [Term], InternalTermError> {
        self.verify_term_slice(slice)?;
        Ok(&self.terms[(slice.index as usize)..((slice.index + slice.len) as usize)])
    }

    /// Borrow the name atom of a variable.
    #[inline]
    pub(crate) fn var_name<'a>(&'a self, var: &VarSlot) -> Result<&'a Term, InternalTermError> {
        self.verify_arena(var.arena_id)?;
        self.var_names
            .get(var.name as usize)
            .ok_or(InternalTermError::ForeignArena(var.arena_id))
    }

    /// Returns the first byte of the flattened rendering of `term` without
    /// building it, or `None` if that rendering is empty.
    pub fn first_byte(&self, term: &Term) -> Result<Option<u8>, TermError> {
        match self.view(term)? {
            View::Atom(bytes) | View::Var(bytes, _) => Ok(bytes.first().copied()),
            View::Constructor(ar, tag, _) => {
                Ok(Some(ar.atom_bytes(tag)?.first().copied().unwrap_or(b'(')))
            }
        }
    }

    /// Returns `true` if the handle resolves in this arena.
    pub fn owns(&self, term: &Term) -> bool {
        match &term.0 {
            Handle::Atom(_) => true,
            _ => term.view(self).is_ok(),
        }
    }
}
