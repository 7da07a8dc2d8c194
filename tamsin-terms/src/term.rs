//! Defines the core [`Term`] type and related constructors.
//!
//! A term is exactly one of an atom, a constructor or a variable.  Terms
//! are immutable once built and are shared by handle, so a term graph is
//! always a DAG.

use crate::{Arena, ArenaID, TermError};
use core::fmt;
use std::borrow::Cow;

/// Number of atom bytes that fit directly in a [`Term`] handle.
pub const INLINE_ATOM_LEN: usize = 14;

// A term is a tagged handle.  Short atoms live entirely inside the handle;
// long atoms, constructors and variables carry an index into the arena that
// allocated them, together with that arena's id.

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct TinyArray {
    pub(crate) bytes: [u8; INLINE_ATOM_LEN],
    pub(crate) len: u8,
}

impl TinyArray {
    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Slice {
    pub(crate) arena_id: ArenaID,
    pub(crate) index: u32,
    pub(crate) len: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct VarSlot {
    pub(crate) arena_id: ArenaID,
    /// Index of the variable's name atom in the arena's name table.
    pub(crate) name: u32,
    pub(crate) slot: u32,
}

/// Internal handle describing the kind of a term and storing its data.
///
/// The `repr(u8)` attribute keeps the discriminant to a single byte, which
/// together with the payloads yields a `Term` size of 16 bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub(crate) enum Handle {
    Atom(TinyArray),
    AtomRef(Slice),
    /// Slice of the arena's term storage: `[tag, sub1, ..., subN]`.
    ConsRef(Slice),
    Var(VarSlot),
}

/// A compact, copyable handle referencing a term stored in an [`Arena`].
///
/// Two handles compare equal with `==` only if they are the same handle:
/// identical inline atoms, or the same arena allocation.  Structural
/// equality of term values is [`crate::equal`].
///
/// Instances of `Term` are cheap to copy (`Copy` and `Clone`).
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Term(pub(crate) Handle);

impl AsRef<Term> for Term {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Conversion of Rust values into terms allocated in an [`Arena`].
///
/// Strings and byte slices become atoms, terms pass through, and closures
/// taking the arena are called, so the construction macros can nest.
pub trait IntoTerm {
    fn into_term(self, arena: &mut Arena) -> Term;
}

impl IntoTerm for &str {
    #[inline]
    fn into_term(self, arena: &mut Arena) -> Term {
        Term::atom(arena, self)
    }
}

impl IntoTerm for &[u8] {
    #[inline]
    fn into_term(self, arena: &mut Arena) -> Term {
        Term::atom(arena, self)
    }
}

impl<const N: usize> IntoTerm for &[u8; N] {
    #[inline]
    fn into_term(self, arena: &mut Arena) -> Term {
        Term::atom(arena, self)
    }
}

impl IntoTerm for Cow<'_, [u8]> {
    #[inline]
    fn into_term(self, arena: &mut Arena) -> Term {
        Term::atom(arena, self)
    }
}

impl IntoTerm for String {
    #[inline]
    fn into_term(self, arena: &mut Arena) -> Term {
        Term::atom(arena, self)
    }
}

impl IntoTerm for Vec<u8> {
    #[inline]
    fn into_term(self, arena: &mut Arena) -> Term {
        Term::atom(arena, self)
    }
}

impl IntoTerm for u8 {
    #[inline]
    fn into_term(self, _arena: &mut Arena) -> Term {
        Term::byte(self)
    }
}

impl IntoTerm for Term {
    #[inline]
    fn into_term(self, _arena: &mut Arena) -> Term {
        self
    }
}

impl IntoTerm for &Term {
    #[inline]
    fn into_term(self, _arena: &mut Arena) -> Term {
        *self
    }
}

impl<F> IntoTerm for F
where
    F: FnOnce(&mut Arena) -> Term,
{
    #[inline]
    fn into_term(self, arena: &mut Arena) -> Term {
        self(arena)
    }
}

impl Term {
    /// The canonical atom for a single byte.
    ///
    /// There is exactly one handle per byte value and it never touches an
    /// arena, so every producer of "the atom for byte `b`" shares it.
    #[inline]
    pub const fn byte(b: u8) -> Self {
        let mut bytes = [0u8; INLINE_ATOM_LEN];
        bytes[0] = b;
        Self(Handle::Atom(TinyArray { bytes, len: 1 }))
    }

    /// The empty atom.
    pub const EMPTY: Self = Self(Handle::Atom(TinyArray {
        bytes: [0; INLINE_ATOM_LEN],
        len: 0,
    }));

    /// The atom `nil`, the conventional list terminator.
    pub const NIL: Self = {
        let buf: [u8; INLINE_ATOM_LEN] = [b'n', b'i', b'l', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        Self(Handle::Atom(TinyArray { bytes: buf, len: 3 }))
    };

    /// Construct an atom.  Atoms of up to [`INLINE_ATOM_LEN`] bytes are
    /// inlined directly into the handle; longer atoms are copied into the
    /// arena and referenced by index and length.
    #[inline]
    pub fn atom(arena: &mut Arena, bytes: impl AsRef<[u8]>) -> Self {
        let bytes = bytes.as_ref();
        if bytes.len() <= INLINE_ATOM_LEN {
            let mut buf = [0u8; INLINE_ATOM_LEN];
            buf[..bytes.len()].copy_from_slice(bytes);
            Self(Handle::Atom(TinyArray {
                bytes: buf,
                len: bytes.len() as u8,
            }))
        } else {
            Self(Handle::AtomRef(arena.intern_bytes(bytes)))
        }
    }

    /// Construct a constructor term.  The tag is stored as an atom followed
    /// by the subterm handles; subterms are referenced, never copied.  An
    /// empty subterm sequence still yields a constructor (of arity 0).
    #[inline]
    pub fn constructor(
        arena: &mut Arena,
        tag: impl AsRef<[u8]>,
        subterms: impl IntoIterator<Item = impl IntoTerm>,
    ) -> Self {
        let tag = Self::atom(arena, tag);
        Self(Handle::ConsRef(arena.intern_constructor(tag, subterms)))
    }

    /// Construct a variable with the given diagnostic name and binding slot.
    ///
    /// Errors if `slot` does not fit in the handle.
    #[inline]
    pub fn var(arena: &mut Arena, name: impl AsRef<[u8]>, slot: usize) -> Result<Self, TermError> {
        let slot = u32::try_from(slot).map_err(|_| TermError::SlotOutOfRange {
            slot,
            limit: u32::MAX as usize,
        })?;
        let name = Self::atom(arena, name);
        Ok(Self(Handle::Var(arena.intern_var(name, slot))))
    }

    /// Returns `true` if the value lives entirely inside the handle.
    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(self.0, Handle::Atom(_))
    }

    /// Returns `true` if the term is an atom.
    #[inline]
    pub fn is_atom(&self) -> bool {
        matches!(self.0, Handle::Atom(_) | Handle::AtomRef(_))
    }

    /// Returns `true` if the term is a constructor.
    #[inline]
    pub fn is_constructor(&self) -> bool {
        matches!(self.0, Handle::ConsRef(_))
    }

    /// Returns `true` if the term is a variable.
    #[inline]
    pub fn is_var(&self) -> bool {
        matches!(self.0, Handle::Var(_))
    }

    /// Returns the number of subterms.  Atoms and variables have arity 0,
    /// as does a constructor built without subterms.
    #[inline]
    pub fn arity(&self) -> usize {
        match &self.0 {
            Handle::ConsRef(Slice { len, .. }) => (*len - 1) as usize,
            Handle::Atom(_) | Handle::AtomRef(_) | Handle::Var(_) => 0,
        }
    }

    /// Returns the slot index if the term is a variable.
    #[inline]
    pub fn slot(&self) -> Option<usize> {
        match &self.0 {
            Handle::Var(v) => Some(v.slot as usize),
            _ => None,
        }
    }

    /// Returns a string describing the kind of this term.
    #[inline]
    pub fn kind_name(&self) -> &'static str {
        match &self.0 {
            Handle::Atom(_) | Handle::AtomRef(_) => "atom",
            Handle::ConsRef(_) => "constructor",
            Handle::Var(_) => "var",
        }
    }

    /// Returns the atom bytes if this is an atom.
    #[inline]
    pub fn atom_bytes<'a>(&'a self, arena: &'a Arena) -> Result<&'a [u8], TermError> {
        arena.atom_bytes(self)
    }

    /// Returns the atom portion of any term: the atom itself, the tag of a
    /// constructor, or the name of a variable.
    #[inline]
    pub fn name<'a>(&'a self, arena: &'a Arena) -> Result<&'a [u8], TermError> {
        arena.name(self)
    }
}

/// Implements the standard [`Debug`] formatter for [`Term`].
///
/// Inline atoms are shown with their content; arena references show the
/// index and length.  The output is meant for diagnostics only.
impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Handle::Atom(a) => f
                .debug_struct("Atom")
                .field("name", &String::from_utf8_lossy(a.as_slice()))
                .finish(),
            Handle::AtomRef(v) => f
                .debug_struct("AtomRef")
                .field("arena_id", &v.arena_id)
                .field("index", &v.index)
                .field("len", &v.len)
                .finish(),
            Handle::ConsRef(v) => f
                .debug_struct("Constructor")
                .field("arena_id", &v.arena_id)
                .field("index", &v.index)
                .field("arity", &(v.len - 1))
                .finish(),
            Handle::Var(v) => f
                .debug_struct("Var")
                .field("arena_id", &v.arena_id)
                .field("name", &v.name)
                .field("slot", &v.slot)
                .finish(),
        }
    }
}

/// Convenience macros to construct atoms, constructors and variables.
///
/// Without the trailing `=> arena` each macro yields a closure taking the
/// arena, so constructions nest.
#[macro_export]
macro_rules! constructor {
    // explicit arena
    ($tag:expr; $($arg:expr),* $(,)? => $arena:expr) => {
        $crate::constructor!($tag; $($arg),*)($arena)
    };
    // implicit arena
    ($tag:expr; $($arg:expr),* $(,)?) => { (|__arena: &mut $crate::Arena| {
        let __args: &[$crate::Term] = &[$($crate::IntoTerm::into_term($arg, __arena)),*];
        __arena.constructor($tag, __args)
    })};
}

#[macro_export]
macro_rules! atom {
    // explicit arena
    ($bytes:expr => $arena:expr) => {
        $crate::atom!($bytes)($arena)
    };
    // implicit arena
    ($bytes:expr) => {
        (|__arena: &mut $crate::Arena| __arena.atom($bytes))
    };
}

#[macro_export]
macro_rules! var {
    ($name:expr, $slot:expr => $arena:expr) => {
        $arena.var($name, $slot)
    };
}
