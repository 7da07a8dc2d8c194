//! # Tamsin Terms
//!
//! Arena-backed terms for the Tamsin runtime.
//!
//! A Tamsin term is an atom (an arbitrary byte string), a constructor (a
//! tag plus an ordered sequence of subterms) or a variable (a diagnostic
//! name plus a slot in a caller-owned bindings array).  This crate provides
//! the compact, copyable [`Term`] handle, the [`Arena`] that stores long
//! atoms and constructors, the `flatten` and `repr` renderings, an
//! [`InternTable`] for hash-consing, and the structural [`equal`] and
//! [`unify`] operations.
//!
//! A term handle is 16 bytes.  Atoms of up to [`INLINE_ATOM_LEN`] bytes live
//! inside the handle itself, which makes the 256 single-byte atoms produced
//! by the scanner canonical and allocation free.  Terms are inspected with
//! [`Term::view`], which yields a [`View`] borrowing from the arena.
//!
//! ## Example
//! ```rust
//! # use tamsin_terms::{Arena, constructor, equal, unify, var};
//! let mut arena = Arena::new();
//!
//! let greeting = constructor!["greeting"; "hello", "a rather long world" => &mut arena];
//! let flat = arena.flatten(&greeting).unwrap();
//! assert_eq!(arena.atom_bytes(&flat).unwrap(), b"greeting(hello, a rather long world)");
//!
//! // match it against a pattern with one variable
//! let who = var!("Who", 0 => &mut arena).unwrap();
//! let pattern = constructor!["greeting"; "hello", who => &mut arena];
//! let mut bindings = vec![None];
//! assert!(unify(&arena, &pattern, &greeting, &mut bindings).unwrap());
//! let bound = bindings[0].unwrap();
//! assert_eq!(arena.atom_bytes(&bound).unwrap(), b"a rather long world");
//! assert!(!equal(&arena, &bound, &flat).unwrap());
//! ```
//!
//! ## License
//!
//! Copyright (c) 2014-2025 Chris Pressey, Cat's Eye Technologies.
//!
//! Released under a BSD-style license (BSD-3-Clause).

mod arena;
mod display;
mod error;
mod intern;
mod matcher;
mod term;
mod view;

pub use arena::{Arena, ArenaID, ArenaStats};
pub use display::TermDisplay;
pub(crate) use error::InternalTermError;
pub use error::TermError;
pub use intern::{DEFAULT_BUCKETS, InternTable, hashpjw};
pub use matcher::{Bindings, bindings_for, equal, is_ground, slot_count, unify};
pub(crate) use term::{Handle, Slice};
pub use term::{INLINE_ATOM_LEN, IntoTerm, Term};
pub use view::View;
