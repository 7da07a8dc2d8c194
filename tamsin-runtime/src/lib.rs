//! # Tamsin Runtime
//!
//! The runtime that compiled Tamsin grammars run against: a backtracking
//! scanner with a stack of tokenization engines, and the primitive
//! recognizers of Tamsin's `$` module.
//!
//! A grammar production is any function or closure
//! `Fn(&mut Runtime) -> Result<Outcome, RuntimeError>`.  It returns
//! [`Outcome::Success`] with the term it produced, [`Outcome::Failure`] with
//! a message term when its input does not match (after rolling the scanner
//! back), or an `Err` for a fatal contract violation.
//!
//! ## Example
//! ```rust
//! use tamsin_runtime::{Outcome, Runtime, RuntimeError, primitives, succeed};
//! use tamsin_terms::Term;
//!
//! // zeroes = ("0" & zeroes → E & return zero(E)) | return nil.
//! fn zeroes(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
//!     if let Outcome::Success(_) = primitives::expect(rt, &Term::byte(b'0'))? {
//!         let e = succeed!(zeroes(rt));
//!         let zero = rt.arena_mut().constructor("zero", [e]);
//!         return Ok(Outcome::Success(zero));
//!     }
//!     Ok(Outcome::Success(Term::NIL))
//! }
//!
//! let mut rt = Runtime::new("00");
//! let result = zeroes(&mut rt).unwrap().term();
//! assert_eq!(result.display(rt.arena()).to_string(), "zero(zero(nil))");
//! ```
//!
//! ## License
//!
//! Copyright (c) 2014-2025 Chris Pressey, Cat's Eye Technologies.
//!
//! Released under a BSD-style license (BSD-3-Clause).

mod engine;
mod error;
mod outcome;
pub mod primitives;
mod runtime;
mod scanner;

pub use engine::{Engine, Named, Production, named};
pub use error::RuntimeError;
pub use outcome::Outcome;
pub use runtime::{Runtime, RuntimeOptions};
pub use scanner::Scanner;
