//! Defines [`Runtime`], the context a compiled grammar runs in.

use crate::{Engine, Outcome, Production, RuntimeError, Scanner, bail};
use core::fmt;
use std::io::{self, Write};
use std::rc::Rc;
use tamsin_terms::{Arena, DEFAULT_BUCKETS, INLINE_ATOM_LEN, InternTable, Term};

/// Capacity settings for a [`Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Initial capacity of the arena's byte storage.
    pub arena_bytes: usize,
    /// Initial capacity of the arena's term storage.
    pub arena_terms: usize,
    /// Number of buckets in the atom interning table.
    pub intern_buckets: usize,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            arena_bytes: 4096,
            arena_terms: 1024,
            intern_buckets: DEFAULT_BUCKETS,
        }
    }
}

/// Everything one run of a grammar needs: the term arena, the atom
/// interning table, the scanner over the input, and an output sink for
/// `emit` and `print`.
///
/// ```rust
/// # use tamsin_runtime::Runtime;
/// let mut rt = Runtime::new("hé");
/// let h = rt.scan().unwrap().unwrap();
/// let e = rt.scan().unwrap().unwrap();
/// assert_eq!(rt.arena().atom_bytes(&h).unwrap(), b"h");
/// assert_eq!(rt.arena().atom_bytes(&e).unwrap(), "é".as_bytes());
/// assert!(rt.scan().unwrap().is_none());
/// ```
pub struct Runtime {
    pub(crate) arena: Arena,
    pub(crate) atoms: InternTable,
    pub(crate) scanner: Scanner,
    pub(crate) output: Box<dyn Write>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("arena", &self.arena.stats())
            .field("atoms", &self.atoms.len())
            .field("scanner", &self.scanner)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// Create a runtime over `input` with default options, writing output to
    /// standard output.
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        Self::with_options(input, RuntimeOptions::default())
    }

    pub fn with_options(input: impl Into<Vec<u8>>, options: RuntimeOptions) -> Self {
        Self {
            arena: Arena::with_capacity(options.arena_bytes, options.arena_terms),
            atoms: InternTable::new(options.intern_buckets),
            scanner: Scanner::new(input),
            output: Box::new(io::stdout()),
        }
    }

    /// Replace the output sink used by `emit` and `print`.
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    #[inline]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[inline]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    #[inline]
    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    #[inline]
    pub fn scanner_mut(&mut self) -> &mut Scanner {
        &mut self.scanner
    }

    #[inline]
    pub fn atoms(&self) -> &InternTable {
        &self.atoms
    }

    /// Return the atom for `bytes`.  Short atoms live in the handle; longer
    /// ones are hash-consed, so equal content yields the same handle.
    pub fn atom(&mut self, bytes: impl AsRef<[u8]>) -> Result<Term, RuntimeError> {
        let bytes = bytes.as_ref();
        if bytes.len() <= INLINE_ATOM_LEN {
            return Ok(self.arena.atom(bytes));
        }
        Ok(self.atoms.intern(&mut self.arena, bytes)?)
    }

    #[inline]
    pub fn unscan(&mut self) {
        self.scanner.unscan();
    }

    #[inline]
    pub fn commit(&mut self) {
        self.scanner.commit();
    }

    /// Produce the next token with the engine on top of the stack, or `None`
    /// at the end of the input.
    ///
    /// A custom engine runs its production with the UTF-8 engine pushed and
    /// the committed position preserved.  If the production fails, the
    /// scanner is rolled back to the last committed position and `None` is
    /// returned.
    pub fn scan(&mut self) -> Result<Option<Term>, RuntimeError> {
        if self.scanner.is_at_eof() {
            return Ok(None);
        }
        match self.scanner.top_engine() {
            None | Some(Engine::Utf8) => Ok(self
                .scanner
                .take_code_point()
                .map(|range| self.arena.atom(&self.scanner.buffer()[range]))),
            Some(Engine::Byte) => Ok(self.scanner.take_byte().map(Term::byte)),
            Some(Engine::Custom(production)) => {
                let production = Rc::clone(production);
                self.scan_custom(&*production)
            }
        }
    }

    fn scan_custom(&mut self, production: &dyn Production) -> Result<Option<Term>, RuntimeError> {
        let checkpoint = self.scanner.committed();
        log::trace!(
            "custom engine {} at {}",
            production.name(),
            self.scanner.position()
        );
        let depth = self.scanner.engine_depth();
        self.scanner.push_engine(Engine::Utf8);
        let outcome = production.call(self);
        let popped = self.scanner.pop_engine();
        let balanced = matches!(popped, Some(Engine::Utf8));
        if !balanced {
            self.scanner.truncate_engines(depth);
        }
        let position = self.scanner.position();
        self.scanner.restore(position, checkpoint);
        let outcome = outcome?;
        if !balanced {
            bail!(
                "custom engine {} left the engine stack unbalanced",
                production.name()
            );
        }
        match outcome {
            Outcome::Success(token) => Ok(Some(token)),
            Outcome::Failure(_) => {
                log::trace!(
                    "custom engine {} failed, rolling back {} -> {}",
                    production.name(),
                    position,
                    checkpoint
                );
                self.scanner.restore(checkpoint, checkpoint);
                Ok(None)
            }
        }
    }

    /// Run `f` with `engine` pushed, popping it again afterwards whatever
    /// the outcome.
    pub fn using<F>(&mut self, engine: Engine, f: F) -> Result<Outcome, RuntimeError>
    where
        F: FnOnce(&mut Runtime) -> Result<Outcome, RuntimeError>,
    {
        let depth = self.scanner.engine_depth();
        self.scanner.push_engine(engine);
        let outcome = f(self);
        self.scanner.pop_engine();
        let outcome = outcome?;
        if self.scanner.engine_depth() != depth {
            bail!(
                "engine stack depth {} after using, expected {}",
                self.scanner.engine_depth(),
                depth
            );
        }
        Ok(outcome)
    }

    /// Run a production, logging its entry and outcome.
    pub fn call<P>(&mut self, production: &P) -> Result<Outcome, RuntimeError>
    where
        P: Production + ?Sized,
    {
        log::trace!("enter {} at {}", production.name(), self.scanner.position());
        let outcome = production.call(self)?;
        log::trace!(
            "leave {} at {}: {}",
            production.name(),
            self.scanner.position(),
            if outcome.is_success() { "success" } else { "failure" }
        );
        Ok(outcome)
    }

    /// Write bytes to the output sink.
    pub(crate) fn write_output(&mut self, bytes: &[u8]) -> Result<(), RuntimeError> {
        self.output.write_all(bytes)?;
        self.output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;

    fn bytes(rt: &Runtime, t: Option<Term>) -> Vec<u8> {
        match t {
            Some(t) => rt.arena().atom_bytes(&t).unwrap().to_vec(),
            None => b"EOF".to_vec(),
        }
    }

    #[test]
    fn eof_is_idempotent() {
        let mut rt = Runtime::new("a");
        assert!(rt.scan().unwrap().is_some());
        assert!(rt.scan().unwrap().is_none());
        assert!(rt.scan().unwrap().is_none());
        assert_eq!(rt.scanner().position(), 1);
    }

    #[test]
    fn byte_engine_splits_code_points() {
        let mut rt = Runtime::new("é");
        rt.scanner_mut().push_engine(Engine::Byte);
        let a = rt.scan().unwrap();
        let b = rt.scan().unwrap();
        assert_eq!(a, Some(Term::byte(0xc3)));
        assert_eq!(b, Some(Term::byte(0xa9)));
        assert!(rt.scan().unwrap().is_none());
    }

    #[test]
    fn options_set_capacities() {
        let options = RuntimeOptions {
            intern_buckets: 0,
            ..RuntimeOptions::default()
        };
        let mut rt = Runtime::with_options("", options);
        assert_eq!(rt.atoms().bucket_count(), 1);
        let a = rt.atom("still works with a single bucket").unwrap();
        assert_eq!(rt.atom("still works with a single bucket").unwrap(), a);
        assert_eq!(RuntimeOptions::default().intern_buckets, 1021);
    }

    #[test]
    fn long_atoms_are_hash_consed() {
        let mut rt = Runtime::new("");
        let a = rt.atom("an atom longer than the handle").unwrap();
        let b = rt.atom("an atom longer than the handle").unwrap();
        let c = rt.atom("short").unwrap();
        assert_eq!(a, b);
        assert!(c.is_inline());
        assert_eq!(rt.atoms().len(), 1);
    }

    fn pair(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
        let a = crate::succeed!(primitives::any(rt));
        let b = crate::succeed!(primitives::any(rt));
        let t = rt.arena_mut().concat(&a, &b)?;
        Ok(Outcome::Success(t))
    }

    #[test]
    fn custom_engine_produces_tokens() {
        let mut rt = Runtime::new("abcde");
        rt.scanner_mut().push_engine(Engine::custom(pair));
        let t1 = rt.scan().unwrap();
        assert_eq!(bytes(&rt, t1), b"ab");
        assert_eq!(rt.scanner().committed(), 0);
        let t2 = rt.scan().unwrap();
        assert_eq!(bytes(&rt, t2), b"cd");
        assert_eq!(rt.scanner().position(), 4);
        // only one byte left: the production fails and nothing is consumed
        rt.commit();
        assert!(rt.scan().unwrap().is_none());
        assert_eq!(rt.scanner().position(), 4);
        assert_eq!(rt.scanner().committed(), 4);
        rt.unscan();
        assert_eq!(rt.scanner().position(), 4);
        assert_eq!(rt.scanner().engine_depth(), 1);
    }

    #[test]
    fn failed_custom_engine_rolls_back_to_checkpoint() {
        let greedy = |rt: &mut Runtime| -> Result<Outcome, RuntimeError> {
            rt.scan()?;
            rt.commit();
            rt.scan()?;
            Ok(Outcome::Failure(Term::NIL))
        };
        let mut rt = Runtime::new("xyz");
        rt.scanner_mut().push_engine(Engine::custom(greedy));
        assert!(rt.scan().unwrap().is_none());
        assert_eq!(rt.scanner().position(), 0);
        assert_eq!(rt.scanner().committed(), 0);
    }

    #[test]
    fn custom_engine_errors_restore_the_stack() {
        let broken = |rt: &mut Runtime| -> Result<Outcome, RuntimeError> {
            let a = rt.arena_mut().constructor("c", [Term::NIL]);
            let b = Term::NIL;
            let t = rt.arena_mut().concat(&a, &b)?;
            Ok(Outcome::Success(t))
        };
        let mut rt = Runtime::new("xyz");
        rt.scanner_mut().push_engine(Engine::custom(broken));
        assert!(matches!(rt.scan(), Err(RuntimeError::Term(_))));
        assert_eq!(rt.scanner().engine_depth(), 1);
        assert_eq!(rt.scanner().committed(), 0);
    }

    #[test]
    fn unbalanced_custom_engine_is_an_error() {
        let leaky = |rt: &mut Runtime| -> Result<Outcome, RuntimeError> {
            rt.scanner_mut().push_engine(Engine::Byte);
            Ok(Outcome::Success(Term::NIL))
        };
        let mut rt = Runtime::new("xyz");
        rt.scanner_mut().push_engine(Engine::custom(crate::named("leaky", leaky)));
        assert!(matches!(rt.scan(), Err(RuntimeError::Other(_))));
        assert_eq!(rt.scanner().engine_depth(), 1);
        assert!(matches!(rt.scanner().top_engine(), Some(Engine::Custom(_))));
    }

    #[test]
    fn using_pops_on_failure() {
        let mut rt = Runtime::new("é!");
        let outcome = rt
            .using(Engine::Byte, |rt| {
                let b = crate::succeed!(primitives::any(rt));
                assert_eq!(b, Term::byte(0xc3));
                primitives::expect(rt, &Term::byte(b'!'))
            })
            .unwrap();
        assert!(outcome.is_failure());
        assert_eq!(rt.scanner().engine_depth(), 0);
        assert_eq!(rt.scanner().position(), 1);
    }

    #[test]
    fn call_runs_named_productions() {
        let mut rt = Runtime::new("a");
        let p = crate::named("anything", primitives::any);
        let outcome = rt.call(&p).unwrap();
        assert_eq!(outcome, Outcome::Success(Term::byte(b'a')));
        assert_eq!(p.name(), "anything");
    }
}
