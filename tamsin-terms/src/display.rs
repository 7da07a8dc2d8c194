//! Rendering of terms as bytes: [`Arena::flatten`], [`Arena::repr`] and the
//! [`TermDisplay`] adapter.
//!
//! Both renderings walk the term with an explicit work stack, so deeply
//! nested terms such as long cons lists do not exhaust the call stack.

use crate::{Arena, Term, TermError, View};
use std::fmt;

/// A wrapper that ties together a [`Term`] and its [`Arena`] so the term can
/// be used with the standard formatting macros.  It prints the
/// [`repr`](Arena::repr) form.
///
/// ### Example
/// ```rust
/// use tamsin_terms::{Arena, constructor};
/// let mut arena = Arena::new();
/// let term = constructor!("foo"; "bar", "hello, world!" => &mut arena);
/// assert_eq!(term.display(&arena).to_string(), "foo(bar, 'hello, world!')");
/// ```
///
/// Construct instances via [`Term::display`].
pub struct TermDisplay<'a> {
    term: &'a Term,
    arena: &'a Arena,
}

impl Term {
    /// Return a [`TermDisplay`] suitable for formatting with [`fmt::Display`].
    #[inline]
    pub fn display<'a>(&'a self, arena: &'a Arena) -> TermDisplay<'a> {
        TermDisplay { term: self, arena }
    }
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.arena
            .repr_into(self.term, &mut buf)
            .map_err(|_e| fmt::Error)?;
        f.write_str(std::str::from_utf8(&buf).map_err(|_e| fmt::Error)?)
    }
}

#[derive(Clone, Copy)]
enum Step {
    Term(Term),
    Text(&'static [u8]),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Flat,
    Repr,
}

/// Returns `true` if the atom can be written without quotes.
fn is_bare_atom(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}

fn needs_escape(b: u8) -> bool {
    !(32..=126).contains(&b) || b == b'\'' || b == b'\\'
}

fn write_repr_atom(bytes: &[u8], out: &mut Vec<u8>) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    if is_bare_atom(bytes) {
        out.extend_from_slice(bytes);
        return;
    }
    out.push(b'\'');
    for &b in bytes {
        match b {
            b'\'' | b'\\' => out.extend_from_slice(&[b'\\', b]),
            _ if needs_escape(b) => out.extend_from_slice(&[
                b'\\',
                b'x',
                HEX[(b >> 4) as usize],
                HEX[(b & 0x0f) as usize],
            ]),
            _ => out.push(b),
        }
    }
    out.push(b'\'');
}

impl Arena {
    /// Flatten a term to an atom.
    ///
    /// An atom is returned as is (the same handle).  A constructor becomes
    /// `tag(sub1, sub2, ...)` with each subterm flattened in turn, and a
    /// variable becomes its name.
    pub fn flatten(&mut self, term: &Term) -> Result<Term, TermError> {
        if term.is_atom() {
            // Resolve once so that foreign handles are still reported.
            self.atom_bytes(term)?;
            return Ok(*term);
        }
        let mut buf = Vec::new();
        self.flatten_into(term, &mut buf)?;
        Ok(self.atom(buf))
    }

    /// Append the flattened rendering of `term` to `out`.
    pub fn flatten_into(&self, term: &Term, out: &mut Vec<u8>) -> Result<(), TermError> {
        self.render_into(term, Style::Flat, out)
    }

    /// Render a term in its canonical, re-readable form.
    ///
    /// Atoms made only of ASCII letters, digits and `_` are written bare.
    /// Any other atom is single-quoted; if it holds a quote, a backslash or
    /// a byte outside the printable ASCII range, those bytes are escaped as
    /// `\'`, `\\` and `\xhh`.  The result is always ASCII.
    pub fn repr(&mut self, term: &Term) -> Result<Term, TermError> {
        let mut buf = Vec::new();
        self.repr_into(term, &mut buf)?;
        Ok(self.atom(buf))
    }

    /// Append the [`repr`](Arena::repr) rendering of `term` to `out`.
    pub fn repr_into(&self, term: &Term, out: &mut Vec<u8>) -> Result<(), TermError> {
        self.render_into(term, Style::Repr, out)
    }

    fn render_into(&self, term: &Term, style: Style, out: &mut Vec<u8>) -> Result<(), TermError> {
        let mut stack = vec![Step::Term(*term)];
        while let Some(step) = stack.pop() {
            let term = match step {
                Step::Text(text) => {
                    out.extend_from_slice(text);
                    continue;
                }
                Step::Term(term) => term,
            };
            match self.view(&term)? {
                View::Atom(bytes) if style == Style::Repr => write_repr_atom(bytes, out),
                View::Atom(bytes) | View::Var(bytes, _) => out.extend_from_slice(bytes),
                View::Constructor(ar, tag, subterms) => {
                    let tag = ar.atom_bytes(tag)?;
                    match style {
                        Style::Flat => out.extend_from_slice(tag),
                        Style::Repr => write_repr_atom(tag, out),
                    }
                    out.push(b'(');
                    stack.push(Step::Text(b")"));
                    for (i, sub) in subterms.iter().enumerate().rev() {
                        stack.push(Step::Term(*sub));
                        if i > 0 {
                            stack.push(Step::Text(b", "));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
