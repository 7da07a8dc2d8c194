//! The primitive recognizers and term operations available to compiled
//! grammars.
//!
//! Every primitive takes the [`Runtime`] first and returns an [`Outcome`].
//! Every failing primitive unscans, so a failure always leaves the cursor at
//! the last commit.  Scanning primitives also commit the token they accept;
//! the others leave the cursor alone when they succeed.  Failure messages
//! are atoms built from literal text and flattened terms; end of input shows
//! up as `EOF`.

use crate::{Outcome, Runtime, RuntimeError};
use std::sync::atomic::{AtomicU64, Ordering};
use tamsin_terms::{Arena, Term, TermError, View};

static GENSYM_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Tag of a cons-list node.
pub const LIST_TAG: &[u8] = b"list";

enum Piece<'a> {
    Text(&'a [u8]),
    Term(&'a Term),
    /// A scanned token, or `EOF`.
    Token(Option<Term>),
}

fn failure(rt: &mut Runtime, pieces: &[Piece<'_>]) -> Result<Outcome, RuntimeError> {
    rt.unscan();
    let mut buf = Vec::with_capacity(64);
    for piece in pieces {
        match piece {
            Piece::Text(text) => buf.extend_from_slice(text),
            Piece::Term(t) => rt.arena.flatten_into(t, &mut buf)?,
            Piece::Token(Some(t)) => rt.arena.flatten_into(t, &mut buf)?,
            Piece::Token(None) => buf.extend_from_slice(b"EOF"),
        }
    }
    log::debug!(
        "failure at {}: {}",
        rt.scanner.position(),
        String::from_utf8_lossy(&buf)
    );
    Ok(Outcome::Failure(rt.atom(buf)?))
}

enum Scanned {
    Accepted(Term),
    Rejected(Option<Term>),
}

/// Scan one token and commit it if `accept` approves, otherwise unscan.
fn scan_if<F>(rt: &mut Runtime, accept: F) -> Result<Scanned, RuntimeError>
where
    F: FnOnce(&Arena, &Term) -> Result<bool, TermError>,
{
    let token = rt.scan()?;
    let accepted = match &token {
        Some(t) => accept(&rt.arena, t)?,
        None => false,
    };
    match token {
        Some(t) if accepted => {
            rt.commit();
            Ok(Scanned::Accepted(t))
        }
        found => {
            rt.unscan();
            Ok(Scanned::Rejected(found))
        }
    }
}

fn flat_bytes(arena: &Arena, term: &Term) -> Result<Vec<u8>, TermError> {
    let mut buf = Vec::new();
    arena.flatten_into(term, &mut buf)?;
    Ok(buf)
}

/// Compares the flattened rendering of `term` with `bytes`.
fn flat_eq(arena: &Arena, term: &Term, bytes: &[u8]) -> Result<bool, TermError> {
    if term.is_atom() {
        return Ok(arena.atom_bytes(term)? == bytes);
    }
    Ok(flat_bytes(arena, term)? == bytes)
}

/// Succeeds, without consuming anything, at the end of the input.  The
/// result is the atom `EOF`.
pub fn eof(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    let token = rt.scan()?;
    rt.unscan();
    match token {
        None => Ok(Outcome::Success(rt.atom("EOF")?)),
        found => failure(
            rt,
            &[
                Piece::Text(b"expected EOF but found '"),
                Piece::Token(found),
                Piece::Text(b"'"),
            ],
        ),
    }
}

/// Accepts any token.
pub fn any(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    match scan_if(rt, |_, _| Ok(true))? {
        Scanned::Accepted(t) => Ok(Outcome::Success(t)),
        Scanned::Rejected(_) => failure(rt, &[Piece::Text(b"expected any token but found EOF")]),
    }
}

/// Accepts a token whose rendering equals that of `expected`.
pub fn expect(rt: &mut Runtime, expected: &Term) -> Result<Outcome, RuntimeError> {
    let want = flat_bytes(&rt.arena, expected)?;
    match scan_if(rt, |arena, token| flat_eq(arena, token, &want))? {
        Scanned::Accepted(t) => Ok(Outcome::Success(t)),
        Scanned::Rejected(found) => failure(
            rt,
            &[
                Piece::Text(b"expected '"),
                Piece::Term(expected),
                Piece::Text(b"' but found '"),
                Piece::Token(found),
                Piece::Text(b"'"),
            ],
        ),
    }
}

fn first_byte_is(
    rt: &mut Runtime,
    what: &'static [u8],
    pred: fn(&u8) -> bool,
) -> Result<Outcome, RuntimeError> {
    match scan_if(rt, |arena, token| Ok(arena.first_byte(token)?.is_some_and(|b| pred(&b))))? {
        Scanned::Accepted(t) => Ok(Outcome::Success(t)),
        Scanned::Rejected(found) => failure(
            rt,
            &[
                Piece::Text(b"expected "),
                Piece::Text(what),
                Piece::Text(b" but found '"),
                Piece::Token(found),
                Piece::Text(b"'"),
            ],
        ),
    }
}

/// Accepts a token starting with an ASCII letter or digit.
pub fn alnum(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    first_byte_is(rt, b"alphanumeric", u8::is_ascii_alphanumeric)
}

/// Accepts a token starting with an ASCII uppercase letter.
pub fn upper(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    first_byte_is(rt, b"uppercase", u8::is_ascii_uppercase)
}

/// Accepts a token whose first byte is the first byte of `prefix`.  An empty
/// `prefix` accepts any token.
pub fn startswith(rt: &mut Runtime, prefix: &Term) -> Result<Outcome, RuntimeError> {
    let first = rt.arena.first_byte(prefix)?;
    let accepted = scan_if(rt, |arena, token| match first {
        None => Ok(true),
        Some(b) => Ok(arena.first_byte(token)? == Some(b)),
    })?;
    match accepted {
        Scanned::Accepted(t) => Ok(Outcome::Success(t)),
        Scanned::Rejected(found) => {
            let first = first.map(|b| vec![b]).unwrap_or_default();
            failure(
                rt,
                &[
                    Piece::Text(b"expected '"),
                    Piece::Text(first.as_slice()),
                    Piece::Text(b"...' but found '"),
                    Piece::Token(found),
                    Piece::Text(b"'"),
                ],
            )
        }
    }
}

/// Strips the `left` prefix and `right` suffix from `quoted`.
pub fn unquote(
    rt: &mut Runtime,
    quoted: &Term,
    left: &Term,
    right: &Term,
) -> Result<Outcome, RuntimeError> {
    let q = flat_bytes(&rt.arena, quoted)?;
    let l = flat_bytes(&rt.arena, left)?;
    let r = flat_bytes(&rt.arena, right)?;
    if q.len() >= l.len() + r.len() && q.starts_with(&l) && q.ends_with(&r) {
        let inner = rt.atom(&q[l.len()..q.len() - r.len()])?;
        return Ok(Outcome::Success(inner));
    }
    failure(
        rt,
        &[
            Piece::Text(b"term '"),
            Piece::Term(quoted),
            Piece::Text(b"' is not quoted with '"),
            Piece::Term(left),
            Piece::Text(b"' and '"),
            Piece::Term(right),
            Piece::Text(b"'"),
        ],
    )
}

/// Succeeds with `lhs` if the two ground terms are structurally equal.
pub fn equal(rt: &mut Runtime, lhs: &Term, rhs: &Term) -> Result<Outcome, RuntimeError> {
    if tamsin_terms::equal(&rt.arena, lhs, rhs)? {
        return Ok(Outcome::Success(*lhs));
    }
    failure(
        rt,
        &[
            Piece::Text(b"term '"),
            Piece::Term(lhs),
            Piece::Text(b"' does not equal '"),
            Piece::Term(rhs),
            Piece::Text(b"'"),
        ],
    )
}

/// If `term` is a two-subterm constructor tagged `tag`, returns its tail and
/// newest element.
fn list_node(arena: &Arena, term: &Term, tag: &[u8]) -> Result<Option<(Term, Term)>, TermError> {
    match arena.view(term)? {
        View::Constructor(ar, t, subterms) if subterms.len() == 2 && ar.atom_bytes(t)? == tag => {
            Ok(Some((subterms[0], subterms[1])))
        }
        _ => Ok(None),
    }
}

/// Builds a constructor tagged with the rendering of `tag` whose subterms
/// are the elements of the cons list `list`, oldest first.  If `list` is not
/// a list node the result is `tag` itself.
pub fn mkterm(rt: &mut Runtime, tag: &Term, list: &Term) -> Result<Outcome, RuntimeError> {
    let mut elements = Vec::new();
    let mut node = *list;
    while let Some((tail, element)) = list_node(&rt.arena, &node, LIST_TAG)? {
        elements.push(element);
        node = tail;
    }
    if elements.is_empty() {
        return Ok(Outcome::Success(*tag));
    }
    elements.reverse();
    let name = flat_bytes(&rt.arena, tag)?;
    Ok(Outcome::Success(rt.arena.constructor(name, elements)))
}

/// Reverses a cons list, keeping the tag of its head node.  The walk must
/// end at a term equal to `sentinel`.
pub fn reverse(rt: &mut Runtime, list: &Term, sentinel: &Term) -> Result<Outcome, RuntimeError> {
    let tag = match rt.arena.view(list)? {
        View::Constructor(ar, t, subterms) if subterms.len() == 2 => ar.atom_bytes(t)?.to_vec(),
        _ => Vec::new(),
    };
    let mut acc = *sentinel;
    let mut node = *list;
    while let Some((tail, element)) = list_node(&rt.arena, &node, &tag)? {
        acc = rt.arena.constructor(&tag, [acc, element]);
        node = tail;
    }
    if tamsin_terms::equal(&rt.arena, &node, sentinel)? {
        // A bare sentinel reverses to itself.
        return Ok(Outcome::Success(if node == *list { *list } else { acc }));
    }
    failure(rt, &[Piece::Text(b"malformed list "), Piece::Term(list)])
}

/// Appends a fresh number to the rendering of `base`.  Numbers are unique
/// for the lifetime of the process.
pub fn gensym(rt: &mut Runtime, base: &Term) -> Result<Outcome, RuntimeError> {
    let n = GENSYM_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    let mut buf = flat_bytes(&rt.arena, base)?;
    buf.extend_from_slice(n.to_string().as_bytes());
    Ok(Outcome::Success(rt.atom(buf)?))
}

fn hex_digit(arena: &Arena, term: &Term) -> Result<u8, RuntimeError> {
    let bytes = arena.atom_bytes(term)?;
    let digit = match bytes {
        [b] => (*b as char).to_digit(16),
        _ => None,
    };
    digit
        .map(|d| d as u8)
        .ok_or_else(|| RuntimeError::BadHexDigit((&*String::from_utf8_lossy(bytes)).into()))
}

/// The byte `16 * hi + lo`, from two single hex-digit atoms.
pub fn hexbyte(rt: &mut Runtime, hi: &Term, lo: &Term) -> Result<Outcome, RuntimeError> {
    let value = hex_digit(&rt.arena, hi)? * 16 + hex_digit(&rt.arena, lo)?;
    Ok(Outcome::Success(Term::byte(value)))
}

/// Octal text of the first byte of the rendering of `ch`.
pub fn format_octal(rt: &mut Runtime, ch: &Term) -> Result<Outcome, RuntimeError> {
    let b = rt
        .arena
        .first_byte(ch)?
        .ok_or(RuntimeError::EmptyAtom("format_octal"))?;
    Ok(Outcome::Success(rt.atom(format!("{b:o}"))?))
}

/// Decimal length in bytes of the rendering of `term`.
pub fn length(rt: &mut Runtime, term: &Term) -> Result<Outcome, RuntimeError> {
    let len = match rt.arena.view(term)? {
        View::Atom(bytes) => bytes.len(),
        _ => flat_bytes(&rt.arena, term)?.len(),
    };
    Ok(Outcome::Success(rt.atom(len.to_string())?))
}

/// The re-readable rendering of `term`.
pub fn repr(rt: &mut Runtime, term: &Term) -> Result<Outcome, RuntimeError> {
    let mut buf = Vec::new();
    rt.arena.repr_into(term, &mut buf)?;
    Ok(Outcome::Success(rt.atom(buf)?))
}

/// Always succeeds with `term`.
pub fn ret(_rt: &mut Runtime, term: &Term) -> Result<Outcome, RuntimeError> {
    Ok(Outcome::Success(*term))
}

/// Always fails with `term`, rolling back to the last commit.
pub fn fail(rt: &mut Runtime, term: &Term) -> Result<Outcome, RuntimeError> {
    rt.unscan();
    Ok(Outcome::Failure(*term))
}

/// Writes the rendering of `term` to the output sink.
pub fn emit(rt: &mut Runtime, term: &Term) -> Result<Outcome, RuntimeError> {
    let buf = flat_bytes(&rt.arena, term)?;
    rt.write_output(&buf)?;
    Ok(Outcome::Success(*term))
}

/// Writes the rendering of `term` and a newline to the output sink.
pub fn print(rt: &mut Runtime, term: &Term) -> Result<Outcome, RuntimeError> {
    let mut buf = flat_bytes(&rt.arena, term)?;
    buf.push(b'\n');
    rt.write_output(&buf)?;
    Ok(Outcome::Success(*term))
}

/// A cons-list node `list(tail, element)`.
pub fn cons(rt: &mut Runtime, tail: Term, element: Term) -> Term {
    rt.arena.constructor(LIST_TAG, [tail, element])
}

/// Builds a cons list of `elements`, first element innermost, terminated by
/// `sentinel`.
pub fn list_from(rt: &mut Runtime, elements: impl IntoIterator<Item = Term>, sentinel: Term) -> Term {
    elements
        .into_iter()
        .fold(sentinel, |tail, element| cons(rt, tail, element))
}
