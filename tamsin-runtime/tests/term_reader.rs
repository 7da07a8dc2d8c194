//! A small reader for the `repr` syntax, written as a grammar over the
//! runtime with a custom tokenizing engine.  Rendering a term with `repr`
//! and reading it back must give an equal term.

use proptest::prelude::*;
use tamsin_runtime::{Engine, Outcome, Runtime, RuntimeError, named, primitives, succeed};
use tamsin_terms::{Arena, Term, bindings_for, constructor, equal, unify};

fn word_char(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    match primitives::alnum(rt)? {
        Outcome::Failure(_) => primitives::expect(rt, &Term::byte(b'_')),
        success => Ok(success),
    }
}

// Body of a quoted atom, after the opening quote.
fn quoted(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    let quote = Term::byte(b'\'');
    let backslash = Term::byte(b'\\');
    let mut text = Term::EMPTY;
    loop {
        let c = if primitives::expect(rt, &backslash)?.is_success() {
            if primitives::expect(rt, &Term::byte(b'x'))?.is_success() {
                let hi = succeed!(primitives::any(rt));
                let lo = succeed!(primitives::any(rt));
                succeed!(primitives::hexbyte(rt, &hi, &lo))
            } else {
                succeed!(primitives::any(rt))
            }
        } else if primitives::expect(rt, &quote)?.is_success() {
            break;
        } else {
            succeed!(primitives::any(rt))
        };
        text = rt.arena_mut().concat(&text, &c)?;
    }
    Ok(Outcome::Success(rt.arena_mut().constructor("atom", [text])))
}

// Tokens are `atom(Text)` for bare and quoted atoms, or a punctuation byte.
fn token(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    while primitives::expect(rt, &Term::byte(b' '))?.is_success() {}
    if primitives::expect(rt, &Term::byte(b'\''))?.is_success() {
        return quoted(rt);
    }
    if let Outcome::Success(first) = word_char(rt)? {
        let mut text = first;
        while let Outcome::Success(c) = word_char(rt)? {
            text = rt.arena_mut().concat(&text, &c)?;
        }
        return Ok(Outcome::Success(rt.arena_mut().constructor("atom", [text])));
    }
    for p in [b'(', b')', b','] {
        if let Outcome::Success(t) = primitives::expect(rt, &Term::byte(p))? {
            return Ok(Outcome::Success(t));
        }
    }
    let message = rt.atom("no token")?;
    primitives::fail(rt, &message)
}

// term = atom(Name) & ["(" & [term {"," & term}] & ")"].
fn term(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    let x = rt.arena_mut().var("Name", 0)?;
    let pattern = rt.arena_mut().constructor("atom", [x]);
    let mut bindings = bindings_for(rt.arena(), &pattern)?;
    let Some(tok) = rt.scan()? else {
        rt.unscan();
        let message = rt.atom("expected a term but found EOF")?;
        return primitives::fail(rt, &message);
    };
    if !unify(rt.arena(), &pattern, &tok, &mut bindings)? {
        rt.unscan();
        return primitives::fail(rt, &tok);
    }
    rt.commit();
    let name = bindings[0].expect("pattern variable is bound");

    let close = Term::byte(b')');
    if primitives::expect(rt, &Term::byte(b'('))?.is_failure() {
        return Ok(Outcome::Success(name));
    }
    if primitives::expect(rt, &close)?.is_success() {
        let tag = rt.arena().atom_bytes(&name)?.to_vec();
        return Ok(Outcome::Success(rt.arena_mut().constructor(tag, Vec::<Term>::new())));
    }
    let mut list = Term::NIL;
    loop {
        let arg = succeed!(term(rt));
        list = primitives::cons(rt, list, arg);
        if primitives::expect(rt, &Term::byte(b','))?.is_failure() {
            break;
        }
    }
    succeed!(primitives::expect(rt, &close));
    primitives::mkterm(rt, &name, &list)
}

fn read(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    rt.using(Engine::custom(named("token", token)), |rt| {
        let t = succeed!(term(rt));
        succeed!(primitives::eof(rt));
        Ok(Outcome::Success(t))
    })
}

fn round_trip(build: impl Fn(&mut Arena) -> Term) {
    let mut arena = Arena::new();
    let original = build(&mut arena);
    let mut text = Vec::new();
    arena.repr_into(&original, &mut text).unwrap();

    let mut rt = Runtime::new(text.clone());
    let expected = build(rt.arena_mut());
    let outcome = read(&mut rt).unwrap();
    let text = String::from_utf8_lossy(&text);
    let read_back = match outcome {
        Outcome::Success(t) => t,
        Outcome::Failure(m) => panic!("failed to read {text}: {}", m.display(rt.arena())),
    };
    assert!(
        equal(rt.arena(), &read_back, &expected).unwrap(),
        "{text} read back as {}",
        read_back.display(rt.arena())
    );
    assert_eq!(rt.scanner().engine_depth(), 0);
}

#[test]
fn atoms_round_trip() {
    for bytes in [
        &b"hello"[..],
        b"",
        b"a'b",
        b"hello world",
        b"back\\slash",
        b"(,)",
        &[0xff, 0x00, b'q'],
        "é".as_bytes(),
        b"an atom long enough to be stored in the arena",
    ] {
        round_trip(|arena| arena.atom(bytes));
    }
}

#[test]
fn constructors_round_trip() {
    round_trip(constructor!("f"; "a", "b c", constructor!("g";), constructor!("h"; "x", "\n")));
    round_trip(constructor!("foo";));
    round_trip(constructor!(""; "x"));
    round_trip(constructor!("it's"; constructor!("list"; "nil", "0")));
}

#[test]
fn reader_reports_trailing_garbage() {
    let mut rt = Runtime::new("f(a) b");
    let outcome = read(&mut rt).unwrap();
    assert!(outcome.is_failure());
    assert_eq!(rt.scanner().engine_depth(), 0);
}

#[test]
fn reader_stops_at_eof_after_spaces() {
    let mut rt = Runtime::new("f(a, b)   ");
    let outcome = read(&mut rt).unwrap();
    assert!(outcome.is_success());
}

fn atom_bytes() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..20)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn random_terms_round_trip(
        tag in atom_bytes(),
        args in proptest::collection::vec(atom_bytes(), 0..5),
        inner in atom_bytes(),
    ) {
        round_trip(|arena| {
            let mut subterms: Vec<Term> = args.iter().map(|a| arena.atom(a)).collect();
            let nested = arena.constructor(&inner, [Term::NIL]);
            subterms.push(nested);
            arena.constructor(&tag, subterms)
        });
    }
}
