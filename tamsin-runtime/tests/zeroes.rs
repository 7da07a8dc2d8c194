use tamsin_runtime::{Outcome, Runtime, RuntimeError, primitives, succeed};
use tamsin_terms::Term;

fn flat(rt: &Runtime, t: Term) -> String {
    let mut buf = Vec::new();
    rt.arena().flatten_into(&t, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

// main = zeroes.
// zeroes = ("0" & zeroes → E & return zero(E)) | return nil.
fn zeroes(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    let zero = Term::byte(b'0');
    if let Outcome::Success(_) = primitives::expect(rt, &zero)? {
        let e = succeed!(zeroes(rt));
        let t = rt.arena_mut().constructor("zero", [e]);
        return primitives::ret(rt, &t);
    }
    primitives::ret(rt, &Term::NIL)
}

// main = zeroes & $:eof.
fn main_production(rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
    let t = succeed!(zeroes(rt));
    succeed!(primitives::eof(rt));
    Ok(Outcome::Success(t))
}

#[test]
fn four_zeroes_then_eof() {
    let mut rt = Runtime::new("0000");
    let zero = Term::byte(b'0');
    for _ in 0..4 {
        let outcome = primitives::expect(&mut rt, &zero).unwrap();
        assert_eq!(outcome, Outcome::Success(zero));
    }
    let outcome = primitives::eof(&mut rt).unwrap();
    assert!(outcome.is_success());
    let before = rt.scanner().position();
    let outcome = primitives::expect(&mut rt, &zero).unwrap();
    assert!(outcome.is_failure());
    assert_eq!(flat(&rt, outcome.term()), "expected '0' but found 'EOF'");
    assert_eq!(rt.scanner().position(), before);
    assert_eq!(rt.scanner().committed(), before);
}

#[test]
fn zeroes_grammar_builds_nested_terms() {
    let mut rt = Runtime::new("0000");
    let outcome = main_production(&mut rt).unwrap();
    assert!(outcome.is_success());
    assert_eq!(flat(&rt, outcome.term()), "zero(zero(zero(zero(nil))))");
}

#[test]
fn zeroes_grammar_rejects_trailing_input() {
    let mut rt = Runtime::new("001");
    let outcome = main_production(&mut rt).unwrap();
    assert_eq!(flat(&rt, outcome.term()), "expected EOF but found '1'");
    assert_eq!(rt.scanner().position(), 2);
}

#[test]
fn empty_input_is_nil() {
    let mut rt = Runtime::new("");
    let outcome = main_production(&mut rt).unwrap();
    assert_eq!(outcome, Outcome::Success(Term::NIL));
}

#[test]
fn unscan_restores_last_commit() {
    let mut rt = Runtime::new("abc");
    rt.scan().unwrap();
    rt.commit();
    rt.scan().unwrap();
    rt.scan().unwrap();
    assert!(rt.scan().unwrap().is_none());
    rt.unscan();
    assert_eq!(rt.scanner().position(), 1);
    let b = rt.scan().unwrap().unwrap();
    assert_eq!(b, Term::byte(b'b'));
}
