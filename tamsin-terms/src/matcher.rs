//! Structural comparison of terms: ground equality and pattern unification.
//!
//! Terms are compared by value, not by handle.  Two terms are equal when they
//! are of the same kind, carry the same atom bytes (the tag, for
//! constructors) and have pairwise equal subterms.  All functions walk the
//! terms with an explicit stack.

use crate::{Arena, Term, TermError, View};

/// Caller-owned variable bindings, indexed by variable slot.
pub type Bindings = Vec<Option<Term>>;

/// Compares two ground terms structurally.
///
/// Encountering a variable on either side is [`TermError::NonGround`].
pub fn equal(arena: &Arena, lhs: &Term, rhs: &Term) -> Result<bool, TermError> {
    let mut stack = vec![(*lhs, *rhs)];
    while let Some((l, r)) = stack.pop() {
        let (lv, rv) = (arena.view(&l)?, arena.view(&r)?);
        match (lv, rv) {
            (View::Var(..), _) => return Err(TermError::NonGround(l)),
            (_, View::Var(..)) => return Err(TermError::NonGround(r)),
            (View::Atom(a), View::Atom(b)) => {
                if a != b {
                    return Ok(false);
                }
            }
            (View::Constructor(_, lt, ls), View::Constructor(_, rt, rs)) => {
                if ls.len() != rs.len() || !arena.equals_atom(lt, rt)? {
                    return Ok(false);
                }
                stack.extend(ls.iter().copied().zip(rs.iter().copied()).rev());
            }
            _ => return Ok(false),
        }
    }
    Ok(true)
}

/// Matches `pattern` against the ground term `ground`, recording variable
/// bindings.
///
/// A variable in `pattern` matches any subterm and stores it in
/// `bindings[slot]`, overwriting an earlier binding for the same slot.
/// Everything else must agree in kind, tag and arity, and matching stops at
/// the first mismatch.  Bindings made before a mismatch are left in place.
pub fn unify(
    arena: &Arena,
    pattern: &Term,
    ground: &Term,
    bindings: &mut [Option<Term>],
) -> Result<bool, TermError> {
    let mut stack = vec![(*pattern, *ground)];
    while let Some((p, g)) = stack.pop() {
        match (arena.view(&p)?, arena.view(&g)?) {
            (_, View::Var(..)) => return Err(TermError::NonGround(g)),
            (View::Var(_, slot), _) => {
                if !is_ground(arena, &g)? {
                    return Err(TermError::NonGround(g));
                }
                let limit = bindings.len();
                let binding = bindings
                    .get_mut(slot)
                    .ok_or(TermError::SlotOutOfRange { slot, limit })?;
                *binding = Some(g);
            }
            (View::Atom(a), View::Atom(b)) => {
                if a != b {
                    return Ok(false);
                }
            }
            (View::Constructor(_, pt, ps), View::Constructor(_, gt, gs)) => {
                if ps.len() != gs.len() || !arena.equals_atom(pt, gt)? {
                    return Ok(false);
                }
                stack.extend(ps.iter().copied().zip(gs.iter().copied()).rev());
            }
            _ => return Ok(false),
        }
    }
    Ok(true)
}

/// Returns `true` if `term` contains no variables.
pub fn is_ground(arena: &Arena, term: &Term) -> Result<bool, TermError> {
    let mut stack = vec![*term];
    while let Some(t) = stack.pop() {
        match arena.view(&t)? {
            View::Var(..) => return Ok(false),
            View::Atom(_) => {}
            View::Constructor(_, _, subterms) => stack.extend_from_slice(subterms),
        }
    }
    Ok(true)
}

/// Returns one more than the largest variable slot in `term`, or zero if it
/// is ground.
pub fn slot_count(arena: &Arena, term: &Term) -> Result<usize, TermError> {
    let mut count = 0;
    let mut stack = vec![*term];
    while let Some(t) = stack.pop() {
        match arena.view(&t)? {
            View::Var(_, slot) => count = count.max(slot + 1),
            View::Atom(_) => {}
            View::Constructor(_, _, subterms) => stack.extend_from_slice(subterms),
        }
    }
    Ok(count)
}

/// Returns empty bindings large enough for every variable in `pattern`.
pub fn bindings_for(arena: &Arena, pattern: &Term) -> Result<Bindings, TermError> {
    Ok(vec![None; slot_count(arena, pattern)?])
}
