//! Defines [`InternTable`], a hash-consing cache from byte strings to terms.

use crate::{Arena, Term, TermError};
use smartstring::alias::String;

/// Default number of buckets in an [`InternTable`].
pub const DEFAULT_BUCKETS: usize = 1021;

/// The `hashpjw` string hash (Aho, Sethi and Ullman), folded modulo
/// `bucket_count`.
pub fn hashpjw(key: &[u8], bucket_count: usize) -> usize {
    let mut h: u32 = 0;
    for &b in key {
        h = (h << 4).wrapping_add(b as u32);
        let g = h & 0xf000_0000;
        if g != 0 {
            h = (h ^ (g >> 24)) ^ g;
        }
    }
    h as usize % bucket_count.max(1)
}

/// A chained hash table mapping byte strings to terms, one entry per
/// distinct key.
///
/// The table does not own the terms' storage; every operation takes the
/// [`Arena`] that allocated them.  Entries are write-once: storing a term
/// whose bytes are already present is [`TermError::AlreadyInterned`].
///
/// ```
/// # use tamsin_terms::{Arena, InternTable};
/// let mut arena = Arena::new();
/// let mut table = InternTable::default();
/// let a = table.intern(&mut arena, "a rather long identifier").unwrap();
/// let b = table.intern(&mut arena, "a rather long identifier").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct InternTable {
    buckets: Vec<Vec<Term>>,
    len: usize,
}

impl Default for InternTable {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS)
    }
}

impl InternTable {
    /// Create an empty table.  A `bucket_count` of zero is treated as one.
    pub fn new(bucket_count: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); bucket_count.max(1)],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Look up the term stored under `key`.
    pub fn fetch(&self, arena: &Arena, key: impl AsRef<[u8]>) -> Result<Option<Term>, TermError> {
        let key = key.as_ref();
        let chain = &self.buckets[hashpjw(key, self.buckets.len())];
        // Newest links first.
        for term in chain.iter().rev() {
            if arena.name(term)? == key {
                return Ok(Some(*term));
            }
        }
        Ok(None)
    }

    /// Store `term` under its own atom bytes (for a constructor, its tag).
    pub fn store(&mut self, arena: &Arena, term: Term) -> Result<(), TermError> {
        let key = arena.name(&term)?;
        if self.fetch(arena, key)?.is_some() {
            return Err(TermError::AlreadyInterned(String::from(
                &*std::string::String::from_utf8_lossy(key),
            )));
        }
        let index = hashpjw(key, self.buckets.len());
        self.buckets[index].push(term);
        self.len += 1;
        Ok(())
    }

    /// Return the atom stored under `bytes`, allocating and storing a new
    /// one on first use.
    pub fn intern(&mut self, arena: &mut Arena, bytes: impl AsRef<[u8]>) -> Result<Term, TermError> {
        let bytes = bytes.as_ref();
        if let Some(term) = self.fetch(arena, bytes)? {
            return Ok(term);
        }
        let term = arena.atom(bytes);
        self.store(arena, term)?;
        log::trace!("interned {:?} ({} entries)", term, self.len);
        Ok(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{QuickCheck, TestResult};

    #[test]
    fn hashpjw_known_values() {
        assert_eq!(hashpjw(b"", 1021), 0);
        assert_eq!(hashpjw(b"a", 1021), 97);
        assert_eq!(hashpjw(b"ab", 1_000_000), 97 * 16 + 98);
        assert_eq!(hashpjw(b"anything", 1), 0);
        assert_eq!(hashpjw(b"anything", 0), 0);
    }

    #[test]
    fn store_is_write_once() {
        let mut arena = Arena::new();
        let mut table = InternTable::new(7);
        let a = arena.atom("key");
        let b = arena.atom("key");
        table.store(&arena, a).unwrap();
        let err = table.store(&arena, b).unwrap_err();
        assert!(matches!(err, TermError::AlreadyInterned(ref k) if k == "key"));
        assert_eq!(table.fetch(&arena, "key").unwrap(), Some(a));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn colliding_keys_share_a_bucket() {
        let mut arena = Arena::new();
        let mut table = InternTable::new(1);
        let words = ["alpha", "beta", "gamma", "a much longer delta entry"];
        let terms: Vec<Term> = words
            .iter()
            .map(|w| table.intern(&mut arena, w).unwrap())
            .collect();
        for (w, t) in words.iter().zip(&terms) {
            assert_eq!(table.fetch(&arena, w).unwrap(), Some(*t));
        }
        assert_eq!(table.fetch(&arena, "epsilon").unwrap(), None);
        assert_eq!(table.bucket_count(), 1);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn constructors_are_keyed_by_tag() {
        let mut arena = Arena::new();
        let mut table = InternTable::default();
        let c = arena.constructor("point", [Term::byte(b'x')]);
        table.store(&arena, c).unwrap();
        assert_eq!(table.fetch(&arena, "point").unwrap(), Some(c));
    }

    #[test]
    fn intern_is_idempotent() {
        fn prop(keys: Vec<Vec<u8>>) -> TestResult {
            let mut arena = Arena::new();
            let mut table = InternTable::new(13);
            let first: Vec<Term> = keys
                .iter()
                .map(|k| table.intern(&mut arena, k).unwrap())
                .collect();
            let again: Vec<Term> = keys
                .iter()
                .map(|k| table.intern(&mut arena, k).unwrap())
                .collect();
            let mut distinct = keys.clone();
            distinct.sort();
            distinct.dedup();
            TestResult::from_bool(first == again && table.len() == distinct.len())
        }
        QuickCheck::new()
            .tests(64)
            .quickcheck(prop as fn(Vec<Vec<u8>>) -> TestResult);
    }
}
