//! The backtracking cursor over a run's input buffer.

use crate::Engine;
use std::ops::Range;

/// Cursor state over a fixed input buffer.
///
/// `position` is where the next token starts; `committed` is the last
/// confirmed position and the target of [`Scanner::unscan`].  Both start at
/// zero.  The buffer is never modified.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    buffer: Vec<u8>,
    position: usize,
    committed: usize,
    engines: Vec<Engine>,
}

impl Scanner {
    pub fn new(buffer: impl Into<Vec<u8>>) -> Self {
        Self {
            buffer: buffer.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// The bytes not yet scanned.
    #[inline]
    pub fn remaining(&self) -> &[u8] {
        &self.buffer[self.position.min(self.buffer.len())..]
    }

    #[inline]
    pub fn is_at_eof(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// Discard everything scanned since the last commit.
    #[inline]
    pub fn unscan(&mut self) {
        if self.position != self.committed {
            log::trace!("unscan {} -> {}", self.position, self.committed);
        }
        self.position = self.committed;
    }

    /// Confirm everything scanned so far.
    #[inline]
    pub fn commit(&mut self) {
        self.committed = self.position;
    }

    pub fn push_engine(&mut self, engine: Engine) {
        log::trace!("push engine {:?} (depth {})", engine, self.engines.len() + 1);
        self.engines.push(engine);
    }

    pub fn pop_engine(&mut self) -> Option<Engine> {
        let engine = self.engines.pop();
        log::trace!("pop engine {:?} (depth {})", engine, self.engines.len());
        engine
    }

    /// Drop engines above `depth`.
    pub(crate) fn truncate_engines(&mut self, depth: usize) {
        if self.engines.len() > depth {
            log::trace!("truncate engines {} -> {}", self.engines.len(), depth);
            self.engines.truncate(depth);
        }
    }

    /// The engine consulted by the next scan, if any has been pushed.
    #[inline]
    pub fn top_engine(&self) -> Option<&Engine> {
        self.engines.last()
    }

    #[inline]
    pub fn engine_depth(&self) -> usize {
        self.engines.len()
    }

    /// Consume one code point's worth of bytes and return their range.
    ///
    /// The length comes from the lead byte alone and is clamped to the end
    /// of the buffer; continuation bytes are not validated.
    pub(crate) fn take_code_point(&mut self) -> Option<Range<usize>> {
        let lead = *self.buffer.get(self.position)?;
        let len = match lead {
            b if b & 0xe0 == 0xc0 => 2,
            b if b & 0xf0 == 0xe0 => 3,
            b if b & 0xf8 == 0xf0 => 4,
            _ => 1,
        };
        let start = self.position;
        let end = (start + len).min(self.buffer.len());
        self.position = end;
        Some(start..end)
    }

    /// Consume one raw byte.
    pub(crate) fn take_byte(&mut self) -> Option<u8> {
        let b = *self.buffer.get(self.position)?;
        self.position += 1;
        Some(b)
    }

    /// Put both cursors back after a custom engine has run.
    pub(crate) fn restore(&mut self, position: usize, committed: usize) {
        self.position = position;
        self.committed = committed;
    }
}
