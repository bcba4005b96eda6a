//! Purpose: Byte-budgeted reader used under the JSON decoder.
//! Exports: `LimitedReader`.
//! Role: Delivers at most `limit` bytes, then reports end-of-stream.
//! Invariants: Never hands more than `limit` bytes to the caller.
//! Invariants: Once the budget is spent, at most one extra byte is pulled from the inner
//! stream to learn whether it continues; that byte is discarded.
use std::io::{self, Read};

#[derive(Debug)]
pub struct LimitedReader<R> {
    inner: R,
    limit: u64,
    remaining: u64,
    overflow: Option<bool>,
}

impl<R: Read> LimitedReader<R> {
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            limit,
            remaining: limit,
            overflow: None,
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn consumed(&self) -> u64 {
        self.limit - self.remaining
    }

    /// True once a read past the budget found more bytes in the inner stream.
    pub fn exceeded(&self) -> bool {
        self.overflow == Some(true)
    }

    /// Whether the inner stream has bytes past a spent budget.
    ///
    /// Reads at most one byte past the budget, once; false while budget remains.
    pub fn continues(&mut self) -> io::Result<bool> {
        if self.remaining > 0 {
            return Ok(false);
        }
        if self.overflow.is_none() {
            self.overflow = Some(self.peek_past_budget()?);
        }
        Ok(self.exceeded())
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn peek_past_budget(&mut self) -> io::Result<bool> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(n) => return Ok(n > 0),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

impl<R: Read> Read for LimitedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.remaining == 0 {
            self.continues()?;
            return Ok(0);
        }
        let max = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        let n = self.inner.read(&mut buf[..max])?;
        self.remaining -= n as u64;
        Ok(n)
    }
}
