// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use bytes::{Buf, BytesMut};

use gheppio_http::HttpParseError;

/// The per-connection accumulator between the transport and the scanners.
///
/// Bytes enter through [`InputBuffer::append`] as they arrive from the
/// socket and leave through [`InputBuffer::consume`] once a scanner has
/// recognized a complete logical unit. The count of held bytes (received but
/// not yet consumed) never exceeds the configured capacity: an append that
/// would cross it is refused outright rather than truncated, and the
/// connection is then treated as malformed. Consuming is what releases
/// capacity again.
#[derive(Debug)]
pub struct InputBuffer {
    data: BytesMut,
    limit: Option<usize>,
}

impl InputBuffer {
    #[must_use]
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            data: BytesMut::new(),
            limit,
        }
    }

    /// Accept newly received bytes.
    ///
    /// Fails with [`HttpParseError::BufferOverflow`] when the held bytes
    /// plus the incoming chunk would exceed the capacity. This fires even
    /// mid-line, before any terminator has been seen: an over-long
    /// unterminated line can never become a legal request, so there is
    /// nothing to wait for.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), HttpParseError> {
        if let Some(limit) = self.limit {
            if self.data.len() + bytes.len() > limit {
                return Err(HttpParseError::BufferOverflow);
            }
        }

        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Release `n` leading bytes that a scanner has fully processed.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.data.len());
        self.data.advance(n);
    }

    /// The held, unconsumed byte range, without copying. Scanners keep their
    /// own resume cursor into this slice and call [`InputBuffer::consume`]
    /// only once a complete line has been recognized.
    #[must_use]
    pub fn peek(&self) -> &[u8] {
        &self.data
    }

    /// Bytes currently held (received but not yet consumed).
    #[must_use]
    pub fn held(&self) -> usize {
        self.data.len()
    }

    /// Remaining capacity before an append would be refused; `None` when
    /// unbounded. This is the signal a transport can use to pace its reads.
    #[must_use]
    pub fn writable(&self) -> Option<usize> {
        self.limit.map(|limit| limit.saturating_sub(self.data.len()))
    }
}
