// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Incremental scanners for the request line and the header block.
//!
//! Both scanners are byte-level state machines over the unconsumed range of
//! an [`InputBuffer`]. They keep an explicit resume cursor instead of shared
//! mutable parse state, so a scan can suspend mid-line when the buffer runs
//! dry and pick up exactly where it left off once the transport appends more
//! bytes. Suspension is a synchronous result ([`ScanStep::NeedMoreData`]),
//! never a blocking call: the surrounding driver decides when to re-invoke.

use gheppio_http::{
    syntax,
    FieldName,
    HeaderMap,
    HeaderValue,
    HttpParseError,
    HttpVersion,
    Method,
    Request,
    RequestTarget,
};

use gheppio_http_handling::ServerLimits;

use crate::buffer::InputBuffer;

/// The outcome of driving a scanner over the currently buffered bytes.
#[derive(Debug)]
pub enum ScanStep<T> {
    /// The buffer does not yet hold enough bytes to decide; feed more and
    /// re-invoke. No partial progress is lost.
    NeedMoreData,
    Done(T),
    Failed(HttpParseError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum RequestLineState {
    Method,
    Target,
    Version,
    ExpectLf,
}

/// Recognizes `method SP request-target SP HTTP-version CRLF`, one byte at a
/// time, under the request-line size limit.
#[derive(Debug)]
struct RequestLineScanner {
    state: RequestLineState,
    limit: usize,
    /// Resume cursor: bytes of the unconsumed region already examined. Also
    /// the running size of the line, since nothing is consumed until the
    /// whole line is recognized.
    scanned: usize,
    method_end: usize,
    target_start: usize,
    target_end: usize,
    version_start: usize,
    version: Option<HttpVersion>,
}

impl RequestLineScanner {
    fn new(limit: usize) -> Self {
        Self {
            state: RequestLineState::Method,
            limit,
            scanned: 0,
            method_end: 0,
            target_start: 0,
            target_end: 0,
            version_start: 0,
            version: None,
        }
    }

    fn is_at_start(&self) -> bool {
        self.scanned == 0
    }

    /// On success, yields the parsed parts plus the full line length
    /// (terminator included), which the caller consumes from the buffer.
    fn scan(&mut self, buf: &[u8]) -> ScanStep<(Method, RequestTarget, HttpVersion, usize)> {
        while self.scanned < buf.len() {
            let byte = buf[self.scanned];

            // The terminating LF is the one byte that never counts against
            // the line limit.
            if self.state == RequestLineState::ExpectLf && byte == b'\n' {
                self.scanned += 1;
                return self.finish(buf);
            }

            self.scanned += 1;
            if self.scanned >= self.limit {
                // The size rule outranks every structural rule, and fires
                // without waiting for a terminator that may never come.
                return ScanStep::Failed(HttpParseError::RequestLineTooLong);
            }

            let position = self.scanned - 1;
            match self.state {
                RequestLineState::Method => {
                    if byte == b' ' {
                        if position == 0 {
                            return ScanStep::Failed(HttpParseError::RequestLineMalformed);
                        }
                        self.method_end = position;
                        self.target_start = self.scanned;
                        self.state = RequestLineState::Target;
                    } else if !syntax::is_token_character(byte) {
                        return ScanStep::Failed(HttpParseError::RequestLineMalformed);
                    }
                }

                RequestLineState::Target => match byte {
                    b' ' => {
                        if position == self.target_start {
                            return ScanStep::Failed(HttpParseError::RequestLineMalformed);
                        }
                        self.target_end = position;
                        if let Err(error) = syntax::validate_target(&buf[self.target_start..self.target_end]) {
                            return ScanStep::Failed(error);
                        }
                        self.version_start = self.scanned;
                        self.state = RequestLineState::Version;
                    }
                    0x00 => return ScanStep::Failed(HttpParseError::TargetContainsNul),
                    b'\r' | b'\n' => return ScanStep::Failed(HttpParseError::RequestLineMalformed),
                    _ if !syntax::is_request_target_character(byte) => {
                        return ScanStep::Failed(HttpParseError::RequestLineMalformed);
                    }
                    _ => {}
                },

                RequestLineState::Version => match byte {
                    b'\r' => {
                        self.version = match &buf[self.version_start..position] {
                            b"HTTP/1.0" => Some(HttpVersion::Http10),
                            b"HTTP/1.1" => Some(HttpVersion::Http11),
                            _ => return ScanStep::Failed(HttpParseError::RequestLineMalformed),
                        };
                        self.state = RequestLineState::ExpectLf;
                    }
                    b'\n' => return ScanStep::Failed(HttpParseError::RequestLineMalformed),
                    _ => {}
                },

                // A CR was seen, but the byte after it is not an LF.
                RequestLineState::ExpectLf => {
                    return ScanStep::Failed(HttpParseError::RequestLineMalformed);
                }
            }
        }

        ScanStep::NeedMoreData
    }

    fn finish(&self, buf: &[u8]) -> ScanStep<(Method, RequestTarget, HttpVersion, usize)> {
        let Some(version) = self.version else {
            return ScanStep::Failed(HttpParseError::RequestLineMalformed);
        };

        let method = Method::from(String::from_utf8_lossy(&buf[..self.method_end]).into_owned());

        let target_bytes = &buf[self.target_start..self.target_end];
        let Some(target) = RequestTarget::parse(String::from_utf8_lossy(target_bytes)) else {
            return ScanStep::Failed(HttpParseError::RequestLineMalformed);
        };

        ScanStep::Done((method, target, version, self.scanned))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum HeaderLineState {
    LineStart,
    Name,
    Value,
    ExpectLf,
    ExpectEndLf,
}

/// One recognized header line: either a field, or the blank line that ends
/// the block.
#[derive(Debug)]
enum HeaderLine {
    Field(FieldName, HeaderValue),
    End,
}

/// Recognizes a single `field-name ":" OWS field-value CRLF` line, or the
/// terminating blank line. The caller resets it after each recognized line.
///
/// There is no per-line size cap here: unbounded header growth is already
/// bounded by the input buffer's capacity.
#[derive(Debug)]
struct HeaderScanner {
    state: HeaderLineState,
    scanned: usize,
    name_end: usize,
    value_start: Option<usize>,
}

impl HeaderScanner {
    fn new() -> Self {
        Self {
            state: HeaderLineState::LineStart,
            scanned: 0,
            name_end: 0,
            value_start: None,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn scan(&mut self, buf: &[u8]) -> ScanStep<(HeaderLine, usize)> {
        while self.scanned < buf.len() {
            let byte = buf[self.scanned];
            self.scanned += 1;
            let position = self.scanned - 1;

            match self.state {
                HeaderLineState::LineStart => match byte {
                    // Obsolete line folding: a continuation of the previous
                    // field's value. Not supported.
                    b' ' | b'\t' => return ScanStep::Failed(HttpParseError::HeaderLineFoldingUnsupported),
                    b'\r' => self.state = HeaderLineState::ExpectEndLf,
                    b'\n' => return ScanStep::Failed(HttpParseError::HeaderMalformed),
                    // A colon with no field name before it.
                    b':' => return ScanStep::Failed(HttpParseError::HeaderMalformed),
                    _ if syntax::is_token_character(byte) => self.state = HeaderLineState::Name,
                    _ => return ScanStep::Failed(HttpParseError::HeaderNameInvalidCharacter),
                },

                HeaderLineState::Name => match byte {
                    b':' => {
                        self.name_end = position;
                        self.state = HeaderLineState::Value;
                    }
                    // No whitespace may separate the name from the colon.
                    b' ' | b'\t' => return ScanStep::Failed(HttpParseError::HeaderNameInvalidCharacter),
                    // The line ended without ever containing a colon.
                    b'\r' | b'\n' => return ScanStep::Failed(HttpParseError::HeaderMalformed),
                    _ if syntax::is_token_character(byte) => {}
                    _ => return ScanStep::Failed(HttpParseError::HeaderNameInvalidCharacter),
                },

                HeaderLineState::Value => match byte {
                    b'\r' => self.state = HeaderLineState::ExpectLf,
                    b'\n' => return ScanStep::Failed(HttpParseError::HeaderMalformed),
                    // Optional whitespace after the colon is trimmed; the
                    // value itself is stored verbatim from its first byte.
                    b' ' | b'\t' if self.value_start.is_none() => {}
                    _ => {
                        if self.value_start.is_none() {
                            self.value_start = Some(position);
                        }
                    }
                },

                HeaderLineState::ExpectLf => {
                    if byte != b'\n' {
                        return ScanStep::Failed(HttpParseError::HeaderMalformed);
                    }
                    return self.finish_field(buf);
                }

                HeaderLineState::ExpectEndLf => {
                    if byte != b'\n' {
                        return ScanStep::Failed(HttpParseError::HeaderMalformed);
                    }
                    return ScanStep::Done((HeaderLine::End, self.scanned));
                }
            }
        }

        ScanStep::NeedMoreData
    }

    fn finish_field(&self, buf: &[u8]) -> ScanStep<(HeaderLine, usize)> {
        let name = String::from_utf8_lossy(&buf[..self.name_end]).into_owned();

        // The value runs up to the CR, which sits two bytes back from the
        // cursor now that the LF has been accepted.
        let value_end = self.scanned - 2;
        let value = match self.value_start {
            Some(value_start) => String::from_utf8_lossy(&buf[value_start..value_end]).into_owned(),
            None => String::new(),
        };

        ScanStep::Done((
            HeaderLine::Field(FieldName::from(name), HeaderValue::String(value)),
            self.scanned,
        ))
    }
}

#[derive(Copy, Clone, Debug)]
enum Phase {
    RequestLine,
    Headers,
    Complete,
    Malformed(HttpParseError),
}

/// Drives the two scanners over a connection's input buffer and accumulates
/// the parsed request.
///
/// Phases only move forward, `RequestLine` to `Headers` to `Complete`, with
/// `Malformed` terminal from anywhere. The request line is fully resolved
/// before header scanning begins. One parser serves exactly one request.
#[derive(Debug)]
pub struct RequestParser {
    phase: Phase,
    request_line: RequestLineScanner,
    header_line: HeaderScanner,
    method: Option<Method>,
    target: Option<RequestTarget>,
    version: Option<HttpVersion>,
    headers: HeaderMap,
}

impl RequestParser {
    #[must_use]
    pub fn new(limits: &ServerLimits) -> Self {
        Self {
            phase: Phase::RequestLine,
            request_line: RequestLineScanner::new(limits.max_request_line_size()),
            header_line: HeaderScanner::new(),
            method: None,
            target: None,
            version: None,
            headers: HeaderMap::new(),
        }
    }

    /// Scan as far as the buffered bytes allow. Recognized lines are
    /// consumed from the buffer as they complete, releasing capacity for
    /// the transport.
    pub fn advance(&mut self, buffer: &mut InputBuffer) -> ScanStep<Request> {
        loop {
            match self.phase {
                Phase::RequestLine => {
                    let step = self.request_line.scan(buffer.peek());
                    match step {
                        ScanStep::NeedMoreData => return ScanStep::NeedMoreData,
                        ScanStep::Failed(error) => return self.fail(error),
                        ScanStep::Done((method, target, version, line_length)) => {
                            buffer.consume(line_length);
                            self.method = Some(method);
                            self.target = Some(target);
                            self.version = Some(version);
                            self.phase = Phase::Headers;
                        }
                    }
                }

                Phase::Headers => {
                    let step = self.header_line.scan(buffer.peek());
                    match step {
                        ScanStep::NeedMoreData => return ScanStep::NeedMoreData,
                        ScanStep::Failed(error) => return self.fail(error),
                        ScanStep::Done((HeaderLine::Field(name, value), line_length)) => {
                            buffer.consume(line_length);
                            self.header_line.reset();
                            self.headers.append(name, value);
                        }
                        ScanStep::Done((HeaderLine::End, line_length)) => {
                            buffer.consume(line_length);
                            self.phase = Phase::Complete;

                            let (Some(method), Some(target), Some(version)) =
                                    (self.method.take(), self.target.take(), self.version.take()) else {
                                return self.fail(HttpParseError::RequestLineMalformed);
                            };

                            return ScanStep::Done(Request {
                                method,
                                target,
                                version,
                                headers: std::mem::take(&mut self.headers),
                            });
                        }
                    }
                }

                Phase::Complete => return ScanStep::NeedMoreData,
                Phase::Malformed(error) => return ScanStep::Failed(error),
            }
        }
    }

    fn fail(&mut self, error: HttpParseError) -> ScanStep<Request> {
        self.phase = Phase::Malformed(error);
        ScanStep::Failed(error)
    }

    /// The failure to report when the transport closes before the request
    /// has fully resolved. `None` when the connection closed cleanly before
    /// any request byte was examined.
    #[must_use]
    pub fn close_error(&self) -> Option<HttpParseError> {
        match self.phase {
            Phase::RequestLine if self.request_line.is_at_start() => None,
            Phase::RequestLine => Some(HttpParseError::RequestLineMalformed),
            Phase::Headers => Some(HttpParseError::HeaderMalformed),
            Phase::Complete | Phase::Malformed(_) => None,
        }
    }
}
