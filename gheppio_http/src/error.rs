// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use strum_macros::AsRefStr;

use std::io;

#[derive(Debug)]
pub enum Error {
    ParseError(HttpParseError),
    Other(io::Error),
}

impl From<HttpParseError> for Error {
    fn from(error: HttpParseError) -> Self {
        Error::ParseError(error)
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Other(error)
    }
}

/// An error that can occur while parsing an HTTP request.
///
/// Every reason is answered with the same `400 Bad Request` response; the
/// variant only matters for diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr)]
pub enum HttpParseError {
    /// Appending received bytes to the per-connection input buffer would
    /// exceed the configured buffer capacity.
    ///
    /// This fires even before a line terminator is seen: an unbounded
    /// unterminated line is exactly what the cap guards against.
    BufferOverflow,

    /// A header line started with whitespace, i.e. obsolete line folding.
    ///
    /// ## Example:
    /// ```text
    /// Header-1: multi
    ///  line
    /// ```
    HeaderLineFoldingUnsupported,

    /// The header line was structurally invalid: no colon before the line
    /// ended, a CR not followed by LF, a bare LF, or the connection closed
    /// before the terminating blank line.
    HeaderMalformed,

    /// The header field name contained a byte outside the token character
    /// set, including whitespace before the colon.
    ///
    /// ## Example:
    /// ```text
    /// Header 1: value1
    /// ```
    HeaderNameInvalidCharacter,

    /// The request line was structurally invalid: a bad method token,
    /// missing or duplicated spaces, an empty target, an unrecognized
    /// HTTP version literal, or a broken CRLF terminator.
    RequestLineMalformed,

    /// The request line reached the configured size limit without its
    /// terminator.
    ///
    /// ## Example:
    /// ```
    /// // Maximum = 8192, line bytes before the LF = 9000
    /// ```
    RequestLineTooLong,

    /// The request target contains a NUL byte, either literally or after
    /// decoding a percent-encoded triplet.
    ///
    /// ## Example:
    /// ```text
    /// GET /%E8%85%00 HTTP/1.1
    /// ```
    TargetContainsNul,
}
