// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! This module creates complete responses for handling common cases.

use gheppio_http::{Response, StatusCode};

use crate::finish_response_error;

/// Create the canonical malformed-request response.
///
/// The format is fixed, identical for every parse-failure reason, and
/// carries no body and no `Server` header:
///
/// ```text
/// HTTP/1.1 400 Bad Request
/// Connection: close
/// Date: <RFC1123 timestamp>
/// Content-Length: 0
/// ```
#[must_use]
pub fn create_bad_request() -> Response {
    let mut response = Response::with_status(StatusCode::BadRequest);
    finish_response_error(&mut response);
    response
}

/// Create a response for when the request times out.
#[must_use]
pub fn create_request_timeout() -> Response {
    let mut response = Response::with_status_and_string_body(StatusCode::RequestTimeout, "Request Timed Out");
    finish_response_error(&mut response);
    response
}
