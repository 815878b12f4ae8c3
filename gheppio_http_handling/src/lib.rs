// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Configuration, the application handler surface, and response finishing
//! shared by the transport front ends.

pub mod config;
pub mod handler;
pub mod responses;

pub use config::{
    ConfigError,
    ServerLimits,
    ServerSettings,
    processor_thread_count,
};
pub use handler::{Handler, HandlerController};

use std::time::SystemTime;

use gheppio_http::{
    FieldName,
    HeaderValue,
    HttpParseError,
    Response,
};

/// The value of the `Server` header on successful responses.
pub const SERVER_NAME: &str = "gheppio";

/// Convert a request parse failure into the response to send.
///
/// Every reason maps to the same fixed `400 Bad Request`; which rule fired
/// is diagnostic information only and is never reflected to the client.
#[must_use]
pub fn handle_parse_error(error: HttpParseError) -> Response {
    #[cfg(feature = "debugging")]
    println!("Malformed request: {}", error.as_ref());

    #[cfg(not(feature = "debugging"))]
    { _ = error }

    responses::create_bad_request()
}

/// Stamp the headers every error response carries: the connection is always
/// closed, and the advertised length always matches the body.
pub fn finish_response_error(response: &mut Response) {
    response.headers.set(FieldName::CONNECTION, HeaderValue::StaticString("close"));
    if !response.headers.contains(&FieldName::DATE) {
        response.headers.set(FieldName::DATE, HeaderValue::DateTime(SystemTime::now()));
    }

    let length = response.body.as_ref().map_or(0, gheppio_http::BodyKind::len);
    response.headers.set(FieldName::CONTENT_LENGTH, HeaderValue::Size(length));
}

/// Stamp the ambient headers of a successful response. Connections are not
/// reused, so the close is advertised here as well.
pub fn finish_response_normal(response: &mut Response) {
    if !response.headers.contains(&FieldName::SERVER) {
        response.headers.set(FieldName::SERVER, HeaderValue::StaticString(SERVER_NAME));
    }
    if !response.headers.contains(&FieldName::DATE) {
        response.headers.set(FieldName::DATE, HeaderValue::DateTime(SystemTime::now()));
    }
    response.headers.set(FieldName::CONNECTION, HeaderValue::StaticString("close"));

    let length = response.body.as_ref().map_or(0, gheppio_http::BodyKind::len);
    response.headers.set(FieldName::CONTENT_LENGTH, HeaderValue::Size(length));
}
