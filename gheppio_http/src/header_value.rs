// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::Write;
use std::time::SystemTime;

/// Represents a value of a header.
///
/// Values parsed from a request are always `String`s holding the bytes the
/// client sent, verbatim. The remaining variants exist for values the server
/// generates itself, so shared code paths can defer serialization to
/// [`HeaderValue::append_to_message`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HeaderValue {
    StaticString(&'static str),
    String(String),
    DateTime(SystemTime),
    Size(usize),
}

impl HeaderValue {
    /// Returns the value as a string, but does not convert it to a string if
    /// it is some other non-convertible type.
    #[must_use]
    pub fn as_str_no_convert(&self) -> Option<&str> {
        match self {
            HeaderValue::StaticString(string) => Some(string),
            HeaderValue::String(string) => Some(string),
            _ => None,
        }
    }

    pub fn append_to_message(&self, response_text: &mut String) {
        match self {
            HeaderValue::StaticString(string) => {
                response_text.push_str(string);
            }
            HeaderValue::String(string) => {
                response_text.push_str(string);
            }
            HeaderValue::DateTime(date_time) => {
                _ = write!(response_text, "{}", httpdate::HttpDate::from(*date_time));
            }
            HeaderValue::Size(size) => {
                _ = write!(response_text, "{size}");
            }
        }
    }

    /// Get the header value in string form.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> String {
        let mut result = String::new();
        self.append_to_message(&mut result);
        result
    }
}

impl From<&'static str> for HeaderValue {
    fn from(value: &'static str) -> Self {
        Self::StaticString(value)
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
