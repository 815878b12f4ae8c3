// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

/// The name of a header field.
///
/// The exact spelling the client sent is preserved, because header semantics
/// may depend on what the application callback observes; comparisons are
/// ASCII-case-insensitive, as per
/// [RFC 9110 - Section 5.1](https://www.rfc-editor.org/rfc/rfc9110.html#section-5.1):
/// > Field names are case-insensitive.
#[derive(Clone, Debug, Eq)]
pub struct FieldName(Cow<'static, str>);

impl FieldName {
    pub const CONNECTION: FieldName = FieldName(Cow::Borrowed("Connection"));
    pub const CONTENT_LENGTH: FieldName = FieldName(Cow::Borrowed("Content-Length"));
    pub const CONTENT_TYPE: FieldName = FieldName(Cow::Borrowed("Content-Type"));
    pub const DATE: FieldName = FieldName(Cow::Borrowed("Date"));
    pub const HOST: FieldName = FieldName(Cow::Borrowed("Host"));
    pub const SERVER: FieldName = FieldName(Cow::Borrowed("Server"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The name exactly as it will appear (or appeared) on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for FieldName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl PartialEq<str> for FieldName {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl Hash for FieldName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl From<String> for FieldName {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&'static str> for FieldName {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spelling_is_preserved() {
        let name = FieldName::from(String::from("x-CuStOm"));
        assert_eq!(name.as_str(), "x-CuStOm");
    }

    #[test]
    fn test_comparison_is_case_insensitive() {
        assert_eq!(FieldName::from(String::from("host")), FieldName::HOST);
        assert_eq!(FieldName::from(String::from("CONTENT-length")), FieldName::CONTENT_LENGTH);
        assert_ne!(FieldName::from(String::from("Content-Range")), FieldName::CONTENT_LENGTH);
    }
}
