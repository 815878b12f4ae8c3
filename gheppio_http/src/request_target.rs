// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::borrow::Cow;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RequestTarget {
    Origin {
        path: String,
        query: String,
    },
    Absolute(String),
    Asterisk,
}

impl RequestTarget {
    /// Parse the request-target forms of
    /// [RFC 9112, Section 3.2](https://www.rfc-editor.org/rfc/rfc9112.html#name-request-target).
    ///
    /// The caller is expected to have validated the raw bytes already (token
    /// boundary, control characters, NUL scan); this only classifies the
    /// form.
    pub fn parse<'a>(input: impl Into<Cow<'a, str>>) -> Option<Self> {
        let input = input.into();
        if input == "*" {
            return Some(Self::Asterisk);
        }

        if input.starts_with('/') {
            if let Some((path, query)) = input.split_once('?') {
                return Some(Self::Origin {
                    path: path.to_string(),
                    query: query.to_string(),
                });
            }

            return Some(Self::Origin { path: input.to_string(), query: String::new() });
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            return Some(RequestTarget::Absolute(input.into_owned()));
        }

        None
    }

    /// Returns the request target as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            RequestTarget::Origin { path, .. } => path,
            RequestTarget::Absolute(string) => string,
            RequestTarget::Asterisk => "*",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("*", Some(RequestTarget::Asterisk))]
    #[case("**", None)]
    #[case("not-beginning-with-a-solidus", None)]
    #[case("?query=string", None)]
    #[case("/", Some(RequestTarget::Origin { path: "/".into(), query: String::new() }))]
    #[case("/test.html", Some(RequestTarget::Origin { path: "/test.html".into(), query: String::new() }))]
    #[case("/???", Some(RequestTarget::Origin { path: "/".into(), query: "??".into() }))]
    #[case("/?t=t", Some(RequestTarget::Origin { path: "/".into(), query: "t=t".into() }))]
    #[case("https://localhost/index.html", Some(RequestTarget::Absolute("https://localhost/index.html".into())))]
    fn test_parse(#[case] input: &str, #[case] expected: Option<RequestTarget>) {
        assert_eq!(RequestTarget::parse(input), expected);
    }
}
