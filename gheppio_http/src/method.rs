// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use phf::phf_map;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Other(String),
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// Get the method in string form.
    ///
    /// # Notes
    /// Method tokens are case-sensitive, as per
    /// [RFC 9110 - Section 9.1](https://www.rfc-editor.org/rfc/rfc9110.html#section-9.1-5):
    /// > The method token is case-sensitive because it might be used as a
    /// > gateway to object-based systems with case-sensitive method names.
    ///
    /// # References
    /// * [RFC 9110 - Section 9. Methods](https://www.rfc-editor.org/rfc/rfc9110.html#section-9)
    /// * [IANA Hypertext Transfer Protocol (HTTP) Method Registry](https://www.iana.org/assignments/http-methods/http-methods.xhtml)
    pub fn as_string(&self) -> &str {
        match self {
            Self::Other(str) => str,
            Self::Connect => "CONNECT",
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Trace => "TRACE",
        }
    }
}

// Keys are exact: a lower-case spelling is a different (unknown) method.
static METHOD_MAP: phf::Map<&'static str, Method> = phf_map!(
    "CONNECT" => Method::Connect,
    "DELETE" => Method::Delete,
    "GET" => Method::Get,
    "HEAD" => Method::Head,
    "OPTIONS" => Method::Options,
    "PATCH" => Method::Patch,
    "POST" => Method::Post,
    "PUT" => Method::Put,
    "TRACE" => Method::Trace,
);

impl From<String> for Method {
    fn from(value: String) -> Self {
        match METHOD_MAP.get(value.as_str()) {
            Some(method) => method.clone(),
            None => Method::Other(value),
        }
    }
}

impl From<&str> for Method {
    fn from(value: &str) -> Self {
        match METHOD_MAP.get(value) {
            Some(method) => method.clone(),
            None => Method::Other(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("GET", Method::Get)]
    #[case("POST", Method::Post)]
    #[case("DELETE", Method::Delete)]
    #[case("get", Method::Other(String::from("get")))]
    #[case("Get", Method::Other(String::from("Get")))]
    #[case("NEW-METHOD", Method::Other(String::from("NEW-METHOD")))]
    fn test_from_str(#[case] input: &str, #[case] expected: Method) {
        assert_eq!(Method::from(input), expected);
        assert_eq!(Method::from(input).as_string(), input);
    }
}
