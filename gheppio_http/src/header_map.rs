// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::{
    FieldName,
    HeaderValue,
};

/// An ordered collection of header fields.
///
/// Insertion order is kept and duplicate names are allowed: header semantics
/// may depend on both, so the map never deduplicates or reorders. Lookups
/// compare names ASCII-case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct HeaderMap {
    headers: Vec<(FieldName, HeaderValue)>,
}

impl HeaderMap {
    pub fn new() -> HeaderMap {
        HeaderMap::default()
    }

    pub fn new_with_vec(headers: Vec<(FieldName, HeaderValue)>) -> HeaderMap {
        HeaderMap { headers }
    }

    /// Appends a header to the end of the list, keeping any field with the
    /// same name that is already present.
    pub fn append(&mut self, name: FieldName, value: HeaderValue) {
        self.headers.push((name, value));
    }

    #[must_use]
    pub fn contains(&self, name: &FieldName) -> bool {
        self.headers.iter().any(|(existing, _)| existing == name)
    }

    /// The first value for the given name, if any.
    #[must_use]
    pub fn get(&self, name: &FieldName) -> Option<&HeaderValue> {
        self.headers.iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// All values for the given name, in insertion order.
    #[must_use]
    pub fn get_all(&self, name: &FieldName) -> Vec<&HeaderValue> {
        self.headers.iter()
            .filter(|(existing, _)| existing == name)
            .map(|(_, value)| value)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(FieldName, HeaderValue)> {
        self.headers.iter()
    }

    /// Replaces the first field with the given name, or appends when absent.
    pub fn set(&mut self, name: FieldName, value: HeaderValue) {
        for (existing, existing_value) in &mut self.headers {
            if existing == &name {
                *existing_value = value;
                return;
            }
        }

        self.headers.push((name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_and_order_are_preserved() {
        let mut headers = HeaderMap::new();
        headers.append(FieldName::from(String::from("Set-Cookie")), "a=1".into());
        headers.append(FieldName::from(String::from("Host")), "example.com".into());
        headers.append(FieldName::from(String::from("set-cookie")), "b=2".into());

        let names: Vec<&str> = headers.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["Set-Cookie", "Host", "set-cookie"]);

        let cookies = headers.get_all(&FieldName::from("Set-Cookie"));
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].as_str_no_convert(), Some("a=1"));
        assert_eq!(cookies[1].as_str_no_convert(), Some("b=2"));
    }

    #[test]
    fn test_set_replaces_first_match_only() {
        let mut headers = HeaderMap::new();
        headers.append(FieldName::DATE, HeaderValue::StaticString("then"));
        headers.set(FieldName::DATE, HeaderValue::StaticString("now"));
        headers.set(FieldName::SERVER, HeaderValue::StaticString("gheppio"));

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get(&FieldName::DATE).and_then(HeaderValue::as_str_no_convert), Some("now"));
    }
}
