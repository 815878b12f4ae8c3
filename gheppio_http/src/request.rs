// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::{
    HeaderMap,
    HttpVersion,
    Method,
    RequestTarget,
};

/// A fully parsed request line plus header block, as handed to the
/// application callback. The headers keep the exact spelling, order and
/// duplication the client sent.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub target: RequestTarget,
    pub version: HttpVersion,
    pub headers: HeaderMap,
}
