// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Example handlers, demonstrating the handler surface of gheppio.

use std::sync::Arc;

use gheppio_http::{
    Request,
    Response,
    StatusCode,
};

use gheppio_http_handling::HandlerController;

pub fn register(handler_controller: &mut HandlerController) {
    handler_controller.register("/", Arc::new(|_request: &Request| {
        Response::with_status_and_string_body(StatusCode::Ok, "Hello from gheppio!")
    }));

    // Echoes the header block back, demonstrating that names, order and
    // duplicates arrive exactly as the client sent them.
    handler_controller.register("/headers", Arc::new(|request: &Request| {
        let mut body = String::new();
        for (name, value) in request.headers.iter() {
            body.push_str(name.as_str());
            body.push_str(": ");
            body.push_str(value.as_str_no_convert().unwrap_or_default());
            body.push('\n');
        }
        Response::with_status_and_string_body(StatusCode::Ok, body)
    }));
}
