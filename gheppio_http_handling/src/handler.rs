// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::sync::Arc;

use async_trait::async_trait;

use gheppio_http::{
    Request,
    Response,
};

/// The application callback: receives a fully parsed request and produces
/// the response to send. Implementations run on the shared runtime, so they
/// should not block.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, request: &Request) -> Response;
}

#[async_trait]
impl<F> Handler for F
        where F: Fn(&Request) -> Response + Send + Sync {
    async fn handle(&self, request: &Request) -> Response {
        self(request)
    }
}

/// Routes parsed requests to registered handlers by exact target path.
#[derive(Clone, Default)]
pub struct HandlerController {
    routes: Vec<(String, Arc<dyn Handler>)>,
}

impl HandlerController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: impl Into<String>, handler: Arc<dyn Handler>) {
        self.routes.push((path.into(), handler));
    }

    pub async fn handle(&self, request: &Request) -> Response {
        for (path, handler) in &self.routes {
            if request.target.as_str() == path {
                return handler.handle(request).await;
            }
        }

        Response::not_found("Not Found")
    }
}
