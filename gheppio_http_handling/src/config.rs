// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::time::Duration;

use thiserror::Error;

use crate::handler::HandlerController;

/// A configuration value was rejected. These errors are fatal to server
/// start: they are raised before the listener begins accepting connections
/// and are never a per-request condition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive integer")]
    ValueOutOfRange { field: &'static str },

    #[error("max_request_buffer_size ({max_request_buffer_size}) must be at least max_request_line_size ({max_request_line_size})")]
    ConfigurationInvalid {
        max_request_line_size: usize,
        max_request_buffer_size: usize,
    },
}

/// Hard size limits on request ingestion.
///
/// Immutable once the server has started: the limits are `Copy` and handed
/// by value to each connection task, so there is no path that could mutate
/// them at request-processing time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServerLimits {
    max_request_line_size: usize,
    max_request_buffer_size: Option<usize>,
}

impl Default for ServerLimits {
    fn default() -> Self {
        Self {
            // Matches the default large_client_header_buffers in nginx.
            max_request_line_size: 8 * 1024,
            // Matches the default client_max_body_size in nginx. Also large
            // enough that most requests should be under the limit.
            max_request_buffer_size: Some(1024 * 1024),
        }
    }
}

impl ServerLimits {
    /// The maximum allowed size for the HTTP request line, counted up to but
    /// excluding the final line feed.
    #[must_use]
    pub fn max_request_line_size(&self) -> usize {
        self.max_request_line_size
    }

    /// The maximum number of received-but-unconsumed bytes held for a
    /// connection. `None` means unbounded.
    #[must_use]
    pub fn max_request_buffer_size(&self) -> Option<usize> {
        self.max_request_buffer_size
    }

    /// Set the request line limit. Zero is rejected immediately,
    /// independent of [`ServerLimits::validate`].
    pub fn set_max_request_line_size(&mut self, value: usize) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::ValueOutOfRange { field: "max_request_line_size" });
        }
        self.max_request_line_size = value;
        Ok(())
    }

    /// Set the buffer capacity. `None` disables the cap; `Some(0)` is
    /// rejected immediately.
    pub fn set_max_request_buffer_size(&mut self, value: Option<usize>) -> Result<(), ConfigError> {
        if value == Some(0) {
            return Err(ConfigError::ValueOutOfRange { field: "max_request_buffer_size" });
        }
        self.max_request_buffer_size = value;
        Ok(())
    }

    /// Check the cross-constraint between the two limits.
    ///
    /// A buffer smaller than the line limit could never hold a maximal
    /// request line, so the line scanner could never see its terminator;
    /// such a pair must fail server start instead of failing every request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(max_request_buffer_size) = self.max_request_buffer_size {
            if max_request_buffer_size < self.max_request_line_size {
                return Err(ConfigError::ConfigurationInvalid {
                    max_request_line_size: self.max_request_line_size,
                    max_request_buffer_size,
                });
            }
        }

        Ok(())
    }
}

/// Everything a listener needs to serve connections.
#[derive(Clone)]
pub struct ServerSettings {
    pub handler_controller: HandlerController,

    pub limits: ServerLimits,

    /// If the client doesn't transmit the full request-line and headers
    /// within this time, the request is terminated.
    pub read_headers_timeout: Duration,
}

/// The number of runtime worker threads to use for serving requests.
///
/// Computed once at startup and passed down as a plain value; nothing in the
/// request path reads the processor count on its own.
#[must_use]
pub fn processor_thread_count() -> usize {
    // Divide by 2 for hyper-threading, and good defaults (still need threads
    // to do webserving).
    let thread_count = num_cpus::get() >> 1;

    // Receive Side Scaling processor counts currently max out at 16.
    thread_count.clamp(1, 16)
}
