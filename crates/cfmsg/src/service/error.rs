// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for service dispatch.

use crate::codec::{DecodeError, EncodeError};
use std::fmt;

/// Result type for dispatcher operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Why a handler did not produce a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerFailure {
    /// Handler returned an error.
    Failed(String),
    /// Handler panicked; the payload message if it was a string.
    Panicked(String),
    /// Caller cancelled before the handler finished.
    Cancelled,
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed: {}", reason),
            Self::Panicked(reason) => write!(f, "panicked: {}", reason),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Errors that can occur while dispatching a service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Service not registered, or registered without handler
    UnknownService(String),

    /// A handler is already registered for the service
    DuplicateHandler(String),

    /// Request bytes did not decode against the request schema
    BadRequest { service: String, source: DecodeError },

    /// Request message was built for another schema
    RequestMismatch { service: String, source: EncodeError },

    /// Handler response did not encode against the response schema
    EncodeError { service: String, source: EncodeError },

    /// Handler failed, panicked or was cancelled
    HandlerError {
        service: String,
        failure: HandlerFailure,
    },
}

impl DispatchError {
    /// Service the error refers to.
    pub fn service(&self) -> &str {
        match self {
            Self::UnknownService(s) | Self::DuplicateHandler(s) => s,
            Self::BadRequest { service, .. }
            | Self::RequestMismatch { service, .. }
            | Self::EncodeError { service, .. }
            | Self::HandlerError { service, .. } => service,
        }
    }

    pub(crate) fn handler(service: &str, failure: HandlerFailure) -> Self {
        Self::HandlerError {
            service: service.to_string(),
            failure,
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownService(name) => write!(f, "Unknown service: {}", name),
            Self::DuplicateHandler(name) => write!(f, "Handler already registered: {}", name),
            Self::BadRequest { service, source } => {
                write!(f, "Bad request for {}: {}", service, source)
            }
            Self::RequestMismatch { service, source } => {
                write!(f, "Request does not match {}: {}", service, source)
            }
            Self::EncodeError { service, source } => {
                write!(f, "Response encoding failed for {}: {}", service, source)
            }
            Self::HandlerError { service, failure } => {
                write!(f, "Handler for {} {}", service, failure)
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BadRequest { source, .. } => Some(source),
            Self::RequestMismatch { source, .. } | Self::EncodeError { source, .. } => Some(source),
            _ => None,
        }
    }
}
