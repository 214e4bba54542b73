// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request/response services.
//!
//! A [`ServiceDefinition`] names a request and response schema. The
//! [`ServiceDispatcher`] decodes incoming request bytes, runs the handler
//! registered for the service and encodes its response:
//!
//! ```text
//! request bytes --decode--> Message --handler--> Message --encode--> response bytes
//! ```
//!
//! Every failure is returned to the caller as a [`DispatchError`]; a failing
//! or panicking handler never affects other calls.

mod definition;
mod dispatcher;
mod error;
mod handler;
mod state;

pub use definition::ServiceDefinition;
pub use dispatcher::{DispatchStats, ServiceDispatcher};
pub use error::{DispatchError, DispatchResult, HandlerFailure};
pub use handler::ServiceHandler;
pub use state::CallState;
