// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Service definition: a request/response schema pair under one name.

use crate::schema::Schema;
use std::sync::Arc;

/// Request and response schemas of a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    name: String,
    request: Arc<Schema>,
    response: Arc<Schema>,
}

impl ServiceDefinition {
    pub fn new(name: impl Into<String>, request: Arc<Schema>, response: Arc<Schema>) -> Self {
        Self {
            name: name.into(),
            request,
            response,
        }
    }

    /// Service name (e.g., "crazyflie_driver/Takeoff").
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn request(&self) -> &Arc<Schema> {
        &self.request
    }

    pub fn response(&self) -> &Arc<Schema> {
        &self.response
    }
}
