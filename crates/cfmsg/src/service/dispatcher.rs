// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Service dispatcher.
//!
//! Pairs each registered service with a handler and runs the call round
//! trip: decode the request, invoke the handler, encode the response.

use crate::message::Message;
use crate::registry::{TypeEntry, TypeRegistry};
use crate::service::error::{DispatchError, DispatchResult, HandlerFailure};
use crate::service::handler::ServiceHandler;
use crate::service::state::{CallState, CallTracker};
use crate::service::ServiceDefinition;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handler and resolved codecs for one service.
struct Route {
    definition: ServiceDefinition,
    request: TypeEntry,
    response: TypeEntry,
    handler: Arc<dyn ServiceHandler>,
}

/// Snapshot of dispatcher counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub completed: u64,
    pub failed: u64,
    pub cancelled: u64,
}

/// Routes service calls to registered handlers.
///
/// Handlers are registered before the dispatcher is shared; after that the
/// handler table is read-only and calls run independently.
///
/// # Example
///
/// ```rust
/// use cfmsg::{Message, SchemaCatalog, ServiceDispatcher, TypeRegistry};
/// use std::sync::Arc;
///
/// let mut catalog = SchemaCatalog::new();
/// cfmsg::interfaces::load_builtin(&mut catalog).unwrap();
/// let registry = Arc::new(TypeRegistry::from_catalog(&catalog));
///
/// let mut dispatcher = ServiceDispatcher::new(registry.clone());
/// let response_schema = registry
///     .resolve_service("crazyflie_driver/Stop")
///     .unwrap()
///     .response()
///     .clone();
/// dispatcher
///     .register_handler("crazyflie_driver/Stop", move |_req: Message| -> Result<Message, String> {
///         Ok(Message::new(&response_schema))
///     })
///     .unwrap();
///
/// let response = dispatcher.call("crazyflie_driver/Stop", &[0x01]).unwrap();
/// assert!(response.is_empty());
/// ```
pub struct ServiceDispatcher {
    registry: Arc<TypeRegistry>,
    routes: HashMap<String, Route>,
    completed: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
}

impl ServiceDispatcher {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            routes: HashMap::new(),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            cancelled: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Register the handler for a service known to the registry.
    pub fn register_handler<H: ServiceHandler>(
        &mut self,
        service: &str,
        handler: H,
    ) -> DispatchResult<()> {
        if self.routes.contains_key(service) {
            return Err(DispatchError::DuplicateHandler(service.to_string()));
        }

        let unknown = |_| DispatchError::UnknownService(service.to_string());
        let definition = self.registry.resolve_service(service).map_err(unknown)?.clone();
        let request = self
            .registry
            .resolve(definition.request().name())
            .map_err(unknown)?
            .clone();
        let response = self
            .registry
            .resolve(definition.response().name())
            .map_err(unknown)?
            .clone();

        log::debug!(
            "dispatcher: handler registered for '{}' ({} -> {})",
            service,
            definition.request().name(),
            definition.response().name()
        );
        self.routes.insert(
            service.to_string(),
            Route {
                definition,
                request,
                response,
                handler: Arc::new(handler),
            },
        );
        Ok(())
    }

    /// True if a handler is registered for `service`.
    pub fn has_handler(&self, service: &str) -> bool {
        self.routes.contains_key(service)
    }

    /// Services with a handler, sorted.
    pub fn services(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Definition of a service with a handler.
    pub fn definition(&self, service: &str) -> DispatchResult<&ServiceDefinition> {
        self.route(service).map(|route| &route.definition)
    }

    /// Run one call from request bytes to response bytes.
    pub fn call(&self, service: &str, request: &[u8]) -> DispatchResult<Vec<u8>> {
        let mut tracker = CallTracker::new(service);
        let result = self.call_inner(service, request, &mut tracker);
        self.record(&result, &mut tracker);
        result
    }

    /// Run one in-process call with an already-built request.
    ///
    /// The request must match the request schema and the response must be
    /// encodable against the response schema.
    pub fn call_message(&self, service: &str, request: Message) -> DispatchResult<Message> {
        let mut tracker = CallTracker::new(service);
        let result = self.call_message_inner(service, request, &mut tracker);
        self.record(&result, &mut tracker);
        result
    }

    /// Current counters.
    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }

    fn call_inner(
        &self,
        service: &str,
        bytes: &[u8],
        tracker: &mut CallTracker<'_>,
    ) -> DispatchResult<Vec<u8>> {
        let route = self.route(service)?;

        let request = route.request.decode(bytes).map_err(|source| {
            log::warn!("dispatcher: bad request for '{}': {}", service, source);
            DispatchError::BadRequest {
                service: service.to_string(),
                source,
            }
        })?;
        tracker.advance(CallState::RequestDecoded);

        let response = self.invoke(route, request, tracker)?;

        let bytes = route.response.encode(&response).map_err(|source| {
            log::error!(
                "dispatcher: handler for '{}' returned an unencodable response: {}",
                service,
                source
            );
            DispatchError::EncodeError {
                service: service.to_string(),
                source,
            }
        })?;
        tracker.advance(CallState::ResponseEncoded);
        Ok(bytes)
    }

    fn call_message_inner(
        &self,
        service: &str,
        request: Message,
        tracker: &mut CallTracker<'_>,
    ) -> DispatchResult<Message> {
        let route = self.route(service)?;

        check_schema(&request, route.request.schema())
            .and_then(|_| route.request.codec().encoded_len(&request))
            .map_err(|source| {
                log::warn!("dispatcher: request rejected for '{}': {}", service, source);
                DispatchError::RequestMismatch {
                    service: service.to_string(),
                    source,
                }
            })?;
        tracker.advance(CallState::RequestDecoded);

        let response = self.invoke(route, request, tracker)?;

        check_schema(&response, route.response.schema())
            .and_then(|_| route.response.codec().encoded_len(&response))
            .map_err(|source| {
                log::error!(
                    "dispatcher: handler for '{}' returned an unencodable response: {}",
                    service,
                    source
                );
                DispatchError::EncodeError {
                    service: service.to_string(),
                    source,
                }
            })?;
        tracker.advance(CallState::ResponseEncoded);
        Ok(response)
    }

    fn invoke(
        &self,
        route: &Route,
        request: Message,
        tracker: &mut CallTracker<'_>,
    ) -> DispatchResult<Message> {
        let service = route.definition.name();
        let handler = route.handler.clone();
        let outcome = panic::catch_unwind(AssertUnwindSafe(move || handler.handle(request)));
        tracker.advance(CallState::HandlerInvoked);

        match outcome {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(reason)) => {
                log::warn!("dispatcher: handler for '{}' failed: {}", service, reason);
                Err(DispatchError::handler(service, HandlerFailure::Failed(reason)))
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                log::warn!("dispatcher: handler for '{}' panicked: {}", service, reason);
                Err(DispatchError::handler(service, HandlerFailure::Panicked(reason)))
            }
        }
    }

    fn route(&self, service: &str) -> DispatchResult<&Route> {
        self.routes
            .get(service)
            .ok_or_else(|| DispatchError::UnknownService(service.to_string()))
    }

    fn record<T>(&self, result: &DispatchResult<T>, tracker: &mut CallTracker<'_>) {
        match result {
            Ok(_) => {
                tracker.finish();
                self.completed.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                tracker.fail();
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(feature = "async")]
impl ServiceDispatcher {
    /// Run [`call`](Self::call) on the blocking pool.
    pub async fn call_async(
        self: &Arc<Self>,
        service: &str,
        request: Vec<u8>,
    ) -> DispatchResult<Vec<u8>> {
        let this = Arc::clone(self);
        let name = service.to_string();
        match tokio::task::spawn_blocking(move || this.call(&name, &request)).await {
            Ok(result) => result,
            Err(join) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                Err(DispatchError::handler(
                    service,
                    HandlerFailure::Panicked(join.to_string()),
                ))
            }
        }
    }

    /// Run a call that resolves to `HandlerError(Cancelled)` if `cancel`
    /// completes first. A handler already running is left to finish; its
    /// result is discarded.
    pub async fn call_cancellable<C>(
        self: &Arc<Self>,
        service: &str,
        request: Vec<u8>,
        cancel: C,
    ) -> DispatchResult<Vec<u8>>
    where
        C: std::future::Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                log::debug!("dispatcher: call to '{}' cancelled", service);
                self.cancelled.fetch_add(1, Ordering::Relaxed);
                Err(DispatchError::handler(service, HandlerFailure::Cancelled))
            }
            result = self.call_async(service, request) => result,
        }
    }
}

fn check_schema(
    message: &Message,
    expected: &Arc<crate::schema::Schema>,
) -> Result<(), crate::codec::EncodeError> {
    if message.schema() != expected {
        return Err(crate::codec::EncodeError::SchemaMismatch {
            expected: expected.name().to_string(),
            found: message.type_name().to_string(),
        });
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
