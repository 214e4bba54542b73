// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Service handler trait.

use crate::message::Message;

/// Handler trait for processing service requests.
///
/// Implement this trait to define your service logic. The request has
/// already been decoded and validated against the request schema; the
/// returned message is encoded against the response schema.
pub trait ServiceHandler: Send + Sync + 'static {
    /// Handle a request and return the response, or a failure reason.
    fn handle(&self, request: Message) -> Result<Message, String>;
}

/// A function-based service handler.
impl<F> ServiceHandler for F
where
    F: Fn(Message) -> Result<Message, String> + Send + Sync + 'static,
{
    fn handle(&self, request: Message) -> Result<Message, String> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, SchemaBuilder};
    use std::sync::Arc;

    #[test]
    fn handler_trait_with_closure() {
        let schema = Arc::new(
            SchemaBuilder::new("Echo")
                .field("value", FieldKind::U32)
                .build()
                .expect("schema"),
        );
        let handler = |request: Message| -> Result<Message, String> { Ok(request) };

        let request = Message::new(&schema).with("value", 5u32).expect("set");
        let response = handler.handle(request.clone()).expect("handle");
        assert_eq!(response, request);
    }

    #[test]
    fn handler_trait_with_error() {
        struct Reject;

        impl ServiceHandler for Reject {
            fn handle(&self, _request: Message) -> Result<Message, String> {
                Err("not armed".to_string())
            }
        }

        let schema = Arc::new(SchemaBuilder::new("Empty").build().expect("schema"));
        let result = Reject.handle(Message::new(&schema));
        assert_eq!(result, Err("not armed".to_string()));
    }
}
