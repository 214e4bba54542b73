// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-call state machine.
//!
//! ```text
//! Idle -> RequestDecoded -> HandlerInvoked -> ResponseEncoded -> Idle
//!   \__________\________________\_______________> Failed -> Idle
//! ```

use std::fmt;

/// Phase of a single service call. Never shared between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallState {
    Idle,
    RequestDecoded,
    HandlerInvoked,
    ResponseEncoded,
    Failed,
}

impl CallState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition(self, next: CallState) -> bool {
        use CallState::*;
        matches!(
            (self, next),
            (Idle, RequestDecoded)
                | (RequestDecoded, HandlerInvoked)
                | (HandlerInvoked, ResponseEncoded)
                | (ResponseEncoded, Idle)
                | (Idle | RequestDecoded | HandlerInvoked, Failed)
                | (Failed, Idle)
        )
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::RequestDecoded => "request-decoded",
            Self::HandlerInvoked => "handler-invoked",
            Self::ResponseEncoded => "response-encoded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Call-local tracker that logs each transition.
#[derive(Debug)]
pub(crate) struct CallTracker<'a> {
    service: &'a str,
    state: CallState,
    history: Vec<CallState>,
}

impl<'a> CallTracker<'a> {
    pub fn new(service: &'a str) -> Self {
        Self {
            service,
            state: CallState::Idle,
            history: vec![CallState::Idle],
        }
    }

    pub fn advance(&mut self, next: CallState) {
        debug_assert!(
            self.state.can_transition(next),
            "illegal call transition {} -> {}",
            self.state,
            next
        );
        log::trace!("call {}: {} -> {}", self.service, self.state, next);
        self.state = next;
        self.history.push(next);
    }

    /// Move to `Failed` and back to `Idle`.
    pub fn fail(&mut self) {
        self.advance(CallState::Failed);
        self.advance(CallState::Idle);
    }

    /// Move from `ResponseEncoded` back to `Idle`.
    pub fn finish(&mut self) {
        self.advance(CallState::Idle);
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn history(&self) -> &[CallState] {
        &self.history
    }
}
