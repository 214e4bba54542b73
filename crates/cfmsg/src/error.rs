// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-level error type.

use crate::catalog::CatalogError;
use crate::codec::{DecodeError, EncodeError};
use crate::idl::{ParseError, RegisterError};
use crate::message::MessageError;
use crate::registry::RegistryError;
use crate::schema::SchemaError;
use crate::service::DispatchError;

/// Result alias over [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Any error raised by this crate.
///
/// Module APIs return their own error types; this enum lets callers mix
/// them with `?`.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Types
    // ========================================================================
    /// Schema construction rejected.
    Schema(SchemaError),
    /// Catalog lookup or registration failed.
    Catalog(CatalogError),
    /// Field access on a message failed.
    Message(MessageError),

    // ========================================================================
    // Wire
    // ========================================================================
    /// Bytes did not decode.
    Decode(DecodeError),
    /// Message did not encode.
    Encode(EncodeError),
    /// Registry operation failed.
    Registry(RegistryError),

    // ========================================================================
    // Services
    // ========================================================================
    /// Service call failed.
    Dispatch(DispatchError),

    // ========================================================================
    // Definitions
    // ========================================================================
    /// Interface definition text did not parse or resolve.
    Parse(ParseError),
    /// Resolved interfaces did not register.
    Register(RegisterError),

    // ========================================================================
    // Loaders
    // ========================================================================
    /// Configuration failed to load.
    #[cfg(feature = "loaders")]
    Config(crate::config::ConfigError),
    /// JSON conversion failed.
    #[cfg(feature = "loaders")]
    Json(crate::json::JsonError),
    /// I/O error with underlying cause.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Schema(e) => write!(f, "Schema error: {}", e),
            Error::Catalog(e) => write!(f, "Catalog error: {}", e),
            Error::Message(e) => write!(f, "Message error: {}", e),
            Error::Decode(e) => write!(f, "Decode error: {}", e),
            Error::Encode(e) => write!(f, "Encode error: {}", e),
            Error::Registry(e) => write!(f, "Registry error: {}", e),
            Error::Dispatch(e) => write!(f, "Dispatch error: {}", e),
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Register(e) => write!(f, "Register error: {}", e),
            #[cfg(feature = "loaders")]
            Error::Config(e) => write!(f, "Config error: {}", e),
            #[cfg(feature = "loaders")]
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Schema(e) => Some(e),
            Error::Catalog(e) => Some(e),
            Error::Message(e) => Some(e),
            Error::Decode(e) => Some(e),
            Error::Encode(e) => Some(e),
            Error::Registry(e) => Some(e),
            Error::Dispatch(e) => Some(e),
            Error::Parse(e) => Some(e),
            Error::Register(e) => Some(e),
            #[cfg(feature = "loaders")]
            Error::Config(e) => Some(e),
            #[cfg(feature = "loaders")]
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

macro_rules! impl_from_error {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(e: $ty) -> Self {
                    Error::$variant(e)
                }
            }
        )*
    };
}

impl_from_error!(
    Schema(SchemaError),
    Catalog(CatalogError),
    Message(MessageError),
    Decode(DecodeError),
    Encode(EncodeError),
    Registry(RegistryError),
    Dispatch(DispatchError),
    Parse(ParseError),
    Register(RegisterError),
    Io(std::io::Error),
);

#[cfg(feature = "loaders")]
impl_from_error!(
    Config(crate::config::ConfigError),
    Json(crate::json::JsonError),
);
