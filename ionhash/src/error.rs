/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Errors raised while hashing.

use crate::IonType;

/// The type of result returned by hashing functions.
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors that can happen while canonicalizing and hashing a value stream.
///
/// All errors are local to the call that raised them. After an error the
/// [`Hasher`](crate::Hasher) is left in a defined but unfinished state, and
/// further protocol calls are not guaranteed to produce a meaningful digest.
pub enum Error {
    #[error("Unknown or unsupported hash algorithm '{0}'")]
    /// A provider was asked for a hash algorithm it does not know, or whose
    /// Cargo feature is disabled.
    Configuration(String),
    #[error("Invalid argument: {0}")]
    /// A required part of a value is absent (e.g., a non-null value without
    /// its raw value).
    InvalidArgument(&'static str),
    #[error("Invalid operation: {0}")]
    /// The traversal protocol was misused.
    InvalidOperation(&'static str),
    #[error("Unsupported value type {0:?} while deriving scalar bytes")]
    /// The value type cannot be encoded as a scalar (e.g., a non-null container
    /// passed to `scalar`).
    UnsupportedValueType(IonType),
    #[error(
        "Symbol has neither text nor a symbol identifier; symbol tables are not supported"
    )]
    /// A field name or annotation could not be resolved.
    UnresolvedSymbol,
}
