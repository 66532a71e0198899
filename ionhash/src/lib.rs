/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unconditional_recursion)]

pub mod binary;
pub mod markers;

mod error;
pub use error::*;

mod value;
pub use value::*;

pub mod hash_function;
pub use hash_function::{HashFunction, IdentityHashFunction};

mod provider;
pub use provider::*;

pub(crate) mod ser;
pub use ser::{
    ANNOTATION_QUALIFIER, FLOAT_POSITIVE_ZERO, SYMBOL_QUALIFIER, SYMBOL_ZERO_QUALIFIER,
};

mod hasher;
pub use hasher::*;

mod element;
pub use element::*;

/// The digest of `element` using hash functions from `provider`.
pub fn hash_element<P: HasherProvider>(element: &Element, provider: P) -> Result<Vec<u8>> {
    element.ion_hash(provider)
}

/// The SHA-256 digest of `element`.
#[cfg(feature = "sha2")]
pub fn sha256(element: &Element) -> Result<Vec<u8>> {
    element.ion_hash(DigestProvider::new(Algorithm::Sha256)?)
}
