/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

The hash-function capability.

A [`HashFunction`] absorbs bytes and can be asked for the digest of what it
absorbed so far without being consumed. Standard algorithms are adapted from
the RustCrypto [`digest`] traits by [`DigestHashFunction`]; the
[`IdentityHashFunction`] returns exactly the bytes it was fed, and is used to
inspect the canonical stream in tests.

*/

use digest::DynDigest;

/// Minimal interface the serializers need from a hash function.
pub trait HashFunction {
    /// Absorb some bytes.
    fn write(&mut self, bytes: &[u8]);

    /// Return `prefix` followed by the digest of the bytes absorbed so far.
    ///
    /// This method must not alter the state: calling it twice in a row
    /// returns the same bytes.
    fn sum(&self, prefix: &[u8]) -> Vec<u8>;

    /// Forget all absorbed bytes.
    fn reset(&mut self);
}

/// A hash function whose digest is the concatenation of the absorbed bytes.
#[derive(Debug, Clone, Default)]
pub struct IdentityHashFunction {
    bytes: Vec<u8>,
}

impl IdentityHashFunction {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HashFunction for IdentityHashFunction {
    #[inline(always)]
    fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    fn sum(&self, prefix: &[u8]) -> Vec<u8> {
        let mut result = Vec::with_capacity(prefix.len() + self.bytes.len());
        result.extend_from_slice(prefix);
        result.extend_from_slice(&self.bytes);
        result
    }

    #[inline(always)]
    fn reset(&mut self) {
        self.bytes.clear();
    }
}

/// Adapter from any RustCrypto digest to [`HashFunction`].
///
/// [`sum`](HashFunction::sum) finalizes a clone of the running state, so that
/// absorbing can continue afterwards.
pub struct DigestHashFunction {
    inner: Box<dyn DynDigest>,
}

impl DigestHashFunction {
    /// Wrap a fresh instance of the digest `D`.
    pub fn new<D: DynDigest + Default + 'static>() -> Self {
        Self {
            inner: Box::new(D::default()),
        }
    }

    /// The size in bytes of the digests returned by [`sum`](HashFunction::sum),
    /// prefix excluded.
    pub fn output_size(&self) -> usize {
        self.inner.output_size()
    }
}

impl HashFunction for DigestHashFunction {
    #[inline(always)]
    fn write(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    fn sum(&self, prefix: &[u8]) -> Vec<u8> {
        let digest = self.inner.box_clone().finalize();
        let mut result = Vec::with_capacity(prefix.len() + digest.len());
        result.extend_from_slice(prefix);
        result.extend_from_slice(&digest);
        result
    }

    #[inline(always)]
    fn reset(&mut self) {
        self.inner.reset();
    }
}

impl core::fmt::Debug for DigestHashFunction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DigestHashFunction")
            .field("output_size", &self.output_size())
            .finish()
    }
}

#[cfg(feature = "xxh3")]
/// Non-cryptographic XXH3 digests, emitted big endian.
#[derive(Clone)]
pub struct Xxh3HashFunction {
    state: xxhash_rust::xxh3::Xxh3,
    wide: bool,
}

#[cfg(feature = "xxh3")]
impl Xxh3HashFunction {
    /// 64-bit digests.
    pub fn new_64() -> Self {
        Self {
            state: xxhash_rust::xxh3::Xxh3::new(),
            wide: false,
        }
    }

    /// 128-bit digests.
    pub fn new_128() -> Self {
        Self {
            state: xxhash_rust::xxh3::Xxh3::new(),
            wide: true,
        }
    }
}

#[cfg(feature = "xxh3")]
impl HashFunction for Xxh3HashFunction {
    #[inline(always)]
    fn write(&mut self, bytes: &[u8]) {
        self.state.update(bytes);
    }

    fn sum(&self, prefix: &[u8]) -> Vec<u8> {
        let mut result = prefix.to_vec();
        if self.wide {
            result.extend_from_slice(&self.state.digest128().to_be_bytes());
        } else {
            result.extend_from_slice(&self.state.digest().to_be_bytes());
        }
        result
    }

    #[inline(always)]
    fn reset(&mut self) {
        self.state.reset();
    }
}
