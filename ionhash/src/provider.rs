/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Providers of fresh hash-function instances.

A [`Hasher`](crate::Hasher) needs a new, independent [`HashFunction`] for
every struct it enters and for every nested container inside a struct, so
it is configured with a [`HasherProvider`] rather than with a single
instance. [`DigestProvider`] covers the standard algorithms listed in
[`Algorithm`]; which of them are available depends on the enabled Cargo
features. Any closure returning a boxed [`HashFunction`] is a provider, too.

*/

use crate::hash_function::*;
use crate::{Error, Result};
use core::fmt;
use core::str::FromStr;

/// Manufactures independent hash-function instances.
pub trait HasherProvider {
    /// Return a new instance, sharing no state with previous ones.
    fn new_hasher(&self) -> Result<Box<dyn HashFunction>>;
}

impl<F: Fn() -> Box<dyn HashFunction>> HasherProvider for F {
    #[inline(always)]
    fn new_hasher(&self) -> Result<Box<dyn HashFunction>> {
        Ok(self())
    }
}

/// Provider of [`IdentityHashFunction`] instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityProvider;

impl HasherProvider for IdentityProvider {
    #[inline(always)]
    fn new_hasher(&self) -> Result<Box<dyn HashFunction>> {
        Ok(Box::new(IdentityHashFunction::new()))
    }
}

/// Hash algorithms known to [`DigestProvider`].
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Ripemd160,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2s256,
    Blake2b256,
    Blake2b384,
    Blake2b512,
    Xxh3_64,
    Xxh3_128,
    Identity,
}

impl Algorithm {
    /// All algorithms, whether enabled or not.
    pub const ALL: [Algorithm; 20] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Sha512_224,
        Algorithm::Sha512_256,
        Algorithm::Ripemd160,
        Algorithm::Sha3_224,
        Algorithm::Sha3_256,
        Algorithm::Sha3_384,
        Algorithm::Sha3_512,
        Algorithm::Blake2s256,
        Algorithm::Blake2b256,
        Algorithm::Blake2b384,
        Algorithm::Blake2b512,
        Algorithm::Xxh3_64,
        Algorithm::Xxh3_128,
        Algorithm::Identity,
    ];

    /// Canonical name, accepted back by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha1 => "SHA-1",
            Algorithm::Sha224 => "SHA-224",
            Algorithm::Sha256 => "SHA-256",
            Algorithm::Sha384 => "SHA-384",
            Algorithm::Sha512 => "SHA-512",
            Algorithm::Sha512_224 => "SHA-512/224",
            Algorithm::Sha512_256 => "SHA-512/256",
            Algorithm::Ripemd160 => "RIPEMD-160",
            Algorithm::Sha3_224 => "SHA3-224",
            Algorithm::Sha3_256 => "SHA3-256",
            Algorithm::Sha3_384 => "SHA3-384",
            Algorithm::Sha3_512 => "SHA3-512",
            Algorithm::Blake2s256 => "BLAKE2s-256",
            Algorithm::Blake2b256 => "BLAKE2b-256",
            Algorithm::Blake2b384 => "BLAKE2b-384",
            Algorithm::Blake2b512 => "BLAKE2b-512",
            Algorithm::Xxh3_64 => "XXH3-64",
            Algorithm::Xxh3_128 => "XXH3-128",
            Algorithm::Identity => "identity",
        }
    }

    /// Build an instance, or `None` if the algorithm's feature is disabled.
    #[allow(unreachable_patterns)]
    fn instantiate(self) -> Option<Box<dyn HashFunction>> {
        Some(match self {
            Algorithm::Identity => Box::new(IdentityHashFunction::new()),
            #[cfg(feature = "md5")]
            Algorithm::Md5 => Box::new(DigestHashFunction::new::<md5::Md5>()),
            #[cfg(feature = "sha1")]
            Algorithm::Sha1 => Box::new(DigestHashFunction::new::<sha1::Sha1>()),
            #[cfg(feature = "sha2")]
            Algorithm::Sha224 => Box::new(DigestHashFunction::new::<sha2::Sha224>()),
            #[cfg(feature = "sha2")]
            Algorithm::Sha256 => Box::new(DigestHashFunction::new::<sha2::Sha256>()),
            #[cfg(feature = "sha2")]
            Algorithm::Sha384 => Box::new(DigestHashFunction::new::<sha2::Sha384>()),
            #[cfg(feature = "sha2")]
            Algorithm::Sha512 => Box::new(DigestHashFunction::new::<sha2::Sha512>()),
            #[cfg(feature = "sha2")]
            Algorithm::Sha512_224 => Box::new(DigestHashFunction::new::<sha2::Sha512_224>()),
            #[cfg(feature = "sha2")]
            Algorithm::Sha512_256 => Box::new(DigestHashFunction::new::<sha2::Sha512_256>()),
            #[cfg(feature = "ripemd")]
            Algorithm::Ripemd160 => Box::new(DigestHashFunction::new::<ripemd::Ripemd160>()),
            #[cfg(feature = "sha3")]
            Algorithm::Sha3_224 => Box::new(DigestHashFunction::new::<sha3::Sha3_224>()),
            #[cfg(feature = "sha3")]
            Algorithm::Sha3_256 => Box::new(DigestHashFunction::new::<sha3::Sha3_256>()),
            #[cfg(feature = "sha3")]
            Algorithm::Sha3_384 => Box::new(DigestHashFunction::new::<sha3::Sha3_384>()),
            #[cfg(feature = "sha3")]
            Algorithm::Sha3_512 => Box::new(DigestHashFunction::new::<sha3::Sha3_512>()),
            #[cfg(feature = "blake2")]
            Algorithm::Blake2s256 => Box::new(DigestHashFunction::new::<blake2::Blake2s256>()),
            #[cfg(feature = "blake2")]
            Algorithm::Blake2b256 => Box::new(DigestHashFunction::new::<
                blake2::Blake2b<blake2::digest::consts::U32>,
            >()),
            #[cfg(feature = "blake2")]
            Algorithm::Blake2b384 => Box::new(DigestHashFunction::new::<
                blake2::Blake2b<blake2::digest::consts::U48>,
            >()),
            #[cfg(feature = "blake2")]
            Algorithm::Blake2b512 => Box::new(DigestHashFunction::new::<blake2::Blake2b512>()),
            #[cfg(feature = "xxh3")]
            Algorithm::Xxh3_64 => Box::new(Xxh3HashFunction::new_64()),
            #[cfg(feature = "xxh3")]
            Algorithm::Xxh3_128 => Box::new(Xxh3HashFunction::new_128()),
            _ => return None,
        })
    }

    /// Whether the algorithm was compiled in.
    pub fn is_enabled(self) -> bool {
        self.instantiate().is_some()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Names are case-insensitive, and `-`, `_`, and `/` are ignored, so
    /// `SHA256`, `sha-256`, and `SHA_256` all denote [`Algorithm::Sha256`].
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | '/'))
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Ok(match key.as_str() {
            "MD5" => Algorithm::Md5,
            "SHA1" => Algorithm::Sha1,
            "SHA224" => Algorithm::Sha224,
            "SHA256" => Algorithm::Sha256,
            "SHA384" => Algorithm::Sha384,
            "SHA512" => Algorithm::Sha512,
            "SHA512224" => Algorithm::Sha512_224,
            "SHA512256" => Algorithm::Sha512_256,
            "RIPEMD160" => Algorithm::Ripemd160,
            "SHA3224" => Algorithm::Sha3_224,
            "SHA3256" => Algorithm::Sha3_256,
            "SHA3384" => Algorithm::Sha3_384,
            "SHA3512" => Algorithm::Sha3_512,
            "BLAKE2S256" => Algorithm::Blake2s256,
            "BLAKE2B256" => Algorithm::Blake2b256,
            "BLAKE2B384" => Algorithm::Blake2b384,
            "BLAKE2B512" => Algorithm::Blake2b512,
            "XXH364" => Algorithm::Xxh3_64,
            "XXH3128" => Algorithm::Xxh3_128,
            "IDENTITY" => Algorithm::Identity,
            _ => return Err(Error::Configuration(s.to_string())),
        })
    }
}

/// Provider of hash functions implementing a fixed [`Algorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestProvider {
    algorithm: Algorithm,
}

impl DigestProvider {
    /// Create a provider for `algorithm`.
    ///
    /// Fails with [`Error::Configuration`] if the algorithm's Cargo feature
    /// is disabled.
    pub fn new(algorithm: Algorithm) -> Result<Self> {
        if !algorithm.is_enabled() {
            return Err(Error::Configuration(algorithm.name().to_string()));
        }
        log::debug!("Using hash algorithm {}", algorithm);
        Ok(Self { algorithm })
    }

    /// Create a provider from an algorithm name (see [`Algorithm::from_str`]).
    pub fn named(name: &str) -> Result<Self> {
        Self::new(name.parse()?)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl HasherProvider for DigestProvider {
    fn new_hasher(&self) -> Result<Box<dyn HashFunction>> {
        self.algorithm
            .instantiate()
            .ok_or_else(|| Error::Configuration(self.algorithm.name().to_string()))
    }
}
