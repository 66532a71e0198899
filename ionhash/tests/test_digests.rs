/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![cfg(test)]

use chrono::NaiveDate;
use ionhash::hash_function::HashFunction;
use ionhash::*;
use sha2::{Digest, Sha256};

fn sample() -> Element {
    Element::list(vec![
        Element::null(),
        Element::from(-128_i64),
        Element::from(1.5_f64),
        Element::from(Decimal::new(-31415, -4)),
        Element::from("ion"),
        Element::symbol("sym").with_annotations(["a", "b"]),
        Element::blob(vec![0x0B, 0x0C, 0x0E, 0xFF]),
        Element::sexp(vec![Element::from(true), Element::typed_null(IonType::Blob)]),
    ])
}

#[test]
fn test_ordered_values_hash_their_stream() -> anyhow::Result<()> {
    // without structs a single hash function sees the whole stream
    let element = sample();
    let stream = element.ion_hash(IdentityProvider)?;
    assert_eq!(sha256(&element)?, Sha256::digest(&stream).to_vec());
    Ok(())
}

#[test]
fn test_sum_is_idempotent() -> anyhow::Result<()> {
    let mut hasher = Hasher::new(DigestProvider::named("sha256")?)?;
    sample().drive(&mut hasher)?;
    let first = hasher.sum(&[])?;
    assert_eq!(first, hasher.sum(&[])?);
    assert_eq!(hasher.sum(&[0xAB, 0xCD])?[2..], first[..]);
    assert_eq!(hasher.sum(&[0xAB, 0xCD])?[..2], [0xAB, 0xCD]);
    Ok(())
}

#[test]
fn test_empty_stream_has_empty_digest() -> anyhow::Result<()> {
    for algorithm in Algorithm::ALL.into_iter().filter(|a| a.is_enabled()) {
        let hasher = Hasher::new(DigestProvider::new(algorithm)?)?;
        assert!(hasher.sum(&[])?.is_empty(), "{}", algorithm);
        assert_eq!(hasher.sum(&[7])?, vec![7], "{}", algorithm);
    }
    Ok(())
}

#[test]
fn test_distinct_values() -> anyhow::Result<()> {
    let values = [
        Element::null(),
        Element::typed_null(IonType::Int),
        Element::typed_null(IonType::List),
        Element::from(1_i64),
        Element::from(-1_i64),
        Element::from(1.0_f64),
        Element::from(0.0_f64),
        Element::from(-0.0_f64),
        Element::from(Decimal::new(1, 0)),
        Element::from(Decimal::new(10, -1)),
        Element::from(Decimal::new(0, 0)),
        Element::from(Decimal::negative_zero(0)),
        Element::from("1"),
        Element::symbol("1"),
        Element::clob(b"1".to_vec()),
        Element::blob(b"1".to_vec()),
        Element::from(1_i64).with_annotations(["a"]),
        Element::from(1_i64).with_annotations(["a", "b"]),
        Element::from(1_i64).with_annotations(["b", "a"]),
        Element::list(vec![]),
        Element::sexp(vec![]),
        Element::structure::<&str>([]),
        Element::list(vec![Element::from(1_i64)]),
        Element::sexp(vec![Element::from(1_i64)]),
        Element::structure([("a", Element::from(1_i64))]),
        Element::structure([("b", Element::from(1_i64))]),
    ];
    let mut digests = values
        .iter()
        .map(sha256)
        .collect::<ionhash::Result<Vec<_>>>()?;
    digests.sort();
    digests.dedup();
    assert_eq!(digests.len(), values.len());
    Ok(())
}

#[test]
fn test_nans_hash_alike() -> anyhow::Result<()> {
    let quiet = Element::from(f64::NAN);
    let other = Element::from(f64::from_bits(0x7FF0_0000_0000_0001));
    assert_eq!(sha256(&quiet)?, sha256(&other)?);
    assert_ne!(sha256(&quiet)?, sha256(&Element::from(f64::INFINITY))?);
    Ok(())
}

#[test]
fn test_timestamps() -> anyhow::Result<()> {
    let local = NaiveDate::from_ymd_opt(2001, 2, 3)
        .unwrap()
        .and_hms_opt(4, 5, 6)
        .unwrap();
    let at = |precision, offset| Element::from(Timestamp::new(precision, local, offset));

    // coarser precisions are different values
    assert_ne!(
        sha256(&at(TimestampPrecision::Year, None))?,
        sha256(&at(TimestampPrecision::Month, None))?
    );
    assert_ne!(
        sha256(&at(TimestampPrecision::Minute, Some(0)))?,
        sha256(&at(TimestampPrecision::Second, Some(0)))?
    );
    // the unknown offset differs from UTC
    assert_ne!(
        sha256(&at(TimestampPrecision::Second, Some(0)))?,
        sha256(&at(TimestampPrecision::Second, None))?
    );
    // the same instant with different offsets are different values
    let shifted = NaiveDate::from_ymd_opt(2001, 2, 3)
        .unwrap()
        .and_hms_opt(5, 5, 6)
        .unwrap();
    assert_ne!(
        sha256(&at(TimestampPrecision::Second, Some(0)))?,
        sha256(&Element::from(Timestamp::new(
            TimestampPrecision::Second,
            shifted,
            Some(60)
        )))?
    );
    // trailing zeros of the fraction are significant
    let fraction = |d| {
        Element::from(Timestamp::new(TimestampPrecision::Second, local, Some(0)).with_fraction(d))
    };
    assert_ne!(
        sha256(&fraction(Decimal::new(5, -1)))?,
        sha256(&fraction(Decimal::new(50, -2)))?
    );
    Ok(())
}

#[test]
fn test_algorithms_are_consistent() -> anyhow::Result<()> {
    let element = Element::structure([
        ("list", sample()),
        ("nested", Element::structure([("x", Element::from(1_i64))])),
    ]);
    for algorithm in Algorithm::ALL.into_iter().filter(|a| a.is_enabled()) {
        let provider = DigestProvider::new(algorithm)?;
        let digest = element.ion_hash(provider)?;
        assert_eq!(digest, element.ion_hash(provider)?, "{}", algorithm);
        assert_eq!(digest, hash_element(&element, provider)?, "{}", algorithm);
        if algorithm != Algorithm::Identity {
            assert_eq!(
                digest.len(),
                provider.new_hasher()?.sum(&[]).len(),
                "{}",
                algorithm
            );
        }
    }
    Ok(())
}

#[cfg(feature = "xxh3")]
#[test]
fn test_xxh3_digests() -> anyhow::Result<()> {
    let element = sample();
    let stream = element.ion_hash(IdentityProvider)?;
    assert_eq!(
        element.ion_hash(DigestProvider::new(Algorithm::Xxh3_64)?)?,
        xxhash_rust::xxh3::xxh3_64(&stream).to_be_bytes().to_vec()
    );
    assert_eq!(
        element.ion_hash(DigestProvider::new(Algorithm::Xxh3_128)?)?,
        xxhash_rust::xxh3::xxh3_128(&stream).to_be_bytes().to_vec()
    );
    Ok(())
}

#[test]
fn test_closure_provider() -> anyhow::Result<()> {
    let provider = || -> Box<dyn HashFunction> {
        Box::new(ionhash::hash_function::DigestHashFunction::new::<Sha256>())
    };
    let element = Element::structure([("a", sample())]);
    assert_eq!(element.ion_hash(provider)?, sha256(&element)?);
    Ok(())
}
