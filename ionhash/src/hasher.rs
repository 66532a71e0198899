/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

The hashing stack machine.

A [`Hasher`] is driven by a reader or a writer in document order:
[`scalar`](Hasher::scalar) for atomic values (and nulls, including null
containers), [`step_in`](Hasher::step_in) and [`step_out`](Hasher::step_out)
around containers. The digest of what has been seen so far can be requested
with [`sum`](Hasher::sum) whenever the hasher is back at top level.

Ordered containers are hashed by concatenation into the hash function of the
enclosing level. A struct, instead, and every container directly inside a
struct, gets a fresh hash function from the provider, so that the digests of
the fields can be computed in isolation and sorted.

```
use ionhash::{Element, Hasher, IdentityProvider};

# fn main() -> ionhash::Result<()> {
let mut hasher = Hasher::new(IdentityProvider)?;
let list = Element::list(vec![Element::from(1_i64), Element::from(2_i64)]);
hasher.step_in(&list.view())?;
hasher.scalar(&Element::from(1_i64).view())?;
hasher.scalar(&Element::from(2_i64).view())?;
hasher.step_out()?;
assert_eq!(
    hasher.sum(&[])?,
    [0x0B, 0xB0, 0x0B, 0x20, 0x01, 0x0E, 0x0B, 0x20, 0x02, 0x0E, 0x0E]
);
# Ok(())
# }
```

*/

use crate::ser::{shared, ScalarSerializer, Serializer, StructSerializer};
use crate::{Error, HashValue, HasherProvider, Result};

/// Computes the digest of a value stream, one traversal session at a time.
///
/// The base serializer (depth 0) always exists; nested serializers are kept
/// on a stack, one per open container, so `depth() == stack.len()`.
pub struct Hasher<P: HasherProvider> {
    provider: P,
    base: Serializer,
    stack: Vec<Serializer>,
    /// Whether a value reached the base serializer since the last reset.
    seen_values: bool,
}

impl<P: HasherProvider> Hasher<P> {
    /// Create a hasher using `provider` for all its hash functions.
    pub fn new(provider: P) -> Result<Self> {
        let base = ScalarSerializer::new(shared(provider.new_hasher()?), 0);
        log::debug!("Created hasher");
        Ok(Self {
            provider,
            base: Serializer::Scalar(base),
            stack: vec![],
            seen_values: false,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The number of containers currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn current(&self) -> &Serializer {
        self.stack.last().unwrap_or(&self.base)
    }

    fn current_mut(&mut self) -> &mut Serializer {
        match self.stack.last_mut() {
            Some(serializer) => serializer,
            None => &mut self.base,
        }
    }

    /// Hash a scalar or a null value at the current depth.
    pub fn scalar(&mut self, value: &dyn HashValue) -> Result<()> {
        if self.stack.is_empty() {
            self.seen_values = true;
        }
        self.current_mut().scalar(value)
    }

    /// Enter the container `value`.
    pub fn step_in(&mut self, value: &dyn HashValue) -> Result<()> {
        let ion_type = value.ion_type();
        if !ion_type.is_container() {
            return Err(Error::InvalidOperation("cannot step into a scalar value"));
        }
        log::trace!("Stepping into {:?} at depth {}", ion_type, self.depth());

        let hash_function = match self.current() {
            Serializer::Struct(_) => shared(self.provider.new_hasher()?),
            Serializer::Scalar(parent) => parent.hash_function(),
        };
        let depth = self.depth();
        let serializer = if value.is_struct() {
            Serializer::Struct(StructSerializer::new(
                hash_function,
                depth,
                self.provider.new_hasher()?,
            ))
        } else {
            Serializer::Scalar(ScalarSerializer::new(hash_function, depth))
        };

        if self.stack.is_empty() {
            self.seen_values = true;
        }
        self.stack.push(serializer);
        self.current_mut().step_in(value)
    }

    /// Leave the current container.
    ///
    /// Fails with [`Error::InvalidOperation`] at top level.
    pub fn step_out(&mut self) -> Result<()> {
        if self.stack.is_empty() {
            return Err(Error::InvalidOperation("cannot step out of the top level"));
        }
        log::trace!("Stepping out of depth {}", self.depth());

        self.current_mut().step_out()?;
        let popped = self.stack.pop();
        if let (Some(popped), Serializer::Struct(parent)) = (popped, self.current_mut()) {
            parent.append_field_digest(popped.sum(&[]));
        }
        Ok(())
    }

    /// Return `prefix` followed by the digest of the values seen so far.
    ///
    /// Before any value has been seen the digest is empty. Fails with
    /// [`Error::InvalidOperation`] if a container is open.
    pub fn sum(&self, prefix: &[u8]) -> Result<Vec<u8>> {
        if !self.stack.is_empty() {
            return Err(Error::InvalidOperation(
                "a digest can be requested only at top level",
            ));
        }
        if !self.seen_values {
            return Ok(prefix.to_vec());
        }
        Ok(self.base.sum(prefix))
    }

    /// Forget the values seen so far, so that the next top-level value is
    /// digested on its own.
    ///
    /// Fails with [`Error::InvalidOperation`] if a container is open.
    pub fn reset(&mut self) -> Result<()> {
        if !self.stack.is_empty() {
            return Err(Error::InvalidOperation(
                "a hasher can be reset only at top level",
            ));
        }
        self.base.reset();
        self.seen_values = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Element, IdentityProvider};

    #[test]
    fn test_depth_tracking() -> anyhow::Result<()> {
        let mut hasher = Hasher::new(IdentityProvider)?;
        let list = Element::list(vec![]);
        assert_eq!(hasher.depth(), 0);
        hasher.step_in(&list.view())?;
        hasher.step_in(&list.view())?;
        assert_eq!(hasher.depth(), 2);
        hasher.step_out()?;
        hasher.step_out()?;
        assert_eq!(hasher.depth(), 0);
        Ok(())
    }

    #[test]
    fn test_protocol_misuse() -> anyhow::Result<()> {
        let mut hasher = Hasher::new(IdentityProvider)?;
        assert!(matches!(hasher.step_out(), Err(Error::InvalidOperation(_))));

        hasher.step_in(&Element::list(vec![]).view())?;
        assert!(matches!(hasher.sum(&[]), Err(Error::InvalidOperation(_))));
        assert!(matches!(hasher.reset(), Err(Error::InvalidOperation(_))));
        hasher.step_out()?;
        assert!(hasher.sum(&[]).is_ok());

        assert!(matches!(
            hasher.step_in(&Element::from(1_i64).view()),
            Err(Error::InvalidOperation(_))
        ));
        assert_eq!(hasher.depth(), 0);
        Ok(())
    }

    #[test]
    fn test_reset_between_top_level_values() -> anyhow::Result<()> {
        let mut hasher = Hasher::new(IdentityProvider)?;
        hasher.scalar(&Element::from(1_i64).view())?;
        hasher.reset()?;
        assert!(hasher.sum(&[])?.is_empty());
        hasher.scalar(&Element::from(2_i64).view())?;
        assert_eq!(hasher.sum(&[])?, vec![0x0B, 0x20, 0x02, 0x0E]);
        Ok(())
    }

    #[test]
    fn test_sum_appends_to_prefix() -> anyhow::Result<()> {
        let mut hasher = Hasher::new(IdentityProvider)?;
        assert_eq!(hasher.sum(&[0xAA])?, vec![0xAA]);
        hasher.scalar(&Element::from(false).view())?;
        assert_eq!(hasher.sum(&[0xAA])?, vec![0xAA, 0x0B, 0x10, 0x0E]);
        Ok(())
    }
}
