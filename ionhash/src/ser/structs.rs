/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::*;
use crate::markers::escape;

/// Hashes a struct independently of the order of its fields.
///
/// Each field is hashed on its own, field name included: scalar fields by
/// an internal [`ScalarSerializer`], container fields by the serializer the
/// [`Hasher`](crate::Hasher) pushes for them. At step-out the field digests
/// are sorted and written, escaped, into the struct's own hash function.
pub(crate) struct StructSerializer {
    pub(super) base: BaseSerializer,
    field_hasher: ScalarSerializer,
    field_digests: Vec<Vec<u8>>,
}

impl StructSerializer {
    pub fn new(
        hash_function: SharedHashFunction,
        depth: usize,
        field_hash_function: Box<dyn HashFunction>,
    ) -> Self {
        Self {
            base: BaseSerializer::new(hash_function, depth),
            field_hasher: ScalarSerializer::new(shared(field_hash_function), depth + 1),
            field_digests: vec![],
        }
    }

    /// Hash a scalar field and record its digest.
    pub fn scalar(&mut self, value: &dyn HashValue) -> Result<()> {
        // each field starts from a clean state
        self.field_hasher.base.reset();
        self.field_hasher.base.handle_field_name(value)?;
        self.field_hasher.scalar(value)?;
        let digest = self.field_hasher.base.sum(&[]);
        self.field_hasher.base.reset();
        self.append_field_digest(digest);
        Ok(())
    }

    pub fn append_field_digest(&mut self, digest: Vec<u8>) {
        self.field_digests.push(digest);
    }

    pub fn step_out(&mut self) -> Result<()> {
        // Vec<u8> compares lexicographically as unsigned bytes, shorter first
        self.field_digests.sort_unstable();
        for digest in core::mem::take(&mut self.field_digests) {
            self.base.write(&escape(&digest));
        }
        self.base.step_out()
    }
}
