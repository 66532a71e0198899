/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::helpers::{get_bytes, scalar_or_null_split_parts};
use super::*;
use crate::markers::escape;

/// Writes values into its hash function by concatenation.
///
/// Also used for lists and s-expressions, whose elements are ordered.
pub(crate) struct ScalarSerializer {
    pub(super) base: BaseSerializer,
}

impl ScalarSerializer {
    pub fn new(hash_function: SharedHashFunction, depth: usize) -> Self {
        Self {
            base: BaseSerializer::new(hash_function, depth),
        }
    }

    pub fn scalar(&mut self, value: &dyn HashValue) -> Result<()> {
        let bytes = get_bytes(value)?;
        let (qualifier, representation) = scalar_or_null_split_parts(value, &bytes)?;

        self.base.handle_annotations_begin(value, false)?;
        self.base.begin_marker();
        self.base.write(&[qualifier]);
        if !representation.is_empty() {
            self.base.write(&escape(representation));
        }
        self.base.end_marker();
        self.base.handle_annotations_end(Some(value), false);
        Ok(())
    }

    pub fn hash_function(&self) -> SharedHashFunction {
        self.base.hash_function()
    }
}
