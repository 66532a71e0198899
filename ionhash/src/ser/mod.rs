/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Serializers writing the canonical stream into hash functions.

A [`Serializer`] is either a [`ScalarSerializer`], which writes values into
its hash function by plain concatenation (it is used at top level and for
ordered containers, too), or a [`StructSerializer`], which hashes each field
independently and writes the field digests in sorted order when the struct
is closed. The envelope logic shared by both lives in [`BaseSerializer`].

*/

use crate::hash_function::HashFunction;
use crate::{HashValue, Result};
use std::cell::RefCell;
use std::rc::Rc;

mod base;
pub(crate) use base::*;

pub mod helpers;

mod scalar;
pub(crate) use scalar::*;

mod structs;
pub(crate) use structs::*;

/// Type qualifier of symbols (and of field names and annotations).
pub const SYMBOL_QUALIFIER: u8 = 0x70;
/// Type qualifier of symbols without text, hashed as symbol zero.
pub const SYMBOL_ZERO_QUALIFIER: u8 = 0x71;
/// Type qualifier opening an annotation wrapper.
pub const ANNOTATION_QUALIFIER: u8 = 0xE0;
/// Complete type qualifier of the float positive zero.
pub const FLOAT_POSITIVE_ZERO: u8 = 0x40;

/// A hash function shared by a serializer and the ordered containers nested
/// in it, which hash by concatenation into the same state.
pub(crate) type SharedHashFunction = Rc<RefCell<Box<dyn HashFunction>>>;

pub(crate) fn shared(hash_function: Box<dyn HashFunction>) -> SharedHashFunction {
    Rc::new(RefCell::new(hash_function))
}

/// The serializer of one nesting level.
pub(crate) enum Serializer {
    Scalar(ScalarSerializer),
    Struct(StructSerializer),
}

impl Serializer {
    fn base(&self) -> &BaseSerializer {
        match self {
            Serializer::Scalar(s) => &s.base,
            Serializer::Struct(s) => &s.base,
        }
    }

    fn base_mut(&mut self) -> &mut BaseSerializer {
        match self {
            Serializer::Scalar(s) => &mut s.base,
            Serializer::Struct(s) => &mut s.base,
        }
    }

    pub fn scalar(&mut self, value: &dyn HashValue) -> Result<()> {
        match self {
            Serializer::Scalar(s) => s.scalar(value),
            Serializer::Struct(s) => s.scalar(value),
        }
    }

    pub fn step_in(&mut self, value: &dyn HashValue) -> Result<()> {
        self.base_mut().step_in(value)
    }

    pub fn step_out(&mut self) -> Result<()> {
        match self {
            Serializer::Scalar(s) => s.base.step_out(),
            Serializer::Struct(s) => s.step_out(),
        }
    }

    pub fn sum(&self, prefix: &[u8]) -> Vec<u8> {
        self.base().sum(prefix)
    }

    pub fn reset(&mut self) {
        self.base_mut().reset()
    }
}
