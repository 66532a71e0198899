/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::*;
use crate::markers::{escape, BEGIN, END};
use crate::{binary::NULL_NIBBLE, Error, SymbolToken};

/// Envelope logic shared by all serializers.
///
/// Every value is written as `BEGIN qualifier representation END`; annotated
/// values are further wrapped in `BEGIN 0xE0 annotations... value END`, and
/// struct members are preceded by their field name written as a symbol.
pub(crate) struct BaseSerializer {
    hash_function: SharedHashFunction,
    /// The depth of the hasher when this serializer was created.
    depth: usize,
    /// Whether the container we stepped into opened an annotation wrapper,
    /// which must be closed at step-out.
    has_container_annotation: bool,
}

impl BaseSerializer {
    pub fn new(hash_function: SharedHashFunction, depth: usize) -> Self {
        Self {
            hash_function,
            depth,
            has_container_annotation: false,
        }
    }

    /// A handle on the hash function, for nested ordered containers.
    pub fn hash_function(&self) -> SharedHashFunction {
        Rc::clone(&self.hash_function)
    }

    #[inline(always)]
    pub fn write(&mut self, bytes: &[u8]) {
        self.hash_function.borrow_mut().write(bytes);
    }

    #[inline(always)]
    pub fn begin_marker(&mut self) {
        self.write(&[BEGIN]);
    }

    #[inline(always)]
    pub fn end_marker(&mut self) {
        self.write(&[END]);
    }

    pub fn sum(&self, prefix: &[u8]) -> Vec<u8> {
        self.hash_function.borrow().sum(prefix)
    }

    pub fn reset(&mut self) {
        self.hash_function.borrow_mut().reset();
        self.has_container_annotation = false;
    }

    /// Write a field name or an annotation.
    pub fn write_symbol(&mut self, token: &SymbolToken) -> Result<()> {
        let (qualifier, text) = match (token.text(), token.sid()) {
            (Some(text), _) => (SYMBOL_QUALIFIER, text.as_bytes()),
            (None, Some(_)) => (SYMBOL_ZERO_QUALIFIER, &[][..]),
            (None, None) => return Err(Error::UnresolvedSymbol),
        };
        self.begin_marker();
        self.write(&[qualifier]);
        self.write(&escape(text));
        self.end_marker();
        Ok(())
    }

    pub fn handle_annotations_begin(
        &mut self,
        value: &dyn HashValue,
        is_container: bool,
    ) -> Result<()> {
        let annotations = value.annotations();
        if annotations.is_empty() {
            return Ok(());
        }
        self.begin_marker();
        self.write(&[ANNOTATION_QUALIFIER]);
        for annotation in annotations {
            self.write_symbol(annotation)?;
        }
        if is_container {
            self.has_container_annotation = true;
        }
        Ok(())
    }

    /// Close the annotation wrapper, if any.
    ///
    /// Scalars pass their value, whose annotations tell whether a wrapper was
    /// opened; containers pass `None`, as their value is gone at step-out.
    pub fn handle_annotations_end(&mut self, value: Option<&dyn HashValue>, is_container: bool) {
        let annotated = value.is_some_and(|v| !v.annotations().is_empty());
        if annotated || (is_container && self.has_container_annotation) {
            self.end_marker();
            if is_container {
                self.has_container_annotation = false;
            }
        }
    }

    pub fn handle_field_name(&mut self, value: &dyn HashValue) -> Result<()> {
        if self.depth > 0 && value.is_in_struct() {
            let field_name = value.field_name().ok_or(Error::UnresolvedSymbol)?;
            self.write_symbol(field_name)?;
        }
        Ok(())
    }

    pub fn step_in(&mut self, value: &dyn HashValue) -> Result<()> {
        self.handle_field_name(value)?;
        self.handle_annotations_begin(value, true)?;
        self.begin_marker();
        let mut qualifier = value.ion_type().type_code() << 4;
        if value.is_null() {
            qualifier |= NULL_NIBBLE;
        }
        self.write(&[qualifier]);
        Ok(())
    }

    pub fn step_out(&mut self) -> Result<()> {
        self.end_marker();
        self.handle_annotations_end(None, true);
        Ok(())
    }
}
