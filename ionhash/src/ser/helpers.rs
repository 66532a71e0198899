/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Derivation of the type qualifier and representation of scalars.

The bytes are obtained from the [binary encoder](crate::binary), and then
normalized: the length field is dropped (the length is implied by the
closing marker), so is the low nibble of the type descriptor, except for
booleans, whose nibble is their value, and nulls.

*/

use super::{FLOAT_POSITIVE_ZERO, SYMBOL_QUALIFIER, SYMBOL_ZERO_QUALIFIER};
use crate::binary::{ScalarEncoder, IVM, NULL_NIBBLE, VAR_LENGTH};
use crate::{Error, HashValue, IonType, Result, ScalarRef};

/// Binary encoding of a scalar or null, binary version marker excluded.
pub fn get_bytes(value: &dyn HashValue) -> Result<Vec<u8>> {
    let ion_type = value.ion_type();
    if value.is_null() || ion_type == IonType::Null {
        return Ok(vec![ion_type.type_code() << 4 | NULL_NIBBLE]);
    }
    if ion_type.is_container() {
        return Err(Error::UnsupportedValueType(ion_type));
    }
    let raw = value
        .value()
        .ok_or(Error::InvalidArgument("non-null scalar without a value"))?;
    if raw.ion_type() != ion_type {
        return Err(Error::InvalidArgument("raw value does not match the value type"));
    }
    // -0e0 must go through the encoder
    if let ScalarRef::Float(f) = raw {
        if f == 0.0 && f.is_sign_positive() {
            return Ok(vec![FLOAT_POSITIVE_ZERO]);
        }
    }

    let mut encoder = ScalarEncoder::new();
    encoder.write_scalar(raw)?;
    let mut bytes = encoder.into_bytes();
    bytes.drain(..IVM.len());
    Ok(bytes)
}

/// Split the output of [`get_bytes`] into type qualifier and representation.
pub fn scalar_or_null_split_parts<'a>(
    value: &dyn HashValue,
    bytes: &'a [u8],
) -> Result<(u8, &'a [u8])> {
    let (&descriptor, rest) = bytes
        .split_first()
        .ok_or(Error::InvalidArgument("empty scalar encoding"))?;
    let ion_type = value.ion_type();
    if value.is_null() || ion_type == IonType::Null {
        return Ok((descriptor, &[]));
    }

    let mut offset = 0;
    if descriptor & 0x0F == VAR_LENGTH {
        // the VarUInt length ends with the first byte having the high bit set
        offset = rest
            .iter()
            .position(|&b| b & 0x80 != 0)
            .map(|pos| pos + 1)
            .ok_or(Error::InvalidArgument("unterminated length field"))?;
    }
    // skip a redundant zero sign byte
    if ion_type == IonType::Int && rest.get(offset) == Some(&0) {
        offset += 1;
    }

    let qualifier = match (ion_type, value.value()) {
        (IonType::Symbol, Some(ScalarRef::Symbol(token))) if token.text().is_none() => {
            SYMBOL_ZERO_QUALIFIER
        }
        (IonType::Symbol, _) => SYMBOL_QUALIFIER,
        (IonType::Bool, _) => descriptor,
        _ => descriptor & 0xF0,
    };
    Ok((qualifier, &rest[offset..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Element, SymbolToken};

    fn parts(element: &Element) -> (u8, Vec<u8>) {
        let view = element.view();
        let bytes = get_bytes(&view).unwrap();
        let (qualifier, representation) = scalar_or_null_split_parts(&view, &bytes).unwrap();
        (qualifier, representation.to_vec())
    }

    #[test]
    fn test_nulls() {
        assert_eq!(parts(&Element::null()), (0x0F, vec![]));
        assert_eq!(parts(&Element::typed_null(IonType::Int)), (0x2F, vec![]));
        assert_eq!(parts(&Element::typed_null(IonType::Symbol)), (0x7F, vec![]));
        assert_eq!(parts(&Element::typed_null(IonType::Struct)), (0xDF, vec![]));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parts(&Element::from(true)), (0x11, vec![]));
        assert_eq!(parts(&Element::from(0_i64)), (0x20, vec![]));
        assert_eq!(parts(&Element::from(-1_i64)), (0x30, vec![0x01]));
        assert_eq!(parts(&Element::from(0.0_f64)), (0x40, vec![]));
        assert_eq!(
            parts(&Element::from(-0.0_f64)),
            (0x40, vec![0x80, 0, 0, 0, 0, 0, 0, 0])
        );
        assert_eq!(
            parts(&Element::from(1.0_f64)),
            (0x40, vec![0x3F, 0xF0, 0, 0, 0, 0, 0, 0])
        );
        assert_eq!(parts(&Element::from("hi")), (0x80, b"hi".to_vec()));
    }

    #[test]
    fn test_long_representation_drops_length() {
        let text = "a string longer than fourteen bytes";
        assert_eq!(parts(&Element::from(text)), (0x80, text.as_bytes().to_vec()));
    }

    #[test]
    fn test_symbols_are_requalified() {
        assert_eq!(
            parts(&Element::symbol(SymbolToken::new("sym"))),
            (0x70, b"sym".to_vec())
        );
        assert_eq!(
            parts(&Element::symbol(SymbolToken::unknown_text(10))),
            (0x71, vec![])
        );
    }

    #[test]
    fn test_redundant_sign_byte() {
        let view = Element::from(1_i64);
        let (qualifier, representation) =
            scalar_or_null_split_parts(&view.view(), &[0x22, 0x00, 0x81]).unwrap();
        assert_eq!((qualifier, representation), (0x20, &[0x81][..]));
    }

    #[test]
    fn test_containers_are_not_scalars() {
        let list = Element::list(vec![]);
        assert_eq!(
            get_bytes(&list.view()),
            Err(Error::UnsupportedValueType(IonType::List))
        );
    }
}
