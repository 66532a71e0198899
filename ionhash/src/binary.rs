/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

A throwaway binary encoder for single scalar values.

Scalar representations are derived from the format's own binary encoding:
[`ScalarEncoder`] writes a complete stream (the binary version marker
followed by exactly one value), and the serializer then strips the marker and
splits the type descriptor from the representation.

The primitive encodings follow the binary format: `UInt` and `Int` are
fixed-length big-endian (the latter in signed-magnitude form), while `VarUInt`
and `VarInt` use seven bits per byte with the high bit marking the last byte.

*/

use crate::{Decimal, Error, IonType, Result, ScalarRef, Timestamp, TimestampPrecision};
use chrono::{Datelike, Timelike};

/// Binary version marker opening every binary stream.
pub const IVM: [u8; 4] = [0xE0, 0x01, 0x00, 0xEA];

/// Low nibble of a type descriptor announcing a `VarUInt` length field.
pub const VAR_LENGTH: u8 = 0x0E;

/// Low nibble of a type descriptor denoting a typed null.
pub const NULL_NIBBLE: u8 = 0x0F;

/// Type code of negative integers; non-negative ones use [`IonType::type_code`].
const NEG_INT_TYPE_CODE: u8 = 0x3;

/// Bit pattern used for every NaN, so that all NaNs hash alike.
const CANONICAL_NAN: u64 = 0x7FF8_0000_0000_0000;

/// Minimal big-endian encoding of `value`; zero is empty.
pub fn uint_bytes(value: u128) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    bytes[skip..].to_vec()
}

/// Signed-magnitude encoding; positive zero is empty, negative zero is `0x80`.
pub fn int_bytes(negative: bool, magnitude: u128) -> Vec<u8> {
    let mut bytes = uint_bytes(magnitude);
    if bytes.is_empty() {
        if negative {
            bytes.push(0x80);
        }
        return bytes;
    }
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0);
    }
    if negative {
        bytes[0] |= 0x80;
    }
    bytes
}

/// `VarUInt` encoding.
pub fn var_uint(mut value: u64) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7F) as u8 | 0x80];
    value >>= 7;
    while value != 0 {
        bytes.push((value & 0x7F) as u8);
        value >>= 7;
    }
    bytes.reverse();
    bytes
}

/// `VarInt` encoding; the first byte carries the sign in bit 6.
pub fn var_int(negative: bool, magnitude: u64) -> Vec<u8> {
    let mut bytes = var_uint(magnitude);
    // the first byte has only six payload bits
    if bytes[0] & 0x40 != 0 {
        bytes.insert(0, 0);
    }
    if negative {
        bytes[0] |= 0x40;
    }
    bytes
}

fn var_int_i64(value: i64) -> Vec<u8> {
    var_int(value < 0, value.unsigned_abs())
}

/// Writes one scalar value after the binary version marker.
#[derive(Debug, Clone)]
pub struct ScalarEncoder {
    buf: Vec<u8>,
}

impl Default for ScalarEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarEncoder {
    pub fn new() -> Self {
        Self { buf: IVM.to_vec() }
    }

    /// Consume the encoder, returning the whole stream, marker included.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Write a typed null, e.g., `null.string`.
    pub fn write_null(&mut self, ion_type: IonType) {
        self.buf.push(ion_type.type_code() << 4 | NULL_NIBBLE);
    }

    /// Write a non-null scalar.
    pub fn write_scalar(&mut self, value: ScalarRef<'_>) -> Result<()> {
        match value {
            ScalarRef::Bool(b) => self.buf.push(IonType::Bool.type_code() << 4 | b as u8),
            ScalarRef::Int(i) => {
                let type_code = if i < 0 {
                    NEG_INT_TYPE_CODE
                } else {
                    IonType::Int.type_code()
                };
                self.write_value(type_code, &uint_bytes(i.unsigned_abs()));
            }
            ScalarRef::Float(f) => {
                if f == 0.0 && f.is_sign_positive() {
                    self.write_value(IonType::Float.type_code(), &[]);
                } else {
                    let bits = if f.is_nan() { CANONICAL_NAN } else { f.to_bits() };
                    self.write_value(IonType::Float.type_code(), &bits.to_be_bytes());
                }
            }
            ScalarRef::Decimal(d) => {
                self.write_value(IonType::Decimal.type_code(), &decimal_representation(d))
            }
            ScalarRef::Timestamp(ts) => {
                let representation = timestamp_representation(&ts)?;
                self.write_value(IonType::Timestamp.type_code(), &representation);
            }
            ScalarRef::Symbol(token) => match token.text() {
                Some(text) => self.write_value(IonType::String.type_code(), text.as_bytes()),
                // symbol zero
                None => self.write_value(IonType::Symbol.type_code(), &[]),
            },
            ScalarRef::String(s) => self.write_value(IonType::String.type_code(), s.as_bytes()),
            ScalarRef::Clob(bytes) => self.write_value(IonType::Clob.type_code(), bytes),
            ScalarRef::Blob(bytes) => self.write_value(IonType::Blob.type_code(), bytes),
        }
        Ok(())
    }

    /// Type descriptor, optional `VarUInt` length, and representation.
    fn write_value(&mut self, type_code: u8, representation: &[u8]) {
        let len = representation.len();
        if len < VAR_LENGTH as usize {
            self.buf.push(type_code << 4 | len as u8);
        } else {
            self.buf.push(type_code << 4 | VAR_LENGTH);
            self.buf.extend_from_slice(&var_uint(len as u64));
        }
        self.buf.extend_from_slice(representation);
    }
}

fn decimal_representation(d: Decimal) -> Vec<u8> {
    // 0d0 has no representation at all
    if d.magnitude() == 0 && !d.is_negative() && d.exponent() == 0 {
        return vec![];
    }
    let mut representation = var_int_i64(d.exponent());
    representation.extend(int_bytes(d.is_negative(), d.magnitude()));
    representation
}

fn timestamp_representation(ts: &Timestamp) -> Result<Vec<u8>> {
    // binary timestamps store UTC components
    let utc = match ts.offset_minutes() {
        Some(minutes) => ts
            .local()
            .checked_sub_signed(chrono::Duration::minutes(minutes as i64))
            .ok_or(Error::InvalidArgument("timestamp offset overflows the date range"))?,
        None => ts.local(),
    };
    let mut representation = match ts.offset_minutes() {
        Some(minutes) => var_int(minutes < 0, minutes.unsigned_abs() as u64),
        None => var_int(true, 0),
    };

    let year = u64::try_from(utc.year())
        .map_err(|_| Error::InvalidArgument("timestamp year must be positive"))?;
    representation.extend(var_uint(year));
    let precision = ts.precision();
    if precision >= TimestampPrecision::Month {
        representation.extend(var_uint(utc.month() as u64));
    }
    if precision >= TimestampPrecision::Day {
        representation.extend(var_uint(utc.day() as u64));
    }
    if precision >= TimestampPrecision::Minute {
        representation.extend(var_uint(utc.hour() as u64));
        representation.extend(var_uint(utc.minute() as u64));
    }
    if precision >= TimestampPrecision::Second {
        representation.extend(var_uint(utc.second() as u64));
    }
    if let (TimestampPrecision::FractionalSecond, Some(fraction)) = (precision, ts.fraction()) {
        representation.extend(var_int_i64(fraction.exponent()));
        representation.extend(int_bytes(fraction.is_negative(), fraction.magnitude()));
    }
    Ok(representation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn encode(value: ScalarRef<'_>) -> Vec<u8> {
        let mut encoder = ScalarEncoder::new();
        encoder.write_scalar(value).unwrap();
        encoder.into_bytes()[IVM.len()..].to_vec()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(uint_bytes(0), Vec::<u8>::new());
        assert_eq!(uint_bytes(0x0102), vec![0x01, 0x02]);
        assert_eq!(int_bytes(false, 0x80), vec![0x00, 0x80]);
        assert_eq!(int_bytes(true, 0x7F), vec![0xFF]);
        assert_eq!(int_bytes(true, 0), vec![0x80]);
        assert_eq!(var_uint(0), vec![0x80]);
        assert_eq!(var_uint(0x7F), vec![0xFF]);
        assert_eq!(var_uint(0x80), vec![0x01, 0x80]);
        assert_eq!(var_int(false, 0x3F), vec![0xBF]);
        assert_eq!(var_int(false, 0x40), vec![0x00, 0xC0]);
        assert_eq!(var_int(true, 1), vec![0xC1]);
        assert_eq!(var_int(true, 0), vec![0xC0]);
    }

    #[test]
    fn test_ints() {
        assert_eq!(encode(ScalarRef::Int(0)), vec![0x20]);
        assert_eq!(encode(ScalarRef::Int(5)), vec![0x21, 0x05]);
        assert_eq!(encode(ScalarRef::Int(-256)), vec![0x32, 0x01, 0x00]);
    }

    #[test]
    fn test_floats() {
        assert_eq!(encode(ScalarRef::Float(0.0)), vec![0x40]);
        assert_eq!(
            encode(ScalarRef::Float(-0.0)),
            vec![0x48, 0x80, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            encode(ScalarRef::Float(f64::NAN)),
            encode(ScalarRef::Float(-f64::NAN))
        );
    }

    #[test]
    fn test_long_representation() {
        let s = "abcdefghijklmnopq";
        let bytes = encode(ScalarRef::String(s));
        assert_eq!(&bytes[..2], &[0x8E, 0x80 | s.len() as u8]);
        assert_eq!(&bytes[2..], s.as_bytes());
    }

    #[test]
    fn test_decimals() {
        assert_eq!(encode(ScalarRef::Decimal(Decimal::new(0, 0))), vec![0x50]);
        assert_eq!(
            encode(ScalarRef::Decimal(Decimal::new(-15, -1))),
            vec![0x52, 0xC1, 0x8F]
        );
        assert_eq!(
            encode(ScalarRef::Decimal(Decimal::negative_zero(0))),
            vec![0x52, 0x80, 0x80]
        );
    }

    #[test]
    fn test_timestamp_utc_shift() {
        let local = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let ts = Timestamp::new(TimestampPrecision::Minute, local, Some(60));
        // offset +60, 2000-01-01T00:30Z
        assert_eq!(
            encode(ScalarRef::Timestamp(ts)),
            vec![0x67, 0xBC, 0x0F, 0xD0, 0x81, 0x81, 0x80, 0x9E]
        );

        let ts = Timestamp::new(TimestampPrecision::Year, local, Some(60));
        assert_eq!(encode(ScalarRef::Timestamp(ts)), vec![0x63, 0xC0, 0x0F, 0xD0]);
    }
}
