/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

The view of a value that drives hashing.

Readers and writers describe the value they are currently visiting through
the [`HashValue`] trait. The hasher never keeps a [`HashValue`] past the call
that received it: everything it needs later (e.g., whether a container opened
an annotation wrapper) is recorded in the serializer.

Raw scalar values are passed as [`ScalarRef`], which borrows from the
collaborator whenever possible.

*/

use chrono::NaiveDateTime;

/// The thirteen Ion types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IonType {
    Null,
    Bool,
    Int,
    Float,
    Decimal,
    Timestamp,
    Symbol,
    String,
    Clob,
    Blob,
    List,
    SExp,
    Struct,
}

impl IonType {
    /// The binary type code, i.e., the high nibble of the type descriptor.
    ///
    /// Integers always report the code of non-negative integers; the sign
    /// only matters in the binary encoding.
    pub const fn type_code(self) -> u8 {
        match self {
            IonType::Null => 0x0,
            IonType::Bool => 0x1,
            IonType::Int => 0x2,
            IonType::Float => 0x4,
            IonType::Decimal => 0x5,
            IonType::Timestamp => 0x6,
            IonType::Symbol => 0x7,
            IonType::String => 0x8,
            IonType::Clob => 0x9,
            IonType::Blob => 0xA,
            IonType::List => 0xB,
            IonType::SExp => 0xC,
            IonType::Struct => 0xD,
        }
    }

    /// Whether values of this type can be stepped into.
    pub const fn is_container(self) -> bool {
        matches!(self, IonType::List | IonType::SExp | IonType::Struct)
    }
}

/// A symbol as seen by the hasher: resolved text, or only an identifier.
///
/// Symbol-table resolution is left to the collaborator. A token with no text
/// but with an identifier is hashed as symbol zero; a token with neither
/// cannot be hashed as a field name or annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SymbolToken {
    text: Option<String>,
    sid: Option<usize>,
}

impl SymbolToken {
    /// A token with resolved text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            sid: None,
        }
    }

    /// A token known only by its symbol identifier.
    pub fn unknown_text(sid: usize) -> Self {
        Self {
            text: None,
            sid: Some(sid),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn sid(&self) -> Option<usize> {
        self.sid
    }
}

impl From<&str> for SymbolToken {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SymbolToken {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// A decimal with a 128-bit coefficient: `(-1)^negative * magnitude * 10^exponent`.
///
/// The sign is kept apart from the magnitude so that negative zero, which is
/// a distinct Ion value, can be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    negative: bool,
    magnitude: u128,
    exponent: i64,
}

impl Decimal {
    /// Build a decimal from a signed coefficient and an exponent.
    pub fn new(coefficient: i128, exponent: i64) -> Self {
        Self {
            negative: coefficient < 0,
            magnitude: coefficient.unsigned_abs(),
            exponent,
        }
    }

    /// Negative zero with the given exponent, e.g., `-0d2`.
    pub fn negative_zero(exponent: i64) -> Self {
        Self {
            negative: true,
            magnitude: 0,
            exponent,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude(&self) -> u128 {
        self.magnitude
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }
}

/// The precision of a [`Timestamp`]; coarser precisions are distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimestampPrecision {
    Year,
    Month,
    Day,
    Minute,
    Second,
    FractionalSecond,
}

/// An Ion timestamp.
///
/// The date and time are stored as local time, together with the offset
/// from UTC in minutes (`None` for the unknown offset `-00:00`). Timestamps
/// with year, month, or day precision never carry an offset. Fractional
/// seconds are a [`Decimal`] in `[0, 1)`, so that trailing zeros (which are
/// significant in Ion) are preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    precision: TimestampPrecision,
    local: NaiveDateTime,
    offset_minutes: Option<i32>,
    fraction: Option<Decimal>,
}

impl Timestamp {
    /// Build a timestamp with no fractional seconds.
    ///
    /// Components finer than `precision` are ignored when hashing.
    pub fn new(
        precision: TimestampPrecision,
        local: NaiveDateTime,
        offset_minutes: Option<i32>,
    ) -> Self {
        let offset_minutes = match precision {
            TimestampPrecision::Year | TimestampPrecision::Month | TimestampPrecision::Day => None,
            _ => offset_minutes,
        };
        Self {
            precision,
            local,
            offset_minutes,
            fraction: None,
        }
    }

    /// Attach fractional seconds, moving to [`TimestampPrecision::FractionalSecond`].
    pub fn with_fraction(mut self, fraction: Decimal) -> Self {
        self.precision = TimestampPrecision::FractionalSecond;
        self.fraction = Some(fraction);
        self
    }

    pub fn precision(&self) -> TimestampPrecision {
        self.precision
    }

    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn offset_minutes(&self) -> Option<i32> {
        self.offset_minutes
    }

    pub fn fraction(&self) -> Option<Decimal> {
        self.fraction
    }
}

/// The raw decoded value of a non-null scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Bool(bool),
    Int(i128),
    Float(f64),
    Decimal(Decimal),
    Timestamp(Timestamp),
    Symbol(&'a SymbolToken),
    String(&'a str),
    Clob(&'a [u8]),
    Blob(&'a [u8]),
}

impl ScalarRef<'_> {
    /// The Ion type of this raw value.
    pub fn ion_type(&self) -> IonType {
        match self {
            ScalarRef::Bool(_) => IonType::Bool,
            ScalarRef::Int(_) => IonType::Int,
            ScalarRef::Float(_) => IonType::Float,
            ScalarRef::Decimal(_) => IonType::Decimal,
            ScalarRef::Timestamp(_) => IonType::Timestamp,
            ScalarRef::Symbol(_) => IonType::Symbol,
            ScalarRef::String(_) => IonType::String,
            ScalarRef::Clob(_) => IonType::Clob,
            ScalarRef::Blob(_) => IonType::Blob,
        }
    }
}

/// The value currently visited by a reader or writer.
///
/// Implementations are supplied by the collaborators driving the
/// [`Hasher`](crate::Hasher). A view is only valid for the duration of one
/// [`Hasher::scalar`](crate::Hasher::scalar) or
/// [`Hasher::step_in`](crate::Hasher::step_in) call.
pub trait HashValue {
    /// The type of the value, also for typed nulls (e.g., `null.int`).
    fn ion_type(&self) -> IonType;

    /// Whether the value is a (typed) null.
    fn is_null(&self) -> bool;

    /// The raw value; `None` for nulls and containers.
    fn value(&self) -> Option<ScalarRef<'_>>;

    /// The annotations of the value, in order.
    fn annotations(&self) -> &[SymbolToken];

    /// The field name, meaningful only if [`is_in_struct`](HashValue::is_in_struct).
    fn field_name(&self) -> Option<&SymbolToken>;

    /// Whether the value is a direct member of a struct.
    fn is_in_struct(&self) -> bool;

    /// Whether the value is a struct.
    #[inline(always)]
    fn is_struct(&self) -> bool {
        self.ion_type() == IonType::Struct
    }
}
