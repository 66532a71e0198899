/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

An owned tree of values, and the traversal that hashes it.

[`Element`] is a convenience for callers that already hold values in memory
(and for tests): [`Element::drive`] performs the same `scalar` / `step_in` /
`step_out` sequence a reader would perform on the serialized form of the
tree, and [`Element::ion_hash`] returns the resulting digest.

```
use ionhash::{Element, IdentityProvider};

# fn main() -> ionhash::Result<()> {
let a = Element::structure([("a", Element::from(1_i64)), ("b", Element::from(2_i64))]);
let b = Element::structure([("b", Element::from(2_i64)), ("a", Element::from(1_i64))]);
assert_eq!(a.ion_hash(IdentityProvider)?, b.ion_hash(IdentityProvider)?);
# Ok(())
# }
```

*/

use crate::{
    Decimal, HashValue, Hasher, HasherProvider, IonType, Result, ScalarRef, SymbolToken,
    Timestamp,
};

/// The content of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A null of the given type; `IonType::Null` is the untyped `null`.
    Null(IonType),
    Bool(bool),
    Int(i128),
    Float(f64),
    Decimal(Decimal),
    Timestamp(Timestamp),
    Symbol(SymbolToken),
    String(String),
    Clob(Vec<u8>),
    Blob(Vec<u8>),
    List(Vec<Element>),
    SExp(Vec<Element>),
    /// Fields in document order; names may repeat.
    Struct(Vec<(SymbolToken, Element)>),
}

/// An annotated value.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    annotations: Vec<SymbolToken>,
    value: Value,
}

impl Element {
    pub fn new(value: Value) -> Self {
        Self {
            annotations: vec![],
            value,
        }
    }

    /// The untyped `null`.
    pub fn null() -> Self {
        Self::new(Value::Null(IonType::Null))
    }

    pub fn typed_null(ion_type: IonType) -> Self {
        Self::new(Value::Null(ion_type))
    }

    pub fn symbol(token: impl Into<SymbolToken>) -> Self {
        Self::new(Value::Symbol(token.into()))
    }

    pub fn clob(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Value::Clob(bytes.into()))
    }

    pub fn blob(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Value::Blob(bytes.into()))
    }

    pub fn list(elements: Vec<Element>) -> Self {
        Self::new(Value::List(elements))
    }

    pub fn sexp(elements: Vec<Element>) -> Self {
        Self::new(Value::SExp(elements))
    }

    /// A struct with the given fields, in order.
    pub fn structure<S: Into<SymbolToken>>(fields: impl IntoIterator<Item = (S, Element)>) -> Self {
        Self::new(Value::Struct(
            fields
                .into_iter()
                .map(|(name, element)| (name.into(), element))
                .collect(),
        ))
    }

    /// Replace the annotations of this element.
    pub fn with_annotations<S: Into<SymbolToken>>(
        mut self,
        annotations: impl IntoIterator<Item = S>,
    ) -> Self {
        self.annotations = annotations.into_iter().map(Into::into).collect();
        self
    }

    pub fn annotations(&self) -> &[SymbolToken] {
        &self.annotations
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn ion_type(&self) -> IonType {
        match &self.value {
            Value::Null(ion_type) => *ion_type,
            Value::Bool(_) => IonType::Bool,
            Value::Int(_) => IonType::Int,
            Value::Float(_) => IonType::Float,
            Value::Decimal(_) => IonType::Decimal,
            Value::Timestamp(_) => IonType::Timestamp,
            Value::Symbol(_) => IonType::Symbol,
            Value::String(_) => IonType::String,
            Value::Clob(_) => IonType::Clob,
            Value::Blob(_) => IonType::Blob,
            Value::List(_) => IonType::List,
            Value::SExp(_) => IonType::SExp,
            Value::Struct(_) => IonType::Struct,
        }
    }

    /// A view of this element as a top-level value.
    pub fn view(&self) -> ElementView<'_> {
        ElementView {
            element: self,
            field_name: None,
        }
    }

    /// Feed this element to `hasher`, in document order.
    pub fn drive<P: HasherProvider>(&self, hasher: &mut Hasher<P>) -> Result<()> {
        drive_view(self.view(), hasher)
    }

    /// The digest of this element alone, with hash functions from `provider`.
    pub fn ion_hash<P: HasherProvider>(&self, provider: P) -> Result<Vec<u8>> {
        let mut hasher = Hasher::new(provider)?;
        self.drive(&mut hasher)?;
        hasher.sum(&[])
    }
}

fn drive_view<P: HasherProvider>(view: ElementView<'_>, hasher: &mut Hasher<P>) -> Result<()> {
    match &view.element.value {
        Value::List(elements) | Value::SExp(elements) => {
            hasher.step_in(&view)?;
            for element in elements {
                drive_view(element.view(), hasher)?;
            }
            hasher.step_out()
        }
        Value::Struct(fields) => {
            hasher.step_in(&view)?;
            for (name, element) in fields {
                drive_view(
                    ElementView {
                        element,
                        field_name: Some(name),
                    },
                    hasher,
                )?;
            }
            hasher.step_out()
        }
        _ => hasher.scalar(&view),
    }
}

/// An [`Element`] seen as a [`HashValue`], possibly as a struct field.
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    element: &'a Element,
    field_name: Option<&'a SymbolToken>,
}

impl HashValue for ElementView<'_> {
    fn ion_type(&self) -> IonType {
        self.element.ion_type()
    }

    fn is_null(&self) -> bool {
        matches!(self.element.value, Value::Null(_))
    }

    fn value(&self) -> Option<ScalarRef<'_>> {
        Some(match &self.element.value {
            Value::Bool(b) => ScalarRef::Bool(*b),
            Value::Int(i) => ScalarRef::Int(*i),
            Value::Float(f) => ScalarRef::Float(*f),
            Value::Decimal(d) => ScalarRef::Decimal(*d),
            Value::Timestamp(ts) => ScalarRef::Timestamp(*ts),
            Value::Symbol(token) => ScalarRef::Symbol(token),
            Value::String(s) => ScalarRef::String(s),
            Value::Clob(bytes) => ScalarRef::Clob(bytes),
            Value::Blob(bytes) => ScalarRef::Blob(bytes),
            Value::Null(_) | Value::List(_) | Value::SExp(_) | Value::Struct(_) => return None,
        })
    }

    fn annotations(&self) -> &[SymbolToken] {
        &self.element.annotations
    }

    fn field_name(&self) -> Option<&SymbolToken> {
        self.field_name
    }

    fn is_in_struct(&self) -> bool {
        self.field_name.is_some()
    }
}

impl From<Value> for Element {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Self::new(Value::Bool(value))
    }
}

impl From<i64> for Element {
    fn from(value: i64) -> Self {
        Self::new(Value::Int(value as i128))
    }
}

impl From<i128> for Element {
    fn from(value: i128) -> Self {
        Self::new(Value::Int(value))
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Self::new(Value::Float(value))
    }
}

impl From<Decimal> for Element {
    fn from(value: Decimal) -> Self {
        Self::new(Value::Decimal(value))
    }
}

impl From<Timestamp> for Element {
    fn from(value: Timestamp) -> Self {
        Self::new(Value::Timestamp(value))
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Self::new(Value::String(value.to_string()))
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Self::new(Value::String(value))
    }
}
