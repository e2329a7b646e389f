// used to keep value references in a stable order
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::datatype::Shape;
use crate::error::{Result, TemporaError};

/// Where a stored time value lives: one field for an instant, two for a period.
#[derive(Eq, PartialEq, Debug, Hash, Clone, Serialize, Deserialize)]
pub enum FieldDescriptor {
    Instant { position: String },
    Period { begin: String, end: String },
}
impl FieldDescriptor {
    pub fn instant(position: impl Into<String>) -> Self {
        FieldDescriptor::Instant { position: position.into() }
    }
    pub fn period(begin: impl Into<String>, end: impl Into<String>) -> Self {
        FieldDescriptor::Period { begin: begin.into(), end: end.into() }
    }
    pub fn shape(&self) -> Shape {
        match self {
            FieldDescriptor::Instant { .. } => Shape::Instant,
            FieldDescriptor::Period { .. } => Shape::Period,
        }
    }
    /// The field whose nullness tells whether this descriptor holds a value at all.
    pub fn anchor(&self) -> &str {
        match self {
            FieldDescriptor::Instant { position } => position,
            FieldDescriptor::Period { begin, .. } => begin,
        }
    }
}
impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldDescriptor::Instant { position } => write!(f, "{}", position),
            FieldDescriptor::Period { begin, end } => write!(f, "[{}, {}]", begin, end),
        }
    }
}

/// A primary descriptor that may be absent on a given row, with an alternate
/// (possibly differently shaped) to consult when it is.
#[derive(Eq, PartialEq, Debug, Hash, Clone, Serialize, Deserialize)]
pub struct NullableFieldDescriptor {
    pub primary: FieldDescriptor,
    pub alternate: FieldDescriptor,
}
impl NullableFieldDescriptor {
    pub fn new(primary: FieldDescriptor, alternate: FieldDescriptor) -> Self {
        Self { primary, alternate }
    }
}

/// The stored ("self") side of a relation.
#[derive(Eq, PartialEq, Debug, Hash, Clone, Serialize, Deserialize)]
pub enum StoredField {
    Plain(FieldDescriptor),
    Nullable(NullableFieldDescriptor),
}
impl From<FieldDescriptor> for StoredField {
    fn from(descriptor: FieldDescriptor) -> Self {
        StoredField::Plain(descriptor)
    }
}
impl From<NullableFieldDescriptor> for StoredField {
    fn from(descriptor: NullableFieldDescriptor) -> Self {
        StoredField::Nullable(descriptor)
    }
}

/// Maps value references used by filters (e.g. `phenomenonTime`) to the
/// stored fields that hold them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldRegistry {
    fields: BTreeMap<String, StoredField>,
}
impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn register(&mut self, reference: impl Into<String>, field: impl Into<StoredField>) -> &mut Self {
        self.fields.insert(reference.into(), field.into());
        self
    }
    pub fn with(mut self, reference: impl Into<String>, field: impl Into<StoredField>) -> Self {
        self.register(reference, field);
        self
    }
    pub fn lookup(&self, reference: &str) -> Result<&StoredField> {
        self.fields
            .get(reference)
            .ok_or_else(|| TemporaError::UnknownValueReference(reference.to_string()))
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
